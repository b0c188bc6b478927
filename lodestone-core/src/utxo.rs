use crate::transaction::Output;
use serde::{Deserialize, Serialize};
use shared::{Amount, OutputIndex, TxId};
use std::collections::HashMap;

/// Identificador único de uma saída de transação (`OutPoint`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: TxId,
    pub vout: OutputIndex,
}

impl OutPoint {
    /// Cria um novo `OutPoint`
    #[must_use]
    pub const fn new(txid: TxId, vout: OutputIndex) -> Self {
        Self { txid, vout }
    }
}

/// Conjunto de saídas não gastas.
///
/// Cada bloco aceito carrega o seu próprio snapshot; depois de anexado a um
/// bloco o snapshot nunca é mutado.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtxoSet {
    utxos: HashMap<OutPoint, Output>,
}

impl UtxoSet {
    /// Cria um novo conjunto vazio de UTXOs
    #[must_use]
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Adiciona uma saída ao conjunto
    pub fn insert(&mut self, outpoint: OutPoint, output: Output) -> Option<Output> {
        self.utxos.insert(outpoint, output)
    }

    /// Remove uma saída do conjunto (quando é gasta)
    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<Output> {
        self.utxos.remove(outpoint)
    }

    /// Obtém uma saída do conjunto
    #[must_use]
    pub fn get(&self, outpoint: &OutPoint) -> Option<&Output> {
        self.utxos.get(outpoint)
    }

    /// Verifica se uma saída existe
    #[must_use]
    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    /// Retorna o número total de UTXOs
    #[must_use]
    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    /// Verifica se o conjunto está vazio
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Itera sobre todas as saídas não gastas
    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &Output)> {
        self.utxos.iter()
    }

    /// Valor total das saídas do conjunto; `None` em caso de overflow
    #[must_use]
    pub fn total_amount(&self) -> Option<Amount> {
        self.utxos
            .values()
            .try_fold(0u64, |total, output| total.checked_add(output.amount))
    }
}
