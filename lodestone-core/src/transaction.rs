use crate::predicate::{Predicate, Value};
use crate::utxo::{OutPoint, UtxoSet};
use serde::{Deserialize, Serialize};
use shared::{Amount, ChainError, Hash256, OutputIndex, Result, TxId};

/// Saída de transação
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Predicado que autoriza o gasto; ausente permite gastar livremente
    pub constraint: Option<Predicate>,
    /// Quantidade de moedas associada à saída
    pub amount: Amount,
}

impl Output {
    /// Cria uma nova saída de transação
    #[must_use]
    pub const fn new(constraint: Option<Predicate>, amount: Amount) -> Self {
        Self { constraint, amount }
    }

    /// Cria uma saída sem restrição de gasto
    #[must_use]
    pub const fn open(amount: Amount) -> Self {
        Self {
            constraint: None,
            amount,
        }
    }

    /// Verifica se o satisfier autoriza o gasto desta saída.
    ///
    /// O predicado é código não confiável: somente um `true` literal
    /// autoriza; qualquer erro de avaliação é tratado como recusa.
    #[must_use]
    pub fn can_spend(&self, satisfier: &[Value]) -> bool {
        match &self.constraint {
            None => true,
            Some(predicate) => matches!(predicate.evaluate(satisfier), Ok(true)),
        }
    }
}

/// Entrada de transação
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Referência à saída sendo gasta
    pub previous_output: OutPoint,
    /// Argumentos passados ao predicado da saída referenciada
    pub satisfier: Vec<Value>,
}

impl Input {
    /// Cria uma nova entrada de transação
    #[must_use]
    pub const fn new(previous_output: OutPoint, satisfier: Vec<Value>) -> Self {
        Self {
            previous_output,
            satisfier,
        }
    }

    /// Referência `(txid, índice)` da saída gasta
    #[must_use]
    pub const fn reference(&self) -> OutPoint {
        self.previous_output
    }

    /// Argumentos do satisfier
    #[must_use]
    pub fn satisfier(&self) -> &[Value] {
        &self.satisfier
    }
}

/// Transação na cadeia Lodestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Entradas da transação; vazio identifica uma coinbase
    pub inputs: Vec<Input>,
    /// Saídas da transação
    pub outputs: Vec<Output>,
    /// Dados opacos escolhidos pelo criador da transação
    pub data: Vec<u8>,
}

impl Transaction {
    /// Cria uma nova transação
    #[must_use]
    pub const fn new(inputs: Vec<Input>, outputs: Vec<Output>, data: Vec<u8>) -> Self {
        Self {
            inputs,
            outputs,
            data,
        }
    }

    /// Cria uma transação de coinbase (sem entradas)
    #[must_use]
    pub const fn coinbase(outputs: Vec<Output>, data: Vec<u8>) -> Self {
        Self::new(Vec::new(), outputs, data)
    }

    /// Calcula o identificador da transação: SHA-256 da codificação
    /// canônica de (entradas, saídas, dados)
    ///
    /// # Errors
    ///
    /// Retorna erro se a serialização da transação falhar
    pub fn id(&self) -> Result<TxId> {
        let encoded = serde_json::to_vec(self)
            .map_err(|e| ChainError::SerializationError(e.to_string()))?;
        Ok(Hash256::sha256(&encoded))
    }

    /// Verifica se é uma transação de coinbase
    #[must_use]
    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Obtém a saída no índice dado
    #[must_use]
    pub fn output(&self, index: OutputIndex) -> Option<&Output> {
        self.outputs.get(index as usize)
    }

    /// Valor total das saídas; `None` em caso de overflow
    #[must_use]
    pub fn total_output_amount(&self) -> Option<Amount> {
        self.outputs
            .iter()
            .try_fold(0u64, |total, output| total.checked_add(output.amount))
    }

    /// Valida uma transação de criação de moedas.
    ///
    /// Válida quando não há entradas e a soma das saídas não excede o
    /// máximo permitido por bloco.
    #[must_use]
    pub fn validate_mint(&self, max_mint: Amount) -> bool {
        if !self.inputs.is_empty() {
            return false;
        }
        match self.total_output_amount() {
            Some(total) => total <= max_mint,
            None => false,
        }
    }

    /// Valida uma transação de gasto contra um conjunto de UTXOs.
    ///
    /// Cada entrada deve referenciar uma saída presente no conjunto e o
    /// predicado da saída deve autorizar o satisfier; a soma das saídas
    /// referenciadas deve cobrir a soma das saídas criadas. Falhas são
    /// reportadas por valor, nunca por pânico.
    #[must_use]
    pub fn validate_spend(&self, utxos: &UtxoSet) -> bool {
        let output_total = match self.total_output_amount() {
            Some(total) => total,
            None => return false,
        };

        let mut input_total: Amount = 0;
        for input in &self.inputs {
            let spent = match utxos.get(&input.reference()) {
                Some(output) => output,
                None => return false,
            };
            if !spent.can_spend(input.satisfier()) {
                return false;
            }
            input_total = match input_total.checked_add(spent.amount) {
                Some(total) => total,
                None => return false,
            };
        }

        input_total >= output_total
    }
}
