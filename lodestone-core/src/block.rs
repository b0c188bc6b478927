use crate::merkle::transaction_merkle_root;
use crate::transaction::Transaction;
use crate::utxo::{OutPoint, UtxoSet};
use serde::{Deserialize, Serialize};
use shared::{Amount, BlockId, ChainError, Hash256, Nonce, OutputIndex, Result, U256};

/// Bloco da cadeia Lodestone.
///
/// O identificador deriva do bloco anterior, da raiz de Merkle das
/// transações, do alvo de dificuldade e do nonce; qualquer alteração nesses
/// campos muda o identificador.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Hash do bloco anterior; ausente somente no bloco gênese
    prior: Option<BlockId>,
    /// Alvo de dificuldade: o hash do bloco deve ficar abaixo deste valor
    target: U256,
    /// Nonce de mineração
    nonce: Nonce,
    /// Transações do bloco
    transactions: Vec<Transaction>,
}

impl Block {
    /// Cria um bloco vazio, sem antecessor e com alvo zero
    #[must_use]
    pub fn new() -> Self {
        Self {
            prior: None,
            target: U256::zero(),
            nonce: 0,
            transactions: Vec::new(),
        }
    }

    /// Substitui as transações do bloco
    pub fn set_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }

    /// Transações do bloco
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Define o alvo de dificuldade
    pub fn set_target(&mut self, target: U256) {
        self.target = target;
    }

    /// Alvo de dificuldade do bloco
    #[must_use]
    pub const fn target(&self) -> U256 {
        self.target
    }

    /// Define o hash do bloco anterior
    pub fn set_prior(&mut self, prior: Option<BlockId>) {
        self.prior = prior;
    }

    /// Hash do bloco anterior
    #[must_use]
    pub const fn prior(&self) -> Option<BlockId> {
        self.prior
    }

    /// Nonce atual do bloco
    #[must_use]
    pub const fn nonce(&self) -> Nonce {
        self.nonce
    }

    /// Codificação canônica do cabeçalho: concatenação, sem delimitadores,
    /// das formas decimais de (anterior, raiz de Merkle, alvo, nonce) em
    /// UTF-8. Um antecessor ausente é codificado como a string vazia.
    fn header_bytes(&self, merkle_root: Hash256) -> Vec<u8> {
        let mut header = String::new();
        if let Some(prior) = self.prior {
            header.push_str(&prior.as_u256().to_string());
        }
        header.push_str(&merkle_root.as_u256().to_string());
        header.push_str(&self.target.to_string());
        header.push_str(&self.nonce.to_string());
        header.into_bytes()
    }

    fn id_with_root(&self, merkle_root: Hash256) -> BlockId {
        Hash256::sha256(&self.header_bytes(merkle_root))
    }

    /// Calcula o identificador do bloco
    ///
    /// # Errors
    ///
    /// Retorna erro se a serialização de alguma transação falhar
    pub fn id(&self) -> Result<BlockId> {
        let merkle_root = transaction_merkle_root(&self.transactions)?;
        Ok(self.id_with_root(merkle_root))
    }

    /// Tenta no máximo `limit` nonces a partir do valor atual, contra o
    /// alvo já definido no bloco. Retorna o identificador encontrado ou
    /// `None` se o orçamento se esgotar; o nonce fica posicionado para a
    /// próxima chamada continuar a busca.
    ///
    /// # Errors
    ///
    /// Retorna erro se a serialização de alguma transação falhar
    pub fn try_nonces(&mut self, limit: u64) -> Result<Option<BlockId>> {
        let merkle_root = transaction_merkle_root(&self.transactions)?;

        for _ in 0..limit {
            let id = self.id_with_root(merkle_root);
            if id.meets_target(self.target) {
                return Ok(Some(id));
            }
            self.nonce = self.nonce.wrapping_add(1);
        }

        Ok(None)
    }

    /// Minera o bloco: define o alvo e procura, a partir do nonce atual, um
    /// nonce cujo hash fique abaixo do alvo. Determinístico para estado
    /// inicial igual; sem limite de tempo no pior caso.
    ///
    /// # Errors
    ///
    /// Retorna erro se o alvo for zero ou se a serialização de alguma
    /// transação falhar
    pub fn mine(&mut self, target: U256) -> Result<()> {
        if target.is_zero() {
            return Err(ChainError::ZeroTarget);
        }
        self.target = target;

        loop {
            if self.try_nonces(u64::MAX)?.is_some() {
                return Ok(());
            }
        }
    }

    /// Valida o bloco contra o snapshot UTXO do bloco anterior e devolve o
    /// snapshot resultante.
    ///
    /// Um bloco sem transações é válido; havendo transações, a primeira
    /// deve ser uma coinbase dentro do limite de emissão e as demais devem
    /// validar contra o snapshot em evolução. As saídas de cada transação
    /// são aplicadas antes de remover as entradas, permitindo que uma
    /// transação gaste saídas criadas anteriormente no mesmo bloco.
    ///
    /// # Errors
    ///
    /// Retorna erro se a prova de trabalho não atingir o alvo, se a
    /// coinbase estiver ausente ou acima do limite, ou se alguma transação
    /// de gasto for inválida
    pub fn validate(&self, parent_utxo: &UtxoSet, max_mint: Amount) -> Result<UtxoSet> {
        let merkle_root = transaction_merkle_root(&self.transactions)?;
        if !self.id_with_root(merkle_root).meets_target(self.target) {
            return Err(ChainError::TargetNotMet);
        }

        let mut working = parent_utxo.clone();

        for (index, tx) in self.transactions.iter().enumerate() {
            if index == 0 {
                if !tx.validate_mint(max_mint) {
                    return Err(ChainError::InvalidCoinbase);
                }
            } else if !tx.validate_spend(&working) {
                return Err(ChainError::InvalidTransaction(format!(
                    "transaction {index} failed spend validation"
                )));
            }

            let txid = tx.id()?;
            for (position, output) in tx.outputs.iter().enumerate() {
                let vout = OutputIndex::try_from(position).map_err(|_| {
                    ChainError::InvalidBlock("output index overflow".to_string())
                })?;
                working.insert(OutPoint::new(txid, vout), output.clone());
            }
            for input in &tx.inputs {
                working.remove(&input.reference());
            }
        }

        Ok(working)
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}
