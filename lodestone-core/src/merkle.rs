use crate::transaction::Transaction;
use shared::{Hash256, Result};

/// Calcula a raiz de Merkle de uma lista ordenada de hashes-folha.
///
/// Lista vazia produz zero; uma única folha é a sua própria raiz. Cada
/// nível ímpar é completado com a sentinela zero e os pares são combinados
/// por SHA-256 sobre as formas big-endian de 32 bytes.
#[must_use]
pub fn merkle_root(leaves: Vec<Hash256>) -> Hash256 {
    if leaves.is_empty() {
        return Hash256::zero();
    }

    let mut level = leaves;
    while level.len() > 1 {
        let mut next_level = Vec::with_capacity((level.len() + 1) / 2);

        for pair in level.chunks(2) {
            let left = pair[0];
            let right = if pair.len() == 2 {
                pair[1]
            } else {
                Hash256::zero()
            };

            let mut combined = [0u8; 64];
            combined[..32].copy_from_slice(&left.to_be_bytes());
            combined[32..].copy_from_slice(&right.to_be_bytes());
            next_level.push(Hash256::sha256(&combined));
        }

        level = next_level;
    }

    level[0]
}

/// Calcula a raiz de Merkle das transações de um bloco
///
/// # Errors
///
/// Retorna erro se o cálculo do identificador de alguma transação falhar
pub fn transaction_merkle_root(transactions: &[Transaction]) -> Result<Hash256> {
    let leaves = transactions
        .iter()
        .map(Transaction::id)
        .collect::<Result<Vec<_>>>()?;
    Ok(merkle_root(leaves))
}
