//! Tipos compartilhados entre os módulos do Lodestone

/// Alias para identificador único de transação
pub type TxId = crate::Hash256;

/// Alias para identificador único de bloco
pub type BlockId = crate::Hash256;

/// Alias para valor monetário
pub type Amount = u64;

/// Alias para altura do bloco na cadeia
pub type BlockHeight = u64;

/// Alias para índice de saída de transação
pub type OutputIndex = u32;

/// Alias para o nonce de mineração
pub type Nonce = u64;
