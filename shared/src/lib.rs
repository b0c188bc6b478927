pub mod error;
pub mod hash;
pub mod types;

pub use error::ChainError;
pub use hash::Hash256;
pub use types::{Amount, BlockHeight, BlockId, Nonce, OutputIndex, TxId};

// Re-export do inteiro de 256 bits usado para alvos de dificuldade
pub use primitive_types::U256;

pub type Result<T> = std::result::Result<T, ChainError>;
