pub mod block;
pub mod blockchain;
pub mod error;
pub mod merkle;
pub mod mining;
pub mod predicate;
pub mod transaction;
pub mod utxo;

// Re-exports principais
pub use block::Block;
pub use blockchain::{Blockchain, ChainEntry, ChainParams, ChainStats};
pub use error::PredicateError;
pub use merkle::{merkle_root, transaction_merkle_root};
pub use mining::{Miner, MinerConfig, MiningOutcome};
pub use predicate::{Predicate, Value};
pub use transaction::{Input, Output, Transaction};
pub use utxo::{OutPoint, UtxoSet};

// Re-exports de tipos compartilhados
pub use shared::{Amount, BlockHeight, BlockId, ChainError, Hash256, Result, TxId, U256};
