use thiserror::Error;

/// Erros relacionados ao motor de blockchain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Transação inválida: {0}")]
    InvalidTransaction(String),

    #[error("Bloco inválido: {0}")]
    InvalidBlock(String),

    #[error("Hash inválido")]
    InvalidHash,

    #[error("Coinbase ausente ou inválida")]
    InvalidCoinbase,

    #[error("Prova de trabalho não atinge o alvo")]
    TargetNotMet,

    #[error("Alvo de dificuldade deve ser positivo")]
    ZeroTarget,

    #[error("Bloco anterior desconhecido")]
    UnknownPriorBlock,

    #[error("Erro de serialização: {0}")]
    SerializationError(String),
}
