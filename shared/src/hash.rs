use primitive_types::U256;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::ChainError;

/// Hash de 256 bits usado para identificar blocos e transações,
/// interpretado como inteiro sem sinal big-endian
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Hash256(U256);

impl Hash256 {
    /// Creates a zeroed hash
    #[must_use]
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// Returns true if every bit is zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Computes the SHA-256 hash of the provided data
    #[must_use]
    pub fn sha256(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(U256::from_big_endian(&bytes))
    }

    /// Creates a hash from its 32-byte big-endian form
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_big_endian(&bytes))
    }

    /// Returns the 32-byte big-endian form of the hash
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.0.to_big_endian(&mut bytes);
        bytes
    }

    /// Returns the hash as a 256-bit unsigned integer
    #[must_use]
    pub const fn as_u256(self) -> U256 {
        self.0
    }

    /// Verifica se o hash fica estritamente abaixo do alvo de dificuldade
    #[must_use]
    pub fn meets_target(&self, target: U256) -> bool {
        self.0 < target
    }
}

impl From<U256> for Hash256 {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_be_bytes()))
    }
}

impl FromStr for Hash256 {
    type Err = ChainError;

    fn from_str(hex_string: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(hex_string).map_err(|_| ChainError::InvalidHash)?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| ChainError::InvalidHash)?;
        Ok(Self::from_be_bytes(bytes))
    }
}
