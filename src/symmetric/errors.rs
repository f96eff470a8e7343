use crate::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymmetricError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("input is required")]
    MissingInput,

    #[error("Base64 decoding failed: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// 填充错误、长度错误与非 UTF-8 输出都归入这一项。
    #[error("decryption failed")]
    Decryption,

    #[error("key generation failed: {0}")]
    KeyGeneration(#[from] rand_core::OsError),
}

impl SymmetricError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SymmetricError::InvalidKeyLength { .. } | SymmetricError::InvalidIvLength { .. } => {
                ErrorKind::Configuration
            }
            SymmetricError::MissingInput => ErrorKind::Argument,
            SymmetricError::Base64Decode(_) => ErrorKind::Format,
            SymmetricError::Decryption => ErrorKind::Decrypt,
            SymmetricError::KeyGeneration(_) => ErrorKind::Generation,
        }
    }
}
