use crate::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsymmetricError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("plaintext of {actual} bytes exceeds the {max} byte limit")]
    PlaintextTooLong { max: usize, actual: usize },

    #[error("encryption failed: {0}")]
    Encryption(String),

    /// 解密失败。不携带任何细节，以免形成填充预言机。
    #[error("decryption failed")]
    Decryption,

    #[error("key encoding failed: {0}")]
    KeyEncoding(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl AsymmetricError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AsymmetricError::KeyGeneration(_) => ErrorKind::Generation,
            AsymmetricError::PlaintextTooLong { .. } => ErrorKind::Argument,
            AsymmetricError::Decryption => ErrorKind::Decrypt,
            AsymmetricError::InvalidKey(_) => ErrorKind::Format,
            AsymmetricError::Encryption(_) | AsymmetricError::KeyEncoding(_) => {
                ErrorKind::Internal
            }
        }
    }
}
