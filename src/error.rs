//! Defines the custom error type for the `seal-gate` crate.

use crate::asymmetric::errors::AsymmetricError;
use crate::common::pem::PemError;
#[cfg(feature = "symmetric")]
use crate::symmetric::errors::SymmetricError;
use thiserror::Error;

/// The main error type for the `seal-gate` crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("asymmetric cryptography error: {0}")]
    Asymmetric(#[from] AsymmetricError),

    #[cfg(feature = "symmetric")]
    #[error("symmetric cryptography error: {0}")]
    Symmetric(#[from] SymmetricError),

    #[error("PEM error: {0}")]
    Pem(#[from] PemError),

    #[error("decoding from Base64 failed: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),

    #[error("invalid data format: {0}")]
    FormatError(String),

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("debug key export is only available in development mode")]
    Unauthorized,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`], used at the service boundary to pick
/// a response without inspecting nested module errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The randomness source or key generation failed.
    Generation,
    /// Malformed Base64 or PEM input.
    Format,
    /// A required input was absent or out of bounds.
    Argument,
    /// Ciphertext did not decrypt under the current key. Deliberately opaque.
    Decrypt,
    /// Operation refused in the current run mode.
    Authorization,
    /// Invalid key sizes, policies or configuration files.
    Configuration,
    Internal,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Asymmetric(err) => err.kind(),
            #[cfg(feature = "symmetric")]
            Error::Symmetric(err) => err.kind(),
            Error::Pem(_) | Error::Base64DecodeError(_) | Error::FormatError(_) => {
                ErrorKind::Format
            }
            Error::Argument(_) => ErrorKind::Argument,
            Error::Unauthorized => ErrorKind::Authorization,
            Error::Configuration(_) | Error::SerializeError(_) => ErrorKind::Configuration,
            Error::Io(_) | Error::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
