//! # Seal-Gate: RSA-OAEP Encryption Gateway
//!
//! `seal-gate` 为浏览器客户端提供“公钥加密、服务端解密”的通道：
//! 服务端持有一个按策略定期轮换的 RSA 密钥对，以 PEM 形式下发公钥，
//! 客户端用 RSA-OAEP (SHA-256) 加密短文本并以 Base64 提交，服务端解密后返回明文。
//!
//! ## Core Concepts
//!
//! - **`KeyManager`**: 持有唯一在用的密钥对，过期时在首次访问时轮换。
//! - **`EncryptionGateway`**: 面向请求的公钥导出与解密。
//! - **`SymmetricCipherBox`**: 独立的 AES-256-CBC 文本加解密（`symmetric` 特性）。
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seal_gate::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> seal_gate::error::Result<()> {
//!     let manager: KeyManager = KeyManager::new(CryptoConfig::default(), RotationPolicy::default())?;
//!     let gateway = EncryptionGateway::new(Arc::new(manager), RunMode::Production);
//!
//!     let bundle = gateway.public_key()?;
//!     let encryptor: PublicKeyEncryptor = PublicKeyEncryptor::from_bundle(&bundle)?;
//!     let ciphertext = encryptor.encrypt("Hello, Seal-Gate!")?;
//!
//!     assert_eq!(gateway.decrypt(&ciphertext)?, "Hello, Seal-Gate!");
//!     Ok(())
//! }
//! ```

pub mod asymmetric;
pub mod client;
pub mod common;
pub mod contract;
pub mod error;
#[cfg(feature = "server")]
pub mod logging;
pub mod rotation;
pub mod server;
#[cfg(feature = "symmetric")]
pub mod symmetric;

/// The version of the `seal-gate` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// --- Prelude ---
// A collection of the most commonly used types.
pub mod prelude {
    pub use crate::asymmetric::{AsymmetricCryptographicSystem, RsaOaepSystem};
    pub use crate::client::PublicKeyEncryptor;
    pub use crate::common::{Clock, ConfigFile, CryptoConfig, ManualClock, RunMode, SystemClock};
    pub use crate::contract::PublicKeyBundle;
    pub use crate::error::{Error, ErrorKind};
    pub use crate::rotation::RotationPolicy;
    pub use crate::rotation::manager::{KeyManager, KeySnapshot};
    pub use crate::server::EncryptionGateway;
    #[cfg(feature = "symmetric")]
    pub use crate::symmetric::{SymmetricCipherBox, SymmetricSession};
}

pub use error::{Error, ErrorKind, Result};
