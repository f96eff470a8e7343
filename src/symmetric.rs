//! 对称加密核心模块
//!
//! 提供与旧版浏览器端兼容的 AES-256-CBC + PKCS#7 文本加解密。

pub mod errors;
pub mod systems;

pub use errors::SymmetricError;
pub use systems::aes_cbc::{SymmetricCipherBox, SymmetricSession};
