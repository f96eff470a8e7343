//! 客户端：与浏览器端相同的加密约定，供 Rust 客户端与测试使用。

pub mod encryptor;

pub use encryptor::PublicKeyEncryptor;
