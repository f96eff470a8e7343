//! # Symmetric Cryptographic Systems Module
//!
//! 本模块是对称加密算法的“门面”。目前只有一个实现：AES-256-CBC，
//! 密钥与 IV 由调用方提供，输出为 Base64 文本。

pub mod aes_cbc;
