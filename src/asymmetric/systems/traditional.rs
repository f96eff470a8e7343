//! # Traditional Cryptographic Algorithm Module
//!
//! This module contains implementations of traditional cryptographic algorithms such as RSA.
//! It provides interfaces that conform to the `AsymmetricCryptographicSystem` trait.
//!
//! ---
//!
//! # 传统加密算法模块
//!
//! 本模块包含 RSA 等传统加密算法的实现。
//! 它提供符合 `AsymmetricCryptographicSystem` 特征的接口。

pub mod rsa;

// 重新导出 RSA 系统，本模块的用户可以直接使用 `traditional::RsaOaepSystem`。
pub use self::rsa::RsaOaepSystem;
