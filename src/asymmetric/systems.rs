//! 算法系统集合
//!
//! 目前只包含传统算法（RSA-OAEP）实现
pub mod traditional;
