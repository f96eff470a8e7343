//! 非对称加密：算法 Trait、错误类型与 RSA-OAEP 实现。

pub mod errors;
pub mod systems;
pub mod traits;

pub use self::errors::AsymmetricError;
pub use self::systems::traditional::RsaOaepSystem;
pub use self::traits::AsymmetricCryptographicSystem;
