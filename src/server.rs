//! 服务端：加密网关以及可选的 HTTP 接口。

pub mod gateway;
#[cfg(feature = "server")]
pub mod http;

pub use gateway::EncryptionGateway;
