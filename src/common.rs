//! 通用模块，包含配置、时钟、PEM 编解码与工具类型

pub mod clock;
pub mod config;
pub mod pem;
pub mod utils;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::config::{ConfigFile, CryptoConfig, RunMode};
pub use self::pem::{PemError, PemLabel};
pub use self::utils::ZeroizingVec;
