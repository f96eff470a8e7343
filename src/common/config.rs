//!
//! # 通用配置模块
//!
//! 包含服务所使用的核心配置结构：加密参数、密钥轮换策略、HTTP 服务与日志。
//! 配置可以从 JSON 文件加载，再由 `SEAL_GATE_` 前缀的环境变量覆盖。
//!
use crate::error::Error;
use crate::rotation::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const ENV_PREFIX: &str = "SEAL_GATE_";
const MIN_RSA_KEY_BITS: usize = 2048;

/// 加密配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CryptoConfig {
    /// RSA 模数位数
    pub rsa_key_bits: usize,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self { rsa_key_bits: 2048 }
    }
}

impl CryptoConfig {
    /// 拒绝小于 2048 位的 RSA 模数。
    pub fn validate(&self) -> Result<(), Error> {
        if self.rsa_key_bits < MIN_RSA_KEY_BITS {
            return Err(Error::Configuration(format!(
                "rsa_key_bits must be at least {MIN_RSA_KEY_BITS}, got {}",
                self.rsa_key_bits
            )));
        }
        Ok(())
    }
}

/// 运行模式。只有开发模式允许导出调试密钥。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    #[default]
    Production,
}

impl RunMode {
    pub fn is_development(&self) -> bool {
        matches!(self, RunMode::Development)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Development => write!(f, "development"),
            RunMode::Production => write!(f, "production"),
        }
    }
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RunMode::Development),
            "production" | "prod" => Ok(RunMode::Production),
            other => Err(Error::Configuration(format!("unknown run mode: {other}"))),
        }
    }
}

/// HTTP 服务配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub mode: RunMode,
    /// 浏览器前端通常部署在另一个源上
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7263,
            mode: RunMode::Production,
            enable_cors: true,
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(Error::Configuration(format!("unknown log level: {other}"))),
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty-printed for development
    #[default]
    Pretty,
    /// JSON for production
    Json,
    /// Compact single-line
    Compact,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(Error::Configuration(format!("unknown log format: {other}"))),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Include source file/line
    pub include_source: bool,
    /// Environment filter string (e.g., "seal_gate=debug,tower_http=warn")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            include_source: false,
            filter: None,
        }
    }
}

/// 完整配置文件。
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ConfigFile {
    /// 加密配置
    #[serde(default)]
    pub crypto: CryptoConfig,
    /// 轮换配置
    #[serde(default)]
    pub rotation: RotationPolicy,
    /// 服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LogConfig,
}

impl ConfigFile {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// 以默认值为基础，读取进程环境变量
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 用环境变量覆盖当前配置。
    ///
    /// `lookup` 接收完整的变量名（含 `SEAL_GATE_` 前缀）。无法解析的值会返回错误，而不是被忽略。
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("RSA_BITS") {
            self.crypto.rsa_key_bits = parse_env("RSA_BITS", &value)?;
        }
        if let Some(value) = var("KEY_VALIDITY_SECS") {
            self.rotation.validity_period_secs = parse_env("KEY_VALIDITY_SECS", &value)?;
        }
        if let Some(value) = var("HOST") {
            self.server.host = value;
        }
        if let Some(value) = var("PORT") {
            self.server.port = parse_env("PORT", &value)?;
        }
        if let Some(value) = var("MODE") {
            self.server.mode = value.parse()?;
        }
        if let Some(value) = var("ENABLE_CORS") {
            self.server.enable_cors = parse_env("ENABLE_CORS", &value.to_ascii_lowercase())?;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.logging.level = value.parse()?;
        }
        if let Some(value) = var("LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }
        if let Some(value) = var("LOG_FILTER") {
            self.logging.filter = Some(value);
        }
        Ok(())
    }

    /// 检查配置是否可用于生成密钥。
    pub fn validate(&self) -> Result<(), Error> {
        self.crypto.validate()?;
        self.rotation.validate()
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T, Error> {
    value.trim().parse().map_err(|_| {
        Error::Configuration(format!("invalid value for {ENV_PREFIX}{name}: {value}"))
    })
}
