//! Structured logging setup (tracing-subscriber).

use crate::common::config::{LogConfig, LogFormat};
use crate::error::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

const DEFAULT_DIRECTIVES: &str = "tower_http=info";

/// 构造过滤器。未显式指定时只对本 crate 应用配置的级别。
pub fn build_filter(config: &LogConfig) -> Result<EnvFilter, Error> {
    let directives = match &config.filter {
        Some(f) => f.clone(),
        None => format!("seal_gate={},{DEFAULT_DIRECTIVES}", config.level),
    };
    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Configuration(format!("invalid log filter `{directives}`: {e}")))
}

/// Initialize logging. 只能调用一次。
pub fn init_logging(config: &LogConfig) -> Result<(), Error> {
    let filter = build_filter(config)?;

    let result = match config.format {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .json()
                    .with_file(config.include_source)
                    .with_line_number(config.include_source),
            );
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .pretty()
                    .with_file(config.include_source)
                    .with_line_number(config.include_source),
            );
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .compact()
                    .with_file(config.include_source)
                    .with_line_number(config.include_source),
            );
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    result.map_err(|e| Error::Configuration(format!("logging already initialized: {e}")))
}
