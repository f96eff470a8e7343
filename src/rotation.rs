pub mod manager;

use crate::error::Error;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_VALIDITY_SECS: u64 = 30 * 24 * 60 * 60;

/// 密钥轮换策略，定义了密钥的生命周期。
///
/// 有效期是一个不透明的参数：生产环境通常是 30 天，测试中常用 10 秒来观察快速轮换。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotationPolicy {
    /// 密钥的有效期（秒）。
    pub validity_period_secs: u64,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            validity_period_secs: DEFAULT_VALIDITY_SECS,
        }
    }
}

impl RotationPolicy {
    /// 有效期以整秒计。带有小数秒的时长是配置错误，不会被截断。
    pub fn new(validity_period: Duration) -> Result<Self, Error> {
        if validity_period.subsec_nanos() != 0 {
            return Err(Error::Configuration(format!(
                "validity period must be a whole number of seconds, got {validity_period:?}"
            )));
        }
        let policy = Self {
            validity_period_secs: validity_period.as_secs(),
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_secs(validity_period_secs: u64) -> Self {
        Self {
            validity_period_secs,
        }
    }

    /// 零有效期会让每次访问都触发轮换。
    pub fn validate(&self) -> Result<(), Error> {
        if self.validity_period_secs == 0 {
            return Err(Error::Configuration(
                "validity_period_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// 有效期，超出 `TimeDelta` 表示范围时饱和为最大值。
    pub fn validity_period(&self) -> TimeDelta {
        i64::try_from(self.validity_period_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// `now - generated_at > validity_period` 时密钥过期。恰好等于有效期时仍然新鲜。
    pub fn is_expired(&self, generated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(generated_at) > self.validity_period()
    }

    /// 计算过期时间点。
    pub fn expires_at(&self, generated_at: DateTime<Utc>) -> DateTime<Utc> {
        generated_at
            .checked_add_signed(self.validity_period())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
