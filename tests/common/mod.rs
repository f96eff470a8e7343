//!
//! 集成测试的通用辅助函数
//!
#![allow(dead_code)]

use seal_gate::common::clock::ManualClock;
use seal_gate::common::config::{CryptoConfig, RunMode};
use seal_gate::rotation::RotationPolicy;
use seal_gate::rotation::manager::KeyManager;
use seal_gate::server::EncryptionGateway;
use std::sync::Arc;

/// 测试中常用的快速轮换周期
pub const FAST_ROTATION_SECS: u64 = 10;

/// 创建一个使用手动时钟、10 秒有效期的密钥管理器。
pub fn fast_rotating_manager() -> (Arc<KeyManager>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let manager = KeyManager::with_clock(
        CryptoConfig::default(),
        RotationPolicy::from_secs(FAST_ROTATION_SECS),
        clock.clone(),
    )
    .unwrap();
    (Arc::new(manager), clock)
}

pub fn gateway(mode: RunMode) -> (EncryptionGateway, Arc<ManualClock>) {
    let (manager, clock) = fast_rotating_manager();
    (EncryptionGateway::new(manager, mode), clock)
}
