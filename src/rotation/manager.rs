//! 单密钥轮换管理器
use crate::asymmetric::systems::traditional::RsaOaepSystem;
use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use crate::common::clock::{Clock, SystemClock};
use crate::common::config::CryptoConfig;
use crate::common::utils::ZeroizingVec;
use crate::error::Error;
use crate::rotation::RotationPolicy;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// 某一次密钥生成的不可变快照。
///
/// 请求开始时取得一个 `Arc<KeySnapshot>`，之后的导出与解密都针对这个快照进行，
/// 即使管理器在请求过程中轮换了密钥，也不会影响正在处理的请求。
pub struct KeySnapshot<T: AsymmetricCryptographicSystem = RsaOaepSystem> {
    id: Uuid,
    generation: u64,
    public_key: T::PublicKey,
    private_key: T::PrivateKey,
    generated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl<T: AsymmetricCryptographicSystem> KeySnapshot<T> {
    /// 本次生成的唯一标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 从 1 开始递增的生成序号
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn public_key(&self) -> &T::PublicKey {
        &self.public_key
    }

    pub fn max_plaintext_len(&self) -> usize {
        T::max_plaintext_len(&self.public_key)
    }

    /// 用本快照的公钥加密，等价于客户端的操作。
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        Ok(T::encrypt(&self.public_key, plaintext)?)
    }

    /// 用本快照的私钥解密。
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        Ok(T::decrypt(&self.private_key, ciphertext)?)
    }

    pub fn export_public_key(&self) -> Result<Vec<u8>, Error> {
        Ok(T::export_public_key(&self.public_key)?)
    }

    pub(crate) fn export_private_key(&self) -> Result<ZeroizingVec, Error> {
        Ok(T::export_private_key(&self.private_key)?)
    }
}

impl<T: AsymmetricCryptographicSystem> fmt::Debug for KeySnapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySnapshot")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("algorithm", &T::ALGORITHM)
            .field("generated_at", &self.generated_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// `KeyManager` 持有唯一一个在用的非对称密钥对，并执行其轮换策略。
///
/// 读取走 `ArcSwap`，无锁；“检查过期 -> 生成 -> 替换”这一段由 `rotation_lock` 串行化，
/// 获取锁后会再检查一次，因此同一次过期只会生成一次新密钥，所有并发调用者看到同一个新快照。
/// 旧密钥在替换后立即丢弃，不保留历史，也没有宽限期。
pub struct KeyManager<T: AsymmetricCryptographicSystem = RsaOaepSystem> {
    crypto_config: CryptoConfig,
    rotation_policy: RotationPolicy,
    clock: Arc<dyn Clock>,
    current: ArcSwap<KeySnapshot<T>>,
    rotation_lock: Mutex<()>,
}

impl<T: AsymmetricCryptographicSystem> KeyManager<T> {
    /// 使用系统时钟创建管理器，并立即生成第一个密钥对。
    pub fn new(crypto_config: CryptoConfig, rotation_policy: RotationPolicy) -> Result<Self, Error> {
        Self::with_clock(crypto_config, rotation_policy, Arc::new(SystemClock))
    }

    /// 使用指定时钟创建管理器。
    ///
    /// 小于 2048 位的 RSA 模数或零有效期会在生成任何密钥之前被拒绝。
    pub fn with_clock(
        crypto_config: CryptoConfig,
        rotation_policy: RotationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        crypto_config.validate()?;
        rotation_policy.validate()?;

        let initial = Self::generate(&crypto_config, &rotation_policy, clock.as_ref(), 1)?;
        tracing::info!(
            key_id = %initial.id,
            algorithm = T::ALGORITHM,
            validity_secs = rotation_policy.validity_period_secs,
            "generated initial keypair"
        );

        Ok(Self {
            crypto_config,
            rotation_policy,
            clock,
            current: ArcSwap::from_pointee(initial),
            rotation_lock: Mutex::new(()),
        })
    }

    /// 返回当前在用的密钥快照；如果已过期，先轮换再返回。
    ///
    /// 密钥生成失败会直接返回错误，不会重试。
    pub fn current(&self) -> Result<Arc<KeySnapshot<T>>, Error> {
        let snapshot = self.current.load_full();
        if !self.is_stale(&snapshot) {
            return Ok(snapshot);
        }

        let _guard = self
            .rotation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // 另一个调用者可能已经在我们等锁时完成了轮换。
        let snapshot = self.current.load_full();
        if !self.is_stale(&snapshot) {
            return Ok(snapshot);
        }

        tracing::debug!(key_id = %snapshot.id, "keypair expired, rotating");
        self.replace(&snapshot)
    }

    /// 纯检查，没有副作用。
    pub fn is_expired(&self) -> bool {
        self.is_stale(&self.current.load())
    }

    /// 无条件轮换：生成新密钥对并重置计时。
    pub fn rotate(&self) -> Result<Arc<KeySnapshot<T>>, Error> {
        let _guard = self
            .rotation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = self.current.load_full();
        self.replace(&previous)
    }

    /// 返回当前快照，不做过期检查。
    pub fn snapshot(&self) -> Arc<KeySnapshot<T>> {
        self.current.load_full()
    }

    pub fn rotation_policy(&self) -> &RotationPolicy {
        &self.rotation_policy
    }

    pub fn crypto_config(&self) -> &CryptoConfig {
        &self.crypto_config
    }

    /// 按当前时间判断给定快照是否已过期。对同一个快照同时读取 id 和过期状态时使用。
    pub fn is_stale(&self, snapshot: &KeySnapshot<T>) -> bool {
        self.rotation_policy
            .is_expired(snapshot.generated_at, self.clock.now())
    }

    /// 调用方必须持有 `rotation_lock`。
    fn replace(&self, previous: &KeySnapshot<T>) -> Result<Arc<KeySnapshot<T>>, Error> {
        let next = Self::generate(
            &self.crypto_config,
            &self.rotation_policy,
            self.clock.as_ref(),
            previous.generation + 1,
        )
        .inspect_err(|e| {
            tracing::error!(key_id = %previous.id, error = %e, "keypair generation failed");
        })?;

        let next = Arc::new(next);
        self.current.store(Arc::clone(&next));
        tracing::info!(
            previous_key_id = %previous.id,
            key_id = %next.id,
            generation = next.generation,
            "rotated keypair"
        );
        Ok(next)
    }

    fn generate(
        crypto_config: &CryptoConfig,
        rotation_policy: &RotationPolicy,
        clock: &dyn Clock,
        generation: u64,
    ) -> Result<KeySnapshot<T>, Error> {
        let (public_key, private_key) = T::generate_keypair(crypto_config)?;
        let generated_at = clock.now();

        Ok(KeySnapshot {
            id: Uuid::new_v4(),
            generation,
            public_key,
            private_key,
            generated_at,
            expires_at: rotation_policy.expires_at(generated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asymmetric::errors::AsymmetricError;
    use crate::common::clock::ManualClock;
    use crate::error::ErrorKind;
    use chrono::TimeDelta;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    fn manager_with_clock(validity_secs: u64) -> (KeyManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = KeyManager::with_clock(
            CryptoConfig::default(),
            RotationPolicy::from_secs(validity_secs),
            clock.clone(),
        )
        .unwrap();
        (manager, clock)
    }

    #[test]
    fn test_fresh_after_construction() {
        let (manager, _) = manager_with_clock(10);
        assert!(!manager.is_expired());
        assert_eq!(manager.snapshot().generation(), 1);
    }

    #[test]
    fn test_same_key_within_validity_period() {
        let (manager, clock) = manager_with_clock(10);
        let first = manager.current().unwrap();

        clock.advance(TimeDelta::seconds(5));
        let second = manager.current().unwrap();

        assert_eq!(first.id(), second.id());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_rotates_after_validity_period() {
        let (manager, clock) = manager_with_clock(10);
        let first = manager.current().unwrap();

        clock.advance(TimeDelta::seconds(11));
        assert!(manager.is_expired());
        // is_expired 没有副作用
        assert_eq!(manager.snapshot().id(), first.id());

        let second = manager.current().unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(second.generation(), first.generation() + 1);
        assert_eq!(second.generated_at(), clock.now());
        assert!(!manager.is_expired());
    }

    #[test]
    fn test_forced_rotation_resets_clock() {
        let (manager, clock) = manager_with_clock(10);
        let first = manager.snapshot();

        clock.advance(TimeDelta::seconds(8));
        let rotated = manager.rotate().unwrap();
        assert_ne!(first.id(), rotated.id());
        assert!(!manager.is_expired());

        // 距离轮换只过去了 8 秒
        clock.advance(TimeDelta::seconds(8));
        assert!(!manager.is_expired());
        assert_eq!(manager.current().unwrap().id(), rotated.id());
    }

    #[test]
    fn test_rejects_weak_configuration_before_generating() {
        let weak_key = KeyManager::<RsaOaepSystem>::new(
            CryptoConfig { rsa_key_bits: 512 },
            RotationPolicy::default(),
        );
        assert_eq!(weak_key.err().map(|e| e.kind()), Some(ErrorKind::Configuration));

        let zero_period =
            KeyManager::<RsaOaepSystem>::new(CryptoConfig::default(), RotationPolicy::from_secs(0));
        assert_eq!(zero_period.err().map(|e| e.kind()), Some(ErrorKind::Configuration));
    }

    #[test]
    fn test_held_snapshot_stays_stale_after_rotation() {
        let (manager, clock) = manager_with_clock(10);
        let held = manager.snapshot();

        clock.advance(TimeDelta::seconds(11));
        let rotated = manager.current().unwrap();

        assert!(manager.is_stale(&held));
        assert!(!manager.is_stale(&rotated));
        assert!(!manager.is_expired());
    }

    #[test]
    fn test_expires_at_matches_policy() {
        let (manager, _) = manager_with_clock(10);
        let snapshot = manager.snapshot();
        assert_eq!(
            snapshot.expires_at() - snapshot.generated_at(),
            TimeDelta::seconds(10)
        );
    }

    #[test]
    fn test_concurrent_callers_observe_single_rotation() {
        const CALLERS: usize = 8;

        let (manager, clock) = manager_with_clock(10);
        let manager = Arc::new(manager);
        let stale_id = manager.snapshot().id();
        clock.advance(TimeDelta::seconds(11));

        let barrier = Arc::new(Barrier::new(CALLERS));
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let manager = Arc::clone(&manager);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let snapshot = manager.current().unwrap();
                    (snapshot.id(), snapshot.generation())
                })
            })
            .collect();

        let results: Vec<(Uuid, u64)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let distinct: HashSet<Uuid> = results.iter().map(|(id, _)| *id).collect();

        assert_eq!(distinct.len(), 1);
        assert!(!distinct.contains(&stale_id));
        assert!(results.iter().all(|(_, generation)| *generation == 2));
    }

    /// 可以按需让密钥生成失败的测试系统，包装真实的 RSA 实现。
    struct FlakySystem;

    static FAIL_GENERATION: AtomicBool = AtomicBool::new(false);
    static GENERATIONS: AtomicUsize = AtomicUsize::new(0);

    impl AsymmetricCryptographicSystem for FlakySystem {
        type PublicKey = <RsaOaepSystem as AsymmetricCryptographicSystem>::PublicKey;
        type PrivateKey = <RsaOaepSystem as AsymmetricCryptographicSystem>::PrivateKey;
        const ALGORITHM: &'static str = "FLAKY-RSA";

        fn generate_keypair(
            config: &CryptoConfig,
        ) -> Result<(Self::PublicKey, Self::PrivateKey), AsymmetricError> {
            GENERATIONS.fetch_add(1, Ordering::SeqCst);
            if FAIL_GENERATION.load(Ordering::SeqCst) {
                return Err(AsymmetricError::KeyGeneration("entropy source unavailable".into()));
            }
            RsaOaepSystem::generate_keypair(config)
        }

        fn public_key_of(private_key: &Self::PrivateKey) -> Self::PublicKey {
            RsaOaepSystem::public_key_of(private_key)
        }

        fn max_plaintext_len(public_key: &Self::PublicKey) -> usize {
            RsaOaepSystem::max_plaintext_len(public_key)
        }

        fn encrypt(
            public_key: &Self::PublicKey,
            plaintext: &[u8],
        ) -> Result<Vec<u8>, AsymmetricError> {
            RsaOaepSystem::encrypt(public_key, plaintext)
        }

        fn decrypt(
            private_key: &Self::PrivateKey,
            ciphertext: &[u8],
        ) -> Result<Vec<u8>, AsymmetricError> {
            RsaOaepSystem::decrypt(private_key, ciphertext)
        }

        fn export_public_key(public_key: &Self::PublicKey) -> Result<Vec<u8>, AsymmetricError> {
            RsaOaepSystem::export_public_key(public_key)
        }

        fn export_private_key(
            private_key: &Self::PrivateKey,
        ) -> Result<ZeroizingVec, AsymmetricError> {
            RsaOaepSystem::export_private_key(private_key)
        }

        fn import_public_key(der: &[u8]) -> Result<Self::PublicKey, AsymmetricError> {
            RsaOaepSystem::import_public_key(der)
        }

        fn import_private_key(der: &[u8]) -> Result<Self::PrivateKey, AsymmetricError> {
            RsaOaepSystem::import_private_key(der)
        }
    }

    #[test]
    fn test_generation_failure_is_surfaced_without_retry() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager: KeyManager<FlakySystem> = KeyManager::with_clock(
            CryptoConfig::default(),
            RotationPolicy::new(Duration::from_secs(10)).unwrap(),
            clock.clone(),
        )
        .unwrap();
        let original = manager.snapshot();

        clock.advance(TimeDelta::seconds(11));
        FAIL_GENERATION.store(true, Ordering::SeqCst);
        let before = GENERATIONS.load(Ordering::SeqCst);

        let err = manager.current().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);
        assert_eq!(GENERATIONS.load(Ordering::SeqCst), before + 1);
        // 失败后不会悄悄继续使用或替换密钥
        assert_eq!(manager.snapshot().id(), original.id());
        assert!(manager.is_expired());

        FAIL_GENERATION.store(false, Ordering::SeqCst);
        let recovered = manager.current().unwrap();
        assert_ne!(recovered.id(), original.id());
        assert_eq!(recovered.generation(), 2);
    }
}
