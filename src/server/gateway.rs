//! `EncryptionGateway` 面向请求：每个请求在开始时取得一次密钥快照，之后只针对这个快照操作。
use crate::asymmetric::systems::traditional::RsaOaepSystem;
use crate::asymmetric::errors::AsymmetricError;
use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use crate::common::config::RunMode;
use crate::common::pem::{self, PemLabel};
use crate::contract::{DebugKeyBundle, PublicKeyBundle};
use crate::error::Error;
use crate::rotation::manager::KeyManager;
use base64::{Engine, engine::general_purpose};
use std::sync::Arc;

pub struct EncryptionGateway<T: AsymmetricCryptographicSystem = RsaOaepSystem> {
    key_manager: Arc<KeyManager<T>>,
    mode: RunMode,
}

impl<T: AsymmetricCryptographicSystem> Clone for EncryptionGateway<T> {
    fn clone(&self) -> Self {
        Self {
            key_manager: Arc::clone(&self.key_manager),
            mode: self.mode,
        }
    }
}

impl<T: AsymmetricCryptographicSystem> EncryptionGateway<T> {
    pub fn new(key_manager: Arc<KeyManager<T>>, mode: RunMode) -> Self {
        Self { key_manager, mode }
    }

    /// 返回当前公钥（PEM），必要时先触发轮换。
    pub fn public_key(&self) -> Result<PublicKeyBundle, Error> {
        let snapshot = self.key_manager.current()?;
        let der = snapshot.export_public_key()?;

        Ok(PublicKeyBundle {
            public_key: pem::encode(PemLabel::PublicKey, &der),
            key_id: snapshot.id().to_string(),
            algorithm: T::ALGORITHM.to_string(),
            issued_at: snapshot.generated_at(),
            expires_at: snapshot.expires_at(),
        })
    }

    /// 解密客户端提交的 Base64 密文，返回 UTF-8 明文。
    ///
    /// Base64 在取得密钥之前校验，所以格式错误永远不会被报告为解密错误。
    /// 用轮换前的公钥加密的数据会得到解密错误。
    pub fn decrypt(&self, data: &str) -> Result<String, Error> {
        let ciphertext = general_purpose::STANDARD.decode(data.trim())?;

        let snapshot = self.key_manager.current()?;
        let plaintext = snapshot.decrypt(&ciphertext).inspect_err(|_| {
            tracing::debug!(key_id = %snapshot.id(), "ciphertext rejected");
        })?;

        String::from_utf8(plaintext).map_err(|_| {
            tracing::debug!(key_id = %snapshot.id(), "plaintext is not valid UTF-8");
            Error::Asymmetric(AsymmetricError::Decryption)
        })
    }

    /// 与 [`decrypt`](Self::decrypt) 相同，但缺失的输入是参数错误。
    pub fn decrypt_optional(&self, data: Option<&str>) -> Result<String, Error> {
        let data = data.ok_or_else(|| Error::Argument("data is required".to_string()))?;
        self.decrypt(data)
    }

    /// 导出当前密钥对，仅开发模式可用。
    pub fn debug_keys(&self) -> Result<DebugKeyBundle, Error> {
        if !self.mode.is_development() {
            tracing::warn!(mode = %self.mode, "refused debug key export");
            return Err(Error::Unauthorized);
        }

        let snapshot = self.key_manager.current()?;
        let public_der = snapshot.export_public_key()?;
        let private_der = snapshot.export_private_key()?;
        tracing::warn!(key_id = %snapshot.id(), "exporting private key in development mode");

        Ok(DebugKeyBundle {
            key_id: snapshot.id().to_string(),
            public_key: pem::encode(PemLabel::PublicKey, &public_der),
            private_key: pem::encode(PemLabel::PrivateKey, &private_der),
        })
    }

    pub fn key_manager(&self) -> &Arc<KeyManager<T>> {
        &self.key_manager
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }
}
