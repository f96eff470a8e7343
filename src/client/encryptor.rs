//! Provides an encryptor that mirrors what the browser does with the gateway's public key.

use crate::asymmetric::systems::traditional::RsaOaepSystem;
use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use crate::common::pem::{self, PemLabel};
use crate::contract::PublicKeyBundle;
use crate::error::Error;
use base64::{Engine, engine::general_purpose};
use chrono::{DateTime, Utc};

/// 导入 PEM 公钥，把短文本加密为 Base64 密文。
///
/// 持有从 [`PublicKeyBundle`] 得到的 `key_id` 与过期时间，调用方可据此判断是否需要重新获取公钥。
/// This component never sees a private key.
pub struct PublicKeyEncryptor<T: AsymmetricCryptographicSystem = RsaOaepSystem> {
    public_key: T::PublicKey,
    key_id: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl<T: AsymmetricCryptographicSystem> PublicKeyEncryptor<T> {
    /// 从 `-----BEGIN PUBLIC KEY-----` 文本导入。
    pub fn from_pem(pem_text: &str) -> Result<Self, Error> {
        let der = pem::decode_expecting(pem_text, PemLabel::PublicKey)?;
        Ok(Self {
            public_key: T::import_public_key(&der)?,
            key_id: None,
            expires_at: None,
        })
    }

    /// 从网关返回的公钥包导入。
    pub fn from_bundle(bundle: &PublicKeyBundle) -> Result<Self, Error> {
        if bundle.algorithm != T::ALGORITHM {
            return Err(Error::FormatError(format!(
                "unsupported algorithm {}, expected {}",
                bundle.algorithm,
                T::ALGORITHM
            )));
        }
        let mut encryptor = Self::from_pem(&bundle.public_key)?;
        encryptor.key_id = Some(bundle.key_id.clone());
        encryptor.expires_at = Some(bundle.expires_at);
        Ok(encryptor)
    }

    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// 公钥包已过期时返回 `true`；直接从 PEM 导入的公钥没有过期时间。
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    pub fn max_plaintext_len(&self) -> usize {
        T::max_plaintext_len(&self.public_key)
    }

    /// 加密 UTF-8 文本。超过 [`max_plaintext_len`](Self::max_plaintext_len) 的输入是参数错误。
    pub fn encrypt(&self, plaintext: &str) -> Result<String, Error> {
        let ciphertext = T::encrypt(&self.public_key, plaintext.as_bytes())?;
        Ok(general_purpose::STANDARD.encode(ciphertext))
    }
}
