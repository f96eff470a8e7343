//! Defines the data structures exchanged between the gateway and its clients.
//!
//! 所有字段在 JSON 中使用 camelCase，与浏览器端的约定保持一致。
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A data structure that contains all the information a client needs for encryption.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyBundle {
    /// The PEM-encoded SubjectPublicKeyInfo (`-----BEGIN PUBLIC KEY-----`).
    pub public_key: String,

    /// Identifies the key generation. Changes on every rotation.
    pub key_id: String,

    /// The padding scheme the client must use, e.g. `RSA-OAEP-256`.
    pub algorithm: String,

    /// The time (UTC) when this public key was issued.
    pub issued_at: DateTime<Utc>,

    /// The time (UTC) until which the client may cache this public key.
    /// Ciphertext produced after this point may be rejected.
    pub expires_at: DateTime<Utc>,
}

impl PublicKeyBundle {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// 开发模式下导出的完整密钥对。
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DebugKeyBundle {
    pub key_id: String,
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for DebugKeyBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugKeyBundle")
            .field("key_id", &self.key_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// `POST /api/encryption/decrypt` 的请求体。
///
/// `data` 缺失或为 `null` 时由网关报告参数错误，而不是反序列化失败。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecryptResponse {
    pub decrypted_data: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub key_id: String,
    pub key_expired: bool,
}
