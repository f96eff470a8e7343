//! AES-256-CBC 对称加密实现
//!
//! 与 RSA 通道相互独立，用于兼容按固定密钥/IV 加密文本的旧客户端。
//! 注意：同一密钥和 IV 下，相同明文总是得到相同密文。需要不可关联性的调用方必须自行更换 IV。
use crate::error::Error;
use crate::symmetric::errors::SymmetricError;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{Engine, engine::general_purpose};
use rand_core::{OsRng, TryRngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

const KEY_SIZE: usize = 32;
const IV_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// 一组 AES-256 密钥与 CBC 初始向量。
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricSession {
    key: [u8; KEY_SIZE],
    iv: [u8; IV_SIZE],
}

impl SymmetricSession {
    /// 从系统随机源生成新的密钥和 IV
    pub fn generate() -> Result<Self, SymmetricError> {
        let mut session = Self {
            key: [0u8; KEY_SIZE],
            iv: [0u8; IV_SIZE],
        };
        OsRng.try_fill_bytes(&mut session.key)?;
        OsRng.try_fill_bytes(&mut session.iv)?;
        Ok(session)
    }

    /// 要求 32 字节密钥与 16 字节 IV
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, SymmetricError> {
        let key: [u8; KEY_SIZE] =
            key.try_into()
                .map_err(|_| SymmetricError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: key.len(),
                })?;
        let iv: [u8; IV_SIZE] = iv.try_into().map_err(|_| SymmetricError::InvalidIvLength {
            expected: IV_SIZE,
            actual: iv.len(),
        })?;
        Ok(Self { key, iv })
    }

    pub fn from_base64(key_b64: &str, iv_b64: &str) -> Result<Self, SymmetricError> {
        let mut key = general_purpose::STANDARD.decode(key_b64.trim())?;
        let mut iv = general_purpose::STANDARD.decode(iv_b64.trim())?;
        let session = Self::new(&key, &iv);
        key.zeroize();
        iv.zeroize();
        session
    }

    pub fn export_key(&self) -> String {
        general_purpose::STANDARD.encode(self.key)
    }

    pub fn export_iv(&self) -> String {
        general_purpose::STANDARD.encode(self.iv)
    }
}

impl fmt::Debug for SymmetricSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricSession")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// 使用固定密钥/IV 对文本做 AES-256-CBC + PKCS#7 加解密，密文以 Base64 表示。
#[derive(Debug, Clone)]
pub struct SymmetricCipherBox {
    session: SymmetricSession,
}

impl SymmetricCipherBox {
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, Error> {
        Ok(Self::from_session(SymmetricSession::new(key, iv)?))
    }

    pub fn from_base64(key_b64: &str, iv_b64: &str) -> Result<Self, Error> {
        Ok(Self::from_session(SymmetricSession::from_base64(
            key_b64, iv_b64,
        )?))
    }

    pub fn from_session(session: SymmetricSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SymmetricSession {
        &self.session
    }

    /// 加密 UTF-8 文本并返回 Base64 密文。空字符串也会产生一个完整的填充块。
    pub fn encrypt(&self, plaintext: &str) -> String {
        let ciphertext = Aes256CbcEnc::new(&self.session.key.into(), &self.session.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        general_purpose::STANDARD.encode(ciphertext)
    }

    /// 解密 Base64 密文。
    ///
    /// `None` 是参数错误；Base64 无效是格式错误；长度、填充或 UTF-8 出错统一为解密错误。
    pub fn decrypt(&self, ciphertext_b64: Option<&str>) -> Result<String, Error> {
        let ciphertext_b64 = ciphertext_b64.ok_or(SymmetricError::MissingInput)?;
        let ciphertext = general_purpose::STANDARD
            .decode(ciphertext_b64)
            .map_err(SymmetricError::from)?;

        let plaintext = Aes256CbcDec::new(&self.session.key.into(), &self.session.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| SymmetricError::Decryption)?;

        Ok(String::from_utf8(plaintext).map_err(|_| SymmetricError::Decryption)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn fixed_box() -> SymmetricCipherBox {
        let key: Vec<u8> = (0u8..32).collect();
        let iv: Vec<u8> = (100u8..116).collect();
        SymmetricCipherBox::new(&key, &iv).unwrap()
    }

    #[test]
    fn test_generate_session() {
        let a = SymmetricSession::generate().unwrap();
        let b = SymmetricSession::generate().unwrap();
        assert_ne!(a.export_key(), b.export_key());
        assert_eq!(general_purpose::STANDARD.decode(a.export_key()).unwrap().len(), KEY_SIZE);
        assert_eq!(general_purpose::STANDARD.decode(a.export_iv()).unwrap().len(), IV_SIZE);
    }

    #[test]
    fn test_roundtrip_texts() {
        let cipher = fixed_box();
        let long = "a".repeat(50_000);
        for text in ["", "   \t\n", "Hello, World!", "!@#$%^&*()_+-=[]{}|;':\",./<>?", "你好，世界 🔐", long.as_str()] {
            let ciphertext = cipher.encrypt(text);
            assert_eq!(cipher.decrypt(Some(&ciphertext)).unwrap(), text);
        }
    }

    #[test]
    fn test_empty_plaintext_is_one_block() {
        let ciphertext = fixed_box().encrypt("");
        assert_eq!(general_purpose::STANDARD.decode(ciphertext).unwrap().len(), 16);
    }

    #[test]
    fn test_deterministic_for_fixed_key_and_iv() {
        let cipher = fixed_box();
        assert_eq!(cipher.encrypt("same input"), cipher.encrypt("same input"));
    }

    #[test]
    fn test_session_from_base64_roundtrip() {
        let session = SymmetricSession::generate().unwrap();
        let cipher = SymmetricCipherBox::from_session(session.clone());
        let restored = SymmetricCipherBox::from_base64(&session.export_key(), &session.export_iv()).unwrap();

        let ciphertext = cipher.encrypt("shared secret");
        assert_eq!(restored.decrypt(Some(&ciphertext)).unwrap(), "shared secret");
    }

    #[test]
    fn test_decrypt_none_is_argument_error() {
        let err = fixed_box().decrypt(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_decrypt_invalid_base64_is_format_error() {
        let err = fixed_box().decrypt(Some("InvalidBase64String")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_decrypt_bad_length_or_padding() {
        let cipher = fixed_box();
        // 15 字节，不是块长度的整数倍
        let short = general_purpose::STANDARD.encode([0u8; 15]);
        assert_eq!(cipher.decrypt(Some(&short)).unwrap_err().kind(), ErrorKind::Decrypt);

        let other = SymmetricCipherBox::new(&[7u8; 32], &[9u8; 16]).unwrap();
        let ciphertext = other.encrypt("x");
        // 用错误的密钥解密几乎总是得到无效填充或非 UTF-8 输出
        let result = cipher.decrypt(Some(&ciphertext));
        assert!(result.is_err() || result.unwrap() != "x");
    }

    #[test]
    fn test_wrong_key_or_iv_length() {
        let err = SymmetricCipherBox::new(&[0u8; 16], &[0u8; 16]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = SymmetricCipherBox::new(&[0u8; 32], &[0u8; 8]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let printed = format!("{:?}", fixed_box());
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("key: ["));
    }
}
