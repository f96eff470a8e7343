//! `RsaOaepSystem` 提供了基于 RSA-OAEP (SHA-256) 的非对称加解密功能。
//! 浏览器端通过 WebCrypto 的 `RSA-OAEP` + `SHA-256` 导入公钥并加密，服务端用私钥解密。

use crate::asymmetric::errors::AsymmetricError;
use crate::asymmetric::traits::AsymmetricCryptographicSystem;
use crate::common::config::CryptoConfig;
use crate::common::utils::ZeroizingVec;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::rand_core::OsRng as RsaOsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

/// RSA 加密系统实现
///
/// 使用 OAEP 填充，掩码生成函数与标签哈希均为 SHA-256。
pub struct RsaOaepSystem;

impl RsaOaepSystem {
    fn padding() -> Oaep {
        Oaep::new::<Sha256>()
    }
}

impl AsymmetricCryptographicSystem for RsaOaepSystem {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;

    const ALGORITHM: &'static str = "RSA-OAEP-256";

    fn generate_keypair(
        config: &CryptoConfig,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), AsymmetricError> {
        let bits = config.rsa_key_bits;
        let mut rsa_rng = RsaOsRng;

        let private_key = RsaPrivateKey::new(&mut rsa_rng, bits)
            .map_err(|e| AsymmetricError::KeyGeneration(format!("生成RSA密钥失败: {}", e)))?;
        let public_key = RsaPublicKey::from(&private_key);

        Ok((public_key, private_key))
    }

    fn public_key_of(private_key: &Self::PrivateKey) -> Self::PublicKey {
        RsaPublicKey::from(private_key)
    }

    fn max_plaintext_len(public_key: &Self::PublicKey) -> usize {
        // OAEP 开销：2 * hLen + 2
        let overhead = 2 * <Sha256 as Digest>::output_size() + 2;
        public_key.size().saturating_sub(overhead)
    }

    fn encrypt(public_key: &Self::PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, AsymmetricError> {
        let max = Self::max_plaintext_len(public_key);
        if plaintext.len() > max {
            return Err(AsymmetricError::PlaintextTooLong {
                max,
                actual: plaintext.len(),
            });
        }

        let mut rng = RsaOsRng;
        public_key
            .encrypt(&mut rng, Self::padding(), plaintext)
            .map_err(|e| AsymmetricError::Encryption(format!("RSA加密失败: {}", e)))
    }

    fn decrypt(
        private_key: &Self::PrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, AsymmetricError> {
        private_key
            .decrypt(Self::padding(), ciphertext)
            .map_err(|_| AsymmetricError::Decryption)
    }

    fn export_public_key(public_key: &Self::PublicKey) -> Result<Vec<u8>, AsymmetricError> {
        let der = public_key
            .to_public_key_der()
            .map_err(|e| AsymmetricError::KeyEncoding(format!("导出RSA公钥DER失败: {}", e)))?;
        Ok(der.as_bytes().to_vec())
    }

    fn export_private_key(private_key: &Self::PrivateKey) -> Result<ZeroizingVec, AsymmetricError> {
        let der = private_key
            .to_pkcs8_der()
            .map_err(|e| AsymmetricError::KeyEncoding(format!("导出RSA私钥DER失败: {}", e)))?;
        Ok(ZeroizingVec(der.as_bytes().to_vec()))
    }

    fn import_public_key(der: &[u8]) -> Result<Self::PublicKey, AsymmetricError> {
        RsaPublicKey::from_public_key_der(der)
            .map_err(|e| AsymmetricError::InvalidKey(format!("导入RSA公钥失败: {}", e)))
    }

    fn import_private_key(der: &[u8]) -> Result<Self::PrivateKey, AsymmetricError> {
        RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| AsymmetricError::InvalidKey(format!("导入RSA私钥失败: {}", e)))
    }
}
