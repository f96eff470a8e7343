//! 定义了非对称加密系统的核心 Trait。
use crate::asymmetric::errors::AsymmetricError;
use crate::common::config::CryptoConfig;
use crate::common::utils::ZeroizingVec;
use std::fmt::Debug;

/// `AsymmetricCryptographicSystem` 定义了非对称加密算法必须实现的核心功能。
///
/// 在 `seal-gate` 中，公钥被交给不受信任的浏览器客户端用于加密短密文，
/// 私钥只在服务端用于解密，永远不会经由生产路径导出。
///
/// 密钥类型是“解密就绪”的原生对象，解密前不需要重新导入。
pub trait AsymmetricCryptographicSystem: Send + Sync + Sized + 'static {
    /// 公钥类型
    type PublicKey: Clone + Debug + Send + Sync;

    /// 私钥类型
    type PrivateKey: Clone + Send + Sync;

    /// 算法标识，随公钥一起下发给客户端
    const ALGORITHM: &'static str;

    /// 生成密钥对
    fn generate_keypair(
        config: &CryptoConfig,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), AsymmetricError>;

    /// 从私钥派生对应的公钥
    fn public_key_of(private_key: &Self::PrivateKey) -> Self::PublicKey;

    /// 单次加密允许的最大明文长度（字节）
    fn max_plaintext_len(public_key: &Self::PublicKey) -> usize;

    /// 使用公钥加密一段短明文。
    fn encrypt(public_key: &Self::PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, AsymmetricError>;

    /// 使用私钥解密。任何失败都必须归为 [`AsymmetricError::Decryption`]。
    fn decrypt(
        private_key: &Self::PrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, AsymmetricError>;

    /// 将公钥导出为 DER（SubjectPublicKeyInfo）
    fn export_public_key(public_key: &Self::PublicKey) -> Result<Vec<u8>, AsymmetricError>;

    /// 将私钥导出为 DER（PKCS#8）
    fn export_private_key(private_key: &Self::PrivateKey) -> Result<ZeroizingVec, AsymmetricError>;

    /// 从 DER 导入公钥
    fn import_public_key(der: &[u8]) -> Result<Self::PublicKey, AsymmetricError>;

    /// 从 DER 导入私钥
    fn import_private_key(der: &[u8]) -> Result<Self::PrivateKey, AsymmetricError>;
}
