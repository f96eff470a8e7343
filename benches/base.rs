use criterion::{Criterion, criterion_group, criterion_main};
use seal_gate::asymmetric::{AsymmetricCryptographicSystem, RsaOaepSystem};
use seal_gate::common::config::{CryptoConfig, RunMode};
use seal_gate::common::pem::{self, PemLabel};
use seal_gate::rotation::RotationPolicy;
use seal_gate::rotation::manager::KeyManager;
use seal_gate::server::EncryptionGateway;
use seal_gate::symmetric::{SymmetricCipherBox, SymmetricSession};
use std::hint::black_box;
use std::sync::Arc;

fn bench_rsa_oaep(c: &mut Criterion) {
    let config = CryptoConfig::default();
    let (pk, sk) = RsaOaepSystem::generate_keypair(&config).unwrap();
    let data = vec![0u8; 190];
    c.bench_function("RsaOaepSystem encrypt 190B", |b| {
        b.iter(|| RsaOaepSystem::encrypt(black_box(&pk), black_box(&data)).unwrap());
    });
    let ciphertext = RsaOaepSystem::encrypt(&pk, &data).unwrap();
    c.bench_function("RsaOaepSystem decrypt 190B", |b| {
        b.iter(|| RsaOaepSystem::decrypt(black_box(&sk), black_box(&ciphertext)).unwrap());
    });
}

fn bench_pem(c: &mut Criterion) {
    let (pk, _) = RsaOaepSystem::generate_keypair(&CryptoConfig::default()).unwrap();
    let der = RsaOaepSystem::export_public_key(&pk).unwrap();
    c.bench_function("pem encode public key", |b| {
        b.iter(|| pem::encode(PemLabel::PublicKey, black_box(&der)));
    });
    let text = pem::encode(PemLabel::PublicKey, &der);
    c.bench_function("pem decode public key", |b| {
        b.iter(|| pem::decode(black_box(&text)).unwrap());
    });
}

fn bench_gateway(c: &mut Criterion) {
    let manager = KeyManager::new(CryptoConfig::default(), RotationPolicy::default()).unwrap();
    let gateway: EncryptionGateway = EncryptionGateway::new(Arc::new(manager), RunMode::Production);
    c.bench_function("EncryptionGateway public_key", |b| {
        b.iter(|| gateway.public_key().unwrap());
    });
}

fn bench_aes_cbc(c: &mut Criterion) {
    let cipher = SymmetricCipherBox::from_session(SymmetricSession::generate().unwrap());
    let text = "a".repeat(50 * 1024);
    c.bench_function("SymmetricCipherBox encrypt 50KB", |b| {
        b.iter(|| cipher.encrypt(black_box(&text)));
    });
    let ciphertext = cipher.encrypt(&text);
    c.bench_function("SymmetricCipherBox decrypt 50KB", |b| {
        b.iter(|| cipher.decrypt(black_box(Some(ciphertext.as_str()))).unwrap());
    });
}

criterion_group!(benches, bench_rsa_oaep, bench_pem, bench_gateway, bench_aes_cbc);
criterion_main!(benches);
