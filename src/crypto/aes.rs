use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use aes_gcm::aead::rand_core::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};
use crate::error::{AppError, Result};

/// The size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// The size of the AES-GCM IV in bytes.
pub const IV_SIZE: usize = 12;

/// A secure key wrapper that ensures the key is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureKey([u8; KEY_SIZE]);

impl SecureKey {
    /// Creates a new `SecureKey` from a byte array.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Returns a reference to the key as a byte slice.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Generates a fresh random AES-GCM IV.
///
/// Every call draws from the OS RNG; an IV is used for exactly one
/// encryption and never again under the same key.
pub fn generate_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypts a plaintext using AES-256-GCM with a freshly generated IV.
///
/// # Arguments
///
/// * `key` - The AES-256 key.
/// * `plaintext` - The data to encrypt.
///
/// # Returns
///
/// A tuple containing the ciphertext and the IV used for encryption.
pub fn encrypt(key: &SecureKey, plaintext: &[u8]) -> Result<(Vec<u8>, [u8; IV_SIZE])> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let iv_bytes = generate_iv();
    let iv = Nonce::from(iv_bytes);

    let ciphertext = cipher
        .encrypt(&iv, plaintext)
        .map_err(|e| AppError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok((ciphertext, iv_bytes))
}

/// Decrypts a ciphertext using AES-256-GCM.
///
/// Fails with `Decryption` for any unreadable input: wrong key, tampered
/// ciphertext or mismatched IV all collapse to the same opaque error.
pub fn decrypt(key: &SecureKey, ciphertext: &[u8], iv: &[u8; IV_SIZE]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let iv = Nonce::from(*iv);

    cipher
        .decrypt(&iv, ciphertext)
        .map_err(|_| AppError::Decryption)
}
