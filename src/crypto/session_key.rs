use hkdf::Hkdf;
use sha2::Sha256;
use std::sync::Arc;
use zeroize::{Zeroize, Zeroizing};
use crate::crypto::aes::{self, SecureKey, IV_SIZE, KEY_SIZE};
use crate::error::{AppError, Result};

/// Domain-separation salt for per-principal key derivation.
const KDF_SALT: &[u8] = b"keylease/session-key/v1";

/// Encrypts and decrypts delegated session private keys.
///
/// Each principal gets its own AES-256 key, derived with HKDF-SHA256 from
/// the server master secret using the principal id as the `info` input.
/// Decrypting under the wrong principal derives a different key and fails
/// the GCM tag check; it can never yield another principal's secret.
#[derive(Clone)]
pub struct KeyEncryption {
    master_key: Arc<SecureKey>,
}

impl KeyEncryption {
    /// Creates the service from a 32-byte master secret.
    pub fn new(master_key: &[u8]) -> Result<Self> {
        let key: [u8; KEY_SIZE] = master_key
            .try_into()
            .map_err(|_| AppError::Encryption("Invalid master key size".to_string()))?;
        Ok(Self {
            master_key: Arc::new(SecureKey::new(key)),
        })
    }

    /// Derives the AES key for a single principal.
    fn derive_principal_key(&self, principal_id: &str) -> Result<SecureKey> {
        let hk = Hkdf::<Sha256>::new(Some(KDF_SALT), self.master_key.as_bytes());
        let mut okm = [0u8; KEY_SIZE];
        hk.expand(principal_id.as_bytes(), &mut okm)
            .map_err(|e| AppError::Encryption(format!("Key derivation failed: {}", e)))?;
        let key = SecureKey::new(okm);
        okm.zeroize();
        Ok(key)
    }

    /// Encrypts a plaintext session private key for `principal_id`.
    ///
    /// # Returns
    ///
    /// A tuple containing the ciphertext and the fresh IV used for this
    /// encryption. The IV is random per call and never reused.
    pub fn encrypt(
        &self,
        plaintext_key: &str,
        principal_id: &str,
    ) -> Result<(Vec<u8>, [u8; IV_SIZE])> {
        let key = self.derive_principal_key(principal_id)?;
        aes::encrypt(&key, plaintext_key.as_bytes())
    }

    /// Decrypts a stored session private key for `principal_id`.
    ///
    /// The returned plaintext is zeroized on drop. Any unreadable input
    /// (wrong principal, tampered ciphertext, malformed IV) fails with the
    /// opaque `Decryption` error.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        iv: &[u8],
        principal_id: &str,
    ) -> Result<Zeroizing<String>> {
        let iv: [u8; IV_SIZE] = iv.try_into().map_err(|_| AppError::Decryption)?;
        let key = self.derive_principal_key(principal_id)?;
        let plaintext = aes::decrypt(&key, ciphertext, &iv)?;

        match String::from_utf8(plaintext) {
            Ok(s) => Ok(Zeroizing::new(s)),
            Err(e) => {
                let mut bytes = e.into_bytes();
                bytes.zeroize();
                Err(AppError::Decryption)
            }
        }
    }
}
