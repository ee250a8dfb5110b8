use uuid::Uuid;
use zeroize::Zeroizing;

use keylease::crypto::session_key::KeyEncryption;
use keylease::error::AppError;
use keylease::services::lifecycle::AuthorizeSession;

const MASTER_KEY: [u8; 32] = [42u8; 32];

fn keys() -> KeyEncryption {
    KeyEncryption::new(&MASTER_KEY).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_bit_exact() {
        let keys = keys();
        let plaintext = "5Kd3NBUAdUnhyzenEwVLy9pBKxSwXvE9FMPyR4UKZvpe6E3AqLp";

        let (ciphertext, iv) = keys.encrypt(plaintext, "principal-1").unwrap();
        assert_ne!(ciphertext.as_slice(), plaintext.as_bytes());

        let decrypted = keys.decrypt(&ciphertext, &iv, "principal-1").unwrap();
        assert_eq!(decrypted.as_str(), plaintext);
    }

    #[test]
    fn cross_principal_decryption_fails() {
        let keys = keys();
        let (ciphertext, iv) = keys.encrypt("secret", "principal-1").unwrap();

        let other = keys.decrypt(&ciphertext, &iv, "principal-2");
        assert!(matches!(other, Err(AppError::Decryption)));
    }

    #[test]
    fn every_encryption_uses_a_fresh_iv() {
        let keys = keys();
        let (c1, iv1) = keys.encrypt("secret", "principal-1").unwrap();
        let (c2, iv2) = keys.encrypt("secret", "principal-1").unwrap();

        assert_ne!(iv1, iv2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let keys = keys();
        let (mut ciphertext, iv) = keys.encrypt("secret", "principal-1").unwrap();
        ciphertext[0] ^= 0x01;

        assert!(matches!(
            keys.decrypt(&ciphertext, &iv, "principal-1"),
            Err(AppError::Decryption)
        ));
    }

    #[test]
    fn malformed_iv_is_rejected() {
        let keys = keys();
        let (ciphertext, _) = keys.encrypt("secret", "principal-1").unwrap();

        assert!(matches!(
            keys.decrypt(&ciphertext, &[0u8; 11], "principal-1"),
            Err(AppError::Decryption)
        ));
    }

    #[test]
    fn master_key_must_be_32_bytes() {
        assert!(KeyEncryption::new(&[1u8; 16]).is_err());
        assert!(KeyEncryption::new(&[]).is_err());
        assert!(KeyEncryption::new(&[1u8; 32]).is_ok());
    }

    #[test]
    fn different_master_secrets_cannot_read_each_other() {
        let a = KeyEncryption::new(&[1u8; 32]).unwrap();
        let b = KeyEncryption::new(&[2u8; 32]).unwrap();

        let (ciphertext, iv) = a.encrypt("secret", "principal-1").unwrap();
        assert!(matches!(
            b.decrypt(&ciphertext, &iv, "principal-1"),
            Err(AppError::Decryption)
        ));
    }

    #[test]
    fn authorize_input_debug_redacts_the_private_key() {
        let input = AuthorizeSession {
            request_id: Uuid::new_v4(),
            session_key_public: "PK1".to_string(),
            session_key_private: Zeroizing::new("very-secret-key".to_string()),
            principal_wallet: "W1".to_string(),
            request_ip: None,
            request_user_agent: None,
        };

        let rendered = format!("{:?}", input);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("very-secret-key"));
    }
}
