//! Password-derived keys, salted hash records and integrity-checked cipher
//! stores.
//!
//! - [`HashStore`] keeps a salted hash of a secret so it can be verified later.
//! - [`CipherStore`] encrypts data under a key stretched from a password and
//!   refuses to hand back plaintext whose hash does not check out.
//! - [`kdf`] derives fixed-parameter key material and unique nonces.
//! - [`crypto`] holds the HMAC, PBKDF2, AES-CBC and AES-CMAC building blocks.

pub mod bytes;
pub mod cipher_store;
pub mod crypto;
mod error;
pub mod format;
pub mod hash_store;
pub mod kdf;
pub mod selftest;
mod storage;

pub use crate::cipher_store::{CiphAlgoId, CipherStore};
pub use crate::error::{KryptoError, Result};
pub use crate::hash_store::{HashAlgoId, HashStore};
pub use crate::kdf::{
    NonceGenerator, derive_bytes, derive_key_bytes, nonce_bytes, nonce_string,
};
pub use crate::crypto::{random_bytes, random_int};
pub use crate::storage::Storage;

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn password_record_lifecycle() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("login.json"));

        let record = HashStore::create("correct horse", b"app-salt", HashAlgoId::Pbkdf2).unwrap();
        storage.save_record(&record).unwrap();

        let loaded = storage.load_hash_store().unwrap();
        assert!(loaded.verify("correct horse", b"app-salt").unwrap());
        assert!(!loaded.verify("battery staple", b"app-salt").unwrap());
    }

    #[test]
    fn secret_record_lifecycle() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("secret.json"));

        let key = derive_key_bytes("master phrase", 32).unwrap();
        let record = CipherStore::create(b"api-token-123", &key).unwrap();
        storage.save_record(&record).unwrap();

        let loaded = storage.load_cipher_store().unwrap();
        assert_eq!(loaded.decrypt(&key).unwrap().as_slice(), b"api-token-123");

        let other = derive_key_bytes("other phrase", 32).unwrap();
        assert!(matches!(
            loaded.decrypt(&other),
            Err(KryptoError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn random_int_and_bytes_are_exposed() {
        assert_eq!(random_bytes(5).unwrap().len(), 5);
        let _ = random_int().unwrap();
    }
}
