//! Encrypted, integrity-checked records.
//!
//! A [`CipherStore`] holds AES-128-CBC ciphertext plus a SHA-1
//! [`HashStore`] of the plaintext. The AES key is never the caller's key
//! itself; it is stretched from it with PBKDF2:
//!
//! ```text
//! key = PBKDF2(caller_key || KPAD, SALT, 11717, 16)
//! ```
//!
//! Decryption re-derives the key, decrypts, and only returns the plaintext
//! once its hash matches the stored one.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::bytes;
use crate::crypto::{
    BLOCK_LEN, KEY_LEN, Padding, SHA1_LEN, aes128_cbc_decrypt, aes128_cbc_encrypt, pbkdf2,
    random_array, sha1,
};
use crate::error::{KryptoError, Result};
use crate::format::hex_bytes;
use crate::hash_store::{HashAlgoId, HashStore};

/// Current record format version.
pub const VERSION_V1: u32 = 1;

/// PBKDF2 iteration count for the cipher key. Never change.
const KEY_ITERATIONS: u32 = 11717;

/// Salt for key derivation, also the static salt of the plaintext hash.
static SALT: LazyLock<[u8; SHA1_LEN]> = LazyLock::new(|| sha1(b"CIPHER_STORE_SALT"));
/// Appended to the caller's key before derivation.
static KPAD: LazyLock<[u8; SHA1_LEN]> = LazyLock::new(|| sha1(b"CIPHER_STORE_KPAD"));

/// Cipher used by a [`CipherStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CiphAlgoId {
    None,
    #[default]
    #[serde(rename = "AES128_CBC")]
    Aes128Cbc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherStore {
    version: u32,
    algo: CiphAlgoId,
    plaintext_hash: HashStore,
    #[serde(with = "hex_bytes")]
    iv: Vec<u8>,
    #[serde(with = "hex_bytes")]
    cipher_text: Vec<u8>,
}

impl Default for CipherStore {
    fn default() -> Self {
        Self {
            version: VERSION_V1,
            algo: CiphAlgoId::Aes128Cbc,
            plaintext_hash: HashStore::default(),
            iv: Vec::new(),
            cipher_text: Vec::new(),
        }
    }
}

fn derive_key(caller_key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let input = Zeroizing::new(bytes::concat(&[caller_key, KPAD.as_slice()]));
    Ok(Zeroizing::new(pbkdf2(
        input.as_slice(),
        SALT.as_slice(),
        KEY_ITERATIONS,
        KEY_LEN,
    )?))
}

impl CipherStore {
    /// Encrypts `text` under a key derived from `caller_key`.
    pub fn create(text: impl AsRef<[u8]>, caller_key: impl AsRef<[u8]>) -> Result<Self> {
        let text = text.as_ref();
        let key = derive_key(caller_key.as_ref())?;
        let iv: [u8; BLOCK_LEN] = random_array()?;

        let plaintext_hash = HashStore::create(text, SALT.as_slice(), HashAlgoId::Sha1)?;
        let cipher_text = aes128_cbc_encrypt(&key, &iv, text, Padding::Pkcs7)?;

        debug!(
            plaintext_len = text.len(),
            cipher_text_len = cipher_text.len(),
            "created cipher store"
        );

        Ok(Self {
            version: VERSION_V1,
            algo: CiphAlgoId::Aes128Cbc,
            plaintext_hash,
            iv: iv.to_vec(),
            cipher_text,
        })
    }

    /// Decrypts the record and checks the plaintext against its stored hash.
    ///
    /// # Errors
    ///
    /// - [`KryptoError::UnsupportedFormat`] if the version, algorithm or
    ///   field lengths are not ones this library writes. Checked before any
    ///   key derivation.
    /// - [`KryptoError::IntegrityCheckFailed`] if the key is wrong or the
    ///   record was corrupted. The two cases are not distinguished.
    pub fn decrypt(&self, caller_key: impl AsRef<[u8]>) -> Result<Zeroizing<Vec<u8>>> {
        self.validate()?;

        let key = derive_key(caller_key.as_ref())?;
        let text = match aes128_cbc_decrypt(&key, &self.iv, &self.cipher_text, Padding::Pkcs7) {
            Ok(text) => Zeroizing::new(text),
            Err(KryptoError::InvalidPadding) => {
                warn!("cipher store padding check failed");
                return Err(KryptoError::IntegrityCheckFailed);
            }
            Err(e) => return Err(e),
        };

        if !self.plaintext_hash.verify(text.as_slice(), SALT.as_slice())? {
            warn!("cipher store plaintext hash mismatch");
            return Err(KryptoError::IntegrityCheckFailed);
        }

        debug!(plaintext_len = text.len(), "decrypted cipher store");
        Ok(text)
    }

    /// [`CipherStore::decrypt`] for records holding UTF-8 text.
    pub fn decrypt_string(&self, caller_key: impl AsRef<[u8]>) -> Result<String> {
        let text = self.decrypt(caller_key)?;
        String::from_utf8(text.to_vec())
            .map_err(|_| KryptoError::InvalidParameter("plaintext is not valid UTF-8".to_string()))
    }

    /// Checks the structural fields of a loaded record.
    pub fn validate(&self) -> Result<()> {
        if self.version != VERSION_V1 {
            return Err(KryptoError::UnsupportedFormat(format!(
                "cipher store version {}",
                self.version
            )));
        }
        if self.algo != CiphAlgoId::Aes128Cbc {
            return Err(KryptoError::UnsupportedFormat(format!(
                "cipher store algorithm {:?}",
                self.algo
            )));
        }
        if self.plaintext_hash.algo() != HashAlgoId::Sha1 {
            return Err(KryptoError::UnsupportedFormat(format!(
                "cipher store plaintext hash algorithm {:?}",
                self.plaintext_hash.algo()
            )));
        }
        if self.iv.len() != BLOCK_LEN {
            return Err(KryptoError::UnsupportedFormat(format!(
                "IV must be {BLOCK_LEN} bytes, got {}",
                self.iv.len()
            )));
        }
        if self.cipher_text.is_empty() || self.cipher_text.len() % BLOCK_LEN != 0 {
            return Err(KryptoError::UnsupportedFormat(format!(
                "cipher text length {} is not a positive multiple of {BLOCK_LEN}",
                self.cipher_text.len()
            )));
        }
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn algo(&self) -> CiphAlgoId {
        self.algo
    }

    pub fn plaintext_hash(&self) -> &HashStore {
        &self.plaintext_hash
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn cipher_text(&self) -> &[u8] {
        &self.cipher_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_decrypt_roundtrip() {
        let store = CipherStore::create("attack at dawn", "pw").unwrap();
        assert_eq!(store.version(), VERSION_V1);
        assert_eq!(store.algo(), CiphAlgoId::Aes128Cbc);
        assert_eq!(store.iv().len(), BLOCK_LEN);
        assert_eq!(store.cipher_text().len(), 16);

        let text = store.decrypt("pw").unwrap();
        assert_eq!(text.as_slice(), b"attack at dawn");
    }

    #[test]
    fn empty_plaintext_roundtrip() {
        let store = CipherStore::create(b"", b"pw").unwrap();
        assert_eq!(store.cipher_text().len(), BLOCK_LEN);
        assert!(store.decrypt(b"pw").unwrap().is_empty());
    }

    #[test]
    fn block_aligned_plaintext_gets_full_pad_block() {
        let store = CipherStore::create([0x55u8; 32], b"pw").unwrap();
        assert_eq!(store.cipher_text().len(), 48);
    }

    #[test]
    fn wrong_key_fails_integrity_check() {
        let store = CipherStore::create("secret", "right").unwrap();
        for key in ["wrong", "", "right ", "Right"] {
            assert!(
                matches!(store.decrypt(key), Err(KryptoError::IntegrityCheckFailed)),
                "key {key:?}"
            );
        }
    }

    #[test]
    fn tampered_cipher_text_fails_integrity_check() {
        let mut store = CipherStore::create("a longer secret spanning blocks", "pw").unwrap();
        store.cipher_text[0] ^= 0x01;
        assert!(matches!(
            store.decrypt("pw"),
            Err(KryptoError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn tampered_iv_fails_integrity_check() {
        let mut store = CipherStore::create("secret", "pw").unwrap();
        store.iv[3] ^= 0x80;
        assert!(matches!(
            store.decrypt("pw"),
            Err(KryptoError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn key_derivation_uses_kpad_and_salt() {
        let key = derive_key(b"pw").unwrap();
        let expected = pbkdf2(
            bytes::concat(&[b"pw".as_slice(), KPAD.as_slice()]),
            SALT.as_slice(),
            KEY_ITERATIONS,
            KEY_LEN,
        )
        .unwrap();
        assert_eq!(key.as_slice(), expected.as_slice());
        assert_eq!(SALT.as_slice(), sha1(b"CIPHER_STORE_SALT").as_slice());
    }

    #[test]
    fn fixed_labels_known_answer() {
        assert_eq!(hex::encode(*SALT), "b743520fe59aa65bf3b62632f59ea1b2c73bdf34");
        assert_eq!(hex::encode(*KPAD), "265d7221e071fdc0d02ca0f34a19fcc037ffb3d0");
    }

    #[test]
    fn derive_key_known_answer() {
        assert_eq!(
            hex::encode(derive_key(b"pw").unwrap().as_slice()),
            "31b3005db7999cf5bb0797121bf56c0d"
        );
    }

    #[test]
    fn stored_record_decrypts_to_known_text() {
        let json = br#"{
            "version": 1,
            "algo": "AES128_CBC",
            "plaintext_hash": {
                "hash": "3b49fc74dc54411cce027f0d807612188e684ced",
                "salt": "a0a1a2a3a4a5a6a7a8a9aaabacadaeaf",
                "algo": "SHA1"
            },
            "iv": "101112131415161718191a1b1c1d1e1f",
            "cipher_text": "a197e7eaeec6390554fc8b18a0f4465a"
        }"#;
        let store = crate::format::decode_cipher_store(json).unwrap();
        assert_eq!(store.decrypt_string("pw").unwrap(), "known plaintext");
        assert!(matches!(
            store.decrypt("pv"),
            Err(KryptoError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn plaintext_hash_uses_fixed_salt() {
        let store = CipherStore::create("text", "pw").unwrap();
        assert_eq!(store.plaintext_hash().algo(), HashAlgoId::Sha1);
        assert!(store.plaintext_hash().verify("text", SALT.as_slice()).unwrap());
    }

    #[test]
    fn unsupported_version_fails_before_decrypting() {
        let mut store = CipherStore::create("text", "pw").unwrap();
        store.version = 2;
        assert!(matches!(
            store.decrypt("pw"),
            Err(KryptoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn unsupported_algorithm_fails() {
        let mut store = CipherStore::create("text", "pw").unwrap();
        store.algo = CiphAlgoId::None;
        assert!(matches!(
            store.decrypt("pw"),
            Err(KryptoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn default_record_is_rejected() {
        let store = CipherStore::default();
        assert_eq!(store.version(), VERSION_V1);
        assert!(matches!(
            store.decrypt("pw"),
            Err(KryptoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn truncated_cipher_text_is_a_format_error() {
        let mut store = CipherStore::create("text", "pw").unwrap();
        store.cipher_text.truncate(10);
        assert!(matches!(
            store.decrypt("pw"),
            Err(KryptoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn decrypt_string_roundtrip() {
        let store = CipherStore::create("grüße", "pw").unwrap();
        assert_eq!(store.decrypt_string("pw").unwrap(), "grüße");
    }

    #[test]
    fn decrypt_string_rejects_binary() {
        let store = CipherStore::create([0xffu8, 0xfe], "pw").unwrap();
        assert!(matches!(
            store.decrypt_string("pw"),
            Err(KryptoError::InvalidParameter(_))
        ));
    }

    #[test]
    fn each_encryption_uses_a_fresh_iv() {
        let a = CipherStore::create("same", "pw").unwrap();
        let b = CipherStore::create("same", "pw").unwrap();
        assert_ne!(a.iv(), b.iv());
        assert_ne!(a.cipher_text(), b.cipher_text());
    }
}
