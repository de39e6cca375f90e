//! Fixed-parameter key stretching and nonce generation.
//!
//! The salt and iteration counts below are baked into every key ever derived
//! with them. A use case that needs different parameters gets a new function.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;

use crate::crypto::{pbkdf2, random_array};
use crate::error::Result;

/// GUID `7331c367-5645-4baa-8705-3d6912e9bc07` in its mixed-endian byte form.
const KEY_SALT: [u8; 16] = [
    0x67, 0xc3, 0x31, 0x73, 0x45, 0x56, 0xaa, 0x4b, 0x87, 0x05, 0x3d, 0x69, 0x12, 0xe9, 0xbc, 0x07,
];
const KEY_ITERATIONS: u32 = 4077;

const FAST_SALT: [u8; 4] = [1, 2, 3, 4];
const FAST_ITERATIONS: u32 = 5;

/// Length of the byte string behind [`NonceGenerator::nonce_string`].
const NONCE_STRING_BYTES: usize = 15;

/// Stretches `text` into `keylen` bytes of key material.
pub fn derive_key_bytes(text: impl AsRef<[u8]>, keylen: usize) -> Result<Vec<u8>> {
    pbkdf2(text, KEY_SALT, KEY_ITERATIONS, keylen)
}

/// Cheap deterministic byte stream for `text`. Not for secrets.
pub fn derive_bytes(text: impl AsRef<[u8]>, keylen: usize) -> Result<Vec<u8>> {
    pbkdf2(text, FAST_SALT, FAST_ITERATIONS, keylen)
}

/// Produces values that never repeat within one process.
///
/// Each nonce mixes the wall clock, a call counter and 8 random bytes,
/// then runs them through [`derive_bytes`]. The counter starts at zero.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    counter: AtomicU64,
}

impl NonceGenerator {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Number of nonces handed out so far.
    pub fn count(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    fn base(&self) -> Result<String> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let noise: [u8; 8] = random_array()?;
        Ok(format!(
            "{}{}{}",
            Utc::now().format("%Y%m%d%H%M%S%f"),
            n,
            hex::encode(noise)
        ))
    }

    pub fn nonce_bytes(&self, count: usize) -> Result<Vec<u8>> {
        derive_bytes(self.base()?, count)
    }

    /// A 20-character base64 nonce.
    pub fn nonce_string(&self) -> Result<String> {
        Ok(STANDARD.encode(self.nonce_bytes(NONCE_STRING_BYTES)?))
    }
}

static NONCES: NonceGenerator = NonceGenerator::new();

/// `count` nonce bytes from the process-wide generator.
pub fn nonce_bytes(count: usize) -> Result<Vec<u8>> {
    NONCES.nonce_bytes(count)
}

/// A nonce string from the process-wide generator.
pub fn nonce_string() -> Result<String> {
    NONCES.nonce_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn key_salt_matches_guid() {
        let guid = "7331c367-5645-4baa-8705-3d6912e9bc07".replace('-', "");
        let be = hex::decode(guid).unwrap();
        let mut le = be.clone();
        le[0..4].reverse();
        le[4..6].reverse();
        le[6..8].reverse();
        assert_eq!(le, KEY_SALT);
    }

    #[test]
    fn derive_key_bytes_is_deterministic() {
        let a = derive_key_bytes("phrase", 32).unwrap();
        let b = derive_key_bytes("phrase", 32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert_eq!(a, pbkdf2("phrase", KEY_SALT, KEY_ITERATIONS, 32).unwrap());
    }

    // Previously derived keys depend on these exact outputs.
    #[test]
    fn derive_known_answers() {
        assert_eq!(
            hex::encode(derive_key_bytes("phrase", 16).unwrap()),
            "3d025a6b09b727faf73035c5b1e845b0"
        );
        assert_eq!(
            hex::encode(derive_bytes("phrase", 16).unwrap()),
            "a9c79ac9c35119c1e523729c9beafd8a"
        );
    }

    #[test]
    fn derive_variants_differ() {
        assert_ne!(
            derive_key_bytes("phrase", 20).unwrap(),
            derive_bytes("phrase", 20).unwrap()
        );
        assert_eq!(
            derive_bytes(b"phrase", 7).unwrap(),
            pbkdf2("phrase", [1u8, 2, 3, 4], 5, 7).unwrap()
        );
    }

    #[test]
    fn nonce_counter_starts_at_zero() {
        let nonces = NonceGenerator::new();
        assert_eq!(nonces.count(), 0);
        nonces.nonce_bytes(8).unwrap();
        nonces.nonce_string().unwrap();
        assert_eq!(nonces.count(), 2);
    }

    #[test]
    fn nonce_lengths() {
        assert_eq!(nonce_bytes(24).unwrap().len(), 24);
        assert_eq!(nonce_string().unwrap().len(), 20);
    }

    #[test]
    fn ten_thousand_sequential_nonces_are_distinct() {
        let nonces = NonceGenerator::new();
        let seen: HashSet<String> = (0..10_000).map(|_| nonces.nonce_string().unwrap()).collect();
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn concurrent_nonces_are_distinct() {
        let nonces = Arc::new(NonceGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let nonces = Arc::clone(&nonces);
                thread::spawn(move || {
                    (0..500)
                        .map(|_| nonces.nonce_bytes(16).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for nonce in handle.join().unwrap() {
                assert!(seen.insert(nonce));
            }
        }
        assert_eq!(nonces.count(), 2000);
    }
}
