//! Hash providers that HMAC and PBKDF2 are generic over.

use sha1::Digest;

/// A fixed-block-size cryptographic hash.
///
/// Implement this for a new hash to use it with [`hmac`](super::hmac::hmac)
/// and [`pbkdf2_with`](super::pbkdf2::pbkdf2_with).
pub trait HashFunction {
    /// Internal block size in bytes (HMAC pads keys to this length).
    const BLOCK_LEN: usize;
    /// Digest length in bytes.
    const OUTPUT_LEN: usize;

    fn digest(data: &[u8]) -> Vec<u8>;
}

/// SHA-1, the hash used by every stored record.
#[derive(Debug, Clone, Copy)]
pub struct Sha1Hash;

impl HashFunction for Sha1Hash {
    const BLOCK_LEN: usize = 64;
    const OUTPUT_LEN: usize = 20;

    fn digest(data: &[u8]) -> Vec<u8> {
        sha1::Sha1::digest(data).to_vec()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    const BLOCK_LEN: usize = 64;
    const OUTPUT_LEN: usize = 32;

    fn digest(data: &[u8]) -> Vec<u8> {
        sha2::Sha256::digest(data).to_vec()
    }
}

/// SHA-1 digest of `data`.
pub fn sha1(data: &[u8]) -> [u8; 20] {
    sha1::Sha1::digest(data).into()
}
