//! HMAC (RFC 2104) over any [`HashFunction`].

use super::hash::{HashFunction, Sha1Hash};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Computes `HMAC_H(key, message)`.
///
/// Keys longer than the hash block are hashed first; shorter keys are
/// zero-extended to the block length, never truncated.
pub fn hmac<H: HashFunction>(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut key_block = vec![0u8; H::BLOCK_LEN];
    if key.len() > H::BLOCK_LEN {
        let hashed = H::digest(key);
        key_block[..hashed.len()].copy_from_slice(&hashed);
    } else {
        key_block[..key.len()].copy_from_slice(key);
    }

    let mut inner = Vec::with_capacity(H::BLOCK_LEN + message.len());
    inner.extend(key_block.iter().map(|b| b ^ IPAD));
    inner.extend_from_slice(message);
    let inner_hash = H::digest(&inner);

    let mut outer = Vec::with_capacity(H::BLOCK_LEN + inner_hash.len());
    outer.extend(key_block.iter().map(|b| b ^ OPAD));
    outer.extend_from_slice(&inner_hash);
    H::digest(&outer)
}

/// HMAC-SHA1.
pub fn hmac_sha1(key: impl AsRef<[u8]>, message: impl AsRef<[u8]>) -> Vec<u8> {
    hmac::<Sha1Hash>(key.as_ref(), message.as_ref())
}
