//! Cryptographic primitives.
//!
//! Provides the generic HMAC and PBKDF2 engines, the AES-128 block cipher
//! modes, and the secure random source.

pub mod cbc;
pub mod cmac;
pub mod hash;
pub mod hmac;
pub mod pbkdf2;
pub mod random;

pub use cbc::{Padding, aes128_cbc_decrypt, aes128_cbc_encrypt};
pub use cmac::cmac_aes128;
pub use hash::{HashFunction, Sha1Hash, Sha256Hash, sha1};
pub use hmac::{hmac, hmac_sha1};
pub use pbkdf2::{MAX_ITERATIONS, WPA_PSK_LEN, pbkdf2, pbkdf2_with, wpa_psk};
pub use random::{random_array, random_bytes, random_int, secure_random};

/// AES block length (16 bytes).
pub const BLOCK_LEN: usize = 16;
/// AES-128 key length (16 bytes).
pub const KEY_LEN: usize = 16;
/// Length of the random salt in a hash store (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of a SHA-1 digest (20 bytes).
pub const SHA1_LEN: usize = 20;
