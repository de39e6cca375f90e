//! PBKDF2 (RFC 8018 section 5.2) with HMAC as the PRF.

use tracing::warn;

use super::hash::{HashFunction, Sha1Hash};
use super::hmac::hmac;
use crate::bytes;
use crate::error::{KryptoError, Result};

/// Largest iteration count accepted before a request is treated as a
/// resource-exhaustion attempt.
pub const MAX_ITERATIONS: u32 = 1 << 24;

/// PBKDF2-HMAC-SHA1.
///
/// # Errors
///
/// Returns [`KryptoError::InvalidParameter`] if `iterations` is zero or above
/// [`MAX_ITERATIONS`], or if `output_len` needs more than `u32::MAX` blocks.
pub fn pbkdf2(
    password: impl AsRef<[u8]>,
    salt: impl AsRef<[u8]>,
    iterations: u32,
    output_len: usize,
) -> Result<Vec<u8>> {
    pbkdf2_with::<Sha1Hash>(password.as_ref(), salt.as_ref(), iterations, output_len)
}

/// PBKDF2 over HMAC with any [`HashFunction`].
pub fn pbkdf2_with<H: HashFunction>(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
) -> Result<Vec<u8>> {
    if iterations == 0 {
        return Err(KryptoError::InvalidParameter(
            "PBKDF2 iterations must be >= 1".to_string(),
        ));
    }
    if iterations > MAX_ITERATIONS {
        warn!(iterations, max = MAX_ITERATIONS, "refusing oversized PBKDF2 iteration count");
        return Err(KryptoError::InvalidParameter(format!(
            "PBKDF2 iterations must be <= {MAX_ITERATIONS}, got {iterations}"
        )));
    }

    let blocks = output_len.div_ceil(H::OUTPUT_LEN) as u64;
    if blocks > u64::from(u32::MAX) {
        return Err(KryptoError::InvalidParameter(format!(
            "PBKDF2 output length {output_len} exceeds the 32-bit block index"
        )));
    }

    let mut out = Vec::with_capacity(output_len);
    for index in 1..=blocks as u32 {
        let block = block::<H>(password, salt, iterations, index)?;
        let take = (output_len - out.len()).min(block.len());
        out.extend_from_slice(&block[..take]);
    }
    Ok(out)
}

/// Length of a WPA pre-shared key.
pub const WPA_PSK_LEN: usize = 32;
/// Accepted passphrase lengths, in bytes (IEEE 802.11i-2004 H.4.1).
pub const WPA_PASSPHRASE_LEN: std::ops::RangeInclusive<usize> = 8..=63;
const WPA_PSK_ITERATIONS: u32 = 4096;

/// WPA passphrase-to-PSK mapping: `PBKDF2(passphrase, ssid, 4096, 32)`.
///
/// # Errors
///
/// [`KryptoError::InvalidParameter`] if the passphrase is not 8 to 63 bytes.
pub fn wpa_psk(
    passphrase: impl AsRef<[u8]>,
    ssid: impl AsRef<[u8]>,
) -> Result<[u8; WPA_PSK_LEN]> {
    let passphrase = passphrase.as_ref();
    if !WPA_PASSPHRASE_LEN.contains(&passphrase.len()) {
        return Err(KryptoError::InvalidParameter(format!(
            "WPA passphrase must be 8 to 63 bytes, got {}",
            passphrase.len()
        )));
    }
    let dk = pbkdf2(passphrase, ssid, WPA_PSK_ITERATIONS, WPA_PSK_LEN)?;
    let mut psk = [0u8; WPA_PSK_LEN];
    psk.copy_from_slice(&dk);
    Ok(psk)
}

/// `F(P, S, c, i) = U1 ^ U2 ^ ... ^ Uc`
fn block<H: HashFunction>(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    index: u32,
) -> Result<Vec<u8>> {
    let mut u = hmac::<H>(password, &bytes::concat(&[salt, &index.to_be_bytes()]));
    let mut acc = u.clone();
    for _ in 1..iterations {
        u = hmac::<H>(password, &u);
        bytes::xor(&mut acc, &u)?;
    }
    Ok(acc)
}
