//! AES-128 in CBC mode.

use aes::Aes128;
use cbc::cipher::{
    BlockDecryptMut, BlockEncryptMut, KeyIvInit,
    block_padding::{NoPadding, Pkcs7},
};

use super::{BLOCK_LEN, KEY_LEN};
use crate::error::{KryptoError, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Block padding applied before encryption and stripped after decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// PKCS#7: always adds 1 to 16 bytes, each holding the pad length.
    Pkcs7,
    /// No padding; input must already be block-aligned.
    None,
}

fn check_lengths(key: &[u8], iv: &[u8]) -> Result<()> {
    if key.len() != KEY_LEN {
        return Err(KryptoError::InvalidParameter(format!(
            "AES-128 key must be {KEY_LEN} bytes, got {}",
            key.len()
        )));
    }
    if iv.len() != BLOCK_LEN {
        return Err(KryptoError::InvalidParameter(format!(
            "IV must be {BLOCK_LEN} bytes, got {}",
            iv.len()
        )));
    }
    Ok(())
}

fn check_aligned(data: &[u8]) -> Result<()> {
    if data.len() % BLOCK_LEN != 0 {
        return Err(KryptoError::InvalidParameter(format!(
            "data length {} is not a multiple of {BLOCK_LEN}",
            data.len()
        )));
    }
    Ok(())
}

/// Encrypt `data` with AES-128-CBC.
pub fn aes128_cbc_encrypt(key: &[u8], iv: &[u8], data: &[u8], padding: Padding) -> Result<Vec<u8>> {
    check_lengths(key, iv)?;
    let cipher = Aes128CbcEnc::new_from_slices(key, iv)
        .map_err(|e| KryptoError::InvalidParameter(e.to_string()))?;

    match padding {
        Padding::Pkcs7 => Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data)),
        Padding::None => {
            check_aligned(data)?;
            Ok(cipher.encrypt_padded_vec_mut::<NoPadding>(data))
        }
    }
}

/// Decrypt `data` with AES-128-CBC.
///
/// # Errors
///
/// [`KryptoError::InvalidPadding`] if the PKCS#7 trailer is malformed, which
/// is what a wrong key usually produces.
pub fn aes128_cbc_decrypt(key: &[u8], iv: &[u8], data: &[u8], padding: Padding) -> Result<Vec<u8>> {
    check_lengths(key, iv)?;
    check_aligned(data)?;
    let cipher = Aes128CbcDec::new_from_slices(key, iv)
        .map_err(|e| KryptoError::InvalidParameter(e.to_string()))?;

    match padding {
        Padding::Pkcs7 => cipher
            .decrypt_padded_vec_mut::<Pkcs7>(data)
            .map_err(|_| KryptoError::InvalidPadding),
        Padding::None => cipher
            .decrypt_padded_vec_mut::<NoPadding>(data)
            .map_err(|_| KryptoError::InvalidPadding),
    }
}
