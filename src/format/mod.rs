//! JSON form of the stored records.
//!
//! Byte fields are written as lowercase hex so they round-trip exactly:
//!
//! ```text
//! {
//!   "version": 1,
//!   "algo": "AES128_CBC",
//!   "plaintext_hash": { "hash": "..", "salt": "..", "algo": "SHA1" },
//!   "iv": "..",
//!   "cipher_text": ".."
//! }
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cipher_store::{CipherStore, VERSION_V1};
use crate::error::{KryptoError, Result};
use crate::hash_store::HashStore;

pub mod hex_bytes;

/// Serializes a record to pretty-printed JSON.
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(record)?)
}

/// Data errors (unknown algorithm names, bad hex, missing fields) are format
/// errors; anything else is reported as JSON.
fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    serde_json::from_slice(data).map_err(|e| {
        if e.is_data() {
            KryptoError::UnsupportedFormat(e.to_string())
        } else {
            KryptoError::Json(e)
        }
    })
}

/// Parses a [`HashStore`].
pub fn decode_hash_store(data: &[u8]) -> Result<HashStore> {
    decode(data)
}

/// Parses a [`CipherStore`], rejecting versions this library does not write.
pub fn decode_cipher_store(data: &[u8]) -> Result<CipherStore> {
    let store: CipherStore = decode(data)?;
    if store.version() != VERSION_V1 {
        return Err(KryptoError::UnsupportedFormat(format!(
            "unsupported cipher store version: {}",
            store.version()
        )));
    }
    Ok(store)
}
