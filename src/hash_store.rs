//! Salted verification records for passwords and other secrets.

use serde::{Deserialize, Serialize};

use crate::bytes;
use crate::crypto::{SALT_LEN, pbkdf2, random_array, sha1};
use crate::error::{KryptoError, Result};
use crate::format::hex_bytes;

/// PBKDF2 parameters for [`HashAlgoId::Pbkdf2`] records. Never change.
const PBKDF2_ITERATIONS: u32 = 2112;
const PBKDF2_HASH_LEN: usize = 32;

/// Hash construction used by a [`HashStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HashAlgoId {
    #[default]
    None,
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "PBKDF2")]
    Pbkdf2,
}

/// A hash of some text together with the random salt it was made with.
///
/// Created once with [`HashStore::create`], then checked any number of
/// times with [`HashStore::verify`]. The static salt is supplied by the
/// caller on both sides and is not stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HashStore {
    #[serde(with = "hex_bytes")]
    hash: Vec<u8>,
    #[serde(with = "hex_bytes")]
    salt: Vec<u8>,
    algo: HashAlgoId,
}

impl HashStore {
    /// Hashes `text` with a fresh random salt and the caller's static salt.
    ///
    /// # Errors
    ///
    /// [`KryptoError::UnsupportedAlgorithm`] for [`HashAlgoId::None`].
    pub fn create(
        text: impl AsRef<[u8]>,
        static_salt: impl AsRef<[u8]>,
        algo: HashAlgoId,
    ) -> Result<Self> {
        let salt: [u8; SALT_LEN] = random_array()?;
        let hash = hash3(text.as_ref(), &salt, static_salt.as_ref(), algo)?;
        Ok(Self {
            hash,
            salt: salt.to_vec(),
            algo,
        })
    }

    /// Same as [`HashStore::create`] with SHA-1, the default algorithm.
    pub fn create_sha1(text: impl AsRef<[u8]>, static_salt: impl AsRef<[u8]>) -> Result<Self> {
        Self::create(text, static_salt, HashAlgoId::Sha1)
    }

    /// Returns whether `text` hashes to the stored value.
    pub fn verify(&self, text: impl AsRef<[u8]>, static_salt: impl AsRef<[u8]>) -> Result<bool> {
        let hash = hash3(text.as_ref(), &self.salt, static_salt.as_ref(), self.algo)?;
        Ok(bytes::compare(&self.hash, &hash))
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn algo(&self) -> HashAlgoId {
        self.algo
    }
}

fn hash3(text: &[u8], random_salt: &[u8], static_salt: &[u8], algo: HashAlgoId) -> Result<Vec<u8>> {
    match algo {
        HashAlgoId::Sha1 => Ok(sha1(&bytes::concat(&[text, random_salt, static_salt])).to_vec()),
        HashAlgoId::Pbkdf2 => pbkdf2(
            text,
            bytes::concat(&[random_salt, static_salt]),
            PBKDF2_ITERATIONS,
            PBKDF2_HASH_LEN,
        ),
        HashAlgoId::None => Err(KryptoError::UnsupportedAlgorithm(
            "hash store algorithm is None".to_string(),
        )),
    }
}
