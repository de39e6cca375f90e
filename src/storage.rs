//! File persistence for encoded records.

use std::fs::{self, OpenOptions};
#[cfg(unix)]
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::cipher_store::CipherStore;
use crate::crypto::random_array;
use crate::error::{KryptoError, Result};
use crate::format;
use crate::hash_store::HashStore;

/// One record file on disk.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    pub fn load_hash_store(&self) -> Result<HashStore> {
        format::decode_hash_store(&self.load()?)
    }

    pub fn load_cipher_store(&self) -> Result<CipherStore> {
        format::decode_cipher_store(&self.load()?)
    }

    pub fn save_record<T: Serialize>(&self, record: &T) -> Result<()> {
        self.save(&format::encode(record)?)
    }

    /// Writes `data` so that a crash leaves either the old or the new file.
    ///
    /// The bytes go to a randomly named sibling file first, which is synced
    /// and then renamed over the target; the directory is synced last.
    /// Missing parent directories are created.
    pub fn save(&self, data: &[u8]) -> Result<()> {
        if let Some(parent) = self.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.random_tmp_path()?;
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)?;
        tmp_file.write_all(data)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        self.sync_parent()?;

        debug!(path = %self.path.display(), bytes = data.len(), "saved record");
        Ok(())
    }

    #[cfg(unix)]
    fn sync_parent(&self) -> Result<()> {
        if let Some(parent) = self.parent() {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }

    /// Directories cannot be opened for syncing here; the rename is enough.
    #[cfg(not(unix))]
    fn sync_parent(&self) -> Result<()> {
        Ok(())
    }

    fn parent(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// `<file name>.tmp.<16 hex digits>` next to the target.
    fn random_tmp_path(&self) -> Result<PathBuf> {
        let file_name = self.path.file_name().ok_or_else(|| {
            KryptoError::InvalidParameter(format!("'{}' has no file name", self.path.display()))
        })?;
        let suffix: [u8; 8] = random_array()?;
        let tmp_name = format!("{}.tmp.{}", file_name.to_string_lossy(), hex::encode(suffix));
        Ok(self.path.with_file_name(tmp_name))
    }
}
