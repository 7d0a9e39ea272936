//! Local image storage under `<data-root>/pictures`.
//!
//! Filenames are a millisecond timestamp plus a random salt. The salt keeps
//! two saves landing in the same millisecond from colliding; the loop below
//! regenerates on the remaining astronomically-unlikely duplicate.

use crate::error::{Error, Result};
use chrono::Utc;
use rand::RngExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension applied to every stored image.
pub const IMAGE_EXT: &str = ".jpg";

/// Filesystem-backed image storage.
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Creates a store rooted at `<data_root>/pictures`.
    pub fn new(data_root: impl AsRef<Path>) -> Self {
        Self { root: data_root.as_ref().join("pictures") }
    }

    /// Absolute path for a stored image name.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Writes image bytes under a freshly generated unique name and
    /// returns that name.
    pub fn save(&self, bytes: &[u8]) -> Result<String> {
        std::fs::create_dir_all(&self.root)?;

        let name = loop {
            let candidate = generate_unique_image_name();
            if !self.root.join(&candidate).exists() {
                break candidate;
            }
        };

        std::fs::write(self.root.join(&name), bytes)
            .map_err(|e| Error::ImageDownload(format!("write {name}: {e}")))?;

        debug!("Stored image {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    /// Reads a stored image back.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.path(name))?)
    }

    /// Removes a stored image. Missing files are ignored; the record is
    /// already gone or being replaced, and there is nothing to roll back.
    pub fn delete(&self, name: &str) -> Result<()> {
        match std::fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// True if the named image exists on disk.
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }
}

/// Millisecond timestamp + 4 hex digits of salt + fixed extension.
fn generate_unique_image_name() -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S%3f");
    let salt: u16 = rand::rng().random();
    format!("{stamp}{salt:04x}{IMAGE_EXT}")
}
