//! On-disk home of the committed blobs and their version stamp.
//!
//! Blobs are written to a temp file in the data directory and renamed onto
//! the final name, so a crash mid-commit leaves at most a stray temp file and
//! the previous blob untouched. The version stamp is written last: a stamp
//! only exists for blobs that were fully committed.

use crate::build::BuiltBlobs;
use crate::config;
use crate::error::{Result, StoreError};
use crate::models::RawCard;
use flate2::read::GzDecoder;
use log::{debug, info, warn};
use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Owns the data directory holding `cards.blob`, `printings.blob` and
/// `version.txt`.
#[derive(Debug, Clone)]
pub struct BlobCache {
    /// Directory where committed blobs live.
    pub data_dir: PathBuf,
}

impl BlobCache {
    /// Create a cache rooted at `data_dir`, or the platform default when
    /// `None`. Creates the directory if it does not exist.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { data_dir: dir })
    }

    pub fn card_blob_path(&self) -> PathBuf {
        self.data_dir.join(config::CARD_BLOB_FILE)
    }

    pub fn printing_blob_path(&self) -> PathBuf {
        self.data_dir.join(config::PRINTING_BLOB_FILE)
    }

    fn version_path(&self) -> PathBuf {
        self.data_dir.join(config::VERSION_FILE)
    }

    /// Read the version stamp of the committed blobs.
    pub fn local_version(&self) -> Option<String> {
        let version_file = self.version_path();
        if version_file.exists() {
            fs::read_to_string(&version_file)
                .ok()
                .map(|s| s.trim().to_string())
        } else {
            None
        }
    }

    fn save_version(&self, version: &str) -> Result<()> {
        write_atomic(&self.data_dir, &self.version_path(), version.as_bytes())
    }

    pub fn has_blobs(&self) -> bool {
        self.card_blob_path().exists() && self.printing_blob_path().exists()
    }

    /// True when a rebuild from `source_version` is needed: either blob is
    /// missing, there is no stamp, or the stamp differs.
    pub fn is_stale(&self, source_version: &str) -> bool {
        if !self.has_blobs() {
            return true;
        }
        match self.local_version() {
            None => true,
            Some(local) => local != source_version.trim(),
        }
    }

    /// Commit both blobs, then the version stamp.
    ///
    /// On failure the temp file is removed and whatever was committed before
    /// stays in place; the old stamp is invalidated first so a half-committed
    /// pair is never reported as fresh.
    pub fn commit(&self, built: &BuiltBlobs, version: &str) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let version_file = self.version_path();
        if version_file.exists() {
            fs::remove_file(&version_file)?;
        }

        write_atomic(&self.data_dir, &self.card_blob_path(), &built.card_blob)?;
        write_atomic(&self.data_dir, &self.printing_blob_path(), &built.printing_blob)?;
        self.save_version(version)?;

        info!(
            "Committed blobs to {} (version {})",
            self.data_dir.display(),
            version
        );
        Ok(())
    }

    /// Load a bulk JSON array of raw records (handles `.gz` transparently).
    pub fn load_source(path: &Path) -> Result<Vec<RawCard>> {
        let contents = read_source(path)?;
        let records: Vec<RawCard> = serde_json::from_str(&contents)?;
        debug!("Loaded {} source records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Like [`load_source`](Self::load_source) but keeps each record as an
    /// untyped value, so one malformed record does not fail the whole file.
    pub fn load_source_values(path: &Path) -> Result<Vec<serde_json::Value>> {
        let contents = read_source(path)?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        match value {
            serde_json::Value::Array(records) => Ok(records),
            _ => Err(StoreError::InvalidArgument(format!(
                "{} is not a JSON array of card records",
                path.display()
            ))),
        }
    }

    /// Remove all committed files and recreate the data directory.
    pub fn clear(&self) -> Result<()> {
        if self.data_dir.exists() {
            fs::remove_dir_all(&self.data_dir)?;
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }
}

fn read_source(path: &Path) -> Result<String> {
    let mut contents = String::new();
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let file = fs::File::open(path)?;
        let decoder = GzDecoder::new(BufReader::new(file));
        BufReader::new(decoder).read_to_string(&mut contents)?;
    } else {
        contents = fs::read_to_string(path)?;
    }
    Ok(contents)
}

/// Write `bytes` to a temp file in `dir`, fsync it, and rename it onto `dest`.
fn write_atomic(dir: &Path, dest: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    // On error the returned temp file is dropped, which deletes it.
    tmp.persist(dest).map_err(|e| {
        warn!("Failed to commit {}: {}", dest.display(), e.error);
        StoreError::Io(e.error)
    })?;
    Ok(())
}
