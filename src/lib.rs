//! Scryfall card data, normalized into compact random-access blobs.
//!
//! Raw bulk records are normalized into oracle-level cards and per-printing
//! rows, encoded into two sealed binary blobs, and served back through a
//! read-only [`CardDatabase`]. Rebuilds are all-or-nothing and swap the live
//! database atomically.
//!
//! # Quick start
//!
//! ```no_run
//! use scryfall_store::ScryfallStore;
//! use std::path::Path;
//!
//! let store = ScryfallStore::builder().data_dir("./data").build().unwrap();
//!
//! // Build from a bulk file unless the committed blobs already match
//! store
//!     .rebuild_from_file(Path::new("oracle-cards.json.gz"), "2024-06-01")
//!     .unwrap();
//!
//! let db = store.database().unwrap();
//! let id = uuid::Uuid::parse_str("4457ed35-7c10-48c8-9776-456485fdf070").unwrap();
//! if let Some(card) = db.card(&id).unwrap() {
//!     let art = db.preferred_printing(&id).unwrap();
//!     println!("{} {:?}", card.name, art.map(|p| p.set_code));
//! }
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod blob;
pub mod build;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod normalize;
pub mod parse;

#[cfg(feature = "async")]
pub use async_client::AsyncScryfallStore;
pub use blob::{BlobLookup, CardBlobReader, PrintingBlobReader};
pub use build::{BlobBuilder, BuildOptions, BuildReport, BuiltBlobs};
pub use cache::BlobCache;
pub use database::CardDatabase;
pub use error::{Result, StoreError};
pub use normalize::{NormalizeIssue, NormalizeOptions, StatPolicy};

use log::{info, warn};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DEFAULT_MAX_SKIP_RATIO;
use crate::models::RawCard;

// ---------------------------------------------------------------------------
// ScryfallStoreBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ScryfallStore`].
///
/// Use [`ScryfallStore::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ScryfallStoreBuilder::build).
#[derive(Debug, Clone)]
pub struct ScryfallStoreBuilder {
    data_dir: Option<PathBuf>,
    prefer_english: bool,
    stat_policy: StatPolicy,
    max_skip_ratio: f64,
    mmap: bool,
}

impl Default for ScryfallStoreBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            prefer_english: true,
            stat_policy: StatPolicy::default(),
            max_skip_ratio: DEFAULT_MAX_SKIP_RATIO,
            mmap: true,
        }
    }
}

impl ScryfallStoreBuilder {
    /// Set the directory holding the committed blobs.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/scryfall-store` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// When two records share an oracle id, let a later English one replace
    /// an earlier non-English one. Defaults to `true`.
    pub fn prefer_english(mut self, prefer: bool) -> Self {
        self.prefer_english = prefer;
        self
    }

    /// How malformed stats and mana costs are handled. Defaults to
    /// [`StatPolicy::Collect`].
    pub fn stat_policy(mut self, policy: StatPolicy) -> Self {
        self.stat_policy = policy;
        self
    }

    /// Fraction of records a build may skip before it fails. Defaults to `0.05`.
    pub fn max_skip_ratio(mut self, ratio: f64) -> Self {
        self.max_skip_ratio = ratio;
        self
    }

    /// Memory-map blobs instead of reading them into memory. Defaults to `true`.
    pub fn mmap(mut self, mmap: bool) -> Self {
        self.mmap = mmap;
        self
    }

    /// Build the store. Blobs already committed in the data directory are
    /// opened right away; otherwise the store starts empty until the first
    /// rebuild. Blobs without a version stamp are left over from an
    /// interrupted commit and are not opened.
    pub fn build(self) -> Result<ScryfallStore> {
        if !(0.0..=1.0).contains(&self.max_skip_ratio) {
            return Err(StoreError::InvalidArgument(format!(
                "max_skip_ratio must be within 0..=1, got {}",
                self.max_skip_ratio
            )));
        }
        let cache = BlobCache::new(self.data_dir)?;
        let store = ScryfallStore {
            cache,
            options: BuildOptions {
                normalize: NormalizeOptions {
                    stat_policy: self.stat_policy,
                },
                prefer_english: self.prefer_english,
                max_skip_ratio: self.max_skip_ratio,
            },
            mmap: self.mmap,
            current: RwLock::new(None),
            build_lock: Mutex::new(()),
        };
        if store.cache.has_blobs() {
            if store.cache.local_version().is_some() {
                store.reload()?;
            } else {
                warn!(
                    "Ignoring unstamped blobs in {}; rebuild to replace them",
                    store.cache.data_dir.display()
                );
            }
        }
        Ok(store)
    }
}

// ---------------------------------------------------------------------------
// ScryfallStore
// ---------------------------------------------------------------------------

/// The main entry point: owns the data directory and the live database.
///
/// Lookups go through [`database()`](Self::database), which hands out a
/// snapshot. A rebuild or reload swaps the snapshot; lookups already holding
/// the previous one keep using it until they drop it.
pub struct ScryfallStore {
    cache: BlobCache,
    options: BuildOptions,
    mmap: bool,
    current: RwLock<Option<Arc<CardDatabase>>>,
    build_lock: Mutex<()>,
}

impl ScryfallStore {
    /// Create a new builder for configuring the store.
    pub fn builder() -> ScryfallStoreBuilder {
        ScryfallStoreBuilder::default()
    }

    /// The current database snapshot.
    pub fn database(&self) -> Result<Arc<CardDatabase>> {
        self.current.read().clone().ok_or_else(|| {
            StoreError::NotFound(format!(
                "no blobs loaded from {}; rebuild first",
                self.cache.data_dir.display()
            ))
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// True when the committed blobs were not built from `source_version`.
    pub fn is_stale(&self, source_version: &str) -> bool {
        self.cache.is_stale(source_version)
    }

    pub fn local_version(&self) -> Option<String> {
        self.cache.local_version()
    }

    pub fn cache(&self) -> &BlobCache {
        &self.cache
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    // -- Rebuilds ----------------------------------------------------------

    /// Build from decoded records, commit, and swap the live database.
    ///
    /// Concurrent rebuilds are serialized. On any failure the previously
    /// committed blobs and the live database are left as they were.
    pub fn rebuild(&self, records: &[RawCard], version: &str) -> Result<BuildReport> {
        let _guard = self.build_lock.lock();
        let built = BlobBuilder::new(self.options).build(records)?;
        self.commit_and_swap(built, version)
    }

    /// Like [`rebuild`](Self::rebuild), from untyped JSON values.
    pub fn rebuild_from_values(
        &self,
        values: Vec<serde_json::Value>,
        version: &str,
    ) -> Result<BuildReport> {
        let _guard = self.build_lock.lock();
        let built = BlobBuilder::new(self.options).build_values(values)?;
        self.commit_and_swap(built, version)
    }

    /// Rebuild from a bulk JSON file (`.json` or `.json.gz`) unless the
    /// committed blobs are already stamped with `version`.
    ///
    /// Returns `None` when the rebuild was skipped.
    pub fn rebuild_from_file(&self, path: &Path, version: &str) -> Result<Option<BuildReport>> {
        if !self.is_stale(version) {
            info!("Blobs already at version {}; skipping rebuild", version);
            if !self.is_loaded() {
                self.reload()?;
            }
            return Ok(None);
        }
        let values = BlobCache::load_source_values(path)?;
        self.rebuild_from_values(values, version).map(Some)
    }

    /// Re-open the committed blobs and swap them in. Fails with `NotFound`
    /// when the pair on disk carries no version stamp.
    pub fn reload(&self) -> Result<()> {
        if self.cache.local_version().is_none() {
            return Err(StoreError::NotFound(format!(
                "no committed blobs in {}",
                self.cache.data_dir.display()
            )));
        }
        let db = CardDatabase::open(
            &self.cache.card_blob_path(),
            &self.cache.printing_blob_path(),
            self.mmap,
        )
        .inspect_err(|e| warn!("Failed to load blobs: {}", e))?;
        *self.current.write() = Some(Arc::new(db));
        Ok(())
    }

    fn commit_and_swap(&self, built: BuiltBlobs, version: &str) -> Result<BuildReport> {
        self.cache.commit(&built, version)?;
        self.reload()?;
        Ok(built.report)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ScryfallStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cards, printings) = match self.current.read().as_ref() {
            Some(db) => (db.card_count(), db.printing_count()),
            None => (0, 0),
        };
        write!(
            f,
            "ScryfallStore(data_dir={}, version={}, cards={}, printings={})",
            self.cache.data_dir.display(),
            self.local_version().as_deref().unwrap_or("none"),
            cards,
            printings
        )
    }
}
