//! Async wrapper around [`ScryfallStore`] for use in async runtimes (Tokio, etc.).
//!
//! Builds, commits and blob loads run on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use scryfall_store::AsyncScryfallStore;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = AsyncScryfallStore::builder().data_dir("./data").build().await.unwrap();
//!
//!     store
//!         .rebuild_from_file(PathBuf::from("oracle-cards.json.gz"), "2024-06-01")
//!         .await
//!         .unwrap();
//!
//!     let count = store.run(|s| Ok(s.database()?.card_count())).await.unwrap();
//!     println!("{} cards", count);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;

use crate::build::BuildReport;
use crate::error::{Result, StoreError};
use crate::models::{GameplayCard, GameplayPrinting, RawCard};
use crate::normalize::StatPolicy;
use crate::{ScryfallStore, ScryfallStoreBuilder};

// ---------------------------------------------------------------------------
// AsyncScryfallStoreBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncScryfallStore`].
#[derive(Debug, Clone, Default)]
pub struct AsyncScryfallStoreBuilder {
    inner: ScryfallStoreBuilder,
}

impl AsyncScryfallStoreBuilder {
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inner = self.inner.data_dir(path);
        self
    }

    pub fn prefer_english(mut self, prefer: bool) -> Self {
        self.inner = self.inner.prefer_english(prefer);
        self
    }

    pub fn stat_policy(mut self, policy: StatPolicy) -> Self {
        self.inner = self.inner.stat_policy(policy);
        self
    }

    pub fn max_skip_ratio(mut self, ratio: f64) -> Self {
        self.inner = self.inner.max_skip_ratio(ratio);
        self
    }

    pub fn mmap(mut self, mmap: bool) -> Self {
        self.inner = self.inner.mmap(mmap);
        self
    }

    /// Build the store on the blocking thread pool, opening any committed blobs.
    pub async fn build(self) -> Result<AsyncScryfallStore> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || {
            let store = inner.build()?;
            Ok(AsyncScryfallStore {
                inner: Arc::new(store),
            })
        })
        .await
        .map_err(|e| StoreError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncScryfallStore
// ---------------------------------------------------------------------------

/// Async wrapper around [`ScryfallStore`].
///
/// The store is shared, not locked: lookups and a running rebuild proceed
/// concurrently, and lookups see the new database once it is swapped in.
#[derive(Clone)]
pub struct AsyncScryfallStore {
    inner: Arc<ScryfallStore>,
}

impl AsyncScryfallStore {
    pub fn builder() -> AsyncScryfallStoreBuilder {
        AsyncScryfallStoreBuilder::default()
    }

    /// Wrap an existing store.
    pub fn from_store(store: ScryfallStore) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// The wrapped store, for synchronous use.
    pub fn store(&self) -> &ScryfallStore {
        &self.inner
    }

    /// Run a sync store operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ScryfallStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn rebuild(&self, records: Vec<RawCard>, version: &str) -> Result<BuildReport> {
        let version = version.to_string();
        self.run(move |s| s.rebuild(&records, &version)).await
    }

    pub async fn rebuild_from_file(
        &self,
        path: PathBuf,
        version: &str,
    ) -> Result<Option<BuildReport>> {
        let version = version.to_string();
        self.run(move |s| s.rebuild_from_file(&path, &version)).await
    }

    pub async fn reload(&self) -> Result<()> {
        self.run(|s| s.reload()).await
    }

    pub async fn card(&self, oracle_id: Uuid) -> Result<Option<GameplayCard>> {
        self.run(move |s| s.database()?.card(&oracle_id)).await
    }

    pub async fn preferred_printing(&self, oracle_id: Uuid) -> Result<Option<GameplayPrinting>> {
        self.run(move |s| s.database()?.preferred_printing(&oracle_id))
            .await
    }
}
