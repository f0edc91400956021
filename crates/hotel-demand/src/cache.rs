//! Process-wide memoization of cleaned datasets.
//!
//! A dataset is computed at most once per [`SourceKey`] and then shared as
//! `Arc<CleanedDataset>`. A changed file produces a new key and is recomputed
//! on next use; the entry for the old content of that path is dropped. Callers
//! that need a fresh run regardless of the cache use
//! [`crate::Pipeline::run_uncached`].

use crate::error::{PipelineError, Result};
use crate::pipeline::CleanedDataset;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

static GLOBAL_CACHE: Lazy<DatasetCache> = Lazy::new(DatasetCache::new);

/// Identity of an ingested source: where it lives and what it contained.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    path: PathBuf,
    len: u64,
    fingerprint: [u8; 32],
}

impl SourceKey {
    /// Key for `path`, whose full content is `bytes`.
    pub fn new(path: &Path, bytes: &[u8]) -> Result<Self> {
        let canonical = path
            .canonicalize()
            .map_err(|e| PipelineError::data_load(path.display().to_string(), e))?;

        Ok(Self {
            path: canonical,
            len: bytes.len() as u64,
            fingerprint: Sha256::digest(bytes).into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hex-encoded SHA-256 of the source content.
    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceKey")
            .field("path", &self.path)
            .field("len", &self.len)
            .field("fingerprint", &self.fingerprint_hex())
            .finish()
    }
}

/// Memoized datasets keyed by source.
#[derive(Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<SourceKey, Arc<CleanedDataset>>>,
}

static_assertions::assert_impl_all!(DatasetCache: Send, Sync);

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by every pipeline in the process.
    pub fn global() -> &'static DatasetCache {
        &GLOBAL_CACHE
    }

    pub fn get(&self, key: &SourceKey) -> Option<Arc<CleanedDataset>> {
        self.entries.read().get(key).cloned()
    }

    /// Return the dataset for `key`, computing it with `compute` on a miss.
    ///
    /// `compute` runs at most once per key, under the write lock, and must
    /// not access this cache. A failed computation caches nothing. A
    /// successful one replaces any entry held for the same path.
    pub fn get_or_try_insert_with<F>(&self, key: SourceKey, compute: F) -> Result<Arc<CleanedDataset>>
    where
        F: FnOnce() -> Result<CleanedDataset>,
    {
        if let Some(dataset) = self.get(&key) {
            debug!("Dataset cache hit for {}", key.path.display());
            return Ok(dataset);
        }

        let mut entries = self.entries.write();
        if let Some(dataset) = entries.get(&key) {
            return Ok(Arc::clone(dataset));
        }

        debug!("Dataset cache miss for {}", key.path.display());
        let dataset = Arc::new(compute()?);
        let before = entries.len();
        entries.retain(|cached, _| cached.path != key.path);
        if entries.len() < before {
            debug!("Dropped superseded dataset for {}", key.path.display());
        }
        entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, key: &SourceKey) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
