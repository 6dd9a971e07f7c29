//! TTL memoization of [`DataSource::load`].
//!
//! One cache may be shared across sessions: it only holds loaded datasets,
//! never filter state. A failed reload keeps serving the last good dataset.
//! Every insert drops the other expired entries, so the map holds at most
//! the sources loaded within one TTL plus the one being refreshed.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rankboard_common::Dataset;
use rustc_hash::FxHashMap;

use crate::clock::{Clock, SystemClock};
use crate::error::IoError;
use crate::traits::DataSource;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

#[derive(Debug)]
struct Entry {
    dataset: Dataset,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct SourceCache<C: Clock = SystemClock> {
    config: CacheConfig,
    clock: C,
    entries: Mutex<FxHashMap<String, Entry>>,
}

impl SourceCache<SystemClock> {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for SourceCache<SystemClock> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<C: Clock> SourceCache<C> {
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the cached dataset for `source` while it is fresh, otherwise
    /// load it again.
    ///
    /// When the reload fails and an expired entry exists, the expired
    /// dataset is returned and the entry is left untouched so the next call
    /// retries. Without a previous entry the error propagates.
    pub fn get_or_load<S: DataSource + ?Sized>(&self, source: &S) -> Result<Dataset, IoError> {
        let id = source.id();
        let stale = {
            let entries = self.entries.lock();
            match entries.get(&id) {
                Some(e) if self.is_fresh(e) => return Ok(e.dataset.clone()),
                Some(e) => Some(e.dataset.clone()),
                None => None,
            }
        };

        // Load without holding the lock.
        match source.load() {
            Ok(dataset) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(source = id.as_str(), rows = dataset.row_count(), "cache_fill");

                let now = self.clock.now();
                let mut entries = self.entries.lock();
                entries.retain(|_, e| now.duration_since(e.fetched_at) < self.config.ttl);
                entries.insert(
                    id,
                    Entry {
                        dataset: dataset.clone(),
                        fetched_at: now,
                    },
                );
                Ok(dataset)
            }
            Err(err) => match stale {
                Some(dataset) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(source = id.as_str(), error = %err, "reload failed; serving stale dataset");
                    drop(err);
                    Ok(dataset)
                }
                None => Err(err),
            },
        }
    }

    /// The cached dataset for `id`, fresh or not.
    pub fn peek(&self, id: &str) -> Option<Dataset> {
        self.entries.lock().get(id).map(|e| e.dataset.clone())
    }

    pub fn is_cached_fresh(&self, id: &str) -> bool {
        self.entries.lock().get(id).is_some_and(|e| self.is_fresh(e))
    }

    /// Drop the entry for `id`; returns whether one existed.
    pub fn invalidate(&self, id: &str) -> bool {
        self.entries.lock().remove(id).is_some()
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| self.is_fresh(e));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        self.clock.now().duration_since(entry.fetched_at) < self.config.ttl
    }
}
