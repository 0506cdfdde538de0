//! Bounded memoization for conversions and color differences
//!
//! Keys are built from numeric inputs rounded to a fixed number of decimals,
//! tagged with the operation and, where it matters, the illuminant and output
//! precision. Keying on illuminant identity means switching illuminants can
//! never return a stale conversion.
//!
//! The map is a `Mutex<LruCache>` so one cache can be shared across rayon
//! workers. Two eviction policies are offered:
//!
//! - [`EvictionPolicy::OldestInserted`] (default): hits do not refresh an
//!   entry, so the entry inserted first is evicted first.
//! - [`EvictionPolicy::LeastRecentlyUsed`]: hits refresh the entry.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::calibration::Illuminant;
use crate::constants::cache as cache_consts;
use crate::{ColorError, Result};

/// Which entry is dropped when the cache is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    #[default]
    OldestInserted,
    LeastRecentlyUsed,
}

/// Memoized operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOp {
    RgbToLab,
    DeltaE2000,
}

/// Cache key: operation, optional illuminant/precision context and rounded inputs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    op: CacheOp,
    illuminant: Option<Illuminant>,
    precision: Option<u32>,
    values: Vec<i64>,
}

impl CacheKey {
    pub fn new(op: CacheOp, values: &[f64]) -> Self {
        let scale = 10f64.powi(cache_consts::KEY_DECIMALS);
        Self {
            op,
            illuminant: None,
            precision: None,
            values: values.iter().map(|v| (v * scale).round() as i64).collect(),
        }
    }

    pub fn with_illuminant(mut self, illuminant: Illuminant) -> Self {
        self.illuminant = Some(illuminant);
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }
}

/// Hit/miss/eviction counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate in [0.0, 1.0]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe bounded cache of computed values
pub struct ReferenceCache<V> {
    entries: Mutex<LruCache<CacheKey, V>>,
    policy: EvictionPolicy,
    capacity: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> ReferenceCache<V> {
    /// Create a cache holding at most `capacity` entries
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if `capacity` is zero.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| ColorError::configuration("cache capacity must be at least 1"))?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            policy,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    /// Cache with the default capacity and oldest-inserted eviction
    pub fn with_default_capacity() -> Self {
        Self {
            entries: Mutex::new(LruCache::new(Self::default_capacity())),
            policy: EvictionPolicy::default(),
            capacity: Self::default_capacity(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn default_capacity() -> NonZeroUsize {
        NonZeroUsize::new(cache_consts::DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Look up `key`, computing and storing the value on a miss
    ///
    /// The computation runs outside the lock.
    pub fn get_or_try_insert<F>(&self, key: CacheKey, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(value) = self.lookup(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    fn lookup(&self, key: &CacheKey) -> Option<V> {
        let mut entries = self.lock();
        match self.policy {
            EvictionPolicy::OldestInserted => entries.peek(key).cloned(),
            EvictionPolicy::LeastRecentlyUsed => entries.get(key).cloned(),
        }
    }

    fn insert(&self, key: CacheKey, value: V) {
        let mut entries = self.lock();
        // Another thread stored it first; pushing again would reset its age
        if self.policy == EvictionPolicy::OldestInserted && entries.contains(&key) {
            return;
        }
        if let Some((evicted, _)) = entries.push(key.clone(), value) {
            // Same key means another thread inserted it first
            if evicted != key {
                let total = self.evictions.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(evictions = total, "reference cache evicted an entry");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all entries and reset counters
    pub fn clear(&self) {
        self.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity.get(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, V>> {
        // Entries are plain values, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<V> std::fmt::Debug for ReferenceCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceCache")
            .field("policy", &self.policy)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
