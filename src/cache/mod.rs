// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Memoisation of expensive term evaluations.
//!
//! The cache is split into shards, each guarded by its own lock, and every key
//! owns a slot with its own lock. The first caller for a key computes while
//! holding the slot's lock; anyone else asking for the same key waits on that
//! lock and then reads the result. Different keys never wait on each other
//! beyond the brief shard lookup.
//!
//! `max_entries` is split between the shards, and least-recently-used order
//! is kept per shard: a full shard evicts its own oldest entry even if another
//! shard holds older ones.
//!
//! Queries are snapped to the configured tolerances *before* they are
//! evaluated, whether or not anything is stored, so a hit returns exactly what
//! a fresh evaluation of the same query would have.


use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use indexmap::IndexMap;
use log::{debug, trace};
use parking_lot::Mutex;

use crate::{
    constants::{CACHE_SHARDS, DEFAULT_CACHE_ENTRIES},
    direction::Direction,
    jones::JonesMatrix,
    station::Station,
    term::TermError,
    time::Time,
    types::{quantise_freq, CacheKey},
};

/// How an [`EvaluationCache`] buckets and bounds its entries. A tolerance of 0
/// means queries are keyed on their exact values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    /// The maximum number of stored responses. 0 disables storage (but not
    /// quantisation).
    pub max_entries: usize,

    /// Directions are snapped to multiples of this \[radians\].
    pub direction_tol_rad: f64,

    /// Times are snapped to multiples of this \[seconds\].
    pub time_tol_s: f64,

    /// Frequencies are snapped to multiples of this \[Hz\].
    pub freq_tol_hz: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_entries: DEFAULT_CACHE_ENTRIES,
            direction_tol_rad: 0.0,
            time_tol_s: 0.0,
            freq_tol_hz: 0.0,
        }
    }
}

impl CacheConfig {
    /// The same tolerances, but nothing is stored.
    pub fn disabled(self) -> CacheConfig {
        CacheConfig {
            max_entries: 0,
            ..self
        }
    }
}

/// A query point after snapping to a cache's tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub direction: Direction,
    pub time: Time,
    pub freq_hz: f64,
}

/// Counters describing how an [`EvaluationCache`] has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// A slot is filled by whoever first holds its lock.
type Slot = Arc<Mutex<Option<JonesMatrix>>>;

type Shard = Mutex<IndexMap<CacheKey, Slot>>;

/// A bounded, thread-safe, least-recently-used store of Jones matrices.
#[derive(Debug)]
pub struct EvaluationCache {
    config: CacheConfig,
    shards: Vec<Shard>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl Default for EvaluationCache {
    fn default() -> Self {
        EvaluationCache::new(CacheConfig::default())
    }
}

impl EvaluationCache {
    pub fn new(config: CacheConfig) -> EvaluationCache {
        debug!(
            "Creating an evaluation cache: {} entries, tolerances {} rad, {} s, {} Hz",
            config.max_entries, config.direction_tol_rad, config.time_tol_s, config.freq_tol_hz
        );
        EvaluationCache {
            config,
            shards: (0..CACHE_SHARDS)
                .map(|_| Mutex::new(IndexMap::new()))
                .collect(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.max_entries > 0
    }

    /// Snap a query to this cache's tolerances and make its key. `term_id`
    /// must identify everything about the term that affects its response;
    /// the station is identified by its name and geometry.
    pub fn quantise(
        &self,
        term_id: u64,
        station: &Station,
        direction: &Direction,
        time: &Time,
        freq_hz: f64,
    ) -> (Query, CacheKey) {
        let (direction, direction_key) = direction.quantise(self.config.direction_tol_rad);
        let (time, time_key) = time.quantise(self.config.time_tol_s);
        let (freq_hz, freq_key) = quantise_freq(freq_hz, self.config.freq_tol_hz);
        (
            Query {
                direction,
                time,
                freq_hz,
            },
            CacheKey::new(term_id, station.id(), direction_key, time_key, freq_key),
        )
    }

    /// Get the response stored against `key`, or run `compute` to get it. For
    /// any key, `compute` runs at most once at a time; concurrent callers
    /// wait for it and reuse its result. Failures are not stored.
    pub fn get_or_compute<F>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<JonesMatrix, TermError>
    where
        F: FnOnce() -> Result<JonesMatrix, TermError>,
    {
        if !self.is_enabled() {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compute();
        }

        let index = shard_index(&key);
        let shard = &self.shards[index];
        let capacity = self.shard_capacity(index);
        let slot = {
            let mut map = shard.lock();
            match map.shift_remove(&key) {
                // Re-inserting moves the key to the most-recently-used end.
                Some(slot) => {
                    map.insert(key, Arc::clone(&slot));
                    slot
                }
                None => {
                    // A shard without capacity only holds keys being computed.
                    if capacity > 0
                        && map.len() >= capacity
                        && map.shift_remove_index(0).is_some()
                    {
                        self.evictions.fetch_add(1, Ordering::Relaxed);
                        trace!("Evicted the least-recently-used cache entry");
                    }
                    let slot = Slot::default();
                    map.insert(key, Arc::clone(&slot));
                    slot
                }
            }
        };

        let mut value = slot.lock();
        if let Some(jones) = *value {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(jones);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!("Cache miss; computing {key:?}");
        match compute() {
            Ok(jones) => {
                *value = Some(jones);
                // Callers already waiting on the slot still get the value.
                if capacity == 0 {
                    forget(shard, &key, &slot);
                }
                Ok(jones)
            }
            Err(e) => {
                // Take the empty slot out so the failure isn't remembered.
                // Anyone already waiting on it will compute for themselves.
                forget(shard, &key, &slot);
                trace!("Not caching a failed evaluation: {e}");
                Err(e)
            }
        }
    }

    /// How many of `max_entries` the shard at `index` may hold. The remainder
    /// of the split goes to the first shards.
    fn shard_capacity(&self, index: usize) -> usize {
        let max = self.config.max_entries;
        max / CACHE_SHARDS + usize::from(index < max % CACHE_SHARDS)
    }

    /// The number of stored entries, including any still being computed.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything. Counters are kept.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
        debug!("Cleared the evaluation cache");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Remove `slot` from `shard`, unless `key` has since been given another slot.
fn forget(shard: &Shard, key: &CacheKey, slot: &Slot) {
    let mut map = shard.lock();
    if map.get(key).is_some_and(|s| Arc::ptr_eq(s, slot)) {
        map.shift_remove(key);
    }
}

fn shard_index(key: &CacheKey) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % CACHE_SHARDS as u64) as usize
}
