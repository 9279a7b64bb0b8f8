/*!
 * Transcript result caching.
 *
 * Parsed transcripts are memoized per (video, selection policy) in a bounded
 * LRU map with a time-to-live. Only successful retrievals are stored.
 */

use log::debug;
use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::transcript::Transcript;
use crate::video_id::VideoId;

/// Cache key combining the video and the selection policy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Video the transcript belongs to
    pub video_id: VideoId,

    /// Fingerprint of the language preferences used for track selection
    pub policy: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new<S: AsRef<str>>(video_id: VideoId, preferences: &[S]) -> Self {
        Self {
            video_id,
            policy: policy_fingerprint(preferences),
        }
    }
}

/// SHA-256 hex digest of a normalized preference list
///
/// Codes are trimmed and lowercased; their order is significant.
pub fn policy_fingerprint<S: AsRef<str>>(preferences: &[S]) -> String {
    let mut hasher = Sha256::new();
    for code in preferences {
        hasher.update(code.as_ref().trim().to_lowercase().as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

struct CacheEntry {
    transcript: Arc<Transcript>,
    inserted_at: Instant,
}

struct CacheState {
    entries: LruCache<CacheKey, CacheEntry>,
    hits: usize,
    misses: usize,
}

/// Bounded LRU cache of parsed transcripts with TTL
pub struct TranscriptCache {
    /// `None` when the cache was created with zero capacity
    state: Option<Mutex<CacheState>>,

    /// Lifetime of an entry
    ttl: Duration,
}

impl TranscriptCache {
    /// Create a new transcript cache; a capacity of 0 disables caching
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let state = NonZeroUsize::new(capacity).map(|cap| {
            Mutex::new(CacheState {
                entries: LruCache::new(cap),
                hits: 0,
                misses: 0,
            })
        });

        Self { state, ttl }
    }

    /// Get a transcript from the cache
    ///
    /// Expired entries are removed and reported as absent.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Transcript>> {
        let state = self.state.as_ref()?;
        let mut state = state.lock();

        let found = state.entries.get(key).map(|entry| {
            (entry.inserted_at.elapsed() < self.ttl).then(|| Arc::clone(&entry.transcript))
        });

        let lookup = match found {
            Some(Some(transcript)) => Some(transcript),
            Some(None) => {
                state.entries.pop(key);
                debug!("Cache entry for {} expired", key.video_id);
                None
            }
            None => None,
        };

        match lookup {
            Some(transcript) => {
                state.hits += 1;
                debug!("Cache hit for {}", key.video_id);
                Some(transcript)
            }
            None => {
                state.misses += 1;
                debug!("Cache miss for {}", key.video_id);
                None
            }
        }
    }

    /// Store a transcript in the cache, replacing any previous entry for the key
    pub fn put(&self, key: CacheKey, transcript: Arc<Transcript>) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let mut state = state.lock();

        let video_id = key.video_id.clone();
        if let Some((evicted, _)) = state.entries.push(
            key,
            CacheEntry {
                transcript,
                inserted_at: Instant::now(),
            },
        ) {
            if evicted.video_id != video_id {
                debug!("Evicted cached transcript for {}", evicted.video_id);
            }
        }

        debug!("Cached transcript for {}", video_id);
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let Some(state) = self.state.as_ref() else {
            return (0, 0, 0.0);
        };
        let state = state.lock();
        let total = state.hits + state.misses;

        let hit_rate = if total > 0 {
            state.hits as f64 / total as f64
        } else {
            0.0
        };

        (state.hits, state.misses, hit_rate)
    }

    /// Clear all entries and counters
    pub fn clear(&self) {
        if let Some(state) = self.state.as_ref() {
            let mut state = state.lock();
            state.entries.clear();
            state.hits = 0;
            state.misses = 0;
            debug!("Transcript cache cleared");
        }
    }

    /// Number of stored entries, expired ones included until they are touched
    pub fn len(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.lock().entries.len())
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.lock().entries.cap().get())
    }

    /// Lifetime of an entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for TranscriptCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptCache")
            .field("enabled", &self.is_enabled())
            .field("len", &self.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
