//! Compiled pattern caching.
//!
//! Compiling a pattern builds a regular expression, which is the most
//! expensive step of route registration. Applications frequently register the
//! same pattern several times (an enter and an exit chain for one path, or
//! the `*` wildcard for every piece of middleware), so the router keeps the
//! compiled forms in a
//! [`PatternCache`]. It is gated behind the `cache` feature flag and uses the
//! [`lru`] crate internally.
//!
//! [`CacheStats`] tracks hits, misses, and invalidations.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::cache::PatternCache;
//! use spa_navigator::PatternOptions;
//!
//! let mut cache = PatternCache::new();
//! cache.get_or_compile("/user/:id", PatternOptions::default()).unwrap();
//! cache.get_or_compile("/user/:id", PatternOptions::default()).unwrap();
//!
//! assert_eq!(cache.stats().misses, 1);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::error::RouterError;
use crate::pattern::{PathPattern, PatternOptions};
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key: the pattern text plus the flags it was compiled with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PatternKey {
    pattern: String,
    options: PatternOptions,
}

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of lookups served from the cache.
    pub hits: usize,
    /// Number of lookups that compiled a new pattern.
    pub misses: usize,
    /// Number of full cache invalidations (via [`PatternCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of compiled [`PathPattern`]s.
///
/// Default capacity is 256 patterns.
#[derive(Debug)]
pub struct PatternCache {
    patterns: LruCache<PatternKey, PathPattern>,
    stats: CacheStats,
}

impl PatternCache {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
        Some(capacity) => capacity,
        None => NonZeroUsize::MIN,
    };

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` patterns.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            patterns: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Return the compiled form of `pattern`, compiling it on a miss.
    ///
    /// Compilation errors are returned as-is and nothing is cached.
    pub fn get_or_compile(
        &mut self,
        pattern: &str,
        options: PatternOptions,
    ) -> Result<PathPattern, RouterError> {
        let key = PatternKey {
            pattern: pattern.to_string(),
            options,
        };
        if let Some(compiled) = self.patterns.get(&key) {
            self.stats.hits += 1;
            trace_log!("Pattern cache hit for '{}'", pattern);
            return Ok(compiled.clone());
        }

        self.stats.misses += 1;
        trace_log!("Pattern cache miss for '{}'", pattern);
        let compiled = PathPattern::compile(pattern, options)?;
        self.patterns.push(key, compiled.clone());
        Ok(compiled)
    }

    /// Drop every cached pattern and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.patterns.len();
        self.patterns.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Pattern cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Return the number of cached patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}
