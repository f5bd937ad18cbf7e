//! Cache of parsed scripts
//!
//! The same template script tends to be pasted into many tasks, so parsed
//! documents are kept in a bounded LRU keyed by a hash of the source text.

use crate::error::Result;
use crate::parsers::script::{ParsedScript, ScriptEncoding, ScriptParser};
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Thread-safe LRU of parsed scripts
pub struct ScriptCache {
    entries: Mutex<LruCache<u64, Arc<ParsedScript>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ScriptCache {
    /// Create a cache holding at most `capacity` documents (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    fn key(source: &str, encoding: ScriptEncoding) -> u64 {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        encoding.to_string().hash(&mut hasher);
        hasher.finish()
    }

    /// Return the cached parse of `source`, parsing it on a miss.
    /// Parse failures are not cached.
    pub fn get_or_parse(
        &self,
        parser: &dyn ScriptParser,
        source: &str,
        encoding: ScriptEncoding,
    ) -> Result<Arc<ParsedScript>> {
        let key = Self::key(source, encoding);

        if let Some(parsed) = self.entries.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(parsed));
        }

        // parse outside the lock; a concurrent miss on the same key just
        // parses twice
        self.misses.fetch_add(1, Ordering::Relaxed);
        let parsed = Arc::new(parser.parse(source, encoding)?);
        self.entries.lock().put(key, Arc::clone(&parsed));
        Ok(parsed)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Cache statistics: (entries, hits, misses)
    pub fn stats(&self) -> (usize, usize, usize) {
        (
            self.len(),
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

impl std::fmt::Debug for ScriptCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (len, hits, misses) = self.stats();
        f.debug_struct("ScriptCache")
            .field("len", &len)
            .field("hits", &hits)
            .field("misses", &misses)
            .finish()
    }
}
