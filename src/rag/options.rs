//! Retrieval and answering options.

use std::time::Duration;

/// Options for retrieval, prompting, and response caching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagOptions {
    /// Number of most recent exchanges rendered into the prompt
    pub history_turns: usize,

    /// Maximum characters of a text or table snippet
    pub snippet_chars: usize,

    /// Characters of the serialized fragments used in the cache key
    pub cache_key_chars: usize,

    /// Maximum number of cached responses
    pub cache_capacity: usize,

    /// Lifetime of a cached response
    pub cache_ttl: Duration,
}

impl RagOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of history turns shown to the model.
    pub fn with_history_turns(mut self, turns: usize) -> Self {
        self.history_turns = turns;
        self
    }

    /// Set the snippet length limit.
    pub fn with_snippet_chars(mut self, chars: usize) -> Self {
        self.snippet_chars = chars;
        self
    }

    /// Set the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the cache entry lifetime.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

impl Default for RagOptions {
    fn default() -> Self {
        Self {
            history_turns: 3,
            snippet_chars: 500,
            cache_key_chars: 100,
            cache_capacity: 100,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}
