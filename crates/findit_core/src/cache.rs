//! Remote-parse memoization
//!
//! The same literal phrase means the same thing within a session, so parses
//! bought from the remote service are kept for the life of the session. Keys
//! use the raw pre-correction transcript: correction happens after the cache
//! lookup on the remote path, and a stale mapping for identical text is
//! acceptable by contract. No eviction, no persistence.

use std::collections::HashMap;

use crate::types::{Intent, RemoteParse};

/// Session-scoped cache of remote parse results
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: HashMap<String, RemoteParse>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key: intent discriminant plus the lowercased raw transcript
    pub fn key(intent: Intent, raw_text: &str) -> String {
        format!("{}:{}", intent.as_str(), raw_text.to_lowercase())
    }

    pub fn get(&self, key: &str) -> Option<&RemoteParse> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: String, parse: RemoteParse) {
        self.entries.insert(key, parse);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
