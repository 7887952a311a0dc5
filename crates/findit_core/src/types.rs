//! Core data types for FindIt

use serde::{Deserialize, Serialize};

/// A logged record: one item, one place, one timestamp.
///
/// `id` is assigned once and survives re-logging: storing "keys" a second
/// time rewrites `location` and `timestamp` on the existing record. The store
/// holds at most one `Item` per case-insensitive `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub location: String,
    /// Unix millis at the moment the record was (re-)logged
    pub timestamp: i64,
}

impl Item {
    /// Whole days elapsed since this record was logged
    pub fn age_days(&self, now_ms: i64) -> i64 {
        (now_ms - self.timestamp) / (1000 * 60 * 60 * 24)
    }
}

/// Final transcript plus ranked alternative transcriptions.
///
/// Speech engines report the chosen transcript again at `alternatives[0]`,
/// so retry stages always skip index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub alternatives: Vec<String>,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            alternatives: vec![text.clone()],
            text,
        }
    }

    pub fn with_alternatives(text: impl Into<String>, alternatives: Vec<String>) -> Self {
        Self {
            text: text.into(),
            alternatives,
        }
    }
}

/// Whether an utterance logs an item or looks for one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Log,
    Find,
}

impl Intent {
    /// Cache-key discriminant, also used in prompt selection
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Log => "log",
            Intent::Find => "find",
        }
    }
}

/// Parsed log command awaiting user confirmation.
///
/// Transient: consumed by [`crate::store::commit_log`] on confirm, dropped on
/// cancel. `confidence` is the heuristic trust score - 0.9 for the hyphen
/// form, 0.8 for a location-phrase split, 0.7 when an alternative transcript
/// was needed, 1.0 when the remote model produced the split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLogCommand {
    pub name: String,
    pub location: String,
    pub confidence: f32,
}

/// Outcome of resolving a find query against the store.
///
/// `Found` preserves the insertion order of the matching pass; results are
/// not relevance-ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchResult {
    Found { items: Vec<Item> },
    NotFound { term: String },
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }
}

/// Typed payload extracted from a remote model reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteParse {
    Log { item: String, location: String },
    Find { search: String },
}

/// Result of running a log transcript through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    /// A usable split was found; present it for confirmation.
    ///
    /// `notice` carries a non-fatal user-facing hint (e.g. "add an API key
    /// for better accuracy") when the remote fallback was wanted but not
    /// configured.
    Confirm {
        parsed: ParsedLogCommand,
        notice: Option<String>,
    },
    /// No stage produced a location; the user should rephrase.
    Unresolved {
        hint: String,
        notice: Option<String>,
    },
}

/// Result of running a find transcript through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum FindOutcome {
    Resolved {
        result: SearchResult,
        /// What was (or would be) spoken to the user
        spoken: String,
    },
    /// The query stripped down to nothing; the user should rephrase.
    Unresolved { hint: String },
}
