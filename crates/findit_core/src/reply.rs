//! Spoken response phrasing
//!
//! Everything the assistant says back is rendered here, so hosts (and tests)
//! see one voice. Callers pass the current time; nothing here looks at the
//! clock.

use crate::types::{Item, SearchResult};

const DAY_MS: i64 = 1000 * 60 * 60 * 24;

/// How trustworthy a record's age makes it, for display accents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Logged within the last day
    Fresh,
    /// More than a day old - worth a spoken caveat
    Stale,
    /// More than a week old
    VeryStale,
}

impl Freshness {
    pub fn of(timestamp: i64, now_ms: i64) -> Self {
        let days = (now_ms - timestamp) / DAY_MS;
        if days > 7 {
            Freshness::VeryStale
        } else if days > 1 {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }
}

/// Spoken description of a search result
pub fn describe_search(result: &SearchResult, now_ms: i64) -> String {
    match result {
        SearchResult::NotFound { term } => format!(
            "I don't have any record of {term}. Try saying the exact item name, \
             or check your items list."
        ),
        SearchResult::Found { items } if items.len() == 1 => {
            let item = &items[0];
            let days = item.age_days(now_ms);
            let caveat = if days > 1 {
                format!(" This was logged {days} days ago, so it might have moved.")
            } else {
                String::new()
            };
            format!("Your {} is in {}.{}", item.name, item.location, caveat)
        }
        SearchResult::Found { items } => {
            format!("I found {} items. Check the screen to see them all.", items.len())
        }
    }
}

/// Spoken confirmation after a record is committed
pub fn describe_saved(item: &Item, updated: bool) -> String {
    if updated {
        format!("Updated {} location to {}", item.name, item.location)
    } else {
        format!("Saved {} in {}", item.name, item.location)
    }
}

/// Guidance when a log transcript never produced a location
pub fn log_guidance() -> String {
    "Could not understand location. Try: \"Keys in the kitchen drawer\" \
     or \"I put my phone on the counter\""
        .to_string()
}

/// Guidance when a find transcript stripped down to nothing
pub fn find_guidance() -> String {
    "Could not understand what you're looking for. Try: \"Where are my keys?\"".to_string()
}

/// Hint surfaced when the remote fallback would have run but no credential
/// is configured
pub fn credential_hint() -> String {
    "For better accuracy, add a free OpenRouter API key to the configuration".to_string()
}

/// Compact age rendering for record listings
pub fn time_since(timestamp: i64, now_ms: i64) -> String {
    let seconds = (now_ms - timestamp) / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else if minutes > 0 {
        format!("{minutes}m ago")
    } else {
        "just now".to_string()
    }
}
