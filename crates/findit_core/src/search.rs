//! Fuzzy search engine over the stored records
//!
//! Four stages, cheapest first, stopping at the first that matches anything:
//! substring over name and location, the same retry over alternative
//! transcripts, word-level fuzzy matching, and finally the remote model's
//! reading of the original utterance (credential-gated). Results keep the
//! match pass's insertion order; nothing is ranked.

use tracing::{debug, warn};

use crate::cache::ParseCache;
use crate::find_parser;
use crate::fuzzy;
use crate::remote::RemoteParser;
use crate::types::{Intent, Item, RemoteParse, SearchResult};

/// Items whose name or location contains `term` (both sides lowercased)
fn substring_matches(items: &[Item], term: &str) -> Vec<Item> {
    let term = term.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&term)
                || item.location.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// Items whose name shares a word with the search term, by prefix relation
/// or edit distance
fn fuzzy_matches(items: &[Item], term: &str) -> Vec<Item> {
    let term = term.to_lowercase();
    let search_words: Vec<&str> = term.split_whitespace().collect();
    items
        .iter()
        .filter(|item| {
            let name = item.name.to_lowercase();
            let item_words: Vec<&str> = name.split_whitespace().collect();
            search_words.iter().any(|search_word| {
                item_words
                    .iter()
                    .any(|item_word| fuzzy::words_match(search_word, item_word))
            })
        })
        .cloned()
        .collect()
}

/// Resolve `term` against `items`.
///
/// `original_text` is the raw pre-correction transcript, needed by the
/// remote stage; `alternatives` feeds the retry stage (index 0 is skipped as
/// the primary transcript).
pub async fn search(
    items: &[Item],
    term: &str,
    alternatives: &[String],
    original_text: &str,
    remote: &RemoteParser,
    cache: &mut ParseCache,
) -> SearchResult {
    // Stage 1: exact/substring
    let matches = substring_matches(items, term);
    if !matches.is_empty() {
        return SearchResult::Found { items: matches };
    }

    // Stage 2: alternative transcripts, re-stripped and retried
    for alternative in alternatives.iter().skip(1) {
        if let Some(alt_term) = find_parser::extract_search_term(alternative) {
            let matches = substring_matches(items, &alt_term);
            if !matches.is_empty() {
                debug!("Search hit came from alternative transcript: {:?}", alternative);
                return SearchResult::Found { items: matches };
            }
        }
    }

    // Stage 3: fuzzy token matching
    let matches = fuzzy_matches(items, term);
    if !matches.is_empty() {
        return SearchResult::Found { items: matches };
    }

    // Stage 4: ask the remote model what the user meant (only with a
    // credential; its absence is not worth a user-facing hint here)
    if remote.has_credential() {
        match remote.parse_intent(cache, original_text, Intent::Find).await {
            Ok(RemoteParse::Find { search }) => {
                let matches = substring_matches(items, &search);
                if !matches.is_empty() {
                    return SearchResult::Found { items: matches };
                }
            }
            Ok(other) => warn!("Remote find parse returned wrong shape: {:?}", other),
            Err(e) => debug!("Remote find parse failed: {}", e),
        }
    }

    SearchResult::NotFound {
        term: term.to_string(),
    }
}
