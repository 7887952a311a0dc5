//! Find query parsing - question phrasing down to a search term
//!
//! "Where are my keys?" carries one useful word. Correction runs first, then
//! the leading question phrase is stripped (longest variants first, so
//! "where is" goes before "where"), then articles, possessives and question
//! marks are dropped token-wise.

use crate::corrector;

/// Leading question phrases, longest-first within shared prefixes
const QUESTION_PHRASES: &[&str] = &[
    "do you know where ",
    "can you find ",
    "looking for ",
    "look for ",
    "where is ",
    "where are ",
    "where's ",
    "wheres ",
    "where ",
    "find ",
    "locate ",
    "search ",
];

/// Tokens discarded from the remainder of the query
const NOISE_WORDS: &[&str] = &["my", "the", "a", "an", "our", "some", "is", "are"];

/// Strip question phrasing from a find transcript, producing the search term.
/// `None` when nothing survives the stripping.
pub fn extract_search_term(text: &str) -> Option<String> {
    let corrected = corrector::correct(text);

    let mut stripped = corrected.trim().to_string();
    loop {
        let mut changed = false;
        for phrase in QUESTION_PHRASES {
            if stripped.starts_with(phrase) {
                stripped = stripped[phrase.len()..].trim_start().to_string();
                changed = true;
                break;
            }
        }
        if !changed {
            break;
        }
    }

    let term = stripped
        .split_whitespace()
        .map(|word| word.trim_matches('?'))
        .filter(|word| !word.is_empty() && !NOISE_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ");

    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}
