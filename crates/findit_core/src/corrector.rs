//! Transcript correction - fixed mishearing and synonym table
//!
//! Speech engines reliably garble a handful of household words ("drawer" in
//! particular arrives as "draw" or even "saw"). This applies a fixed
//! correction table before any parsing. Whole-word matches only, so "draw"
//! never rewrites the inside of "drawing".

use once_cell::sync::Lazy;
use regex::Regex;

/// Correction table: (misheard, corrected).
///
/// Identity entries pin down vocabulary we expect to extend later; they are
/// no-ops today.
const CORRECTIONS: &[(&str, &str)] = &[
    ("draw", "drawer"),
    ("draws", "drawers"),
    // "drawer" often comes through as "saw"
    ("saw", "drawer"),
    ("garage toolbox", "garage toolbox"),
    ("kitchen counter", "kitchen counter"),
    ("bedroom", "bedroom"),
    ("living room", "living room"),
    ("bathroom", "bathroom"),
    ("office", "office"),
    ("car", "car"),
    ("purse", "purse"),
    ("wallet", "wallet"),
    ("keys", "keys"),
    ("phone", "phone"),
    ("charger", "charger"),
];

static COMPILED: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    CORRECTIONS
        .iter()
        .map(|(wrong, right)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(wrong));
            (Regex::new(&pattern).expect("static correction pattern"), *right)
        })
        .collect()
});

/// Lowercase the text and apply the correction table.
///
/// Pure and deterministic; applying it twice yields the same string.
pub fn correct(text: &str) -> String {
    let mut corrected = text.to_lowercase();
    for (pattern, right) in COMPILED.iter() {
        corrected = pattern.replace_all(&corrected, *right).into_owned();
    }
    corrected
}
