//! Log command heuristics - "item at location" out of a noisy transcript
//!
//! Ordered stripping passes (filler, placement verbs, leading articles) and a
//! fixed priority list of location-introducing phrases. The phrase order is
//! load-bearing: longer variants sharing a prefix come before shorter ones
//! ("in the" before "in"), and the first phrase found wins the split.
//! Remote fallback orchestration lives in [`crate::session`]; everything here
//! is pure and synchronous.

use tracing::debug;

use crate::corrector;
use crate::types::{ParsedLogCommand, Transcript};

/// Location-introducing phrases, scanned in this exact order.
pub const LOCATION_PHRASES: &[&str] = &[
    " in the ", " in my ", " in ",
    " at the ", " at my ", " at ",
    " on the ", " on my ", " on ",
    " inside the ", " inside my ", " inside ",
    " under the ", " under my ", " under ",
    " behind the ", " behind my ", " behind ",
    " near the ", " near my ", " near ",
    " by the ", " by my ", " by ",
    " next to the ", " next to my ", " next to ",
    " within the ", " within my ", " within ",
];

/// Leading conversational filler, stripped repeatedly until none remains.
/// Longer variants precede their prefixes ("i just" before "i").
const LEADING_FILLER: &[&str] = &[
    "i'm ", "i've ", "i just ", "i am ", "i ", "so ", "okay ", "ok ", "um ", "uh ", "the ", "an ",
    "a ", "my ",
];

/// Placement verbs dropped wherever they occur
const PLACEMENT_VERBS: &[&str] = &[
    "put", "placing", "placed", "left", "leaving", "kept", "keeping", "stored", "storing",
    "saved", "saving", "dropped", "dropping", "threw", "throwing",
];

/// Articles and possessives stripped from the front after verb removal
const LEADING_ARTICLES: &[&str] = &["the ", "an ", "a ", "my ", "our ", "some "];

/// Confidence for the hyphen-delimited "item - location" form
const CONFIDENCE_HYPHEN: f32 = 0.9;
/// Confidence for a location-phrase split on the primary transcript
const CONFIDENCE_PRIMARY: f32 = 0.8;
/// Confidence when an alternative transcript was needed
const CONFIDENCE_ALTERNATIVE: f32 = 0.7;

fn strip_leading(text: &str, prefixes: &[&str]) -> String {
    let mut out = text.trim_start().to_string();
    loop {
        let mut changed = false;
        for prefix in prefixes {
            if out.starts_with(prefix) {
                out = out[prefix.len()..].trim_start().to_string();
                changed = true;
                break;
            }
        }
        if !changed {
            break;
        }
    }
    out
}

fn strip_placement_verbs(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !PLACEMENT_VERBS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Correct, then run the three stripping passes in order
pub fn clean_log_text(text: &str) -> String {
    let corrected = corrector::correct(text);
    let without_filler = strip_leading(&corrected, LEADING_FILLER);
    let without_verbs = strip_placement_verbs(&without_filler);
    strip_leading(&without_verbs, LEADING_ARTICLES)
}

/// First location phrase found splits the text; the remainder is rejoined if
/// the phrase recurs ("box in the shed in the garden" keeps the full tail).
fn split_on_location(cleaned: &str) -> Option<(String, String)> {
    for phrase in LOCATION_PHRASES {
        if let Some(index) = cleaned.find(phrase) {
            let item = cleaned[..index].trim().to_string();
            let location = cleaned[index + phrase.len()..].trim().to_string();
            if location.is_empty() {
                return None;
            }
            return Some((item, location));
        }
    }
    None
}

/// The explicit "item - location" form, considered more reliable than a
/// location-word guess
fn split_on_hyphen(cleaned: &str) -> Option<(String, String)> {
    let index = cleaned.find(" - ")?;
    let item = cleaned[..index].trim().to_string();
    let location = cleaned[index + 3..].trim().to_string();
    if location.is_empty() {
        return None;
    }
    Some((item, location))
}

/// Heuristic stages 1-4: primary transcript, hyphen override, then each
/// alternative in turn. `None` means no stage determined a location.
pub fn parse_log_heuristic(transcript: &Transcript) -> Option<ParsedLogCommand> {
    let cleaned = clean_log_text(&transcript.text);

    let mut parsed = split_on_location(&cleaned).map(|(name, location)| ParsedLogCommand {
        name,
        location,
        confidence: CONFIDENCE_PRIMARY,
    });

    // Hyphen form overrides a location-word split when both are present
    if let Some((name, location)) = split_on_hyphen(&cleaned) {
        parsed = Some(ParsedLogCommand {
            name,
            location,
            confidence: CONFIDENCE_HYPHEN,
        });
    }

    if parsed.is_some() {
        return parsed;
    }

    // Alternative transcripts, skipping index 0 (the primary again)
    for alternative in transcript.alternatives.iter().skip(1) {
        let alt_cleaned = clean_log_text(alternative);
        if let Some((name, location)) = split_on_location(&alt_cleaned) {
            debug!("Log split came from alternative transcript: {:?}", alternative);
            return Some(ParsedLogCommand {
                name,
                location,
                confidence: CONFIDENCE_ALTERNATIVE,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_location_phrase() {
        let parsed = parse_log_heuristic(&Transcript::new("keys in the kitchen drawer")).unwrap();
        assert_eq!(parsed.name, "keys");
        assert_eq!(parsed.location, "kitchen drawer");
        assert_eq!(parsed.confidence, 0.8);
    }

    #[test]
    fn test_filler_verb_article_stripping() {
        let parsed =
            parse_log_heuristic(&Transcript::new("i just put my phone on the counter")).unwrap();
        assert_eq!(parsed.name, "phone");
        assert_eq!(parsed.location, "counter");
    }

    #[test]
    fn test_hyphen_form() {
        let parsed = parse_log_heuristic(&Transcript::new("passport - filing cabinet")).unwrap();
        assert_eq!(parsed.name, "passport");
        assert_eq!(parsed.location, "filing cabinet");
        assert_eq!(parsed.confidence, 0.9);
    }

    #[test]
    fn test_hyphen_overrides_location_phrase() {
        // Contains both " in the " and a hyphen split; hyphen wins
        let parsed =
            parse_log_heuristic(&Transcript::new("charger in the bag - hall cupboard")).unwrap();
        assert_eq!(parsed.name, "charger in the bag");
        assert_eq!(parsed.location, "hall cupboard");
        assert_eq!(parsed.confidence, 0.9);
    }

    #[test]
    fn test_phrase_priority_in_the_before_in() {
        let parsed = parse_log_heuristic(&Transcript::new("wallet in the car")).unwrap();
        // " in the " must win over " in ", otherwise location would be "the car"
        assert_eq!(parsed.location, "car");
    }

    #[test]
    fn test_recurring_phrase_rejoins_tail() {
        let parsed =
            parse_log_heuristic(&Transcript::new("box in the shed in the garden")).unwrap();
        assert_eq!(parsed.name, "box");
        assert_eq!(parsed.location, "shed in the garden");
    }

    #[test]
    fn test_correction_applies_before_split() {
        let parsed = parse_log_heuristic(&Transcript::new("scissors in the draw")).unwrap();
        assert_eq!(parsed.location, "drawer");
    }

    #[test]
    fn test_alternative_transcript_at_reduced_confidence() {
        let transcript = Transcript::with_alternatives(
            "keys and kitchen drawer",
            vec![
                "keys and kitchen drawer".to_string(),
                "keys in the kitchen drawer".to_string(),
            ],
        );
        let parsed = parse_log_heuristic(&transcript).unwrap();
        assert_eq!(parsed.name, "keys");
        assert_eq!(parsed.location, "kitchen drawer");
        assert_eq!(parsed.confidence, 0.7);
    }

    #[test]
    fn test_no_location_resolves_none() {
        assert!(parse_log_heuristic(&Transcript::new("keys")).is_none());
        assert!(parse_log_heuristic(&Transcript::new("i put my keys somewhere")).is_none());
    }

    #[test]
    fn test_trailing_phrase_without_location_is_not_a_split() {
        assert!(split_on_location("keys in the ").is_none());
    }
}
