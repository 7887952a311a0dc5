//! Terminal rendering for records and spoken lines

use findit_core::reply::{self, Freshness};
use findit_core::Item;
use owo_colors::OwoColorize;

/// Render the line the speech collaborator would say
pub fn print_spoken(text: &str) {
    println!("{} {}", "[voice]".cyan(), text);
}

pub fn print_hint(text: &str) {
    println!("{} {}", "[hint]".yellow(), text);
}

/// One record per line: name, location, age. Age accent follows freshness -
/// over a day old yellow, over a week red.
pub fn print_items(items: &[Item], now_ms: i64) {
    if items.is_empty() {
        println!("No items logged yet.");
        return;
    }

    for item in items {
        let age = reply::time_since(item.timestamp, now_ms);
        let age = match Freshness::of(item.timestamp, now_ms) {
            Freshness::Fresh => age.to_string(),
            Freshness::Stale => age.yellow().to_string(),
            Freshness::VeryStale => age.red().to_string(),
        };
        println!("  {:<20} {:<30} {}", item.name.bold(), item.location, age);
    }
}

/// The parsed split awaiting the user's go-ahead
pub fn print_parsed(name: &str, location: &str, confidence: f32) {
    println!();
    println!("  Item:       {}", name.bold());
    println!("  Location:   {}", location.bold());
    println!("  Confidence: {confidence:.1}");
    println!();
}
