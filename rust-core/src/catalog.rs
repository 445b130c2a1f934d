// Training sessions offered by the event picker.

use crate::validation;

pub const EVENTS: &[&str] = &[
    "Python Workshop Day 1",
    "WeThinkCode Bootcamp",
    "AWS Summit",
    "Base Vibe Coding Hackathon",
    "Geekulcha Hackathon",
    "AI Fundamentals",
    "Data Science Basics",
    "AI & Machine Learning",
    "AVI Jozi",
    "Web3 Security Workshop",
];

/// Catalog spelling of `name`, matched case-insensitively with whitespace
/// runs collapsed.
pub fn lookup(name: &str) -> Option<&'static str> {
    let name = validation::event_key(name);
    EVENTS.iter().copied().find(|e| e.eq_ignore_ascii_case(&name))
}
