// Display model for a wallet's badge list.

use crate::badge::Badge;
use chrono::DateTime;

pub const EMPTY_MESSAGE: &str = "You don't have any badges yet. Claim your first badge!";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeView {
    pub event: String,
    pub earned_on: String,
    pub wallet_short: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerView {
    pub wallet_short: String,
    pub count: usize,
    pub summary: String,
    pub badges: Vec<BadgeView>,
    /// Set only when there is nothing to list.
    pub empty_message: Option<&'static str>,
}

impl LedgerView {
    pub fn new(wallet: &str, badges: &[Badge]) -> Self {
        let count = badges.len();
        LedgerView {
            wallet_short: short_wallet(wallet),
            count,
            summary: summary(count),
            badges: badges.iter().map(BadgeView::from).collect(),
            empty_message: (count == 0).then_some(EMPTY_MESSAGE),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl From<&Badge> for BadgeView {
    fn from(b: &Badge) -> Self {
        BadgeView {
            event: b.event.clone(),
            earned_on: format_date(&b.date),
            wallet_short: short_wallet(&b.wallet),
            image: b.image.clone(),
        }
    }
}

pub fn summary(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("You have {} badge{}", count, plural)
}

/// `0x1234...abcd`; short strings are returned whole.
pub fn short_wallet(wallet: &str) -> String {
    let chars: Vec<char> = wallet.chars().collect();
    if chars.len() <= 10 {
        return wallet.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// RFC 3339 dates render as `October 19, 2026, 02:30 PM` (UTC); anything
/// else, such as locale strings from older records, is shown verbatim.
pub fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&chrono::Utc)
            .format("%B %-d, %Y, %I:%M %p")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
