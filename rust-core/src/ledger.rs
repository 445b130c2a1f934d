// Per-wallet badge ledger over an injected key-value store.
// Append-only, at most one badge per event; every mutation rewrites the whole entry.

use crate::badge::{storage_key, Badge, Claim, ClaimStatus};
use crate::clock::{Clock, SystemClock};
use crate::error::LedgerError;
use crate::storage::KvStore;
use crate::validation;
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct BadgeLedger<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KvStore> BadgeLedger<S> {
    pub fn new(store: S) -> Self {
        BadgeLedger {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: KvStore, C: Clock> BadgeLedger<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        BadgeLedger { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Badges claimed by `wallet`, in claim order.
    ///
    /// Never fails: a blank wallet, a missing entry, unreadable storage and
    /// malformed JSON all yield an empty ledger.
    pub fn load(&self, wallet: &str) -> Vec<Badge> {
        let Ok(wallet) = validation::wallet(wallet) else {
            return Vec::new();
        };
        match self.store.get(&storage_key(wallet)) {
            Ok(Some(raw)) => decode_ledger(&raw, wallet),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(wallet, error = %e, "ledger read failed; treating as empty");
                Vec::new()
            }
        }
    }

    /// Append a badge for `event` unless the wallet already holds one.
    ///
    /// A blank wallet is a silent no-op (`ClaimStatus::NoWallet`). Unlike
    /// `load`, a storage read failure aborts the claim: writing on top of an
    /// unread ledger would drop the existing badges.
    pub fn claim(&self, wallet: &str, event: &str, image: &str) -> Result<Claim, LedgerError> {
        let Ok(wallet) = validation::wallet(wallet) else {
            debug!("claim without a wallet ignored");
            return Ok(Claim {
                badges: Vec::new(),
                status: ClaimStatus::NoWallet,
            });
        };
        let event = validation::event(event).map_err(LedgerError::InvalidEvent)?;

        let key = storage_key(wallet);
        let mut badges = match self.store.get(&key)? {
            Some(raw) => decode_ledger(&raw, wallet),
            None => Vec::new(),
        };

        if badges.iter().any(|b| validation::same_event(&b.event, event)) {
            debug!(wallet, event, "badge already claimed");
            return Ok(Claim {
                badges,
                status: ClaimStatus::AlreadyClaimed,
            });
        }

        badges.push(Badge::new(wallet, event, self.clock.timestamp(), image));
        let encoded = serde_json::to_string(&badges)?;
        self.store.set(&key, &encoded)?;
        info!(wallet, event, total = badges.len(), "badge claimed");

        Ok(Claim {
            badges,
            status: ClaimStatus::Added,
        })
    }

    pub fn count(&self, wallet: &str) -> usize {
        self.load(wallet).len()
    }

    pub fn contains(&self, wallet: &str, event: &str) -> bool {
        self.load(wallet)
            .iter()
            .any(|b| validation::same_event(&b.event, event))
    }
}

/// Best-effort decode of a stored ledger. Non-array values decode to an
/// empty ledger; array entries that are not badges are dropped.
fn decode_ledger(raw: &str, wallet: &str) -> Vec<Badge> {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!(wallet, "stored ledger is not an array; treating as empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(wallet, error = %e, "stored ledger is malformed; treating as empty");
            return Vec::new();
        }
    };

    let total = entries.len();
    let badges: Vec<Badge> = entries
        .into_iter()
        .filter_map(|v| serde_json::from_value::<Badge>(v).ok())
        .filter(|b| !b.event.trim().is_empty())
        .map(|mut b| {
            if b.wallet.is_empty() {
                b.wallet = wallet.to_string();
            }
            b
        })
        .collect();

    if badges.len() != total {
        warn!(
            wallet,
            dropped = total - badges.len(),
            "skipped unreadable ledger entries"
        );
    }
    badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::LOCAL_BADGE_IMAGE;
    use crate::clock::FixedClock;
    use crate::error::StoreError;
    use crate::storage::MemoryStore;
    use crate::validation::ValidationError;
    use chrono::{TimeZone, Utc};

    const WALLET: &str = "0xABCD...1234";

    fn ledger() -> BadgeLedger<MemoryStore, FixedClock> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap());
        BadgeLedger::with_clock(MemoryStore::new(), clock)
    }

    #[test]
    fn unseen_wallet_loads_empty() {
        let l = ledger();
        assert!(l.load(WALLET).is_empty());
        assert!(l.load("").is_empty());
        assert!(l.store().is_empty());
    }

    #[test]
    fn claim_appends_and_persists() {
        let l = ledger();
        let claim = l.claim(WALLET, "AWS Summit", LOCAL_BADGE_IMAGE).unwrap();
        assert!(claim.added());
        assert_eq!(claim.badges.len(), 1);

        let loaded = l.load(WALLET);
        assert_eq!(loaded, claim.badges);
        let last = loaded.last().unwrap();
        assert_eq!(last.event, "AWS Summit");
        assert_eq!(last.wallet, WALLET);
        assert_eq!(last.date, "2026-10-19T09:00:00.000Z");
        assert_eq!(last.image, LOCAL_BADGE_IMAGE);
    }

    #[test]
    fn duplicate_claim_is_a_noop() {
        let l = ledger();
        l.claim(WALLET, "AWS Summit", "a.png").unwrap();
        let before = l.store().get(&storage_key(WALLET)).unwrap();

        let again = l.claim(WALLET, "AWS Summit", "b.png").unwrap();
        assert_eq!(again.status, ClaimStatus::AlreadyClaimed);
        assert!(!again.added());
        assert_eq!(again.badges.len(), 1);
        assert_eq!(again.badges[0].image, "a.png");
        assert_eq!(l.store().get(&storage_key(WALLET)).unwrap(), before);
    }

    #[test]
    fn whitespace_variants_of_an_event_dedupe() {
        let l = ledger();
        l.claim(WALLET, "AI Fundamentals", "x").unwrap();
        let again = l.claim(WALLET, "  AI Fundamentals ", "x").unwrap();
        assert_eq!(again.status, ClaimStatus::AlreadyClaimed);
        assert!(l.contains(WALLET, "AI Fundamentals "));
    }

    #[test]
    fn doubled_space_spelling_from_older_records_dedupes() {
        let l = ledger();
        let raw = r#"[{"id":"1712000000000","wallet":"0xABCD...1234","event":"Geekulcha  Hackathon","date":"4/9/2024","image":"local-badge"}]"#;
        l.store().set(&storage_key(WALLET), raw).unwrap();

        let again = l.claim(WALLET, "Geekulcha Hackathon", "x").unwrap();
        assert_eq!(again.status, ClaimStatus::AlreadyClaimed);
        assert_eq!(again.badges.len(), 1);
        assert_eq!(again.badges[0].event, "Geekulcha  Hackathon");
        assert!(l.contains(WALLET, "Geekulcha Hackathon"));
    }

    #[test]
    fn long_event_names_are_accepted() {
        let l = ledger();
        let event = "a".repeat(201);
        let claim = l.claim("0xabc", &event, LOCAL_BADGE_IMAGE).unwrap();
        assert!(claim.added());
        assert_eq!(l.load("0xabc")[0].event, event);
    }

    #[test]
    fn padded_wallet_is_stored_trimmed() {
        let l = ledger();
        l.claim(" 0xa ", "AWS Summit", "x").unwrap();
        let badges = l.load("0xa");
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].wallet, "0xa");
        assert_eq!(l.load("  0xa"), badges);
        assert!(l.store().get("badges_0xa").unwrap().is_some());
    }

    #[test]
    fn distinct_events_keep_claim_order() {
        let l = ledger();
        l.claim(WALLET, "AWS Summit", "x").unwrap();
        l.claim(WALLET, "AWS Summit", "x").unwrap();
        l.claim(WALLET, "AI Fundamentals", "x").unwrap();

        let events: Vec<_> = l.load(WALLET).into_iter().map(|b| b.event).collect();
        assert_eq!(events, vec!["AWS Summit", "AI Fundamentals"]);
        assert_eq!(l.count(WALLET), 2);
    }

    #[test]
    fn wallets_are_partitioned() {
        let l = ledger();
        l.claim("0xaaa", "AVI Jozi", "x").unwrap();
        let other = l.claim("0xbbb", "AVI Jozi", "x").unwrap();
        assert!(other.added());
        assert_eq!(l.count("0xaaa"), 1);
        assert_eq!(l.count("0xbbb"), 1);
    }

    #[test]
    fn blank_wallet_claim_writes_nothing() {
        let l = ledger();
        let claim = l.claim("  ", "AWS Summit", "x").unwrap();
        assert_eq!(claim.status, ClaimStatus::NoWallet);
        assert!(claim.badges.is_empty());
        assert!(l.store().is_empty());
    }

    #[test]
    fn blank_event_is_rejected() {
        let l = ledger();
        let err = l.claim(WALLET, " ", "x").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidEvent(ValidationError::EmptyEvent)
        ));
        assert!(!err.is_retryable());
        assert!(l.store().is_empty());
    }

    #[test]
    fn malformed_json_loads_empty() {
        let l = ledger();
        l.store().set(&storage_key(WALLET), "{not json").unwrap();
        assert!(l.load(WALLET).is_empty());

        l.store().set(&storage_key(WALLET), r#"{"event":"x"}"#).unwrap();
        assert!(l.load(WALLET).is_empty());
    }

    #[test]
    fn claim_over_malformed_entry_starts_fresh() {
        let l = ledger();
        l.store().set(&storage_key(WALLET), "{not json").unwrap();
        let claim = l.claim(WALLET, "AWS Summit", "x").unwrap();
        assert!(claim.added());
        assert_eq!(l.count(WALLET), 1);
    }

    #[test]
    fn legacy_and_partial_entries_load_best_effort() {
        let l = ledger();
        let raw = r#"[
            {"id":"1712000000000","wallet":"0xABCD...1234","event":"AVI Jozi","date":"4/9/2024","image":"local-badge"},
            {"wallet":"0xABCD...1234","date":"4/9/2024"},
            42,
            {"event":"AWS Summit"}
        ]"#;
        l.store().set(&storage_key(WALLET), raw).unwrap();

        let badges = l.load(WALLET);
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].event, "AVI Jozi");
        assert_eq!(badges[0].date, "4/9/2024");
        assert_eq!(badges[1].event, "AWS Summit");
        assert_eq!(badges[1].wallet, WALLET);
        assert_eq!(badges[1].image, LOCAL_BADGE_IMAGE);

        let dup = l.claim(WALLET, "AVI Jozi", "x").unwrap();
        assert_eq!(dup.status, ClaimStatus::AlreadyClaimed);
    }

    #[test]
    fn write_failure_is_retryable_and_keeps_prior_state() {
        let l = ledger();
        l.claim(WALLET, "AWS Summit", "x").unwrap();
        l.store().fail_writes(true);

        let err = l.claim(WALLET, "AI Fundamentals", "x").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Storage(StoreError::QuotaExceeded { .. })
        ));
        assert!(err.is_retryable());
        assert_eq!(l.count(WALLET), 1);

        l.store().fail_writes(false);
        assert!(l.claim(WALLET, "AI Fundamentals", "x").unwrap().added());
        assert_eq!(l.count(WALLET), 2);
    }

    #[test]
    fn read_failure_degrades_load_but_aborts_claim() {
        let l = ledger();
        l.claim(WALLET, "AWS Summit", "x").unwrap();
        l.store().fail_reads(true);

        assert!(l.load(WALLET).is_empty());
        assert!(matches!(
            l.claim(WALLET, "AI Fundamentals", "x"),
            Err(LedgerError::Storage(StoreError::Unavailable(_)))
        ));

        l.store().fail_reads(false);
        assert_eq!(l.count(WALLET), 1);
    }
}
