// Session: the one set of UI states driving the ledger.
//
// Disconnected -> ConnectedEmpty/ConnectedWithBadges on WalletEvent::Connected.
// begin_scan() enters Claiming; complete_scan() claims and leaves it.
// Wallet changes reload the ledger from storage and drop any open scanner.

use crate::badge::{Badge, ClaimStatus};
use crate::catalog;
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::error::LedgerError;
use crate::ledger::BadgeLedger;
use crate::render::LedgerView;
use crate::storage::KvStore;
use crate::validation;
use std::fmt;
use tracing::{debug, warn};

/// Delivered by the wallet connector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    Connected(String),
    Disconnected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    ConnectedEmpty,
    ConnectedWithBadges,
    Claiming,
}

/// User-facing outcome of a session action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    NotConnected,
    ScannerClosed,
    ScanInProgress,
    NotScanning,
    SelectEventFirst,
    UnknownEvent(String),
    PhraseMismatch,
    BadgeEarned(String),
    AlreadyClaimed(String),
    ClaimFailed,
}

impl Notice {
    /// Whether the action this notice answers went through.
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::BadgeEarned(_) | Notice::AlreadyClaimed(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NotConnected => write!(f, "Please connect your wallet first"),
            Notice::ScannerClosed => write!(f, "Open the scanner to join a training session"),
            Notice::ScanInProgress => write!(f, "Scanning..."),
            Notice::NotScanning => write!(f, "No scan in progress"),
            Notice::SelectEventFirst => write!(f, "Please select a training session first!"),
            Notice::UnknownEvent(e) => write!(f, "Unknown training session: {}", e),
            Notice::PhraseMismatch => write!(f, "Organiser phrase does not match"),
            Notice::BadgeEarned(e) => write!(f, "Badge earned for {}!", e),
            Notice::AlreadyClaimed(e) => write!(f, "You already have a badge for {}", e),
            Notice::ClaimFailed => write!(f, "Claim failed, please retry"),
        }
    }
}

#[derive(Debug, Default)]
struct Scanner {
    selected: Option<String>,
    phrase: Option<String>,
    scanning: bool,
}

pub struct Session<S, C = SystemClock> {
    ledger: BadgeLedger<S, C>,
    config: AppConfig,
    address: Option<String>,
    badges: Vec<Badge>,
    scanner: Option<Scanner>,
}

impl<S: KvStore, C: Clock> Session<S, C> {
    pub fn new(ledger: BadgeLedger<S, C>, config: AppConfig) -> Self {
        Session {
            ledger,
            config,
            address: None,
            badges: Vec::new(),
            scanner: None,
        }
    }

    pub fn ledger(&self) -> &BadgeLedger<S, C> {
        &self.ledger
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn selected_event(&self) -> Option<&str> {
        self.scanner.as_ref().and_then(|s| s.selected.as_deref())
    }

    pub fn scanner_open(&self) -> bool {
        self.scanner.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.scanner.as_ref().is_some_and(|s| s.scanning) {
            return Phase::Claiming;
        }
        match (&self.address, self.badges.is_empty()) {
            (None, _) => Phase::Disconnected,
            (Some(_), true) => Phase::ConnectedEmpty,
            (Some(_), false) => Phase::ConnectedWithBadges,
        }
    }

    /// Render model for the connected wallet; `None` while disconnected.
    pub fn view(&self) -> Option<LedgerView> {
        self.address
            .as_deref()
            .map(|addr| LedgerView::new(addr, &self.badges))
    }

    pub fn handle_wallet(&mut self, event: WalletEvent) {
        self.scanner = None;
        match event {
            WalletEvent::Connected(addr) => match validation::wallet(&addr) {
                Ok(addr) => {
                    if !validation::looks_like_evm_address(addr) {
                        debug!(wallet = addr, "connected address is not 0x-hex");
                    }
                    self.badges = self.ledger.load(addr);
                    self.address = Some(addr.to_string());
                    debug!(wallet = addr, badges = self.badges.len(), "wallet connected");
                }
                Err(_) => {
                    warn!("connector reported a blank address; treating as disconnected");
                    self.disconnect();
                }
            },
            WalletEvent::Disconnected => self.disconnect(),
        }
    }

    fn disconnect(&mut self) {
        self.address = None;
        self.badges.clear();
    }

    /// Open the event picker with a fresh selection.
    pub fn open_scanner(&mut self) -> Result<(), Notice> {
        if self.address.is_none() {
            return Err(Notice::NotConnected);
        }
        if self.phase() == Phase::Claiming {
            return Err(Notice::ScanInProgress);
        }
        self.scanner = Some(Scanner::default());
        Ok(())
    }

    pub fn select_event(&mut self, name: &str) -> Result<(), Notice> {
        let allow_free_text = self.config.allow_free_text_events;
        let scanner = self.idle_scanner()?;
        let chosen = match catalog::lookup(name) {
            Some(known) => known.to_string(),
            None if allow_free_text => validation::event(name)
                .map_err(|_| Notice::UnknownEvent(name.to_string()))?
                .to_string(),
            None => return Err(Notice::UnknownEvent(name.to_string())),
        };
        scanner.selected = Some(chosen);
        Ok(())
    }

    pub fn enter_phrase(&mut self, phrase: &str) -> Result<(), Notice> {
        let scanner = self.idle_scanner()?;
        scanner.phrase = Some(phrase.trim().to_string());
        Ok(())
    }

    /// Start the mock scan. Gated on a selected event and, when configured,
    /// the organiser phrase.
    pub fn begin_scan(&mut self) -> Result<(), Notice> {
        let expected = self
            .config
            .organiser_phrase
            .as_deref()
            .map(|p| p.trim().to_string());
        let scanner = self.idle_scanner()?;
        if scanner.selected.is_none() {
            return Err(Notice::SelectEventFirst);
        }
        if let Some(expected) = expected {
            if scanner.phrase.as_deref() != Some(expected.as_str()) {
                return Err(Notice::PhraseMismatch);
            }
        }
        scanner.scanning = true;
        Ok(())
    }

    /// Finish the mock scan by claiming the selected event.
    pub fn complete_scan(&mut self) -> Notice {
        let (Some(addr), Some(scanner)) = (self.address.as_deref(), self.scanner.as_mut()) else {
            return Notice::NotScanning;
        };
        if !scanner.scanning {
            return Notice::NotScanning;
        }
        scanner.scanning = false;
        let Some(event) = scanner.selected.clone() else {
            return Notice::SelectEventFirst;
        };

        match self.ledger.claim(addr, &event, &self.config.default_image) {
            Ok(claim) => {
                self.badges = claim.badges;
                self.scanner = None;
                match claim.status {
                    ClaimStatus::Added => Notice::BadgeEarned(event),
                    ClaimStatus::AlreadyClaimed => Notice::AlreadyClaimed(event),
                    ClaimStatus::NoWallet => Notice::NotConnected,
                }
            }
            Err(LedgerError::InvalidEvent(_)) => Notice::UnknownEvent(event),
            Err(e) => {
                warn!(error = %e, event = event.as_str(), "claim failed");
                Notice::ClaimFailed
            }
        }
    }

    pub fn cancel_scan(&mut self) {
        self.scanner = None;
    }

    fn idle_scanner(&mut self) -> Result<&mut Scanner, Notice> {
        if self.address.is_none() {
            return Err(Notice::NotConnected);
        }
        let scanner = self.scanner.as_mut().ok_or(Notice::ScannerClosed)?;
        if scanner.scanning {
            return Err(Notice::ScanInProgress);
        }
        Ok(scanner)
    }
}
