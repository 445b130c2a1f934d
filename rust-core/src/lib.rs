// Wallet-keyed attendance badges: claim once per event, read back in claim order.

pub mod badge;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod render;
pub mod session;
pub mod storage;
pub mod validation;

pub use badge::{Badge, Claim, ClaimStatus};
pub use error::{ConfigError, LedgerError, StoreError};
pub use ledger::BadgeLedger;
pub use session::{Notice, Phase, Session, WalletEvent};
pub use storage::{FileStore, KvStore, MemoryStore};

/*
Intentionally avoids:
- global mutable state (storage and time are injected)
- cross-writer coordination: concurrent claims for one wallet are last-writer-wins
*/
