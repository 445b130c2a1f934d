// Badge record and the storage layout it is persisted under.

use serde::{Deserialize, Serialize};

/// Image sentinel used when no asset URL is supplied.
pub const LOCAL_BADGE_IMAGE: &str = "local-badge";

/// Storage keys are `badges_<address>`, one per wallet.
pub const STORAGE_KEY_PREFIX: &str = "badges_";

pub fn storage_key(wallet: &str) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, wallet)
}

/// One attendance claim. Field names match the persisted JSON shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    #[serde(default)]
    pub wallet: String,
    pub event: String,
    /// RFC 3339 for new claims; older records may hold locale strings.
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_image() -> String {
    LOCAL_BADGE_IMAGE.to_string()
}

impl Badge {
    pub fn new(wallet: &str, event: &str, date: String, image: &str) -> Self {
        Badge {
            wallet: wallet.to_string(),
            event: event.to_string(),
            date,
            image: image.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimStatus {
    Added,
    AlreadyClaimed,
    /// No wallet connected; nothing was written.
    NoWallet,
}

/// Result of a claim: the ledger after the call plus what happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    pub badges: Vec<Badge>,
    pub status: ClaimStatus,
}

impl Claim {
    pub fn added(&self) -> bool {
        self.status == ClaimStatus::Added
    }
}
