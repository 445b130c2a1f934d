// Validation: input checks applied before the ledger touches storage.
// Wallet strings are opaque to the ledger; only blankness is a hard rule.

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    EmptyWallet,
    EmptyEvent,
}

/// Trimmed wallet address, or `EmptyWallet` when nothing usable remains.
pub fn wallet(raw: &str) -> Result<&str, ValidationError> {
    let w = raw.trim();
    if w.is_empty() {
        return Err(ValidationError::EmptyWallet);
    }
    Ok(w)
}

/// Trimmed event name, stored as given.
pub fn event(raw: &str) -> Result<&str, ValidationError> {
    let e = raw.trim();
    if e.is_empty() {
        return Err(ValidationError::EmptyEvent);
    }
    Ok(e)
}

/// Form events are compared in: whitespace runs collapse to one space.
/// Older records spell some events with doubled spaces.
pub fn event_key(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn same_event(a: &str, b: &str) -> bool {
    event_key(a) == event_key(b)
}

/// `0x` followed by 40 hex digits. Advisory only: connectors may hand us
/// other address formats and the ledger still accepts them.
pub fn looks_like_evm_address(addr: &str) -> bool {
    let Some(body) = addr.strip_prefix("0x").or_else(|| addr.strip_prefix("0X")) else {
        return false;
    };
    body.len() == 40 && body.bytes().all(|b| b.is_ascii_hexdigit())
}
