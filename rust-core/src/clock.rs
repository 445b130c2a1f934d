// Time is injected: the ledger never reads the wall clock directly.

use chrono::{DateTime, SecondsFormat, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Claim timestamp as persisted in badge records.
    fn timestamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap());
        assert_eq!(clock.timestamp(), "2026-10-19T14:30:00.000Z");
    }
}
