//! Rate-limit clock shared by every refresh trigger.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Result of asking the clock for permission to start a refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The caller owns the pass; the clock already records `now`.
    Granted,
    /// Another pass started less than the minimum interval ago.
    Denied { retry_in: Duration },
}

/// Timestamp (unix seconds) of the most recent refresh pass start.
///
/// Starts at zero, meaning "never refreshed". The check and the update
/// happen in one compare-and-swap, so two concurrent triggers can never
/// both be admitted within the same interval.
#[derive(Debug, Default)]
pub struct RefreshClock {
    last: AtomicI64,
}

impl RefreshClock {
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Tries to claim a refresh pass at `now` (unix seconds).
    ///
    /// On success the stored timestamp is set to `now` before returning, so
    /// triggers arriving while the pass is still running are denied.
    pub fn try_begin(&self, now: i64, min_interval: Duration) -> Admission {
        let min = i64::try_from(min_interval.as_secs()).unwrap_or(i64::MAX);
        let mut last = self.last.load(Ordering::Acquire);

        loop {
            if last != 0 {
                let elapsed = now.saturating_sub(last);
                if elapsed < min {
                    let remaining = u64::try_from(min.saturating_sub(elapsed)).unwrap_or(0);
                    return Admission::Denied {
                        retry_in: Duration::from_secs(remaining),
                    };
                }
            }

            match self
                .last
                .compare_exchange_weak(last, now, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Admission::Granted,
                Err(actual) => last = actual,
            }
        }
    }

    /// Start time of the last admitted pass, if any.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        match self.last.load(Ordering::Acquire) {
            0 => None,
            ts => DateTime::from_timestamp(ts, 0),
        }
    }
}
