//! Configuration types for the VoteLedger.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;
use tracing::warn;

/// Default number of read-modify-write attempts per vote.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default base delay between conflicting attempts, in milliseconds.
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 5;

/// Default upper bound on the delay between attempts, in milliseconds.
const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 100;

/// Default capacity of the vote event channel.
const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Configuration for the VoteLedger.
///
/// Controls how many times a vote is retried after losing a race on the same
/// `(user, target)` pair, the backoff between those attempts, and how many
/// unread events a lagging subscriber may accumulate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteLedgerConfig {
    /// Total attempts per vote, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Delay before the first retry. Each later delay is the previous one
    /// multiplied by this value in milliseconds.
    pub retry_base_delay: Duration,
    /// Upper bound of a single backoff delay.
    pub retry_max_delay: Duration,
    /// Capacity of the broadcast channel behind `VoteLedger::subscribe`.
    pub event_capacity: usize,
}

impl Default for VoteLedgerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            retry_max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl VoteLedgerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VOTE_MAX_ATTEMPTS`: attempts per vote, at least 1 (default: 5)
    /// - `VOTE_RETRY_BASE_DELAY_MS`: base backoff delay (default: 5)
    /// - `VOTE_RETRY_MAX_DELAY_MS`: maximum backoff delay (default: 100)
    /// - `VOTE_EVENT_CAPACITY`: event channel capacity, at least 1 (default: 256)
    ///
    /// Missing variables use the default; invalid ones are logged and use the default.
    pub fn from_env() -> Self {
        let max_attempts = env_or("VOTE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS, |v| *v >= 1);
        let base_ms = env_or("VOTE_RETRY_BASE_DELAY_MS", DEFAULT_RETRY_BASE_DELAY_MS, |_| true);
        let max_ms = env_or("VOTE_RETRY_MAX_DELAY_MS", DEFAULT_RETRY_MAX_DELAY_MS, |_| true);
        let event_capacity = env_or("VOTE_EVENT_CAPACITY", DEFAULT_EVENT_CAPACITY, |v| *v >= 1);

        Self {
            max_attempts,
            retry_base_delay: Duration::from_millis(base_ms),
            retry_max_delay: Duration::from_millis(max_ms.max(base_ms)),
            event_capacity,
        }
    }

    /// Create a config with a custom attempt budget.
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - Total attempts per vote; values below 1 are raised to 1
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Delays between attempts, before jitter: one per retry, capped at
    /// `retry_max_delay`.
    pub fn retry_delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let base_ms = u64::try_from(self.retry_base_delay.as_millis()).unwrap_or(u64::MAX);
        ExponentialBackoff::from_millis(base_ms)
            .factor(1)
            .max_delay(self.retry_max_delay)
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

fn env_or<T>(name: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy,
{
    match env::var(name) {
        Err(_) => default,
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) if valid(&value) => value,
            _ => {
                warn!(variable = name, value = %raw, "Invalid value, using default");
                default
            }
        },
    }
}
