//! Per-page retry state machine with linear per-class backoff
//!
//! Each page gets one attempt budget shared across every error class: a page
//! that alternates between 404s and timeouts is not granted extra attempts.
//! The only thing the error class changes is backoff timing: 404s back off
//! from a shorter base than timeouts, transport errors, unexpected statuses,
//! and decode failures, which all share the generic transient delay.
//!
//! Delays grow linearly with the attempt index: the delay after attempt N is
//! `base * N`.

use crate::config::FetchConfig;
use crate::error::Error;
use std::time::Duration;

/// Attempt tracker for one page's fetch lifecycle
///
/// Drives the per-page state machine: each failed attempt is fed to
/// [`RetryState::next_delay`], which either yields the backoff to sleep
/// before the next attempt or `None` once the budget is exhausted.
///
/// # Example
///
/// ```
/// use devpost_harvest::config::FetchConfig;
/// use devpost_harvest::error::Error;
/// use devpost_harvest::retry::RetryState;
///
/// let config = FetchConfig::default();
/// let mut retry = RetryState::new(&config);
/// let delay = retry.next_delay(&Error::PageNotFound { page: 2 });
/// assert_eq!(delay, Some(config.not_found_backoff));
/// ```
#[derive(Debug)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
    not_found_backoff: Duration,
    transient_backoff: Duration,
}

impl RetryState {
    /// Create a fresh attempt budget for one page
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            not_found_backoff: config.not_found_backoff,
            transient_backoff: config.transient_backoff,
        }
    }

    /// Record a failed attempt and return the backoff before the next one
    ///
    /// Returns `None` when the attempt budget is exhausted; the page is then
    /// terminal (EXHAUSTED) and must be recorded as failed. Otherwise returns
    /// the class-specific linear delay: `not_found_backoff * attempt` for a
    /// 404, `transient_backoff * attempt` for everything else.
    pub fn next_delay(&mut self, error: &Error) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }
        let base = match error {
            Error::PageNotFound { .. } => self.not_found_backoff,
            _ => self.transient_backoff,
        };
        Some(base * self.attempt)
    }

    /// Number of failed attempts recorded so far
    pub fn attempts_made(&self) -> u32 {
        self.attempt
    }
}
