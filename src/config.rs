//! Configuration types for devpost-harvest

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fetch behavior configuration (endpoint, concurrency, retry timing)
///
/// Every field has a sensible default matching the live Devpost listing API,
/// so `FetchConfig::default()` works out of the box. All fields are also
/// individually defaulted under serde, so a partial config file is fine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL of the listing API host (default: "https://devpost.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    ///
    /// The listing endpoint rejects requests without a browser-like UA.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Total attempts per page across all error classes combined (default: 3)
    ///
    /// A page that alternates between 404s and timeouts still gets exactly
    /// this many attempts in total; no error class resets the budget.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Maximum simultaneous in-flight page requests (default: 10)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Per-attempt request timeout (default: 30 seconds)
    #[serde(default = "default_page_timeout", with = "duration_serde")]
    pub page_timeout: Duration,

    /// Base delay for linear backoff after a 404 attempt (default: 1 second)
    ///
    /// The delay before attempt N+1 is `not_found_backoff * N`.
    #[serde(default = "default_not_found_backoff", with = "duration_serde")]
    pub not_found_backoff: Duration,

    /// Base delay for linear backoff after a timeout, transport error,
    /// unexpected status, or decode failure (default: 2 seconds)
    ///
    /// The delay before attempt N+1 is `transient_backoff * N`.
    #[serde(default = "default_transient_backoff", with = "duration_serde")]
    pub transient_backoff: Duration,

    /// Emit a progress line every N page completions (default: 100)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            max_attempts: default_max_attempts(),
            max_concurrent: default_max_concurrent(),
            page_timeout: default_page_timeout(),
            not_found_backoff: default_not_found_backoff(),
            transient_backoff: default_transient_backoff(),
            progress_interval: default_progress_interval(),
        }
    }
}

fn default_base_url() -> String {
    "https://devpost.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_max_concurrent() -> usize {
    10
}

fn default_page_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_not_found_backoff() -> Duration {
    Duration::from_secs(1)
}

fn default_transient_backoff() -> Duration {
    Duration::from_secs(2)
}

fn default_progress_interval() -> u64 {
    100
}

// Duration serialization helper (serializes as whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
