//! Error types for devpost-harvest
//!
//! Two failure tiers exist in a harvest run:
//! - The discovery request (page 1) is fatal: nothing downstream is possible
//!   without the total record count, so it maps to [`Error::Discovery`] and
//!   propagates out of the library.
//! - Every other page failure is recoverable: it feeds the per-page retry
//!   state machine and, once the attempt budget is exhausted, is downgraded
//!   to a recorded failed page rather than an error.

use thiserror::Error;

/// Result type alias for devpost-harvest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for devpost-harvest
#[derive(Debug, Error)]
pub enum Error {
    /// Discovery request (page 1) failed or its response was unusable.
    ///
    /// This is the only fatal error class: the caller should abort the run.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// Transport-level error from the HTTP client (includes per-attempt timeouts)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with HTTP 404 for a page
    ///
    /// Treated as possibly transient: the listing endpoint is known to return
    /// sporadic 404s for pages that exist.
    #[error("page {page} not found (HTTP 404)")]
    PageNotFound {
        /// The page number that returned 404
        page: u32,
    },

    /// Server answered with a non-2xx, non-404 status
    #[error("unexpected HTTP {status} from {url}")]
    Status {
        /// The HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Response body could not be decoded as a listing page
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid base URL in the configuration
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// CSV serialization error during export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_page_number() {
        let err = Error::PageNotFound { page: 42 };
        assert_eq!(err.to_string(), "page 42 not found (HTTP 404)");
    }

    #[test]
    fn display_includes_status_and_url() {
        let err = Error::Status {
            status: 503,
            url: "https://devpost.com/api/hackathons?page=3".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("page=3"));
    }

    #[test]
    fn decode_error_converts_via_from() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = Error::from(json_err);
        assert!(matches!(err, Error::Decode(_)));
    }
}
