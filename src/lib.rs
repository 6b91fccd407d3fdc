//! # devpost-harvest
//!
//! Harvests the complete hackathon listing from the Devpost-style paginated
//! JSON API into an ordered collection of fixed-shape records, ready for
//! CSV export.
//!
//! One discovery request to page 1 learns the total record count and page
//! size; the remaining pages are fetched concurrently under a bounded
//! limiter, each with a capped per-page retry budget. Individual page
//! failures never abort a run: they are recorded and the partial dataset is
//! still usable.
//!
//! ## Quick Start
//!
//! ```no_run
//! use devpost_harvest::{FetchConfig, FetchSession, write_csv};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = FetchSession::new(FetchConfig::default())?;
//!     let discovery = session.discover().await?;
//!     let report = session.fetch_all(discovery).await;
//!     write_csv(Path::new("devpost_hackathons.csv"), &report.records)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// CSV export
pub mod export;
/// Paginated bulk fetcher
pub mod fetcher;
/// Raw-record flattening
pub mod flatten;
/// Per-page retry state machine
pub mod retry;
/// Core wire and output types
pub mod types;

// Re-export commonly used types
pub use config::FetchConfig;
pub use error::{Error, Result};
pub use export::write_csv;
pub use fetcher::FetchSession;
pub use flatten::flatten;
pub use types::{Discovery, FetchReport, FlatRecord, RawHackathon};
