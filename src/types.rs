//! Core types for devpost-harvest
//!
//! Wire shapes mirror the listing API's JSON: page 1 carries a `meta` block
//! with pagination totals, every page carries a `hackathons` array. Raw
//! records keep every field optional because the API omits or nulls fields
//! freely; the flattening step is where defaulting happens.

use serde::{Deserialize, Serialize};

/// Pagination metadata from the page-1 response
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PageMeta {
    /// Total number of records across all pages
    pub total_count: u64,
    /// Number of records per page
    pub per_page: u64,
}

/// One decoded page of the listing API
///
/// `meta` is only present on page 1; `hackathons` is required on every page.
/// A 200 body without the `hackathons` key is a decode error, which makes it
/// retryable and ultimately a failed page, matching how the endpoint's
/// occasional malformed responses should be treated.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiPage {
    /// Pagination totals (page 1 only)
    #[serde(default)]
    pub meta: Option<PageMeta>,
    /// The raw records on this page
    pub hackathons: Vec<RawHackathon>,
}

/// Nested location object on a raw record
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DisplayedLocation {
    /// Human-readable location string (e.g. "Online" or a city name)
    #[serde(default)]
    pub location: Option<String>,
}

/// One theme tag on a raw record
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Theme {
    /// Theme display name (e.g. "Machine Learning/AI")
    #[serde(default)]
    pub name: Option<String>,
}

/// Prize counts nested object on a raw record
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct PrizesCounts {
    /// Number of cash prizes
    #[serde(default)]
    pub cash: Option<u64>,
    /// Number of non-cash prizes
    #[serde(default)]
    pub other: Option<u64>,
}

/// One raw hackathon record as returned by the listing API
///
/// Every field is optional: real responses omit fields, null them, or add
/// new ones without notice. Unknown fields are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawHackathon {
    /// Numeric record identifier
    #[serde(default)]
    pub id: Option<u64>,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Canonical hackathon URL
    #[serde(default)]
    pub url: Option<String>,
    /// Organizer display name
    #[serde(default)]
    pub organization_name: Option<String>,
    /// Nested location object
    #[serde(default)]
    pub displayed_location: Option<DisplayedLocation>,
    /// Open/closed/upcoming state string
    #[serde(default)]
    pub open_state: Option<String>,
    /// Human-readable submission window
    #[serde(default)]
    pub submission_period_dates: Option<String>,
    /// Human-readable countdown to the submission deadline
    #[serde(default)]
    pub time_left_to_submission: Option<String>,
    /// Prize total as a display string, wrapped in currency markup
    #[serde(default)]
    pub prize_amount: Option<String>,
    /// Nested prize counts
    #[serde(default)]
    pub prizes_counts: Option<PrizesCounts>,
    /// Number of registered participants
    #[serde(default)]
    pub registrations_count: Option<u64>,
    /// Theme tags
    #[serde(default)]
    pub themes: Option<Vec<Theme>>,
    /// Whether the listing is featured
    #[serde(default)]
    pub featured: Option<bool>,
    /// Whether winners have been announced
    #[serde(default)]
    pub winners_announced: Option<bool>,
    /// Whether participation is invite-only
    #[serde(default)]
    pub invite_only: Option<bool>,
    /// Whether the hackathon carries the managed-by-Devpost badge
    #[serde(default)]
    pub managed_by_devpost_badge: Option<bool>,
    /// Scheme-relative thumbnail URL (e.g. "//cdn.example.com/x.png")
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// URL of the submission gallery
    #[serde(default)]
    pub submission_gallery_url: Option<String>,
}

/// Fixed-shape output row derived from one raw record
///
/// Invariant: every `FlatRecord` carries exactly this field set, in this
/// order, regardless of which fields the source record had. Missing sources
/// become empty strings, zeros, or false, so CSV serialization never sees a
/// ragged schema.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlatRecord {
    /// Numeric record identifier (0 when absent)
    pub id: u64,
    /// Display title
    pub title: String,
    /// Canonical hackathon URL
    pub url: String,
    /// Organizer display name
    pub organization_name: String,
    /// Projected location string from the nested location object
    pub location: String,
    /// Open/closed/upcoming state
    pub open_state: String,
    /// Human-readable submission window
    pub submission_period_dates: String,
    /// Human-readable countdown to the submission deadline
    pub time_left_to_submission: String,
    /// Prize total with currency markup stripped
    pub prize_amount: String,
    /// Number of cash prizes
    pub cash_prizes_count: u64,
    /// Number of non-cash prizes
    pub other_prizes_count: u64,
    /// Number of registered participants
    pub registrations_count: u64,
    /// Theme names joined with ", "
    pub themes: String,
    /// Whether the listing is featured
    pub featured: bool,
    /// Whether winners have been announced
    pub winners_announced: bool,
    /// Whether participation is invite-only
    pub invite_only: bool,
    /// Whether the hackathon carries the managed-by-Devpost badge
    pub managed_by_devpost: bool,
    /// Absolute thumbnail URL ("https:" prefixed when the source is non-empty)
    pub thumbnail_url: String,
    /// URL of the submission gallery
    pub submission_gallery_url: String,
}

impl FlatRecord {
    /// CSV column names, in serialization order
    ///
    /// Must stay in sync with the struct's field order; the exporter writes
    /// this as the header row.
    pub const FIELD_NAMES: [&'static str; 19] = [
        "id",
        "title",
        "url",
        "organization_name",
        "location",
        "open_state",
        "submission_period_dates",
        "time_left_to_submission",
        "prize_amount",
        "cash_prizes_count",
        "other_prizes_count",
        "registrations_count",
        "themes",
        "featured",
        "winners_announced",
        "invite_only",
        "managed_by_devpost",
        "thumbnail_url",
        "submission_gallery_url",
    ];
}

/// Result of the discovery request (page 1)
#[derive(Clone, Debug)]
pub struct Discovery {
    /// Total number of pages: `ceil(total_count / per_page)`
    pub total_pages: u32,
    /// Total record count reported by the API
    pub total_count: u64,
    /// Page size reported by the API
    pub per_page: u64,
    /// The raw records already delivered on page 1
    pub first_page: Vec<RawHackathon>,
}

/// Outcome of one full fetch run
///
/// Progress state is threaded through the fetch loop and returned here
/// instead of living in ambient module state, so a session stays reusable
/// and testable in isolation.
#[derive(Clone, Debug, Default)]
pub struct FetchReport {
    /// All flattened records, in ascending page order
    pub records: Vec<FlatRecord>,
    /// Pages whose attempt budget was exhausted, in ascending page order
    pub failed_pages: Vec<u32>,
    /// Number of pages attempted, including page 1
    pub pages_attempted: u32,
}
