//! Projection of raw API records into fixed-shape output rows
//!
//! Flattening is pure and total: no I/O, no retry, and no raw record can
//! make it fail. Every missing or null source field becomes an empty string,
//! zero, or false, so the output schema is never ragged.

use crate::types::{FlatRecord, RawHackathon};

/// Currency markup the API wraps around the prize total
const PRIZE_MARKUP_OPEN: &str = "<span data-currency-value>";
/// Closing tag of the currency markup
const PRIZE_MARKUP_CLOSE: &str = "</span>";

/// Flatten one raw record into a [`FlatRecord`]
///
/// Field handling:
/// - theme names are joined with `", "`,
/// - the nested location object is projected to a single string,
/// - the prize total has its currency markup substrings stripped,
/// - the scheme-relative thumbnail URL gets an `https:` prefix, but only
///   when the source value is non-empty.
pub fn flatten(raw: &RawHackathon) -> FlatRecord {
    let themes = raw
        .themes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|theme| theme.name.as_deref())
        .collect::<Vec<_>>()
        .join(", ");

    let location = raw
        .displayed_location
        .as_ref()
        .and_then(|loc| loc.location.clone())
        .unwrap_or_default();

    let prize_amount = raw
        .prize_amount
        .as_deref()
        .unwrap_or_default()
        .replace(PRIZE_MARKUP_OPEN, "")
        .replace(PRIZE_MARKUP_CLOSE, "");

    let thumbnail_url = match raw.thumbnail_url.as_deref() {
        Some(path) if !path.is_empty() => format!("https:{path}"),
        _ => String::new(),
    };

    let prizes = raw.prizes_counts.unwrap_or_default();

    FlatRecord {
        id: raw.id.unwrap_or_default(),
        title: raw.title.clone().unwrap_or_default(),
        url: raw.url.clone().unwrap_or_default(),
        organization_name: raw.organization_name.clone().unwrap_or_default(),
        location,
        open_state: raw.open_state.clone().unwrap_or_default(),
        submission_period_dates: raw.submission_period_dates.clone().unwrap_or_default(),
        time_left_to_submission: raw.time_left_to_submission.clone().unwrap_or_default(),
        prize_amount,
        cash_prizes_count: prizes.cash.unwrap_or_default(),
        other_prizes_count: prizes.other.unwrap_or_default(),
        registrations_count: raw.registrations_count.unwrap_or_default(),
        themes,
        featured: raw.featured.unwrap_or_default(),
        winners_announced: raw.winners_announced.unwrap_or_default(),
        invite_only: raw.invite_only.unwrap_or_default(),
        managed_by_devpost: raw.managed_by_devpost_badge.unwrap_or_default(),
        thumbnail_url,
        submission_gallery_url: raw.submission_gallery_url.clone().unwrap_or_default(),
    }
}
