//! CSV export of flattened records
//!
//! The output file is the run's only data artifact: a header row matching
//! the [`FlatRecord`](crate::types::FlatRecord) field set, then one row per
//! record in the order the fetcher produced them.

use crate::error::Result;
use crate::types::FlatRecord;
use std::path::Path;

/// Write records to a CSV file, returning the number of rows written
///
/// The header row is derived from the `FlatRecord` field names via serde, so
/// it always matches the fixed output schema. An empty record slice still
/// produces a file with just the header.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a row fails to
/// serialize.
pub fn write_csv(path: &Path, records: &[FlatRecord]) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(FlatRecord::FIELD_NAMES)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    tracing::info!(rows = records.len(), path = %path.display(), "CSV written");
    Ok(records.len())
}
