//! Row building: form values aligned to schema columns.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::constants::TIMESTAMP_COLUMN;

/// Builds a row stamped with the current UTC time.
#[must_use]
pub fn build_row(columns: &[String], values: &HashMap<String, String>) -> Vec<String> {
    build_row_at(columns, values, Utc::now())
}

/// Builds a row aligned 1:1 with `columns`.
///
/// `timestamp_utc` always receives `now` (RFC 3339, `+00:00` offset) and
/// ignores any supplied value; other missing keys become empty strings.
#[must_use]
pub fn build_row_at(
    columns: &[String],
    values: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let stamp = format_timestamp(now);
    columns
        .iter()
        .map(|column| {
            if column == TIMESTAMP_COLUMN {
                stamp.clone()
            } else {
                values.get(column).cloned().unwrap_or_default()
            }
        })
        .collect()
}

#[must_use]
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}
