//! Shared constants for emolabel.
//!
//! Column names and sheet defaults used across crates.

/// Identifier column; always first in a derived schema.
pub const VIDEO_ID_COLUMN: &str = "video_id";

/// Column filled with the submit time, never with form input.
pub const TIMESTAMP_COLUMN: &str = "timestamp_utc";

/// Free-text column that receives the uncertain marker when no confidence column exists.
pub const NOTES_COLUMN: &str = "notes";

/// Preferred destination for the uncertain marker.
pub const LABEL_CONFIDENCE_COLUMN: &str = "label_confidence";

/// Value written when an annotator flags a label as uncertain.
pub const UNCERTAIN_MARKER: &str = "uncertain";

/// Legacy header dropped from remote sheets.
pub const LEGACY_VIDEO_NAME: &str = "Video_Name";

/// Legacy header renamed to [`VIDEO_ID_COLUMN`] on remote sheets.
pub const LEGACY_VIDEO_ID: &str = "Video ID";

/// Columns used when no example table is available.
pub const DEFAULT_COLUMNS: [&str; 4] = [VIDEO_ID_COLUMN, TIMESTAMP_COLUMN, "rater_id", NOTES_COLUMN];

/// Minimum row capacity guaranteed on the worksheet.
pub const MIN_WORKSHEET_ROWS: u32 = 1000;

/// Minimum column capacity guaranteed on the worksheet (A..Z).
pub const MIN_WORKSHEET_COLUMNS: u32 = 26;

/// Worksheet tab used when none is configured.
pub const DEFAULT_WORKSHEET_NAME: &str = "labels_log";

/// Service-account key file looked up when no path is configured.
pub const DEFAULT_CREDENTIALS_PATH: &str = "service_account.json";

/// Hosted secrets file looked up when `EMOLABEL_SECRETS` is unset.
pub const DEFAULT_SECRETS_PATH: &str = "secrets.toml";

/// Default features template.
pub const DEFAULT_FEATURES_PATH: &str = "Features.xlsx";

/// Default example-labels template.
pub const DEFAULT_EXAMPLE_PATH: &str = "Example_of_Video_Labelling.xlsx";

/// HTTP timeout for Sheets and token requests, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Minimum capacity in columns for a given schema width.
#[must_use]
pub fn min_columns_for(column_count: usize) -> u32 {
    u32::try_from(column_count).unwrap_or(u32::MAX).max(MIN_WORKSHEET_COLUMNS)
}
