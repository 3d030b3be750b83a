//! Spreadsheet operations the synchronizer depends on.
//!
//! [`crate::SheetsClient`] implements this against Google Sheets; tests use
//! in-memory fakes.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SheetsError;

/// One worksheet tab inside one spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorksheetRef {
    pub spreadsheet_id: String,
    pub sheet_id: i64,
    pub title: String,
}

/// A worksheet and its current grid size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorksheetInfo {
    pub worksheet: WorksheetRef,
    pub row_count: u32,
    pub column_count: u32,
}

/// How the service interprets written values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInputOption {
    /// Stored exactly as given.
    Raw,
    /// Parsed as if typed into the UI; numeric-looking strings become numbers.
    UserEntered,
}

impl ValueInputOption {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

/// Remote spreadsheet operations, one network round trip each.
///
/// Row and column numbers are 1-based, matching A1 notation.
#[async_trait]
pub trait SpreadsheetApi: Send + Sync {
    /// Looks up a worksheet by exact title.
    async fn find_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
    ) -> Result<Option<WorksheetInfo>, SheetsError>;

    /// Creates a worksheet with the given grid size.
    async fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> Result<WorksheetInfo, SheetsError>;

    /// Appends empty rows at the bottom of the grid.
    async fn add_rows(&self, worksheet: &WorksheetRef, count: u32) -> Result<(), SheetsError>;

    /// Appends empty columns at the right of the grid.
    async fn add_columns(&self, worksheet: &WorksheetRef, count: u32) -> Result<(), SheetsError>;

    /// Deletes a whole column, shifting later columns left.
    async fn delete_column(&self, worksheet: &WorksheetRef, column: u32) -> Result<(), SheetsError>;

    /// Reads one row; trailing empty cells are omitted.
    async fn read_row(&self, worksheet: &WorksheetRef, row: u32) -> Result<Vec<String>, SheetsError>;

    /// Overwrites a single cell.
    async fn update_cell(
        &self,
        worksheet: &WorksheetRef,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), SheetsError>;

    /// Overwrites `values` into `row`, starting at column A.
    async fn write_row(
        &self,
        worksheet: &WorksheetRef,
        row: u32,
        values: &[String],
    ) -> Result<(), SheetsError>;

    /// Appends one row after the last non-empty row.
    async fn append_row(
        &self,
        worksheet: &WorksheetRef,
        values: &[String],
        input: ValueInputOption,
    ) -> Result<(), SheetsError>;

    /// Reads every non-empty row of the worksheet.
    async fn read_all_values(&self, worksheet: &WorksheetRef) -> Result<Vec<Vec<String>>, SheetsError>;
}

/// Converts a 1-based column number to its A1 letters (`1` → `A`, `27` → `AA`).
#[must_use]
pub fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Quotes a worksheet title for A1 notation, doubling embedded quotes.
#[must_use]
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(column_letters(0), "");
    }

    #[test]
    fn test_quote_title() {
        assert_eq!(quote_title("labels_log"), "'labels_log'");
        assert_eq!(quote_title("rater's tab"), "'rater''s tab'");
    }
}
