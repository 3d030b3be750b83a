use std::sync::Arc;

use emolabel_sheets::{SpreadsheetApi, ValueInputOption, WorksheetRef};

use crate::error::ServiceError;

/// A synchronized worksheet, ready for appends.
#[derive(Clone)]
pub struct WorksheetHandle {
    api: Arc<dyn SpreadsheetApi>,
    worksheet: WorksheetRef,
}

impl std::fmt::Debug for WorksheetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorksheetHandle").field("worksheet", &self.worksheet).finish_non_exhaustive()
    }
}

impl WorksheetHandle {
    #[must_use]
    pub const fn new(api: Arc<dyn SpreadsheetApi>, worksheet: WorksheetRef) -> Self {
        Self { api, worksheet }
    }

    #[must_use]
    pub fn spreadsheet_id(&self) -> &str {
        &self.worksheet.spreadsheet_id
    }

    #[must_use]
    pub fn worksheet_name(&self) -> &str {
        &self.worksheet.title
    }

    #[must_use]
    pub const fn worksheet(&self) -> &WorksheetRef {
        &self.worksheet
    }

    /// Appends one row, letting the service interpret value types.
    ///
    /// Single attempt; the error is returned as-is and nothing is retried.
    pub async fn append(&self, row: &[String]) -> Result<(), ServiceError> {
        self.api.append_row(&self.worksheet, row, ValueInputOption::UserEntered).await?;
        Ok(())
    }

    /// Number of data rows below the header.
    pub async fn saved_rows(&self) -> Result<usize, ServiceError> {
        let rows = self.api.read_all_values(&self.worksheet).await?;
        Ok(rows.len().saturating_sub(1))
    }
}
