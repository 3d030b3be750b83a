//! Brings a remote worksheet in line with a derived schema.

use std::sync::Arc;

use emolabel_core::constants::{LEGACY_VIDEO_ID, LEGACY_VIDEO_NAME, MIN_WORKSHEET_ROWS, VIDEO_ID_COLUMN, min_columns_for};
use emolabel_sheets::{SheetsError, SpreadsheetApi, WorksheetInfo, WorksheetRef};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::worksheet::WorksheetHandle;

/// Outcome of the capacity step. Resizing is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CapacityStatus {
    AlreadySufficient,
    Resized { rows_added: u32, columns_added: u32 },
    ResizeDenied { reason: String },
}

/// Legacy header fixups applied during this sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub dropped_video_name: bool,
    pub renamed_video_id: bool,
    /// Set when migration stopped early; reconciliation still ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub spreadsheet_id: String,
    pub worksheet_name: String,
    pub created: bool,
    pub capacity: CapacityStatus,
    pub migration: MigrationReport,
    pub header_rewritten: bool,
}

/// Opens or creates the label worksheet and reconciles its header.
#[derive(Clone)]
pub struct SheetSynchronizer {
    api: Arc<dyn SpreadsheetApi>,
}

impl SheetSynchronizer {
    #[must_use]
    pub fn new(api: Arc<dyn SpreadsheetApi>) -> Self {
        Self { api }
    }

    /// Ensures the worksheet exists, has room, and carries `columns` as its header.
    ///
    /// Safe to call repeatedly: an already-correct sheet sees no writes.
    pub async fn ensure_worksheet(
        &self,
        spreadsheet_id: &str,
        worksheet_name: &str,
        columns: &[String],
    ) -> Result<(WorksheetHandle, SyncReport), ServiceError> {
        let min_columns = min_columns_for(columns.len());

        let (info, created) = match self.api.find_worksheet(spreadsheet_id, worksheet_name).await? {
            Some(info) => (info, false),
            None => {
                info!(spreadsheet_id, worksheet = worksheet_name, "Creating worksheet");
                let info = self
                    .api
                    .add_worksheet(spreadsheet_id, worksheet_name, MIN_WORKSHEET_ROWS, min_columns)
                    .await?;
                (info, true)
            },
        };
        let worksheet = info.worksheet.clone();

        let capacity = self.ensure_capacity(&info, MIN_WORKSHEET_ROWS, min_columns).await;

        let migration = match migrate_legacy_headers(self.api.as_ref(), &worksheet).await {
            Ok(report) => report,
            Err(e) => {
                warn!(worksheet = %worksheet.title, error = %e, "Legacy header migration failed");
                MigrationReport { failure: Some(e.to_string()), ..MigrationReport::default() }
            },
        };

        let header_rewritten = self.reconcile_header(&worksheet, columns).await?;

        let report = SyncReport {
            spreadsheet_id: spreadsheet_id.to_owned(),
            worksheet_name: worksheet_name.to_owned(),
            created,
            capacity,
            migration,
            header_rewritten,
        };
        info!(
            worksheet = %worksheet.title,
            created = report.created,
            header_rewritten = report.header_rewritten,
            "Worksheet synchronized"
        );
        Ok((WorksheetHandle::new(Arc::clone(&self.api), worksheet), report))
    }

    async fn ensure_capacity(&self, info: &WorksheetInfo, min_rows: u32, min_columns: u32) -> CapacityStatus {
        let rows_added = min_rows.saturating_sub(info.row_count);
        let columns_added = min_columns.saturating_sub(info.column_count);
        if rows_added == 0 && columns_added == 0 {
            return CapacityStatus::AlreadySufficient;
        }

        let ws = &info.worksheet;
        let result = async {
            if rows_added > 0 {
                self.api.add_rows(ws, rows_added).await?;
            }
            if columns_added > 0 {
                self.api.add_columns(ws, columns_added).await?;
            }
            Ok::<(), SheetsError>(())
        }
        .await;

        match result {
            Ok(()) => {
                debug!(worksheet = %ws.title, rows_added, columns_added, "Worksheet resized");
                CapacityStatus::Resized { rows_added, columns_added }
            },
            Err(e) => {
                warn!(worksheet = %ws.title, error = %e, "Worksheet resize denied, continuing");
                CapacityStatus::ResizeDenied { reason: e.to_string() }
            },
        }
    }

    /// Rewrites row 1 when it differs from `columns`.
    ///
    /// Cells past the end of `columns` are blanked so a shrinking schema
    /// settles after one rewrite.
    async fn reconcile_header(&self, ws: &WorksheetRef, columns: &[String]) -> Result<bool, ServiceError> {
        let current = self.api.read_row(ws, 1).await?;
        if current == columns {
            return Ok(false);
        }
        let mut header = columns.to_vec();
        if current.len() > header.len() {
            header.resize(current.len(), String::new());
        }
        debug!(worksheet = %ws.title, old = ?current, new = ?columns, "Rewriting header");
        self.api.write_row(ws, 1, &header).await?;
        Ok(true)
    }
}

/// Drops the `Video_Name` column and renames `Video ID` to `video_id`.
///
/// Matching is exact; a sheet without legacy headers sees no writes.
pub async fn migrate_legacy_headers(
    api: &dyn SpreadsheetApi,
    ws: &WorksheetRef,
) -> Result<MigrationReport, SheetsError> {
    let mut headers = api.read_row(ws, 1).await?;
    let mut report = MigrationReport::default();

    if let Some(idx) = headers.iter().position(|h| h == LEGACY_VIDEO_NAME) {
        api.delete_column(ws, column_number(idx)).await?;
        headers.remove(idx);
        report.dropped_video_name = true;
        info!(worksheet = %ws.title, column = idx, "Dropped legacy Video_Name column");
    }

    if let Some(idx) = headers.iter().position(|h| h == LEGACY_VIDEO_ID) {
        api.update_cell(ws, 1, column_number(idx), VIDEO_ID_COLUMN).await?;
        report.renamed_video_id = true;
        info!(worksheet = %ws.title, column = idx, "Renamed legacy Video ID header");
    }

    Ok(report)
}

fn column_number(idx: usize) -> u32 {
    u32::try_from(idx).map_or(u32::MAX, |i| i.saturating_add(1))
}
