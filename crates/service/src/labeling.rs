//! Label submission against a synchronized worksheet.

use std::sync::Arc;

use emolabel_core::{LabelForm, LabelSession};
use emolabel_sheets::SpreadsheetApi;
use tracing::{info, warn};

use crate::error::ServiceError;
use crate::sync::{SheetSynchronizer, SyncReport};
use crate::worksheet::WorksheetHandle;

/// Appends validated label rows to one worksheet.
#[derive(Debug, Clone)]
pub struct LabelService {
    handle: WorksheetHandle,
}

impl LabelService {
    #[must_use]
    pub const fn new(handle: WorksheetHandle) -> Self {
        Self { handle }
    }

    /// Synchronizes the session's worksheet against its schema and binds to it.
    pub async fn connect(
        api: Arc<dyn SpreadsheetApi>,
        session: &LabelSession,
    ) -> Result<(Self, SyncReport), ServiceError> {
        let (handle, report) = SheetSynchronizer::new(api)
            .ensure_worksheet(
                &session.settings.spreadsheet_id,
                &session.settings.worksheet_name,
                &session.schema.columns,
            )
            .await?;
        Ok((Self::new(handle), report))
    }

    #[must_use]
    pub const fn handle(&self) -> &WorksheetHandle {
        &self.handle
    }

    /// Validates `form` and appends its row. Returns the row as written.
    ///
    /// A blank `video_id` is rejected before any remote call.
    pub async fn submit(&self, form: &LabelForm) -> Result<Vec<String>, ServiceError> {
        let row = form.to_row()?;
        if let Err(e) = self.handle.append(&row).await {
            warn!(video_id = form.video_id(), error = %e, "Label not saved");
            return Err(e);
        }
        info!(video_id = form.video_id(), worksheet = self.handle.worksheet_name(), "Label saved");
        Ok(row)
    }

    /// Submits `form` and moves the session to the next clip on success.
    pub async fn submit_and_advance(
        &self,
        session: &mut LabelSession,
        form: &LabelForm,
    ) -> Result<Vec<String>, ServiceError> {
        let row = self.submit(form).await?;
        session.advance();
        Ok(row)
    }

    pub async fn saved_rows(&self) -> Result<usize, ServiceError> {
        self.handle.saved_rows().await
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use emolabel_core::{Clip, CredentialSource, Schema, Settings, Table, derive_schema};

    use super::*;
    use crate::testing::FakeSpreadsheet;

    fn session(header: &[&str], clips: &[&str]) -> LabelSession {
        let settings = Settings {
            spreadsheet_id: "sheet1".to_owned(),
            worksheet_name: "labels_log".to_owned(),
            credentials: CredentialSource::File("service_account.json".into()),
        };
        let schema: Schema = derive_schema(None, Some(&Table::from_rows([header.to_vec()])));
        let clips = clips.iter().map(|c| Clip::from_path(Path::new(c))).collect();
        LabelSession::new(settings, schema, clips)
    }

    async fn connected(fake: &Arc<FakeSpreadsheet>, session: &LabelSession) -> LabelService {
        let api: Arc<dyn SpreadsheetApi> = fake.clone();
        LabelService::connect(api, session).await.unwrap().0
    }

    #[tokio::test]
    async fn test_empty_video_id_makes_no_append() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let session = session(&["Video ID", "Emotion"], &["a.mp4"]);
        let service = connected(&fake, &session).await;

        let mut form = LabelForm::new(&session.schema);
        form.set("Emotion", "Happy").unwrap();
        let err = service.submit(&form).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(fake.count("append_row"), 0);
    }

    #[tokio::test]
    async fn test_submit_appends_aligned_row() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let session = session(&["Video ID", "timestamp_utc", "Emotion", "notes"], &["a.mp4"]);
        let service = connected(&fake, &session).await;

        let mut form = LabelForm::new(&session.schema);
        form.set("video_id", "a").unwrap();
        form.set("timestamp_utc", "yesterday").unwrap();
        form.set("Emotion", "Calm").unwrap();
        let row = service.submit(&form).await.unwrap();

        assert_eq!(row[0], "a");
        assert!(row[1].ends_with("+00:00"));
        assert_eq!(&row[2..], ["Calm", ""]);
        assert_eq!(fake.calls().last().map(String::as_str), Some("append_row:USER_ENTERED"));
        assert_eq!(fake.rows("labels_log")[1], row[..3].to_vec());
        assert_eq!(service.saved_rows().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_saved_rows_on_fresh_sheet() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let session = session(&["Video ID"], &[]);
        let service = connected(&fake, &session).await;

        assert_eq!(service.saved_rows().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_advances_until_last_clip() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let mut session = session(&["Video ID"], &["a.mp4", "b.mp4"]);
        let service = connected(&fake, &session).await;

        let mut form = LabelForm::new(&session.schema);
        form.set("video_id", "a").unwrap();
        service.submit_and_advance(&mut session, &form).await.unwrap();
        assert_eq!(session.position(), (1, 2));

        service.submit_and_advance(&mut session, &form).await.unwrap();
        assert_eq!(session.position(), (1, 2));
        assert_eq!(service.saved_rows().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_append_keeps_position() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let mut session = session(&["Video ID"], &["a.mp4", "b.mp4"]);
        let service = connected(&fake, &session).await;
        fake.fail_append();

        let mut form = LabelForm::new(&session.schema);
        form.set("video_id", "a").unwrap();
        let err = service.submit_and_advance(&mut session, &form).await.unwrap_err();

        assert!(matches!(err, ServiceError::Sheets(_)));
        assert_eq!(session.position(), (0, 2));
        assert_eq!(fake.count("append_row"), 1);
        assert_eq!(service.saved_rows().await.unwrap(), 0);
    }
}
