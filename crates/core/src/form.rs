//! Label form values keyed by schema column.

use std::collections::HashMap;

use crate::constants::{LABEL_CONFIDENCE_COLUMN, NOTES_COLUMN, UNCERTAIN_MARKER, VIDEO_ID_COLUMN};
use crate::row::build_row;
use crate::{CoreError, Result, Schema};

/// Values entered for one clip.
///
/// Only columns of the schema are accepted; columns never set are written
/// as empty strings.
#[derive(Debug, Clone)]
pub struct LabelForm {
    columns: Vec<String>,
    values: HashMap<String, String>,
}

impl LabelForm {
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        Self { columns: schema.columns.clone(), values: HashMap::new() }
    }

    /// Sets `column` to `value`.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownColumn`] if the schema has no such column.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(CoreError::UnknownColumn(column.to_owned()));
        }
        self.values.insert(column.to_owned(), value.into());
        Ok(())
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    #[must_use]
    pub fn video_id(&self) -> &str {
        self.get(VIDEO_ID_COLUMN).map_or("", str::trim)
    }

    /// Records the uncertain flag.
    ///
    /// Goes to `label_confidence` when the schema has it, otherwise it is
    /// appended to `notes`; schemas with neither drop the flag.
    pub fn mark_uncertain(&mut self) {
        let has = |name: &str| self.columns.iter().any(|c| c == name);
        if has(LABEL_CONFIDENCE_COLUMN) {
            self.values.insert(LABEL_CONFIDENCE_COLUMN.to_owned(), UNCERTAIN_MARKER.to_owned());
        } else if has(NOTES_COLUMN) {
            let notes = self.values.entry(NOTES_COLUMN.to_owned()).or_default();
            if notes.is_empty() {
                notes.push_str(UNCERTAIN_MARKER);
            } else {
                notes.push_str("; ");
                notes.push_str(UNCERTAIN_MARKER);
            }
        } else {
            tracing::debug!("schema has no confidence or notes column, uncertain flag dropped");
        }
    }

    /// # Errors
    /// Returns [`CoreError::Validation`] when `video_id` is blank.
    pub fn validate(&self) -> Result<()> {
        if self.video_id().is_empty() {
            return Err(CoreError::Validation("video_id must be set before submitting".to_owned()));
        }
        Ok(())
    }

    /// Validates and builds the row to append.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] when `video_id` is blank.
    pub fn to_row(&self) -> Result<Vec<String>> {
        self.validate()?;
        Ok(build_row(&self.columns, &self.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Table, derive_schema};

    fn schema(header: &[&str]) -> Schema {
        derive_schema(None, Some(&Table::from_rows([header.to_vec()])))
    }

    #[test]
    fn test_unknown_column_rejected() {
        let mut form = LabelForm::new(&schema(&["Video ID", "Emotion"]));
        let err = form.set("Mood", "happy").unwrap_err();
        assert!(matches!(err, CoreError::UnknownColumn(ref c) if c == "Mood"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_video_id_fails_validation() {
        let mut form = LabelForm::new(&schema(&["Video ID", "Emotion"]));
        form.set("Emotion", "Happy").unwrap();
        assert!(matches!(form.to_row(), Err(CoreError::Validation(_))));
        form.set("video_id", "   ").unwrap();
        assert!(form.validate().is_err());
        form.set("video_id", "clip_7").unwrap();
        assert_eq!(form.to_row().unwrap(), vec!["clip_7", "Happy"]);
    }

    #[test]
    fn test_uncertain_prefers_confidence_column() {
        let mut form = LabelForm::new(&schema(&["Video ID", "label_confidence", "notes"]));
        form.set("notes", "dark").unwrap();
        form.mark_uncertain();
        assert_eq!(form.get("label_confidence"), Some("uncertain"));
        assert_eq!(form.get("notes"), Some("dark"));
    }

    #[test]
    fn test_uncertain_appends_to_notes() {
        let mut form = LabelForm::new(&schema(&["Video ID", "notes"]));
        form.mark_uncertain();
        assert_eq!(form.get("notes"), Some("uncertain"));

        let mut form = LabelForm::new(&schema(&["Video ID", "notes"]));
        form.set("notes", "dark").unwrap();
        form.mark_uncertain();
        assert_eq!(form.get("notes"), Some("dark; uncertain"));
    }

    #[test]
    fn test_uncertain_dropped_without_target_column() {
        let mut form = LabelForm::new(&schema(&["Video ID", "Emotion"]));
        form.mark_uncertain();
        assert_eq!(form.get("notes"), None);
        assert_eq!(form.get("label_confidence"), None);
    }
}
