//! Label-form schema derived from the two template workbooks.
//!
//! The example-labels table decides which columns exist and seeds fallback
//! choices from observed values; the features table then replaces the choice
//! list of every field it describes.

mod example;
mod features;

pub use example::{ExampleColumns, normalize_example_table};
pub use features::parse_features_table;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COLUMNS, VIDEO_ID_COLUMN};
use crate::table::Table;

/// Ordered columns plus allowed values per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<String>,
    pub choices: IndexMap<String, Vec<String>>,
}

impl Schema {
    /// Allowed values for `column`; empty when the column is free-form or unknown.
    #[must_use]
    pub fn choices_for(&self, column: &str) -> &[String] {
        self.choices.get(column).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Moves `video_id` to the front, inserting it when missing.
    fn put_video_id_first(&mut self) {
        self.columns.retain(|c| c != VIDEO_ID_COLUMN);
        self.columns.insert(0, VIDEO_ID_COLUMN.to_owned());
    }

    fn fill_missing_choices(&mut self) {
        for column in &self.columns {
            self.choices.entry(column.clone()).or_default();
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        let mut schema = Self {
            columns: DEFAULT_COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
            choices: IndexMap::new(),
        };
        schema.fill_missing_choices();
        schema
    }
}

/// Builds the form schema from the optional features and example tables.
///
/// Features-table choice lists overwrite example-derived ones for the same field.
#[must_use]
pub fn derive_schema(features: Option<&Table>, example: Option<&Table>) -> Schema {
    let mut schema = match example {
        Some(table) => {
            let ExampleColumns { columns, fallback_choices } = normalize_example_table(table);
            Schema { columns, choices: fallback_choices }
        },
        None => Schema::default(),
    };
    schema.put_video_id_first();

    if let Some(table) = features {
        for (field, values) in parse_features_table(table) {
            schema.choices.insert(field, values);
        }
    }

    schema.fill_missing_choices();
    tracing::debug!(
        columns = schema.columns.len(),
        choice_lists = schema.choices.len(),
        "derived label schema"
    );
    schema
}
