//! Wire types for the Sheets v4 REST API.

use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub(crate) struct SpreadsheetMeta {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
pub(crate) struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SheetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub grid_properties: GridProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GridProperties {
    #[serde(default)]
    pub row_count: u32,
    #[serde(default)]
    pub column_count: u32,
}

#[derive(Serialize)]
pub(crate) struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum Request {
    AddSheet { properties: SheetProperties },
    #[serde(rename_all = "camelCase")]
    AppendDimension { sheet_id: i64, dimension: Dimension, length: u32 },
    DeleteDimension { range: DimensionRange },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DimensionRange {
    pub sheet_id: i64,
    pub dimension: Dimension,
    pub start_index: u32,
    pub end_index: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum Dimension {
    Rows,
    Columns,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Reply {
    #[serde(default)]
    pub add_sheet: Option<AddSheetReply>,
}

#[derive(Deserialize)]
pub(crate) struct AddSheetReply {
    pub properties: SheetProperties,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

/// Renders a cell value from a values response as a string.
pub(crate) fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let body = BatchUpdateRequest {
            requests: vec![
                Request::AppendDimension { sheet_id: 7, dimension: Dimension::Rows, length: 10 },
                Request::DeleteDimension {
                    range: DimensionRange {
                        sheet_id: 7,
                        dimension: Dimension::Columns,
                        start_index: 0,
                        end_index: 1,
                    },
                },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"requests": [
                {"appendDimension": {"sheetId": 7, "dimension": "ROWS", "length": 10}},
                {"deleteDimension": {"range": {
                    "sheetId": 7, "dimension": "COLUMNS", "startIndex": 0, "endIndex": 1
                }}}
            ]})
        );
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&serde_json::json!("a")), "a");
        assert_eq!(cell_text(&serde_json::json!(3)), "3");
        assert_eq!(cell_text(&serde_json::Value::Null), "");
    }
}
