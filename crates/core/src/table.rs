//! In-memory grid read from the first sheet of a template workbook.

use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};

use crate::{CoreError, Result};

/// Rectangular-ish grid of trimmed cell strings.
///
/// Positions are absolute: column index 1 is always spreadsheet column B,
/// even when column A is empty throughout. Missing and empty cells read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.as_ref().trim().to_owned()).collect())
            .collect();
        Self { rows }
    }

    /// Reads the first sheet of an `.xlsx` workbook.
    ///
    /// # Errors
    /// Returns [`CoreError::Template`] if the file cannot be opened or has no sheets.
    pub fn read_first_sheet(path: &Path) -> Result<Self> {
        let template_err = |message: String| CoreError::Template {
            path: path.display().to_string(),
            message,
        };
        let mut workbook: Xlsx<_> =
            open_workbook(path).map_err(|e: calamine::XlsxError| template_err(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| template_err("workbook has no sheets".to_owned()))?
            .map_err(|e| template_err(e.to_string()))?;
        let table = Self::from_range(&range);
        tracing::debug!(path = %path.display(), rows = table.len(), width = table.width(), "read template sheet");
        Ok(table)
    }

    /// Like [`Table::read_first_sheet`], but a missing file yields `None`.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed.
    pub fn read_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "template not found, skipping");
            return Ok(None);
        }
        Self::read_first_sheet(path).map(Some)
    }

    fn from_range(range: &Range<Data>) -> Self {
        let offset = range.start().map_or(0, |(_, col)| col as usize);
        let rows = range
            .rows()
            .map(|row| {
                std::iter::repeat_n(String::new(), offset)
                    .chain(row.iter().map(cell_to_string))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row, counting leading empty columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows.get(row).and_then(|r| r.get(col)).map_or("", String::as_str)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Coerces a cell to a trimmed string.
///
/// Whole-number floats drop the fractional part so `3.0` reads as `"3"`.
#[must_use]
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_owned(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_owned(),
    }
}

fn format_float(f: f64) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT {
        #[allow(clippy::cast_possible_truncation, reason = "bounded by MAX_EXACT")]
        let whole = f as i64;
        whole.to_string()
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_trims_cells() {
        let table = Table::from_rows([vec![" a ", "b"], vec!["c"]]);
        assert_eq!(table.cell(0, 0), "a");
        assert_eq!(table.cell(1, 0), "c");
        assert_eq!(table.cell(1, 1), "");
        assert_eq!(table.cell(5, 5), "");
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn test_cell_to_string_coercion() {
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(-4)), "-4");
        assert_eq!(cell_to_string(&Data::String("  happy ".into())), "happy");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_read_first_sheet_keeps_absolute_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Features.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "Emotion").unwrap();
        sheet.write_string(0, 2, "Happy").unwrap();
        sheet.write_number(1, 2, 7.0).unwrap();
        workbook.save(&path).unwrap();

        let table = Table::read_first_sheet(&path).unwrap();
        assert_eq!(table.cell(0, 0), "");
        assert_eq!(table.cell(0, 1), "Emotion");
        assert_eq!(table.cell(0, 2), "Happy");
        assert_eq!(table.cell(1, 2), "7");
    }

    #[test]
    fn test_read_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::read_optional(&dir.path().join("nope.xlsx")).unwrap();
        assert!(table.is_none());
    }

    #[test]
    fn test_read_first_sheet_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();
        let err = Table::read_first_sheet(&path).unwrap_err();
        assert!(matches!(err, CoreError::Template { .. }));
    }
}
