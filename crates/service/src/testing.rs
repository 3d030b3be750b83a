//! In-memory [`SpreadsheetApi`] for tests of this crate and its callers.

use std::sync::Mutex;

use async_trait::async_trait;
use emolabel_sheets::{SheetsError, SpreadsheetApi, ValueInputOption, WorksheetInfo, WorksheetRef};

#[derive(Debug)]
struct FakeSheet {
    info: WorksheetInfo,
    grid: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
struct State {
    sheets: Vec<FakeSheet>,
    calls: Vec<String>,
    next_sheet_id: i64,
    deny_resize: bool,
    deny_delete: bool,
    fail_lookup: bool,
    fail_append: bool,
    fail_read_all: bool,
}

#[derive(Debug, Default)]
pub struct FakeSpreadsheet {
    state: Mutex<State>,
}

fn denied() -> SheetsError {
    SheetsError::HttpStatus { code: 403, body: "PERMISSION_DENIED".to_owned() }
}

fn trim_trailing(row: &[String]) -> Vec<String> {
    let end = row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
    row[..end].to_vec()
}

fn idx(n: u32) -> usize {
    usize::try_from(n).unwrap() - 1
}

impl FakeSpreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_sheet(&self, title: &str, rows: u32, columns: u32, grid: Vec<Vec<String>>) {
        let mut state = self.state.lock().unwrap();
        let sheet_id = state.next_sheet_id;
        state.next_sheet_id += 1;
        state.sheets.push(FakeSheet {
            info: WorksheetInfo {
                worksheet: WorksheetRef {
                    spreadsheet_id: "sheet1".to_owned(),
                    sheet_id,
                    title: title.to_owned(),
                },
                row_count: rows,
                column_count: columns,
            },
            grid,
        });
    }

    pub fn deny_resize(&self) {
        self.state.lock().unwrap().deny_resize = true;
    }

    pub fn deny_delete(&self) {
        self.state.lock().unwrap().deny_delete = true;
    }

    pub fn fail_lookup(&self) {
        self.state.lock().unwrap().fail_lookup = true;
    }

    pub fn fail_append(&self) {
        self.state.lock().unwrap().fail_append = true;
    }

    pub fn fail_read_all(&self) {
        self.state.lock().unwrap().fail_read_all = true;
    }

    /// Number of recorded calls whose name starts with `op`.
    pub fn count(&self, op: &str) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| c.starts_with(op)).count()
    }

    /// Every mutating call, in order.
    pub fn writes(&self) -> Vec<String> {
        let reads = ["find_worksheet", "read_row", "read_all_values"];
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| !reads.iter().any(|r| c.starts_with(r)))
            .cloned()
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn size(&self, title: &str) -> Option<(u32, u32)> {
        let state = self.state.lock().unwrap();
        state
            .sheets
            .iter()
            .find(|s| s.info.worksheet.title == title)
            .map(|s| (s.info.row_count, s.info.column_count))
    }

    pub fn rows(&self, title: &str) -> Vec<Vec<String>> {
        let state = self.state.lock().unwrap();
        state
            .sheets
            .iter()
            .find(|s| s.info.worksheet.title == title)
            .map(|s| s.grid.iter().map(|r| trim_trailing(r)).collect())
            .unwrap_or_default()
    }

    pub fn header(&self, title: &str) -> Vec<String> {
        self.rows(title).into_iter().next().unwrap_or_default()
    }

    fn with_sheet<T>(
        &self,
        call: String,
        ws: &WorksheetRef,
        f: impl FnOnce(&mut State, usize) -> Result<T, SheetsError>,
    ) -> Result<T, SheetsError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        let pos = state
            .sheets
            .iter()
            .position(|s| s.info.worksheet.sheet_id == ws.sheet_id)
            .ok_or_else(|| SheetsError::WorksheetNotFound(ws.title.clone()))?;
        f(&mut state, pos)
    }
}

fn set_cell(grid: &mut Vec<Vec<String>>, row: usize, col: usize, value: &str) {
    if grid.len() <= row {
        grid.resize(row + 1, Vec::new());
    }
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize(col + 1, String::new());
    }
    cells[col] = value.to_owned();
}

#[async_trait]
impl SpreadsheetApi for FakeSpreadsheet {
    async fn find_worksheet(
        &self,
        _spreadsheet_id: &str,
        title: &str,
    ) -> Result<Option<WorksheetInfo>, SheetsError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("find_worksheet:{title}"));
        if state.fail_lookup {
            return Err(denied());
        }
        Ok(state.sheets.iter().find(|s| s.info.worksheet.title == title).map(|s| s.info.clone()))
    }

    async fn add_worksheet(
        &self,
        _spreadsheet_id: &str,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> Result<WorksheetInfo, SheetsError> {
        self.insert_sheet(title, rows, columns, Vec::new());
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("add_worksheet:{title}:{rows}x{columns}"));
        let sheet = state.sheets.last().map(|s| s.info.clone());
        sheet.ok_or_else(|| SheetsError::WorksheetNotFound(title.to_owned()))
    }

    async fn add_rows(&self, ws: &WorksheetRef, count: u32) -> Result<(), SheetsError> {
        self.with_sheet(format!("add_rows:{count}"), ws, |state, pos| {
            if state.deny_resize {
                return Err(denied());
            }
            state.sheets[pos].info.row_count += count;
            Ok(())
        })
    }

    async fn add_columns(&self, ws: &WorksheetRef, count: u32) -> Result<(), SheetsError> {
        self.with_sheet(format!("add_columns:{count}"), ws, |state, pos| {
            if state.deny_resize {
                return Err(denied());
            }
            state.sheets[pos].info.column_count += count;
            Ok(())
        })
    }

    async fn delete_column(&self, ws: &WorksheetRef, column: u32) -> Result<(), SheetsError> {
        self.with_sheet(format!("delete_column:{column}"), ws, |state, pos| {
            if state.deny_delete {
                return Err(denied());
            }
            let sheet = &mut state.sheets[pos];
            for row in &mut sheet.grid {
                if row.len() > idx(column) {
                    row.remove(idx(column));
                }
            }
            sheet.info.column_count -= 1;
            Ok(())
        })
    }

    async fn read_row(&self, ws: &WorksheetRef, row: u32) -> Result<Vec<String>, SheetsError> {
        self.with_sheet(format!("read_row:{row}"), ws, |state, pos| {
            Ok(state.sheets[pos].grid.get(idx(row)).map(|r| trim_trailing(r)).unwrap_or_default())
        })
    }

    async fn update_cell(
        &self,
        ws: &WorksheetRef,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), SheetsError> {
        self.with_sheet(format!("update_cell:{row}:{column}"), ws, |state, pos| {
            set_cell(&mut state.sheets[pos].grid, idx(row), idx(column), value);
            Ok(())
        })
    }

    async fn write_row(&self, ws: &WorksheetRef, row: u32, values: &[String]) -> Result<(), SheetsError> {
        self.with_sheet(format!("write_row:{row}"), ws, |state, pos| {
            for (col, value) in values.iter().enumerate() {
                set_cell(&mut state.sheets[pos].grid, idx(row), col, value);
            }
            Ok(())
        })
    }

    async fn append_row(
        &self,
        ws: &WorksheetRef,
        values: &[String],
        input: ValueInputOption,
    ) -> Result<(), SheetsError> {
        self.with_sheet(format!("append_row:{}", input.as_str()), ws, |state, pos| {
            if state.fail_append {
                return Err(SheetsError::HttpStatus { code: 503, body: "unavailable".to_owned() });
            }
            let grid = &mut state.sheets[pos].grid;
            while grid.last().is_some_and(|r| trim_trailing(r).is_empty()) {
                grid.pop();
            }
            grid.push(values.to_vec());
            Ok(())
        })
    }

    async fn read_all_values(&self, ws: &WorksheetRef) -> Result<Vec<Vec<String>>, SheetsError> {
        self.with_sheet("read_all_values".to_owned(), ws, |state, pos| {
            if state.fail_read_all {
                return Err(SheetsError::HttpStatus { code: 503, body: "unavailable".to_owned() });
            }
            let mut rows: Vec<Vec<String>> = state.sheets[pos].grid.iter().map(|r| trim_trailing(r)).collect();
            while rows.last().is_some_and(Vec::is_empty) {
                rows.pop();
            }
            Ok(rows)
        })
    }
}
