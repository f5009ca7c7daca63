use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::FillError;
use crate::extract::build_record;
use crate::model::Record;

/// Parse an xls/xlsx workbook into records.
///
/// The first sheet is the data sheet and its first row carries the
/// column headers. Fully empty rows are skipped.
pub fn parse_sheet(bytes: &[u8]) -> Result<Vec<Record>, FillError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| FillError::Spreadsheet(format!("failed to open workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| FillError::Spreadsheet("workbook has no sheets".into()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| FillError::Spreadsheet(format!("failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let map: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(row.iter().map(cell_text))
            .collect();
        if map.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push(build_record(&map)?);
    }
    Ok(records)
}

/// Render a cell to the display string the form sees.
///
/// Whole-number floats drop the trailing `.0` so a numeric quantity
/// column reads `30`, not `30.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => format!("{other}"),
    }
}
