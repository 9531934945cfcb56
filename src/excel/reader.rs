//! Excel reader implementation - Excel (.xlsx) bytes → sheet model

use crate::error::{SiftError, SiftResult};
use crate::types::{CellValue, Row, Sheet, Workbook};
use calamine::{Data, Range, Reader, Xlsx};
use std::io::Cursor;

/// Reads uploaded workbook bytes. Only the first worksheet is ever loaded.
pub struct ExcelReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ExcelReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn open(&self) -> SiftResult<Xlsx<Cursor<&'a [u8]>>> {
        Xlsx::new(Cursor::new(self.bytes))
            .map_err(|e| SiftError::Parse(format!("Failed to read workbook: {}", e)))
    }

    /// Load the first worksheet, or None when the workbook has no sheets
    pub fn read_first_sheet(&self) -> SiftResult<Option<Sheet>> {
        let mut workbook = self.open()?;

        let Some(name) = workbook.sheet_names().first().cloned() else {
            return Ok(None);
        };

        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| SiftError::Parse(format!("Failed to read sheet '{}': {}", name, e)))?;

        Ok(Some(range_to_sheet(&name, &range)))
    }

    /// Load the workbook model (first sheet only; the rest are ignored)
    pub fn read(&self) -> SiftResult<Workbook> {
        let sheets = self.read_first_sheet()?.into_iter().collect();
        Ok(Workbook { sheets })
    }

    /// Header names from row 1 of the first sheet
    pub fn headers(&self) -> SiftResult<Vec<String>> {
        let sheet = self
            .read_first_sheet()?
            .ok_or_else(|| SiftError::Parse("Workbook contains no worksheet".to_string()))?;

        Ok(sheet.rows.first().map(header_names).unwrap_or_default())
    }
}

/// Header names of the first sheet of `bytes`.
///
/// Gaps in the header row come back as empty strings so that position `i`
/// always corresponds to column `i + 1`. A sheet without rows yields an
/// empty list.
pub fn extract_headers(bytes: &[u8]) -> SiftResult<Vec<String>> {
    ExcelReader::new(bytes).headers()
}

/// Dense list of cell texts from column 1 to the last populated column
pub fn header_names(row: &Row) -> Vec<String> {
    (1..=row.last_column())
        .map(|column| row.cell(column).text())
        .collect()
}

/// Materialise a calamine range using absolute sheet coordinates.
///
/// calamine trims the range to the used area, so leading blank rows and
/// columns are re-added here; row 1 of the model is always sheet row 1.
fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);

    let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
    else {
        return sheet;
    };

    for row_idx in 0..=end_row {
        let mut row = Row::new();
        if row_idx >= start_row {
            for col_idx in start_col..=end_col {
                if let Some(data) = range.get_value((row_idx, col_idx)) {
                    let value = convert_cell(data);
                    if !value.is_empty() {
                        row.push(col_idx + 1, value);
                    }
                }
            }
        }
        sheet.add_row(row);
    }

    sheet
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Duration(dt.as_f64()),
        Data::DateTime(dt) => CellValue::Date(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
