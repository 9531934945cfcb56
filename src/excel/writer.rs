//! Excel writer implementation - sheet model → .xlsx bytes

use crate::error::{SiftError, SiftResult};
use crate::types::{CellValue, Sheet};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const TIME_FORMAT: &str = "hh:mm:ss";
const DURATION_FORMAT: &str = "[h]:mm:ss";

/// Serialize a sheet as a single-worksheet workbook held in memory
pub fn write_workbook(sheet: &Sheet) -> SiftResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&sheet.name)
        .map_err(|e| SiftError::Export(format!("Failed to set worksheet name: {}", e)))?;

    write_sheet(worksheet, sheet)?;

    workbook
        .save_to_buffer()
        .map_err(|e| SiftError::Export(format!("Failed to save Excel workbook: {}", e)))
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> SiftResult<()> {
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);
    let time_format = Format::new().set_num_format(TIME_FORMAT);
    let duration_format = Format::new().set_num_format(DURATION_FORMAT);

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx)
            .map_err(|_| SiftError::Export(format!("Row {} is out of range", row_idx + 1)))?;

        for cell in &row.cells {
            let col = cell
                .column
                .checked_sub(1)
                .and_then(|c| u16::try_from(c).ok())
                .ok_or_else(|| {
                    SiftError::Export(format!("Column {} is out of range", cell.column))
                })?;

            match &cell.value {
                CellValue::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                CellValue::Date(serial) => {
                    let format = if (0.0..1.0).contains(serial) {
                        &time_format
                    } else if serial.fract() == 0.0 {
                        &date_format
                    } else {
                        &datetime_format
                    };
                    worksheet.write_number_with_format(row_num, col, *serial, format)?;
                }
                CellValue::Duration(days) => {
                    worksheet.write_number_with_format(row_num, col, *days, &duration_format)?;
                }
                CellValue::Empty => {}
            }
        }
    }

    Ok(())
}
