//! Column projection - keep the selected header columns of the first sheet

use crate::error::{SiftError, SiftResult};
use crate::excel::reader::ExcelReader;
use crate::excel::writer::write_workbook;
use crate::types::{FieldSelection, Row, Sheet, TargetColumn, TargetMap};

/// Name of the single worksheet in every filtered workbook
pub const OUTPUT_SHEET_NAME: &str = "Filtered Data";

/// Result of projecting a sheet: the matched columns and the new sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub targets: TargetMap,
    pub sheet: Sheet,
}

impl Projection {
    pub fn column_count(&self) -> usize {
        self.targets.len()
    }

    pub fn row_count(&self) -> usize {
        self.sheet.row_count()
    }

    /// Serialize the projected sheet as an .xlsx workbook
    pub fn to_bytes(&self) -> SiftResult<Vec<u8>> {
        write_workbook(&self.sheet)
    }
}

/// Scan the header row left to right, keeping every cell whose text is selected.
///
/// Output order is source column order, never selection order. A header
/// name that appears twice is matched twice.
pub fn build_target_map(header: &Row, selection: &FieldSelection) -> TargetMap {
    header
        .cells
        .iter()
        .filter_map(|cell| {
            let name = cell.value.text();
            selection.contains(&name).then_some(TargetColumn {
                name,
                index: cell.column,
            })
        })
        .collect()
}

/// Pick the target columns out of a single row.
///
/// The result is dense: one cell per target, `Empty` where the source row
/// is too short or has a gap.
pub fn project_row(row: &Row, targets: &TargetMap) -> Row {
    let mut projected = Row::new();
    for (position, target) in targets.iter().enumerate() {
        projected.push(position as u32 + 1, row.cell(target.index).clone());
    }
    projected
}

/// Project every row of `sheet` (header row included) through the selection
pub fn project_sheet(sheet: &Sheet, selection: &FieldSelection) -> SiftResult<Projection> {
    let header = sheet
        .header_row()
        .ok_or_else(|| SiftError::Validation("Worksheet has no header row".to_string()))?;

    let targets = build_target_map(header, selection);

    let mut output = Sheet::new(OUTPUT_SHEET_NAME);
    for row in &sheet.rows {
        output.add_row(project_row(row, &targets));
    }

    Ok(Projection {
        targets,
        sheet: output,
    })
}

/// Read `bytes`, project the first sheet, but do not serialize yet
pub fn project_workbook(bytes: &[u8], selection: &FieldSelection) -> SiftResult<Projection> {
    let sheet = ExcelReader::new(bytes)
        .read_first_sheet()?
        .ok_or_else(|| SiftError::Validation("Workbook contains no worksheet".to_string()))?;

    project_sheet(&sheet, selection)
}

/// Filter a workbook down to the selected columns and return the new .xlsx bytes.
///
/// An empty selection is not rejected here; it yields zero-column rows.
pub fn project(bytes: &[u8], selection: &FieldSelection) -> SiftResult<Vec<u8>> {
    project_workbook(bytes, selection)?.to_bytes()
}
