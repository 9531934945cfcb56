//! Excel column filtering
//!
//! - Read: .xlsx bytes → first-sheet model (calamine)
//! - Project: keep the selected header columns, all rows, source order
//! - Write: projected sheet → .xlsx bytes (rust_xlsxwriter)

mod projector;
mod reader;
mod writer;

pub use projector::{
    build_target_map, project, project_row, project_sheet, project_workbook, Projection,
    OUTPUT_SHEET_NAME,
};
pub use reader::{extract_headers, header_names, ExcelReader};
pub use writer::write_workbook;
