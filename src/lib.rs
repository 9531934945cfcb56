//! Sheetsift - keep only the spreadsheet columns you pick
//!
//! Reads the first sheet of an .xlsx workbook, matches the requested field
//! names against its header row and writes a new single-sheet workbook with
//! just those columns. Rows keep their order; columns keep their source order.
//!
//! # Example
//!
//! ```no_run
//! use sheetsift::excel::{extract_headers, project};
//! use sheetsift::types::FieldSelection;
//!
//! let bytes = std::fs::read("sales.xlsx")?;
//! println!("Headers: {:?}", extract_headers(&bytes)?);
//!
//! let filtered = project(&bytes, &FieldSelection::new(["Name", "Date"]))?;
//! std::fs::write("filtered_sales.xlsx", filtered)?;
//! # Ok::<(), sheetsift::error::SiftError>(())
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, SiftError, SiftResult};
pub use types::{Cell, CellValue, FieldSelection, Row, Sheet, TargetColumn, TargetMap, Workbook};
