//! Header extraction and column projection tests against real .xlsx bytes

use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use sheetsift::excel::{
    extract_headers, project, project_workbook, ExcelReader, OUTPUT_SHEET_NAME,
};
use sheetsift::types::{CellValue, FieldSelection, Sheet};
use sheetsift::SiftError;

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

/// Workbook whose first sheet holds the given text grid
fn text_workbook(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Header [Name, Amount, Date] with two typed data rows
fn sales_workbook() -> Vec<u8> {
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(0, 1, "Amount").unwrap();
    sheet.write_string(0, 2, "Date").unwrap();

    sheet.write_string(1, 0, "Alice").unwrap();
    sheet.write_number(1, 1, 10).unwrap();
    sheet.write_number_with_format(1, 2, 45292, &date).unwrap();

    sheet.write_string(2, 0, "Bob").unwrap();
    sheet.write_number(2, 1, 20).unwrap();
    sheet.write_number_with_format(2, 2, 45293, &date).unwrap();

    workbook.save_to_buffer().unwrap()
}

fn read_output(bytes: &[u8]) -> Sheet {
    ExcelReader::new(bytes)
        .read_first_sheet()
        .unwrap()
        .expect("filtered workbook has a sheet")
}

fn row_texts(sheet: &Sheet, row: usize, width: u32) -> Vec<String> {
    (1..=width).map(|c| sheet.rows[row].cell(c).text()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// HEADER EXTRACTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_extract_headers_sales() {
    assert_eq!(
        extract_headers(&sales_workbook()).unwrap(),
        vec!["Name", "Amount", "Date"]
    );
}

#[test]
fn test_extract_headers_is_repeatable() {
    let bytes = text_workbook(&[&["x", "", "z"], &["1", "2", "3"]]);
    let first = extract_headers(&bytes).unwrap();
    let second = extract_headers(&bytes).unwrap();
    assert_eq!(first, vec!["x", "", "z"]);
    assert_eq!(first, second);
}

#[test]
fn test_extract_headers_zero_rows() {
    let mut workbook = XlsxWorkbook::new();
    workbook.add_worksheet();
    let bytes = workbook.save_to_buffer().unwrap();

    assert!(extract_headers(&bytes).unwrap().is_empty());
}

#[test]
fn test_extract_headers_early_1900_dates() {
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_number_with_format(0, 0, 1, &date).unwrap();
    sheet.write_number_with_format(0, 1, 59, &date).unwrap();
    sheet.write_number_with_format(0, 2, 61, &date).unwrap();
    sheet.write_string(1, 0, "first").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    assert_eq!(
        extract_headers(&bytes).unwrap(),
        vec!["1900-01-01", "1900-02-28", "1900-03-01"]
    );

    let projection = project_workbook(&bytes, &FieldSelection::new(["1900-01-01"])).unwrap();
    assert_eq!(projection.column_count(), 1);
    assert_eq!(projection.targets[0].index, 1);
}

#[test]
fn test_extract_headers_corrupt_bytes() {
    let mut bytes = sales_workbook();
    bytes.truncate(bytes.len() / 3);

    let err = extract_headers(&bytes).unwrap_err();
    assert!(matches!(err, SiftError::Parse(_)), "got {:?}", err);
}

// ═══════════════════════════════════════════════════════════════════════════
// PROJECTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_project_sales_name_and_date() {
    let output = project(&sales_workbook(), &FieldSelection::new(["Name", "Date"])).unwrap();
    let sheet = read_output(&output);

    assert_eq!(sheet.name, OUTPUT_SHEET_NAME);
    assert_eq!(sheet.row_count(), 3);
    assert_eq!(row_texts(&sheet, 0, 2), vec!["Name", "Date"]);
    assert_eq!(row_texts(&sheet, 1, 2), vec!["Alice", "2024-01-01"]);
    assert_eq!(row_texts(&sheet, 2, 2), vec!["Bob", "2024-01-02"]);
    assert!(matches!(sheet.rows[1].cell(2), CellValue::Date(_)));
    assert_eq!(sheet.rows[1].cell(3), &CellValue::Empty);
}

#[test]
fn test_project_keeps_number_type() {
    let output = project(&sales_workbook(), &FieldSelection::new(["Amount"])).unwrap();
    let sheet = read_output(&output);

    assert_eq!(sheet.rows[1].cell(1), &CellValue::Number(10.0));
    assert_eq!(sheet.rows[2].cell(1), &CellValue::Number(20.0));
}

#[test]
fn test_project_uses_source_order() {
    let bytes = text_workbook(&[&["A", "B", "C"], &["a", "b", "c"]]);
    let output = project(&bytes, &FieldSelection::new(["C", "A"])).unwrap();
    let sheet = read_output(&output);

    assert_eq!(row_texts(&sheet, 0, 2), vec!["A", "C"]);
    assert_eq!(row_texts(&sheet, 1, 2), vec!["a", "c"]);
}

#[test]
fn test_project_duplicate_headers_both_kept() {
    let bytes = text_workbook(&[&["Name", "Name", "Amount"], &["first", "last", "5"]]);
    let projection = project_workbook(&bytes, &FieldSelection::new(["Name"])).unwrap();

    assert_eq!(projection.column_count(), 2);
    let sheet = read_output(&projection.to_bytes().unwrap());
    assert_eq!(row_texts(&sheet, 0, 2), vec!["Name", "Name"]);
    assert_eq!(row_texts(&sheet, 1, 2), vec!["first", "last"]);
}

#[test]
fn test_project_sparse_row() {
    let bytes = text_workbook(&[
        &["Name", "Amount", "Date"],
        &["Alice"],
        &["Bob", "", "2024-01-02"],
    ]);
    let projection = project_workbook(&bytes, &FieldSelection::new(["Name", "Date"])).unwrap();

    assert_eq!(projection.sheet.rows[1].cell(2), &CellValue::Empty);
    assert_eq!(
        projection.sheet.rows[2].cell(2),
        &CellValue::Text("2024-01-02".into())
    );
}

#[test]
fn test_project_row_and_column_counts() {
    let bytes = text_workbook(&[
        &["A", "B", "C", "D"],
        &["1", "2", "3", "4"],
        &["5"],
        &[],
        &["", "", "", "8"],
    ]);
    let source_rows = ExcelReader::new(&bytes)
        .read_first_sheet()
        .unwrap()
        .unwrap()
        .row_count();

    for selection in [
        FieldSelection::new(["A"]),
        FieldSelection::new(["D", "B"]),
        FieldSelection::new(["A", "B", "C", "D"]),
    ] {
        let projection = project_workbook(&bytes, &selection).unwrap();
        assert_eq!(projection.row_count(), source_rows);
        for row in &projection.sheet.rows {
            assert_eq!(row.cells.len(), projection.column_count());
        }
    }
}

#[test]
fn test_project_nonexistent_field_gives_empty_rows() {
    let bytes = text_workbook(&[&["Name"], &["Alice"]]);
    let projection =
        project_workbook(&bytes, &FieldSelection::new(["Nonexistent"])).unwrap();

    assert_eq!(projection.column_count(), 0);
    assert_eq!(projection.row_count(), 2);

    // Still a valid workbook with the expected sheet
    let sheet = read_output(&projection.to_bytes().unwrap());
    assert_eq!(sheet.name, OUTPUT_SHEET_NAME);
}

#[test]
fn test_project_only_first_sheet() {
    let mut workbook = XlsxWorkbook::new();
    let first = workbook.add_worksheet();
    first.write_string(0, 0, "Keep").unwrap();
    first.write_string(1, 0, "yes").unwrap();
    let second = workbook.add_worksheet();
    second.write_string(0, 0, "Keep").unwrap();
    second.write_string(1, 0, "no").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let output = project(&bytes, &FieldSelection::new(["Keep"])).unwrap();
    let sheet = read_output(&output);
    assert_eq!(row_texts(&sheet, 1, 1), vec!["yes"]);
}

#[test]
fn test_project_empty_sheet_is_validation_error() {
    let mut workbook = XlsxWorkbook::new();
    workbook.add_worksheet();
    let bytes = workbook.save_to_buffer().unwrap();

    let err = project(&bytes, &FieldSelection::new(["Name"])).unwrap_err();
    assert!(matches!(err, SiftError::Validation(_)), "got {:?}", err);
}

#[test]
fn test_project_garbage_is_parse_error() {
    let err = project(b"PK\x03\x04 not really", &FieldSelection::new(["Name"])).unwrap_err();
    assert!(matches!(err, SiftError::Parse(_)), "got {:?}", err);
}

#[test]
fn test_project_exact_match_only() {
    let bytes = text_workbook(&[&["Name ", "name", "Name"], &["a", "b", "c"]]);
    let projection = project_workbook(&bytes, &FieldSelection::new(["Name"])).unwrap();

    assert_eq!(projection.column_count(), 1);
    assert_eq!(projection.targets[0].index, 3);
}
