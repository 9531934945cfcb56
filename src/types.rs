use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

//==============================================================================
// Cell Values
//==============================================================================

/// Typed cell value as read from (or written to) a worksheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date (whole part = day, fraction = time of day; below 1 = time only)
    Date(f64),
    /// Elapsed time in days, from `[h]:mm:ss` style cells
    Duration(f64),
    #[default]
    Empty,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Textual rendering of the cell, used for header matching
    pub fn text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Date(serial) => format_serial_date(*serial),
            CellValue::Duration(days) => format_duration(*days),
            CellValue::Empty => String::new(),
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "Text",
            CellValue::Number(_) => "Number",
            CellValue::Bool(_) => "Boolean",
            CellValue::Date(_) => "Date",
            CellValue::Duration(_) => "Duration",
            CellValue::Empty => "Empty",
        }
    }
}

/// Integral values print without a trailing ".0"
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Serial 60 is Excel's 1900-02-29, a day the calendar never had
const PHANTOM_LEAP_DAY: f64 = 60.0;

/// Convert an Excel serial number (1900 date system) to chrono.
///
/// Serial 1 is 1900-01-01. Excel treats 1900 as a leap year, so serials below 60
/// count from 1899-12-31 and later ones from 1899-12-30. Returns None for negative
/// or non-finite serials and for the phantom 1900-02-29.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial.floor() == PHANTOM_LEAP_DAY {
        return None;
    }
    let epoch = if serial < PHANTOM_LEAP_DAY {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let millis = (serial * 86_400_000.0).round();
    if millis > i64::MAX as f64 {
        return None;
    }
    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(TimeDelta::milliseconds(millis as i64))
}

/// Time of day held in the fractional part of a serial
fn time_of_day(serial: f64) -> Option<NaiveTime> {
    let secs = (serial.fract() * 86_400.0).round() as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs.min(86_399), 0)
}

fn format_serial_date(serial: f64) -> String {
    if (0.0..1.0).contains(&serial) {
        return match time_of_day(serial) {
            Some(t) => t.format("%H:%M:%S").to_string(),
            None => format_number(serial),
        };
    }
    if serial.floor() == PHANTOM_LEAP_DAY {
        return match time_of_day(serial) {
            Some(t) if serial.fract() != 0.0 => format!("1900-02-29 {}", t.format("%H:%M:%S")),
            _ => "1900-02-29".to_string(),
        };
    }
    match serial_to_datetime(serial) {
        Some(dt) if serial.fract() == 0.0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_number(serial),
    }
}

/// Elapsed hours are not wrapped at 24, matching Excel's `[h]:mm:ss`
fn format_duration(days: f64) -> String {
    if !days.is_finite() {
        return format_number(days);
    }
    let total = (days.abs() * 86_400.0).round() as u64;
    let sign = if days < 0.0 && total > 0 { "-" } else { "" };
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

//==============================================================================
// Sheet Model
//==============================================================================

/// A populated cell; `column` is 1-based
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: u32,
    pub value: CellValue,
}

impl Cell {
    pub fn new(column: u32, value: CellValue) -> Self {
        Self { column, value }
    }
}

/// Sparse row: only populated cells are stored, ordered by column
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dense row from a value list, columns numbered from 1 (empty values are dropped)
    pub fn from_values(values: Vec<CellValue>) -> Self {
        let cells = values
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_empty())
            .map(|(idx, v)| Cell::new(idx as u32 + 1, v))
            .collect();
        Self { cells }
    }

    /// Append a cell; callers push in ascending column order
    pub fn push(&mut self, column: u32, value: CellValue) {
        self.cells.push(Cell::new(column, value));
    }

    /// Value at a 1-based column, `Empty` when the row has no cell there
    pub fn cell(&self, column: u32) -> &CellValue {
        self.cells
            .binary_search_by_key(&column, |c| c.column)
            .map(|idx| &self.cells[idx].value)
            .unwrap_or(&EMPTY_CELL)
    }

    /// Highest populated column (0 for an empty row)
    pub fn last_column(&self) -> u32 {
        self.cells.last().map(|c| c.column).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A named grid of rows; `rows[0]` is sheet row 1
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row 1, if it carries at least one populated cell
    pub fn header_row(&self) -> Option<&Row> {
        self.rows.first().filter(|row| !row.is_empty())
    }
}

/// Ordered sheets of a workbook
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

//==============================================================================
// Field Selection & Target Map
//==============================================================================

/// Caller-requested header names; an ordered set (first occurrence wins)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSelection {
    fields: Vec<String>,
}

impl FieldSelection {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::default();
        for field in fields {
            let field = field.into();
            if !selection.fields.contains(&field) {
                selection.fields.push(field);
            }
        }
        selection
    }

    /// Parse the JSON-encoded array sent in the `fields` form part
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let fields: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::new(fields))
    }

    /// Exact string comparison, no trimming or case folding
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// No name with visible content; such a selection can never match a header
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

/// A selected header and the 1-based source column it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetColumn {
    pub name: String,
    pub index: u32,
}

/// Selected columns in source order; repeated names are kept
pub type TargetMap = Vec<TargetColumn>;
