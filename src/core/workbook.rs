use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use thiserror::Error;

/// Errors raised while turning uploaded bytes into a workbook grid
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to decode workbook: {0}")]
    Decode(#[from] calamine::Error),

    #[error("workbook contains no sheets")]
    NoSheets,
}

/// A single spreadsheet cell, decoupled from the decoder library so the
/// extraction heuristics can be tested on literal grids
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    pub fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The cell's string content, if it is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render any non-empty cell as trimmed display text
    ///
    /// Whole numbers drop their fractional part, matching how spreadsheet
    /// tools display them.
    pub fn display(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    fn from_data(data: &Data) -> Cell {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) => Cell::Empty,
        }
    }
}

/// One decoded sheet: name plus a dense 2D grid in absolute coordinates
/// (row 0 / column 0 are the spreadsheet's first row and column)
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn from_rows(name: &str, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }

    /// Cell at an absolute position; positions outside the grid are empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Index of the last row (0 for an empty sheet)
    pub fn end_row(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Index of the last column across all rows (0 for an empty sheet)
    pub fn end_col(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .saturating_sub(1)
    }
}

/// A fully decoded workbook, sheets in file order
#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}

/// Decode uploaded spreadsheet bytes into a workbook grid
///
/// Format detection is automatic (xlsx, xls, xlsb, ods). Sheets that fail
/// to decode individually are kept as empty grids so one bad sheet does
/// not sink the rest of the workbook.
pub fn decode_workbook(bytes: &[u8]) -> Result<Workbook, ExtractError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut reader = open_workbook_auto_from_rs(cursor)?;

    let names = reader.sheet_names().to_owned();
    if names.is_empty() {
        return Err(ExtractError::NoSheets);
    }

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let rows = match reader.worksheet_range(&name) {
            Ok(range) => grid_from_range(&range),
            Err(e) => {
                tracing::warn!("Skipping unreadable sheet '{}': {}", name, e);
                Vec::new()
            }
        };
        sheets.push(Sheet { name, rows });
    }

    Ok(Workbook { sheets })
}

fn grid_from_range(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(start_row as usize + range.height());
    for _ in 0..start_row {
        rows.push(Vec::new());
    }

    for row in range.rows() {
        let mut cells: Vec<Cell> = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(Cell::from_data));
        rows.push(cells);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_trims_text() {
        assert_eq!(Cell::text("  Jean Dupont  ").display().unwrap(), "Jean Dupont");
    }

    #[test]
    fn test_display_whole_numbers() {
        assert_eq!(Cell::Number(45123.0).display().unwrap(), "45123");
        assert_eq!(Cell::Number(7.33).display().unwrap(), "7.33");
    }

    #[test]
    fn test_empty_cell_has_no_display() {
        assert!(Cell::Empty.display().is_none());
        assert!(Cell::Empty.is_empty());
    }

    #[test]
    fn test_cell_lookup_out_of_bounds() {
        let sheet = Sheet::from_rows("Feuille1", vec![vec![Cell::text("a")]]);
        assert_eq!(*sheet.cell(0, 0), Cell::text("a"));
        assert!(sheet.cell(5, 5).is_empty());
    }

    #[test]
    fn test_end_row_and_col() {
        let sheet = Sheet::from_rows(
            "Feuille1",
            vec![
                vec![Cell::text("a"), Cell::text("b"), Cell::text("c")],
                vec![Cell::text("d")],
            ],
        );
        assert_eq!(sheet.end_row(), 1);
        assert_eq!(sheet.end_col(), 2);
    }
}
