use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Prefix given to header cells that are blank.
pub const SYNTHETIC_HEADER_PREFIX: &str = "Unnamed:";

/// One spreadsheet value, decoupled from the workbook reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel serial date.
    DateTime(f64),
    Error(String),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion; anything that is not a number is missing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) if f.is_finite() => Some(*f),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Raw value as shown in the sample block; missing values print `nan`.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => "nan".to_string(),
            Cell::Text(s) if s.trim().is_empty() => "nan".to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(serial) => serial.to_string(),
            Cell::Error(e) => format!("#ERR:{e}"),
        }
    }
}

/// A parsed sheet: header names plus data rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset from an absolute cell grid, using `header_row` as the
    /// header line. Rows above it are discarded, blank data rows dropped.
    pub fn from_grid(sheet: &str, grid: &[Vec<Cell>], header_row: usize) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let header_cells = grid.get(header_row).map(Vec::as_slice).unwrap_or(&[]);

        let raw: Vec<String> = (0..width)
            .map(|i| match header_cells.get(i) {
                Some(cell) if !cell.is_empty() => cell.display(),
                _ => format!("{SYNTHETIC_HEADER_PREFIX} {i}"),
            })
            .collect();

        let rows = grid
            .iter()
            .skip(header_row + 1)
            .filter(|row| !row.iter().all(Cell::is_empty))
            .cloned()
            .collect();

        Self {
            sheet: sheet.to_string(),
            headers: dedupe_headers(raw),
            rows,
        }
    }

    /// True when no header came from the sheet itself (including no headers).
    pub fn has_only_synthetic_headers(&self) -> bool {
        self.headers
            .iter()
            .all(|h| h.starts_with(SYNTHETIC_HEADER_PREFIX))
    }

    /// Index of the header equal to `name` after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cells of one column, short rows padded with empty cells.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&EMPTY))
    }
}

/// Repeated names get `.1`, `.2`, ... appended in order of appearance.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
