//! Workbook loading with header-row recovery.
//!
//! Exports sometimes carry a title block above the real header, which leaves
//! the first row blank and every header synthetic. When that happens the
//! sheet is re-read with each header offset until the duration column shows
//! up; if none works, the first parse is returned as-is.

use anyhow::{Context, Result, bail};
use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::column::{ColumnResolution, resolve_duration_column};
use crate::types::{Cell, Dataset};

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Sheet tried first; falls back to the first sheet when absent.
    pub preferred_sheet: String,
    /// Highest header row probed during recovery (inclusive).
    pub max_header_offset: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            preferred_sheet: "detalle".to_string(),
            max_header_offset: 9,
        }
    }
}

/// A sheet after header recovery, with the duration column already resolved.
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub dataset: Dataset,
    pub header_row: usize,
    pub duration: ColumnResolution,
}

/// An open workbook.
pub struct SheetSource {
    path: PathBuf,
    workbook: Xlsx<BufReader<File>>,
}

impl SheetSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let workbook: Xlsx<_> = open_workbook(&path)
            .with_context(|| format!("opening workbook {}", path.display()))?;
        Ok(Self { path, workbook })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// The preferred sheet when present, else the first sheet.
    pub fn pick_sheet(&self, options: &LoaderOptions) -> Result<String> {
        let names = self.sheet_names();
        if names.iter().any(|n| n == &options.preferred_sheet) {
            return Ok(options.preferred_sheet.clone());
        }
        match names.into_iter().next() {
            Some(first) => Ok(first),
            None => bail!("{} contains no sheets", self.path.display()),
        }
    }

    /// First sheet not named like the preferred one.
    pub fn first_other_sheet(&self, options: &LoaderOptions) -> Option<String> {
        self.sheet_names()
            .into_iter()
            .find(|n| n != &options.preferred_sheet)
    }

    pub fn load_preferred(&mut self, options: &LoaderOptions) -> Result<LoadedSheet> {
        let name = self.pick_sheet(options)?;
        self.load_sheet(&name, options)
    }

    /// Load a named sheet, recovering the header row when needed.
    pub fn load_sheet(&mut self, name: &str, options: &LoaderOptions) -> Result<LoadedSheet> {
        let range = self
            .workbook
            .worksheet_range(name)
            .with_context(|| format!("reading sheet '{}' of {}", name, self.path.display()))?;
        let grid = range_to_grid(&range);
        Ok(recover_header(name, &grid, options.max_header_offset))
    }
}

/// Header row 0 first; other offsets only when row 0 gave nothing but
/// synthetic names.
pub fn recover_header(name: &str, grid: &[Vec<Cell>], max_offset: usize) -> LoadedSheet {
    let first = Dataset::from_grid(name, grid, 0);

    if first.has_only_synthetic_headers() {
        for offset in (0..=max_offset).take_while(|o| *o < grid.len()) {
            let candidate = Dataset::from_grid(name, grid, offset);
            let duration = resolve_duration_column(&candidate);
            if duration.is_found() {
                tracing::debug!(sheet = name, offset, "recovered header row");
                return LoadedSheet {
                    dataset: candidate,
                    header_row: offset,
                    duration,
                };
            }
        }
        tracing::debug!(sheet = name, "no header offset exposes a duration column");
    }

    let duration = resolve_duration_column(&first);
    LoadedSheet {
        dataset: first,
        header_row: 0,
        duration,
    }
}

/// Absolute cell grid: rows and columns before the used range stay blank so
/// that header offsets count from the top of the sheet.
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(to_cell));
        grid.push(cells);
    }
    grid
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(format!("{e:?}")),
    }
}
