//! Open destination workbooks, keyed by path

use crate::error::{XlcpError, XlcpResult};
use crate::sheet::{SheetRead, SheetWrite};
use crate::types::CellValue;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use umya_spreadsheet::{reader::xlsx, CellRawValue, Spreadsheet, Worksheet};

struct PooledBook {
    book: Spreadsheet,
    holders: usize,
}

/// Reference-counted set of workbooks loaded for editing.
///
/// Acquiring a path that is already open hands back the same in-memory
/// workbook, so every edit to one file lands in one place and is saved once.
#[derive(Default)]
pub struct WorkbookPool {
    books: HashMap<PathBuf, PooledBook>,
}

impl WorkbookPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Open `path` (or attach to it if already open) and take a hold on it.
    pub fn acquire(&mut self, path: &Path) -> XlcpResult<&mut Spreadsheet> {
        let pooled = match self.books.entry(Self::key(path)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                info!("opening {}", path.display());
                let book = xlsx::read(path).map_err(|e| XlcpError::workbook(path, e))?;
                entry.insert(PooledBook { book, holders: 0 })
            }
        };
        pooled.holders += 1;
        Ok(&mut pooled.book)
    }

    pub fn is_open(&self, path: &Path) -> bool {
        self.books.contains_key(&Self::key(path))
    }

    pub fn get(&self, path: &Path) -> Option<&Spreadsheet> {
        self.books.get(&Self::key(path)).map(|p| &p.book)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Spreadsheet> {
        self.books.get_mut(&Self::key(path)).map(|p| &mut p.book)
    }

    /// Write the in-memory workbook back to `path`.
    pub fn save(&self, path: &Path) -> XlcpResult<()> {
        let pooled = self
            .books
            .get(&Self::key(path))
            .ok_or_else(|| XlcpError::workbook(path, "workbook is not open"))?;
        umya_spreadsheet::writer::xlsx::write(&pooled.book, path)
            .map_err(|e| XlcpError::workbook(path, e))?;
        info!("saved {}", path.display());
        Ok(())
    }

    /// Drop one hold on `path`; the workbook is closed when the last hold goes.
    /// Returns `true` if it was closed.
    pub fn release(&mut self, path: &Path) -> bool {
        let key = Self::key(path);
        let closed = match self.books.get_mut(&key) {
            Some(pooled) => {
                pooled.holders = pooled.holders.saturating_sub(1);
                pooled.holders == 0
            }
            None => return false,
        };
        if closed {
            self.books.remove(&key);
            debug!("closed {}", path.display());
        }
        closed
    }

    /// Close everything still open without saving. Returns how many were closed.
    pub fn release_all(&mut self) -> usize {
        let count = self.books.len();
        self.books.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    book.get_sheet_collection()
        .iter()
        .map(|s| s.get_name().to_string())
        .collect()
}

/// Make sure `book` has a sheet called `name`. Returns `true` if it was created.
pub fn ensure_sheet(book: &mut Spreadsheet, name: &str) -> Result<bool, String> {
    if book.get_sheet_by_name(name).is_some() {
        return Ok(false);
    }
    book.new_sheet(name).map_err(|e| e.to_string())?;
    Ok(true)
}

// umya addresses cells as 1-based (column, row)
impl SheetRead for Worksheet {
    fn value(&self, row: u32, column: u32) -> CellValue {
        let cell = match self.get_cell((column + 1, row + 1)) {
            Some(cell) => cell,
            None => return CellValue::Empty,
        };
        match cell.get_cell_value().get_raw_value() {
            CellRawValue::Empty => CellValue::Empty,
            CellRawValue::Numeric(n) => CellValue::Number(*n),
            CellRawValue::Bool(b) => CellValue::Bool(*b),
            _ => {
                let text = cell.get_value();
                if text.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(text.to_string())
                }
            }
        }
    }

    fn extent(&self) -> Option<(u32, u32)> {
        let (column, row) = self.get_highest_column_and_row();
        if column == 0 || row == 0 {
            None
        } else {
            Some((row - 1, column - 1))
        }
    }
}

impl SheetWrite for Worksheet {
    fn write_value(&mut self, row: u32, column: u32, value: &CellValue) {
        let cell = self.get_cell_mut((column + 1, row + 1));
        match value {
            CellValue::Empty => {
                cell.set_blank();
            }
            CellValue::Number(n) => {
                cell.set_value_number(*n);
            }
            CellValue::Text(s) => {
                cell.set_value_string(s.clone());
            }
            CellValue::Bool(b) => {
                cell.set_value_bool(*b);
            }
        }
    }
}
