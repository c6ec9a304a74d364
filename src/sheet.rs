//! Sheet access and range resolution
//!
//! [`SheetRead`] / [`SheetWrite`] are the per-sheet surface a workbook backend
//! has to offer. On top of them this module implements the spreadsheet "End"
//! scans used to auto-extend open ranges, and block reads and writes.

use crate::address::RangeSpec;
use crate::types::{CellValue, Matrix};
use std::fmt;
use tracing::debug;

/// Last zero-based row of a worksheet (row 1,048,576)
pub const MAX_ROW: u32 = 1_048_575;
/// Last zero-based column of a worksheet (column XFD)
pub const MAX_COLUMN: u32 = 16_383;

/// Read access to one worksheet, zero-based coordinates.
pub trait SheetRead {
    fn value(&self, row: u32, column: u32) -> CellValue;

    /// Bottom-right corner of the region that may hold data, `None` if the sheet is empty.
    fn extent(&self) -> Option<(u32, u32)>;

    fn is_filled(&self, row: u32, column: u32) -> bool {
        !self.value(row, column).is_empty()
    }
}

/// Write access to one worksheet, zero-based coordinates.
pub trait SheetWrite: SheetRead {
    fn write_value(&mut self, row: u32, column: u32, value: &CellValue);
}

//==============================================================================
// End scans
//==============================================================================

/// Row reached by pressing End+Down at (`row`, `column`).
///
/// Inside a run of filled cells this is the last cell of the run. From an empty
/// cell, or from the last cell of a run, it is the next filled cell below, or
/// the bottom of the sheet when there is none.
pub fn end_down<S: SheetRead + ?Sized>(sheet: &S, row: u32, column: u32) -> u32 {
    if row >= MAX_ROW {
        return MAX_ROW;
    }
    if sheet.is_filled(row, column) && sheet.is_filled(row + 1, column) {
        let mut r = row + 1;
        while r < MAX_ROW && sheet.is_filled(r + 1, column) {
            r += 1;
        }
        return r;
    }
    let last = match sheet.extent() {
        Some((last_row, _)) => last_row,
        None => return MAX_ROW,
    };
    (row + 1..=last)
        .find(|&r| sheet.is_filled(r, column))
        .unwrap_or(MAX_ROW)
}

/// Column reached by pressing End+Right at (`row`, `column`).
pub fn end_right<S: SheetRead + ?Sized>(sheet: &S, row: u32, column: u32) -> u32 {
    if column >= MAX_COLUMN {
        return MAX_COLUMN;
    }
    if sheet.is_filled(row, column) && sheet.is_filled(row, column + 1) {
        let mut c = column + 1;
        while c < MAX_COLUMN && sheet.is_filled(row, c + 1) {
            c += 1;
        }
        return c;
    }
    let last = match sheet.extent() {
        Some((_, last_column)) => last_column,
        None => return MAX_COLUMN,
    };
    (column + 1..=last)
        .find(|&c| sheet.is_filled(row, c))
        .unwrap_or(MAX_COLUMN)
}

//==============================================================================
// Resolved ranges
//==============================================================================

/// A concrete rectangle on a sheet. Always at least 1 x 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub top: u32,
    pub left: u32,
    rows: u32,
    columns: u32,
}

impl ResolvedRange {
    pub fn new(top: u32, left: u32, rows: u32, columns: u32) -> Self {
        Self {
            top,
            left,
            rows: rows.max(1),
            columns: columns.max(1),
        }
    }

    /// Rectangle spanning two corners given in any order
    pub fn from_corners(a: (u32, u32), b: (u32, u32)) -> Self {
        let top = a.0.min(b.0);
        let left = a.1.min(b.1);
        Self::new(top, left, a.0.abs_diff(b.0) + 1, a.1.abs_diff(b.1) + 1)
    }

    /// (rows, columns)
    pub fn shape(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    pub fn bottom(&self) -> u32 {
        self.top + (self.rows - 1)
    }

    pub fn right(&self) -> u32 {
        self.left + (self.columns - 1)
    }
}

impl fmt::Display for ResolvedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::address::CellAddress;
        write!(
            f,
            "{}:{}",
            CellAddress::new(self.top, self.left),
            CellAddress::new(self.bottom(), self.right())
        )
    }
}

/// Bind `spec` to `sheet`, filling open end axes by auto-extension.
///
/// An open end row is found with End+Down from the anchor; an open end column
/// with End+Right from the (resolved) bottom-left cell.
pub fn resolve<S: SheetRead + ?Sized>(spec: &RangeSpec, sheet: &S) -> ResolvedRange {
    let top = spec.start_row;
    let left = spec.start_column;

    let bottom = match spec.end_row {
        Some(row) => row,
        None => end_down(sheet, top, left),
    };
    let right = match spec.end_column {
        Some(column) => column,
        None => end_right(sheet, bottom, left),
    };

    let range = ResolvedRange::from_corners((top, left), (bottom, right));
    debug!("resolved {} to {}", spec, range);
    range
}

//==============================================================================
// Block transfer
//==============================================================================

/// Read the values of `range` into a matrix.
///
/// When auto-extension ran off to the sheet edge the block is cut back to the
/// sheet's data extent, since everything past it is empty.
pub fn read_block<S: SheetRead + ?Sized>(sheet: &S, range: &ResolvedRange) -> Matrix {
    let (mut rows, mut columns) = range.shape();
    if range.bottom() == MAX_ROW || range.right() == MAX_COLUMN {
        let (last_row, last_column) = sheet.extent().unwrap_or((0, 0));
        if range.bottom() == MAX_ROW {
            rows = (last_row + 1).saturating_sub(range.top).min(rows);
        }
        if range.right() == MAX_COLUMN {
            columns = (last_column + 1).saturating_sub(range.left).min(columns);
        }
    }

    let mut matrix = Matrix::new(rows as usize, columns as usize);
    for r in 0..rows {
        for c in 0..columns {
            matrix.set(
                r as usize,
                c as usize,
                sheet.value(range.top + r, range.left + c),
            );
        }
    }
    matrix
}

/// Write `matrix` into `range`, cropped to whichever of the two is smaller.
///
/// Returns the shape actually written.
pub fn write_block<S: SheetWrite + ?Sized>(
    sheet: &mut S,
    range: &ResolvedRange,
    matrix: &Matrix,
) -> (usize, usize) {
    let (rows, columns) = range.shape();
    let block = matrix.crop(rows as usize, columns as usize);
    for (r, row) in block.rows().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_value(range.top + r as u32, range.left + c as u32, value);
        }
    }
    block.shape()
}
