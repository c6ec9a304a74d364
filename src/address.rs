//! Cell and range notation
//!
//! Converts human-written references such as `B3`, `C`, `5` and `B3:G` into
//! zero-based coordinates. Either half of a cell reference may be left out to
//! mean "auto" on that axis; the missing bound is resolved later against a live
//! sheet (see [`crate::sheet::resolve`]).

use crate::error::{XlcpError, XlcpResult};
use crate::sheet::{MAX_COLUMN, MAX_ROW};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Number of letters in the column alphabet
const RADIX: u32 = 26;

/// A (row, column) pair; `None` means "unbounded / auto-detect" on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellAddress {
    pub row: Option<u32>,
    pub column: Option<u32>,
}

impl CellAddress {
    pub fn new(row: u32, column: u32) -> Self {
        Self {
            row: Some(row),
            column: Some(column),
        }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(column) = self.column {
            write!(f, "{}", encode_column(column))?;
        }
        if let Some(row) = self.row {
            write!(f, "{}", row + 1)?;
        }
        Ok(())
    }
}

/// Decode a column name using bijective base-26 (A=0, Z=25, AA=26, ...).
///
/// Case-insensitive. Fails on empty input, non-letters, or overflow.
pub fn decode_column(letters: &str) -> XlcpResult<u32> {
    if letters.is_empty() {
        return Err(XlcpError::InvalidCell(letters.to_string()));
    }
    let mut value: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(XlcpError::InvalidCell(letters.to_string()));
        }
        let digit = u32::from(ch.to_ascii_lowercase() as u8 - b'a') + 1;
        value = value
            .checked_mul(RADIX)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| XlcpError::InvalidCell(letters.to_string()))?;
    }
    Ok(value - 1)
}

/// Encode a zero-based column index as letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn encode_column(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(index) + 1;
    while n > 0 {
        let rem = ((n - 1) % u64::from(RADIX)) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / u64::from(RADIX);
    }
    letters.iter().rev().collect()
}

/// Parse a single cell reference.
///
/// The leading letter run is the column, the trailing digit run is the 1-based
/// row. An empty run leaves that axis as `None` ("auto"); anything else that
/// does not fit `<letters><digits>` is an error.
pub fn parse_cell(text: &str) -> XlcpResult<CellAddress> {
    static CELL_PATTERN: OnceLock<Regex> = OnceLock::new();
    let cell_pattern = match CELL_PATTERN.get() {
        Some(pattern) => pattern,
        None => {
            let pattern = Regex::new(r"^([A-Za-z]*)([0-9]*)$")
                .map_err(|e| XlcpError::InvalidCell(format!("Regex error: {}", e)))?;
            CELL_PATTERN.get_or_init(|| pattern)
        }
    };

    let text = text.trim();
    let caps = cell_pattern
        .captures(text)
        .ok_or_else(|| XlcpError::InvalidCell(text.to_string()))?;

    let letters = caps.get(1).map_or("", |m| m.as_str());
    let digits = caps.get(2).map_or("", |m| m.as_str());

    let column = if letters.is_empty() {
        None
    } else {
        let column = decode_column(letters)?;
        if column > MAX_COLUMN {
            return Err(XlcpError::InvalidCell(text.to_string()));
        }
        Some(column)
    };

    let row = if digits.is_empty() {
        None
    } else {
        let number: u32 = digits
            .parse()
            .map_err(|_| XlcpError::InvalidCell(text.to_string()))?;
        if number == 0 || number - 1 > MAX_ROW {
            return Err(XlcpError::InvalidCell(text.to_string()));
        }
        Some(number - 1)
    };

    Ok(CellAddress { row, column })
}

/// A parsed `<start>:<end>` range whose end may still be open.
///
/// The start corner is fixed at parse time (a missing start axis means 0).
/// A `None` end axis is resolved by auto-extension against a live sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSpec {
    pub start_row: u32,
    pub start_column: u32,
    pub end_row: Option<u32>,
    pub end_column: Option<u32>,
}

impl RangeSpec {
    /// Parse `"<cell>:<cell>"`. The separator is mandatory even when the end is
    /// fully automatic, so `"A1:"` is valid but `"A1"` is not.
    pub fn parse(text: &str) -> XlcpResult<Self> {
        let trimmed = text.trim();
        let (start, end) = trimmed
            .split_once(':')
            .ok_or_else(|| XlcpError::InvalidRange(trimmed.to_string()))?;
        if end.contains(':') {
            return Err(XlcpError::InvalidRange(trimmed.to_string()));
        }

        let start = parse_cell(start).map_err(|_| XlcpError::InvalidRange(trimmed.to_string()))?;
        let end = parse_cell(end).map_err(|_| XlcpError::InvalidRange(trimmed.to_string()))?;

        Ok(Self {
            start_row: start.row.unwrap_or(0),
            start_column: start.column.unwrap_or(0),
            end_row: end.row,
            end_column: end.column,
        })
    }

    pub fn start(&self) -> CellAddress {
        CellAddress::new(self.start_row, self.start_column)
    }

    pub fn end(&self) -> CellAddress {
        CellAddress {
            row: self.end_row,
            column: self.end_column,
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start(), self.end())
    }
}
