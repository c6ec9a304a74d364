//! Header placement relative to a data block
//!
//! A header position is written as `"(axis1,axis2)"` or `"(axis1)"` with axis
//! tokens from `top`, `bottom`, `left`, `right`. The first token picks the side
//! of the block the label sits on; the optional second token aligns it along
//! the other axis.

use crate::error::{XlcpError, XlcpResult};
use crate::sheet::{ResolvedRange, MAX_COLUMN, MAX_ROW};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Top,
    Bottom,
    Left,
    Right,
}

impl Axis {
    fn is_vertical(self) -> bool {
        matches!(self, Axis::Top | Axis::Bottom)
    }

    fn name(self) -> &'static str {
        match self {
            Axis::Top => "top",
            Axis::Bottom => "bottom",
            Axis::Left => "left",
            Axis::Right => "right",
        }
    }
}

impl FromStr for Axis {
    type Err = XlcpError;

    fn from_str(s: &str) -> XlcpResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Axis::Top),
            "bottom" => Ok(Axis::Bottom),
            "left" => Ok(Axis::Left),
            "right" => Ok(Axis::Right),
            other => Err(XlcpError::InvalidPosition(format!(
                "unknown axis '{}' (expected top, bottom, left or right)",
                other
            ))),
        }
    }
}

/// Where a header label goes relative to the block it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPosition {
    pub primary: Axis,
    pub secondary: Option<Axis>,
}

impl Default for HeaderPosition {
    fn default() -> Self {
        Self {
            primary: Axis::Top,
            secondary: Some(Axis::Left),
        }
    }
}

impl HeaderPosition {
    /// Parse `"(top,left)"`, `"[right, bottom]"`, `"left"` and so on.
    ///
    /// Two tokens on the same axis (e.g. `top,bottom`) are rejected.
    pub fn parse(text: &str) -> XlcpResult<Self> {
        let inner = text
            .trim()
            .trim_matches(|c| matches!(c, '{' | '[' | '(' | ')' | ']' | '}'));
        let tokens: Vec<&str> = inner.split(',').collect();
        if tokens.len() > 2 {
            return Err(XlcpError::InvalidPosition(format!(
                "'{}' has more than two axes",
                text
            )));
        }

        let primary: Axis = tokens[0].parse()?;
        let secondary = match tokens.get(1) {
            Some(token) if !token.trim().is_empty() => Some(token.parse::<Axis>()?),
            _ => None,
        };

        if let Some(second) = secondary {
            if second.is_vertical() == primary.is_vertical() {
                return Err(XlcpError::InvalidPosition(format!(
                    "'{}' and '{}' are on the same axis",
                    primary.name(),
                    second.name()
                )));
            }
        }

        Ok(Self { primary, secondary })
    }

    /// Row and column offsets of the header cell from the block's top-left corner.
    pub fn offsets(&self, rows: u32, columns: u32) -> (i64, i64) {
        let mut row_offset = 0i64;
        let mut column_offset = 0i64;

        match self.primary {
            Axis::Top => row_offset = -1,
            Axis::Bottom => row_offset = i64::from(rows),
            Axis::Left => column_offset = -1,
            Axis::Right => column_offset = i64::from(columns),
        }

        // Top/Left as secondary keep the default alignment to the top-left edge.
        match self.secondary {
            Some(Axis::Right) => column_offset = i64::from(columns) - 1,
            Some(Axis::Bottom) => row_offset = i64::from(rows) - 1,
            _ => {}
        }

        (row_offset, column_offset)
    }
}

impl FromStr for HeaderPosition {
    type Err = XlcpError;

    fn from_str(s: &str) -> XlcpResult<Self> {
        HeaderPosition::parse(s)
    }
}

impl fmt::Display for HeaderPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.secondary {
            Some(second) => write!(f, "({},{})", self.primary.name(), second.name()),
            None => write!(f, "({})", self.primary.name()),
        }
    }
}

/// Zero-based (row, column) of the cell that should hold the header for `range`.
///
/// Fails with [`XlcpError::HeaderOutsideSheet`] when that cell is off either edge of the sheet.
pub fn header_cell(range: &ResolvedRange, position: &HeaderPosition) -> XlcpResult<(u32, u32)> {
    let (rows, columns) = range.shape();
    let (row_offset, column_offset) = position.offsets(rows, columns);
    let row = i64::from(range.top) + row_offset;
    let column = i64::from(range.left) + column_offset;

    match (u32::try_from(row), u32::try_from(column)) {
        (Ok(r), Ok(c)) if r <= MAX_ROW && c <= MAX_COLUMN => Ok((r, c)),
        _ => Err(XlcpError::HeaderOutsideSheet {
            row: row_offset,
            column: column_offset,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3 rows x 2 columns anchored at B2
    fn block() -> ResolvedRange {
        ResolvedRange::new(1, 1, 3, 2)
    }

    #[test]
    fn test_parse_default_position() {
        let pos = HeaderPosition::parse("(top,left)").unwrap();
        assert_eq!(pos, HeaderPosition::default());
    }

    #[test]
    fn test_parse_tolerates_brackets_case_and_spaces() {
        let pos = HeaderPosition::parse(" [ RIGHT , Bottom ] ").unwrap();
        assert_eq!(pos.primary, Axis::Right);
        assert_eq!(pos.secondary, Some(Axis::Bottom));

        let single = HeaderPosition::parse("{left}").unwrap();
        assert_eq!(single.primary, Axis::Left);
        assert_eq!(single.secondary, None);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(HeaderPosition::parse("(middle)").is_err());
        assert!(HeaderPosition::parse("()").is_err());
        assert!(HeaderPosition::parse("(top,bottom)").is_err());
        assert!(HeaderPosition::parse("(top,left,right)").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["(top,left)", "(right,bottom)", "(bottom)"] {
            assert_eq!(HeaderPosition::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_header_top_left() {
        let pos = HeaderPosition::parse("(top,left)").unwrap();
        // One row above B2, same column
        assert_eq!(header_cell(&block(), &pos).unwrap(), (0, 1));
    }

    #[test]
    fn test_header_right_bottom() {
        let pos = HeaderPosition::parse("(right,bottom)").unwrap();
        // Right of column C, aligned with the last row (row 4)
        assert_eq!(header_cell(&block(), &pos).unwrap(), (3, 3));
    }

    #[test]
    fn test_header_primary_only() {
        let block = block();
        let cases = [
            ("(top)", (0, 1)),
            ("(bottom)", (4, 1)),
            ("(left)", (1, 0)),
            ("(right)", (1, 3)),
        ];
        for (text, expected) in cases {
            let pos = HeaderPosition::parse(text).unwrap();
            assert_eq!(header_cell(&block, &pos).unwrap(), expected, "{text}");
        }
    }

    #[test]
    fn test_header_secondary_alignment_is_symmetric() {
        let block = block();
        // Vertical primary, horizontal secondary
        let top_right = HeaderPosition::parse("(top,right)").unwrap();
        assert_eq!(header_cell(&block, &top_right).unwrap(), (0, 2));
        let bottom_left = HeaderPosition::parse("(bottom,left)").unwrap();
        assert_eq!(header_cell(&block, &bottom_left).unwrap(), (4, 1));

        // Horizontal primary, vertical secondary
        let left_bottom = HeaderPosition::parse("(left,bottom)").unwrap();
        assert_eq!(header_cell(&block, &left_bottom).unwrap(), (3, 0));
        let left_top = HeaderPosition::parse("(left,top)").unwrap();
        assert_eq!(header_cell(&block, &left_top).unwrap(), (1, 0));
    }

    #[test]
    fn test_header_off_the_sheet() {
        let at_origin = ResolvedRange::new(0, 0, 2, 2);
        let pos = HeaderPosition::parse("(top)").unwrap();
        assert!(matches!(
            header_cell(&at_origin, &pos),
            Err(XlcpError::HeaderOutsideSheet { row: -1, column: 0 })
        ));
    }

    #[test]
    fn test_header_past_the_last_row_or_column() {
        let whole_sheet = ResolvedRange::new(0, 0, MAX_ROW + 1, MAX_COLUMN + 1);
        for text in ["(right)", "(bottom)", "(right,bottom)", "(bottom,right)"] {
            let pos = HeaderPosition::parse(text).unwrap();
            assert!(
                matches!(
                    header_cell(&whole_sheet, &pos),
                    Err(XlcpError::HeaderOutsideSheet { .. })
                ),
                "{text}"
            );
        }

        // Flush against the edge is still on the sheet
        let last_column = ResolvedRange::new(0, MAX_COLUMN - 1, 1, 1);
        let right = HeaderPosition::parse("(right)").unwrap();
        assert_eq!(header_cell(&last_column, &right).unwrap(), (0, MAX_COLUMN));
    }
}
