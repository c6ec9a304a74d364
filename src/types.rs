use std::fmt;

//==============================================================================
// Cell Values
//==============================================================================

/// Raw value of a single cell. Formatting, styles and formulas are not carried.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Render the value as a trimmed, non-empty name (file, sheet or range text).
    ///
    /// Whole numbers lose their trailing `.0`, so a sheet called `2024` that the
    /// workbook stores as a number still reads back as `"2024"`.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string().to_uppercase(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

//==============================================================================
// Matrix
//==============================================================================

/// Row-major 2-D block of cell values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    cells: Vec<CellValue>,
}

impl Matrix {
    /// Create a matrix of empty cells
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![CellValue::Empty; rows * columns],
        }
    }

    /// Build a matrix from rows; short rows are padded with empty cells.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut matrix = Self::new(rows.len(), columns);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                matrix.set(r, c, value);
            }
        }
        matrix
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&CellValue> {
        if row < self.rows && column < self.columns {
            self.cells.get(row * self.columns + column)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, column: usize, value: CellValue) {
        if row < self.rows && column < self.columns {
            self.cells[row * self.columns + column] = value;
        }
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::new(self.columns, self.rows);
        for r in 0..self.rows {
            for c in 0..self.columns {
                out.cells[c * self.rows + r] = self.cells[r * self.columns + c].clone();
            }
        }
        out
    }

    /// Top-left sub-block of at most `rows` x `columns`.
    pub fn crop(&self, rows: usize, columns: usize) -> Matrix {
        let rows = rows.min(self.rows);
        let columns = columns.min(self.columns);
        let mut out = Matrix::new(rows, columns);
        for r in 0..rows {
            for c in 0..columns {
                out.cells[r * columns + c] = self.cells[r * self.columns + c].clone();
            }
        }
        out
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        // chunks() panics on 0
        self.cells.chunks(self.columns.max(1)).take(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(rows: usize, columns: usize) -> Matrix {
        let mut m = Matrix::new(rows, columns);
        for r in 0..rows {
            for c in 0..columns {
                m.set(r, c, CellValue::Number((r * 10 + c) as f64));
            }
        }
        m
    }

    #[test]
    fn test_transpose_swaps_axes() {
        let m = numbers(2, 3);
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(2, 1), Some(&CellValue::Number(12.0)));
        assert_eq!(t.get(0, 1), Some(&CellValue::Number(10.0)));
    }

    #[test]
    fn test_crop_keeps_top_left() {
        let m = numbers(5, 5);
        let c = m.crop(3, 4);
        assert_eq!(c.shape(), (3, 4));
        assert_eq!(c.get(2, 3), Some(&CellValue::Number(23.0)));
        assert_eq!(c.get(3, 0), None);
    }

    #[test]
    fn test_crop_never_grows() {
        let m = numbers(2, 2);
        assert_eq!(m.crop(10, 10).shape(), (2, 2));
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let m = Matrix::from_rows(vec![
            vec![CellValue::Number(1.0)],
            vec![CellValue::Number(2.0), CellValue::Text("x".to_string())],
        ]);
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.get(0, 1), Some(&CellValue::Empty));
        assert_eq!(m.rows().count(), 2);
    }

    #[test]
    fn test_as_text_normalises_numbers() {
        assert_eq!(CellValue::Number(2024.0).as_text(), Some("2024".to_string()));
        assert_eq!(CellValue::Number(1.5).as_text(), Some("1.5".to_string()));
        assert_eq!(CellValue::Text("  ".to_string()).as_text(), None);
        assert_eq!(CellValue::Text(" out.xlsx ".to_string()).as_text(), Some("out.xlsx".to_string()));
        assert_eq!(CellValue::Empty.as_text(), None);
    }
}
