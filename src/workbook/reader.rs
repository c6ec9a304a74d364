//! Read-only workbook access via calamine

use crate::error::{XlcpError, XlcpResult};
use crate::sheet::SheetRead;
use crate::types::CellValue;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A workbook opened for reading. Dropping it closes the file.
pub struct SourceBook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl SourceBook {
    pub fn open<P: AsRef<Path>>(path: P) -> XlcpResult<Self> {
        let path = path.as_ref().to_path_buf();
        let sheets = open_workbook_auto(&path).map_err(|e| XlcpError::workbook(&path, e))?;
        Ok(Self { path, sheets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|n| n == name)
    }

    pub fn worksheet(&mut self, name: &str) -> XlcpResult<Range<Data>> {
        self.sheets
            .worksheet_range(name)
            .map_err(|e| XlcpError::workbook(&self.path, e))
    }

    /// Every sheet in workbook order
    pub fn worksheets(&mut self) -> XlcpResult<Vec<(String, Range<Data>)>> {
        let mut out = Vec::new();
        for name in self.sheet_names() {
            let range = self.worksheet(&name)?;
            out.push((name, range));
        }
        Ok(out)
    }
}

fn convert(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        // Serial number, same as the cell holds on disk
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// calamine ranges use absolute (row, column) positions.
impl SheetRead for Range<Data> {
    fn value(&self, row: u32, column: u32) -> CellValue {
        self.get_value((row, column))
            .map(convert)
            .unwrap_or_default()
    }

    fn extent(&self) -> Option<(u32, u32)> {
        self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::RangeSpec;
    use crate::sheet::{read_block, resolve};
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("source.xlsx");
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut((2, 2)).set_value_string("name");
        sheet.get_cell_mut((3, 2)).set_value_string("qty");
        sheet.get_cell_mut((2, 3)).set_value_string("bolt");
        sheet.get_cell_mut((3, 3)).set_value_number(12);
        let _ = book.new_sheet("Other");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
        path
    }

    #[test]
    fn test_convert_data_variants() {
        assert_eq!(convert(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(convert(&Data::Bool(false)), CellValue::Bool(false));
    }

    #[test]
    fn test_open_lists_sheets() {
        let dir = TempDir::new().unwrap();
        let book = SourceBook::open(write_fixture(&dir)).unwrap();
        assert_eq!(book.sheet_names(), vec!["Sheet1", "Other"]);
        assert!(book.has_sheet("Other"));
        assert!(!book.has_sheet("Missing"));
    }

    #[test]
    fn test_range_offsets_are_absolute() {
        let dir = TempDir::new().unwrap();
        let mut book = SourceBook::open(write_fixture(&dir)).unwrap();
        let sheet = book.worksheet("Sheet1").unwrap();

        // Data starts at B2, not A1
        assert_eq!(sheet.value(1, 1), CellValue::Text("name".to_string()));
        assert_eq!(sheet.value(0, 0), CellValue::Empty);
        assert_eq!(sheet.extent(), Some((2, 2)));

        let range = resolve(&RangeSpec::parse("B2:").unwrap(), &sheet);
        assert_eq!(range.to_string(), "B2:C3");
        let block = read_block(&sheet, &range);
        assert_eq!(block.get(1, 1), Some(&CellValue::Number(12.0)));
    }

    #[test]
    fn test_open_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = SourceBook::open(dir.path().join("nope.xlsx"));
        assert!(matches!(result, Err(XlcpError::Workbook { .. })));
    }
}
