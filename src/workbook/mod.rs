//! Workbook backends
//!
//! - Reading: order tables and source files are opened read-only with calamine
//!   (xlsx, xlsm, xlsb, xls, ods).
//! - Writing: destination files are loaded into a [`WorkbookPool`] with
//!   umya-spreadsheet, edited in memory, and saved once at the end of an order.

mod pool;
mod reader;

pub use pool::{ensure_sheet, sheet_names, WorkbookPool};
pub use reader::SourceBook;
