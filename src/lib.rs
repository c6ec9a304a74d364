//! xlcp - copy cell blocks between spreadsheet workbooks
//!
//! The copy instructions live in the input workbook itself: every sheet holds
//! an order table whose rows each name a source file/sheet/range and a
//! destination file/sheet/range, optionally with a header label.
//!
//! # Features
//!
//! - A1-style ranges with open ends (`B3:`, `A1:D`), auto-extended against
//!   the live sheet the way End+Down / End+Right would
//! - Header labels placed on any side of the written block
//! - Destination files created from a template, or edited in place after a prompt
//! - Every destination saved exactly once per order
//!
//! # Example
//!
//! ```no_run
//! use xlcp::order::{Order, TransferOptions};
//! use xlcp::workbook::{SourceBook, WorkbookPool};
//!
//! let mut book = SourceBook::open("orders.xlsx")?;
//! let mut pool = WorkbookPool::new();
//! let options = TransferOptions::default();
//! let mut always_yes = |_: &std::path::Path| true;
//!
//! for (name, sheet) in book.worksheets()? {
//!     let order = Order::load(&name, &sheet);
//!     let summary = order.execute(&mut pool, &options, &mut always_yes)?;
//!     println!("{}: {} copied", summary.name, summary.copied());
//! }
//! # Ok::<(), xlcp::error::XlcpError>(())
//! ```

pub mod address;
pub mod cli;
pub mod error;
pub mod order;
pub mod position;
pub mod sheet;
pub mod types;
pub mod workbook;

// Re-export commonly used types
pub use error::{XlcpError, XlcpResult};
pub use types::{CellValue, Matrix};
