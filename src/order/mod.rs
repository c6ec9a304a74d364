//! Orders: the transfer table kept in one sheet of the order workbook
//!
//! Layout of an order sheet:
//!
//! | cell | content |
//! |------|---------|
//! | B1   | template workbook copied for new destination files |
//! | B2   | source directory |
//! | B3   | destination directory |
//! | A6.. | one transfer per row: header, source file, source sheet, source range, destination file, destination sheet, destination range |
//!
//! The table ends at the first fully blank row.

mod transfer;

pub use transfer::{
    Endpoint, ReadFailure, Transfer, TransferOutcome, TransferRow, DEST_FILE_COLUMN,
    DEST_RANGE_COLUMN, DEST_SHEET_COLUMN, HEADER_COLUMN, SOURCE_FILE_COLUMN,
    SOURCE_RANGE_COLUMN, SOURCE_SHEET_COLUMN,
};

use crate::error::{XlcpError, XlcpResult};
use crate::position::HeaderPosition;
use crate::sheet::{SheetRead, MAX_ROW};
use crate::workbook::WorkbookPool;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Zero-based positions of the configuration cells
const TEMPLATE_CELL: (u32, u32) = (0, 1);
const SOURCE_DIR_CELL: (u32, u32) = (1, 1);
const DEST_DIR_CELL: (u32, u32) = (2, 1);
/// First table row (row 6); row 5 holds the column titles
const FIRST_TABLE_ROW: u32 = 5;

/// Options shared by every transfer of a run.
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    pub transpose: bool,
    pub force_overwrite: bool,
    pub header_position: HeaderPosition,
}

/// Asked before an existing destination file is modified.
pub trait OverwritePrompt {
    /// `Ok(true)` to go ahead and overwrite `path`.
    fn confirm_overwrite(&mut self, path: &Path) -> XlcpResult<bool>;
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&Path) -> bool,
{
    fn confirm_overwrite(&mut self, path: &Path) -> XlcpResult<bool> {
        Ok(self(path))
    }
}

/// An order-table row that named all four endpoints but could not be parsed.
#[derive(Debug)]
pub struct RejectedRow {
    /// Zero-based sheet row
    pub row: u32,
    pub error: XlcpError,
}

//==============================================================================
// Order
//==============================================================================

#[derive(Debug)]
pub struct Order {
    pub name: String,
    pub template: Option<PathBuf>,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub transfers: Vec<Transfer>,
    pub rejected: Vec<RejectedRow>,
}

impl Order {
    /// Scan an order sheet. Improper rows are dropped without comment;
    /// rows with malformed ranges are kept in [`Order::rejected`].
    pub fn load<S: SheetRead + ?Sized>(name: &str, sheet: &S) -> Self {
        let path_at = |(row, column): (u32, u32)| sheet.value(row, column).as_text().map(PathBuf::from);

        let mut transfers = Vec::new();
        let mut rejected = Vec::new();

        let last_row = sheet.extent().map_or(0, |(row, _)| row.min(MAX_ROW));
        let mut row = FIRST_TABLE_ROW;
        while row <= last_row {
            let record = TransferRow::read(sheet, row);
            if record.is_blank() {
                break;
            }
            match Transfer::from_row(record) {
                Ok(Some(transfer)) => transfers.push(transfer),
                Ok(None) => debug!("{}: row {} is incomplete, ignored", name, row + 1),
                Err(error) => {
                    warn!("{}: row {}: {}", name, row + 1, error);
                    rejected.push(RejectedRow { row, error });
                }
            }
            row += 1;
        }

        info!("{}: loaded {} transfers", name, transfers.len());
        Self {
            name: name.to_string(),
            template: path_at(TEMPLATE_CELL),
            source_dir: path_at(SOURCE_DIR_CELL).unwrap_or_default(),
            dest_dir: path_at(DEST_DIR_CELL).unwrap_or_default(),
            transfers,
            rejected,
        }
    }

    /// Run every transfer in table order, then save each touched destination once.
    ///
    /// Per-row failures are recorded in the summary; an error here means a
    /// destination could not be created, opened or saved.
    pub fn execute(
        &self,
        pool: &mut WorkbookPool,
        options: &TransferOptions,
        prompt: &mut dyn OverwritePrompt,
    ) -> XlcpResult<OrderSummary> {
        let mut ctx = OrderContext {
            template: self.template.as_deref(),
            source_dir: &self.source_dir,
            dest_dir: &self.dest_dir,
            options,
            pool,
            prompt,
            open_destinations: Vec::new(),
            declined: HashSet::new(),
        };

        let mut outcomes = Vec::with_capacity(self.transfers.len());
        for transfer in &self.transfers {
            let destination = ctx.destination_path(&transfer.destination.file);
            if ctx.is_declined(&destination) {
                debug!("skipping {}", destination.display());
                outcomes.push(TransferOutcome::Skipped(destination));
                continue;
            }

            info!("{} -> {}", transfer.source.file, transfer.destination.file);
            let outcome = match transfer.read_source(&ctx) {
                Ok(matrix) => transfer.write_destination(&matrix, &mut ctx)?,
                Err(failure) => {
                    warn!("{}", failure);
                    TransferOutcome::ReadFailed(failure)
                }
            };
            outcomes.push(outcome);
        }

        let saved = ctx.finish()?;
        Ok(OrderSummary {
            name: self.name.clone(),
            outcomes,
            saved,
        })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |p: &Path| p.display().to_string();
        writeln!(
            f,
            "template    : {}",
            self.template.as_deref().map(show).unwrap_or_default()
        )?;
        writeln!(f, "source dir  : {}", show(&self.source_dir))?;
        write!(f, "dest dir    : {}", show(&self.dest_dir))?;
        for transfer in &self.transfers {
            write!(f, "\n\n{}", transfer)?;
        }
        Ok(())
    }
}

//==============================================================================
// Execution state
//==============================================================================

/// Mutable state shared by the transfers of one order while it runs.
pub struct OrderContext<'a> {
    pub template: Option<&'a Path>,
    pub source_dir: &'a Path,
    pub dest_dir: &'a Path,
    pub options: &'a TransferOptions,
    pool: &'a mut WorkbookPool,
    prompt: &'a mut dyn OverwritePrompt,
    /// Destinations this order holds open, in first-use order
    open_destinations: Vec<PathBuf>,
    /// Destinations the user would not let us overwrite
    declined: HashSet<PathBuf>,
}

impl OrderContext<'_> {
    pub fn destination_path(&self, file: &str) -> PathBuf {
        self.dest_dir.join(file)
    }

    pub fn is_open(&self, path: &Path) -> bool {
        self.open_destinations.iter().any(|p| p == path)
    }

    pub fn is_declined(&self, path: &Path) -> bool {
        self.declined.contains(path)
    }

    fn decline(&mut self, path: PathBuf) {
        info!("not overwriting {}", path.display());
        self.declined.insert(path);
    }

    fn open(&mut self, path: &Path) -> XlcpResult<()> {
        self.pool.acquire(path)?;
        self.open_destinations.push(path.to_path_buf());
        Ok(())
    }

    /// Save and release every destination, once each.
    fn finish(self) -> XlcpResult<Vec<PathBuf>> {
        for path in &self.open_destinations {
            self.pool.save(path)?;
            self.pool.release(path);
        }
        Ok(self.open_destinations)
    }
}

//==============================================================================
// Summary
//==============================================================================

/// Result of running one order.
#[derive(Debug)]
pub struct OrderSummary {
    pub name: String,
    /// One entry per transfer, in table order
    pub outcomes: Vec<TransferOutcome>,
    /// Destination files written, each exactly once
    pub saved: Vec<PathBuf>,
}

impl OrderSummary {
    pub fn copied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_copied()).count()
    }

    pub fn not_copied(&self) -> usize {
        self.outcomes.len() - self.copied()
    }
}
