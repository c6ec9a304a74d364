//! One row of an order table: copy a source block into a destination block

use super::OrderContext;
use crate::address::RangeSpec;
use crate::error::{XlcpError, XlcpResult};
use crate::position::header_cell;
use crate::sheet::{read_block, resolve, write_block, ResolvedRange, SheetRead, SheetWrite};
use crate::types::{CellValue, Matrix};
use crate::workbook::{ensure_sheet, SourceBook};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

//==============================================================================
// Table rows
//==============================================================================

pub const HEADER_COLUMN: u32 = 0;
pub const SOURCE_FILE_COLUMN: u32 = 1;
pub const SOURCE_SHEET_COLUMN: u32 = 2;
pub const SOURCE_RANGE_COLUMN: u32 = 3;
pub const DEST_FILE_COLUMN: u32 = 4;
pub const DEST_SHEET_COLUMN: u32 = 5;
pub const DEST_RANGE_COLUMN: u32 = 6;

/// One order-table row as written, every field optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferRow {
    pub header: Option<String>,
    pub source_file: Option<String>,
    pub source_sheet: Option<String>,
    pub source_range: Option<String>,
    pub dest_file: Option<String>,
    pub dest_sheet: Option<String>,
    pub dest_range: Option<String>,
}

impl TransferRow {
    /// Read row `row` of an order table.
    pub fn read<S: SheetRead + ?Sized>(sheet: &S, row: u32) -> Self {
        let text = |column| sheet.value(row, column).as_text();
        Self {
            header: text(HEADER_COLUMN),
            source_file: text(SOURCE_FILE_COLUMN),
            source_sheet: text(SOURCE_SHEET_COLUMN),
            source_range: text(SOURCE_RANGE_COLUMN),
            dest_file: text(DEST_FILE_COLUMN),
            dest_sheet: text(DEST_SHEET_COLUMN),
            dest_range: text(DEST_RANGE_COLUMN),
        }
    }

    /// True when nothing in the row is filled in.
    pub fn is_blank(&self) -> bool {
        *self == TransferRow::default()
    }

    /// True iff both files and both sheets are named.
    pub fn is_proper(&self) -> bool {
        self.source_file.is_some()
            && self.source_sheet.is_some()
            && self.dest_file.is_some()
            && self.dest_sheet.is_some()
    }
}

//==============================================================================
// Transfers
//==============================================================================

/// File, sheet and range on one side of a transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub file: String,
    pub sheet: String,
    pub range: RangeSpec,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.file, self.sheet, self.range)
    }
}

/// A proper order row, ready to run.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub header: Option<String>,
    pub source: Endpoint,
    pub destination: Endpoint,
}

fn parse_range(text: Option<&str>) -> XlcpResult<RangeSpec> {
    // A blank range cell means "A1, both ends automatic"
    text.map_or_else(|| Ok(RangeSpec::default()), RangeSpec::parse)
}

impl Transfer {
    /// Build a transfer from a row. `Ok(None)` for an improper row.
    pub fn from_row(row: TransferRow) -> XlcpResult<Option<Self>> {
        if !row.is_proper() {
            return Ok(None);
        }
        let source_range = parse_range(row.source_range.as_deref())?;
        let dest_range = parse_range(row.dest_range.as_deref())?;
        match (row.source_file, row.source_sheet, row.dest_file, row.dest_sheet) {
            (Some(source_file), Some(source_sheet), Some(dest_file), Some(dest_sheet)) => {
                Ok(Some(Self {
                    header: row.header,
                    source: Endpoint {
                        file: source_file,
                        sheet: source_sheet,
                        range: source_range,
                    },
                    destination: Endpoint {
                        file: dest_file,
                        sheet: dest_sheet,
                        range: dest_range,
                    },
                }))
            }
            _ => Ok(None),
        }
    }

    /// Read the source block. Per-row failures come back as [`ReadFailure`].
    pub fn read_source(&self, ctx: &OrderContext<'_>) -> Result<Matrix, ReadFailure> {
        let path = ctx.source_dir.join(&self.source.file);
        if !path.exists() {
            return Err(ReadFailure::FileMissing {
                file: self.source.file.clone(),
                dir: ctx.source_dir.to_path_buf(),
            });
        }
        info!("loading {}", path.display());

        let sheet_missing = || ReadFailure::SheetMissing {
            sheet: self.source.sheet.clone(),
            path: path.clone(),
        };

        // A file that is already open for writing is read from memory, edits included.
        let matrix = if let Some(book) = ctx.pool.get(&path) {
            let sheet = book
                .get_sheet_by_name(&self.source.sheet)
                .ok_or_else(sheet_missing)?;
            let range = resolve(&self.source.range, sheet);
            read_block(sheet, &range)
        } else {
            let mut book =
                SourceBook::open(&path).map_err(|e| ReadFailure::Unreadable(e.to_string()))?;
            if !book.has_sheet(&self.source.sheet) {
                return Err(sheet_missing());
            }
            let sheet = book
                .worksheet(&self.source.sheet)
                .map_err(|e| ReadFailure::Unreadable(e.to_string()))?;
            let range = resolve(&self.source.range, &sheet);
            read_block(&sheet, &range)
        };

        let matrix = if ctx.options.transpose {
            matrix.transpose()
        } else {
            matrix
        };
        info!("data shape: {:?}", matrix.shape());
        Ok(matrix)
    }

    /// Write `matrix` (and the header, if any) into the destination.
    ///
    /// Errors are fatal to the run: the destination could not be created,
    /// opened or edited.
    pub fn write_destination(
        &self,
        matrix: &Matrix,
        ctx: &mut OrderContext<'_>,
    ) -> XlcpResult<TransferOutcome> {
        let path = ctx.destination_path(&self.destination.file);

        if !ctx.is_open(&path) {
            if !path.exists() {
                let template = ctx.template.ok_or_else(|| {
                    XlcpError::Template("no template file configured (cell B1)".to_string())
                })?;
                if !template.exists() {
                    return Err(XlcpError::Template(format!(
                        "{} does not exist",
                        template.display()
                    )));
                }
                fs::copy(template, &path)?;
                info!("created {} from {}", path.display(), template.display());
            } else if !ctx.options.force_overwrite && !ctx.prompt.confirm_overwrite(&path)? {
                ctx.decline(path.clone());
                return Ok(TransferOutcome::Declined(path));
            }
            ctx.open(&path)?;
        }

        let book = ctx
            .pool
            .get_mut(&path)
            .ok_or_else(|| XlcpError::workbook(&path, "workbook is not open"))?;
        let created_sheet =
            ensure_sheet(book, &self.destination.sheet).map_err(|e| XlcpError::workbook(&path, e))?;
        if created_sheet {
            info!("created sheet {} in {}", self.destination.sheet, path.display());
        }
        let sheet = book
            .get_sheet_by_name_mut(&self.destination.sheet)
            .ok_or_else(|| XlcpError::workbook(&path, "sheet vanished after creation"))?;

        let range = resolve(&self.destination.range, &*sheet);

        if let Some(header) = &self.header {
            match header_cell(&range, &ctx.options.header_position) {
                Ok((row, column)) => sheet.write_value(row, column, &CellValue::Text(header.clone())),
                Err(e) => {
                    warn!("{}: {}", self.destination, e);
                    return Ok(TransferOutcome::InvalidHeader(e.to_string()));
                }
            }
        }

        let written = write_block(sheet, &range, matrix);
        Ok(TransferOutcome::Copied {
            destination: path,
            range,
            written,
            created_sheet,
        })
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(header) = &self.header {
            writeln!(f, "header      : {}", header)?;
        }
        writeln!(f, "source      : {}", self.source)?;
        write!(f, "destination : {}", self.destination)
    }
}

//==============================================================================
// Outcomes
//==============================================================================

/// Why a source block could not be read. The row is abandoned, the run goes on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadFailure {
    #[error("{file} does not exist in {}", dir.display())]
    FileMissing { file: String, dir: PathBuf },

    #[error("{sheet} does not exist in {}", path.display())]
    SheetMissing { sheet: String, path: PathBuf },

    #[error("{0}")]
    Unreadable(String),
}

/// What happened to one transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// Block written; `written` is the (possibly cropped) shape.
    Copied {
        destination: PathBuf,
        range: ResolvedRange,
        written: (usize, usize),
        created_sheet: bool,
    },
    ReadFailed(ReadFailure),
    /// Overwrite declined at the prompt for this destination.
    Declined(PathBuf),
    /// Not attempted: overwrite of this destination was declined earlier.
    Skipped(PathBuf),
    /// The header cell would fall outside the sheet; nothing written.
    InvalidHeader(String),
}

impl TransferOutcome {
    pub fn is_copied(&self) -> bool {
        matches!(self, TransferOutcome::Copied { .. })
    }
}
