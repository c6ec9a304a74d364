use std::path::PathBuf;
use thiserror::Error;

pub type XlcpResult<T> = Result<T, XlcpError>;

#[derive(Error, Debug)]
pub enum XlcpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cell reference: '{0}'")]
    InvalidCell(String),

    #[error("Invalid range: '{0}' (expected <cell>:<cell>)")]
    InvalidRange(String),

    #[error("Invalid header position: {0}")]
    InvalidPosition(String),

    #[error("Header cell would fall outside the sheet (row offset {row}, column offset {column})")]
    HeaderOutsideSheet { row: i64, column: i64 },

    #[error("Workbook error ({}): {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Template error: {0}")]
    Template(String),
}

impl XlcpError {
    /// Wrap a backend failure for the workbook at `path`.
    pub fn workbook(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        XlcpError::Workbook {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
