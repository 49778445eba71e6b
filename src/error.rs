use thiserror::Error;

/// Convenience result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type shared by every stage of a load.
///
/// The loader never retries: the first error aborts the run and propagates
/// unchanged to the caller. A failure during batch writing can leave the
/// destination table partially loaded (there is no cross-batch transaction);
/// see the crate docs.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Bad or missing CLI input. Raised before any file or network I/O.
    #[error("invalid arguments: {message}")]
    ArgumentValidation { message: String },

    /// The spreadsheet file or the requested sheet does not exist.
    #[error("source not found: {message}")]
    SourceNotFound { message: String },

    /// The header row contains no populated cells.
    #[error("header row is empty, no columns to infer")]
    EmptySchema,

    /// A header cell is blank or whitespace-only (0-based column index).
    #[error("header cell at column {index} is blank or whitespace")]
    InvalidColumnName { index: usize },

    /// A body cell could not be converted (1-based row, as shown in Excel).
    #[error("failed to read cell at row {row}, column '{column}': {message}")]
    CellRead {
        row: u32,
        column: String,
        message: String,
    },

    /// Any failure reported by the destination store (connectivity, DDL
    /// conflict, constraint violation, bulk-copy rejection).
    #[error("destination error: {message}")]
    Destination { message: String },

    /// Underlying I/O error (e.g. unreadable format file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet parsing error from the workbook reader.
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] calamine::Error),

    /// Malformed format file.
    #[error("format file error: {0}")]
    Format(#[from] toml::de::Error),
}

impl From<tiberius::error::Error> for LoadError {
    fn from(e: tiberius::error::Error) -> Self {
        LoadError::Destination {
            message: e.to_string(),
        }
    }
}
