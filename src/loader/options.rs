//! CLI surface and option resolution.
//!
//! The raw command line mirrors `bcp`'s: positional `database..table`,
//! action verb, file, then flags. [`Cli::resolve`] validates it and folds
//! the negated flags (`--nocreate`, `--keep`) into plain booleans once, so
//! nothing downstream ever sees the raw negations.

use std::path::PathBuf;

use clap::Parser;

use crate::destination::ConnectionParams;
use crate::error::{LoadError, LoadResult};
use crate::extract::RowBounds;
use crate::types::DEFAULT_BATCH_SIZE;

/// Raw command line.
#[derive(Debug, Parser)]
#[command(
    name = "apbcp",
    about = "Bulk-load a spreadsheet into a SQL Server table, bcp-style.",
    after_help = "Example: apbcp mydb..mytbl in mysheet.xlsx -S localhost -U sa -P secret"
)]
pub struct Cli {
    /// Destination as [database]..[tablename]
    #[arg(value_name = "database..table")]
    pub db_table: String,

    /// Transfer direction; only `in` is supported
    #[arg(value_name = "action")]
    pub verb: String,

    /// Spreadsheet file to load
    #[arg(value_name = "file")]
    pub file: PathBuf,

    /// SQL Server as host, host:port, or host,port
    #[arg(short = 'S', long = "server", env = "APBCP_SERVER")]
    pub server: Option<String>,

    /// SQL user login name
    #[arg(short = 'U', long = "user", env = "APBCP_USER")]
    pub user: Option<String>,

    /// SQL user login password
    #[arg(short = 'P', long = "password", env = "APBCP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Don't create the destination table
    #[arg(long = "nocreate")]
    pub nocreate: bool,

    /// Keep existing data in the table
    #[arg(long = "keep")]
    pub keep: bool,

    /// TOML format file overriding column types
    #[arg(short = 'f', long = "formatfile", value_name = "file")]
    pub format_file: Option<PathBuf>,

    /// First row of the import, counting the header as row 1
    #[arg(short = 'F', long = "firstrow", value_name = "row")]
    pub first_row: Option<u32>,

    /// Last row of the import, counting the header as row 1
    #[arg(short = 'L', long = "lastrow", value_name = "row")]
    pub last_row: Option<u32>,

    /// Number of rows per bulk-copy batch
    #[arg(short = 'b', long = "batchsize", value_name = "rows")]
    pub batch_size: Option<usize>,
}

/// Fully resolved load configuration: defaults applied, negations folded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Drop and re-create the destination table before loading.
    pub create_table: bool,
    /// Truncate the destination table before loading.
    pub truncate: bool,
    /// Rows per bulk-copy batch.
    pub batch_size: usize,
    /// Row bounds for the import.
    pub bounds: RowBounds,
    /// Zero-based worksheet index to load from.
    pub sheet_index: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_table: true,
            truncate: true,
            batch_size: DEFAULT_BATCH_SIZE,
            bounds: RowBounds::default(),
            sheet_index: 0,
        }
    }
}

/// Everything one run needs, produced by [`Cli::resolve`].
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Destination database name.
    pub database: String,
    /// Destination table name.
    pub table: String,
    /// Spreadsheet path.
    pub file: PathBuf,
    /// Destination connection parameters.
    pub connection: ConnectionParams,
    /// Optional format file path (not yet read).
    pub format_file: Option<PathBuf>,
    /// Resolved load options.
    pub options: LoadOptions,
}

impl Cli {
    /// Validate the raw command line and resolve it into a [`LoadRequest`].
    ///
    /// Pure validation: no file or network I/O happens here, so a rejected
    /// command line can never touch the spreadsheet or the store.
    pub fn resolve(self) -> LoadResult<LoadRequest> {
        let (database, table) = split_db_table(&self.db_table)?;
        if self.verb != "in" {
            return Err(argument("only the 'in' action is supported"));
        }

        let server = required(self.server, "server")?;
        let user = required(self.user, "user")?;
        let password = required(self.password, "password")?;

        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size < 1 {
            return Err(argument("batch size must be >= 1"));
        }
        if let Some(first) = self.first_row {
            if first < 1 {
                return Err(argument("first row is 1-indexed and must be >= 1"));
            }
        }
        if let (Some(first), Some(last)) = (self.first_row, self.last_row) {
            if last < first {
                return Err(argument("last row must not precede first row"));
            }
        }

        Ok(LoadRequest {
            connection: ConnectionParams {
                server,
                user,
                password,
                database: database.clone(),
            },
            database,
            table,
            file: self.file,
            format_file: self.format_file,
            options: LoadOptions {
                create_table: !self.nocreate,
                truncate: !self.keep,
                batch_size,
                bounds: RowBounds::new(self.first_row, self.last_row),
                sheet_index: 0,
            },
        })
    }
}

fn split_db_table(value: &str) -> LoadResult<(String, String)> {
    let parts: Vec<&str> = value.split("..").collect();
    match parts.as_slice() {
        [database, table] if !database.is_empty() && !table.is_empty() => {
            Ok((database.to_string(), table.to_string()))
        }
        _ => Err(argument(
            "first argument must be [database]..[tablename]",
        )),
    }
}

fn required(value: Option<String>, name: &str) -> LoadResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(argument(&format!("missing {name}"))),
    }
}

fn argument(message: &str) -> LoadError {
    LoadError::ArgumentValidation {
        message: message.to_string(),
    }
}
