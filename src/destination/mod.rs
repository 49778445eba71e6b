//! Destination-store collaborators.
//!
//! The loader core only sees two narrow traits: [`TableManager`] for DDL and
//! truncation, [`BulkWriter`] for streaming batches. [`mssql`] implements
//! both over a live SQL Server connection; tests substitute in-memory
//! recorders.

pub mod mssql;
pub mod sql;

use crate::error::LoadResult;
use crate::types::{FieldDescriptor, RowBatch};

pub use mssql::{ConnectionParams, MssqlDestination};

/// DDL and truncation against the destination store.
///
/// Each call is a single synchronous operation that either succeeds or
/// raises a destination-store error.
pub trait TableManager {
    /// Drop the table if it exists.
    fn drop_table(&mut self, table: &str) -> LoadResult<()>;

    /// Create the table from the inferred fields, in header order.
    fn create_table(&mut self, table: &str, fields: &[FieldDescriptor]) -> LoadResult<()>;

    /// Remove all rows from the table.
    fn truncate_table(&mut self, table: &str) -> LoadResult<()>;
}

/// Streams row batches to the destination store.
pub trait BulkWriter {
    /// Write one batch through the store's bulk-insert path; returns the
    /// number of rows written.
    fn write_batch(&mut self, table: &str, batch: &RowBatch) -> LoadResult<usize>;
}
