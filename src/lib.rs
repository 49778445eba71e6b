//! `apbcp` bulk-loads one spreadsheet into one SQL Server table, the way
//! `bcp in` loads a flat file: the header row defines the columns, the body
//! rows are streamed to the server in fixed-size batches.
//!
//! The column list is inferred from the header only — every destination
//! column gets one wide nullable text type (overridable via a TOML format
//! file), and numeric/date correctness is deferred to the server's implicit
//! conversion during bulk write. Body rows are pulled lazily, one batch at a
//! time, so peak memory is bounded by a single batch.
//!
//! ## Modules
//!
//! - [`extract`]: schema inference, batched row extraction, the session
//!   controller, and progress hooks
//! - [`destination`]: the `TableManager`/`BulkWriter` collaborator traits
//!   and their SQL Server implementation
//! - [`loader`]: CLI options, format file, and the orchestrator
//! - [`types`]: field descriptors, cell values, row batches
//! - [`error`]: the crate-wide error type
//!
//! ## Example: inspect a spreadsheet's inferred schema and batches
//!
//! ```no_run
//! use apbcp::extract::{LoadController, RowBounds};
//!
//! # fn main() -> Result<(), apbcp::LoadError> {
//! let session = LoadController::open("people.xlsx", 0, RowBounds::default())?;
//! for field in session.fields() {
//!     println!("{} {} {}", field.index, field.name, field.type_definition);
//! }
//! for batch in session.batches(1000)? {
//!     println!("batch of {} rows", batch?.row_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Partial loads
//!
//! There is no cross-batch transaction and no retry: if a batch write fails
//! mid-stream, the batches already written stay in the destination table.
//! Re-running with the default `create_table`/`truncate` options restores a
//! clean state.

pub mod destination;
pub mod error;
pub mod extract;
pub mod loader;
pub mod types;

pub use error::{LoadError, LoadResult};
