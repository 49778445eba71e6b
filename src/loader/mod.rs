//! Orchestration of a full load.
//!
//! - [`options`]: the CLI surface and its resolution into [`LoadOptions`]
//! - [`format`]: the optional TOML format file
//! - [`load_spreadsheet`]: the sequencing façade wiring the extraction
//!   engine to the destination collaborators

pub mod format;
pub mod options;

pub use format::FormatFile;
pub use options::{Cli, LoadOptions, LoadRequest};

use std::path::Path;
use std::time::Instant;

use crate::destination::{BulkWriter, TableManager};
use crate::error::LoadResult;
use crate::extract::{LoadController, LoadEvent, LoadObserver};

/// Run a complete load: open the spreadsheet, infer the schema, prepare the
/// destination table, then stream batches until the source is exhausted.
///
/// The destination is produced by the `connect` closure, invoked only after
/// the session is open and the schema inferred — a missing spreadsheet can
/// never touch the store. Sequencing, each step gated by [`LoadOptions`]:
///
/// 1. open session (fails `SourceNotFound` first)
/// 2. apply format-file overrides to the inferred fields
/// 3. if `create_table`: drop-if-exists, then create
/// 4. if `truncate`: truncate
/// 5. write each batch, reporting progress through `observer`
///
/// There is no retry and no cross-batch transaction: the first error aborts
/// the run, and a mid-stream write failure leaves the batches already
/// written in the table.
pub fn load_spreadsheet<D, F>(
    path: &Path,
    table: &str,
    options: &LoadOptions,
    format: Option<&FormatFile>,
    connect: F,
    observer: &dyn LoadObserver,
) -> LoadResult<u64>
where
    D: TableManager + BulkWriter,
    F: FnOnce() -> LoadResult<D>,
{
    let result = run(path, table, options, format, connect, observer);
    if let Err(e) = &result {
        observer.on_failure(e);
    }
    result
}

fn run<D, F>(
    path: &Path,
    table: &str,
    options: &LoadOptions,
    format: Option<&FormatFile>,
    connect: F,
    observer: &dyn LoadObserver,
) -> LoadResult<u64>
where
    D: TableManager + BulkWriter,
    F: FnOnce() -> LoadResult<D>,
{
    let started = Instant::now();

    let controller = LoadController::open(path, options.sheet_index, options.bounds)?;
    observer.on_event(&LoadEvent::SessionOpened {
        path,
        fields: controller.fields(),
    });

    let mut fields = controller.fields().to_vec();
    if let Some(fmt) = format {
        fmt.apply(&mut fields)?;
    }

    let mut destination = connect()?;

    if options.create_table {
        destination.drop_table(table)?;
        observer.on_event(&LoadEvent::TableDropped { table });
        destination.create_table(table, &fields)?;
        observer.on_event(&LoadEvent::TableCreated { table });
    }
    if options.truncate {
        destination.truncate_table(table)?;
        observer.on_event(&LoadEvent::TableTruncated { table });
    }

    let mut total_rows: u64 = 0;
    for (batch_index, batch) in controller.batches(options.batch_size)?.enumerate() {
        let batch = batch?;
        let written = destination.write_batch(table, &batch)?;
        total_rows += written as u64;
        observer.on_event(&LoadEvent::BatchWritten {
            batch_index,
            rows: batch.row_count(),
            total_rows,
        });
    }

    observer.on_event(&LoadEvent::Finished {
        total_rows,
        elapsed: started.elapsed(),
    });
    Ok(total_rows)
}
