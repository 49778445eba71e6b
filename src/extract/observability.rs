//! Progress reporting hooks.
//!
//! The orchestrator reports through an injected [`LoadObserver`] rather
//! than a process-wide logger, so the core components carry no ambient
//! state and can be observed in tests.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::LoadError;
use crate::types::FieldDescriptor;

/// Events emitted while a load runs.
#[derive(Debug)]
pub enum LoadEvent<'a> {
    /// Spreadsheet opened and schema inferred.
    SessionOpened {
        path: &'a Path,
        fields: &'a [FieldDescriptor],
    },
    /// Destination table dropped (if it existed).
    TableDropped { table: &'a str },
    /// Destination table created from the inferred fields.
    TableCreated { table: &'a str },
    /// Destination table truncated.
    TableTruncated { table: &'a str },
    /// One batch handed to the destination store.
    BatchWritten {
        batch_index: usize,
        rows: usize,
        total_rows: u64,
    },
    /// Load completed.
    Finished { total_rows: u64, elapsed: Duration },
}

/// Observer hook for load progress.
///
/// Implementors can record metrics, drive progress output, or just log.
pub trait LoadObserver: Send + Sync {
    /// Called for each progress event, in sequence.
    fn on_event(&self, event: &LoadEvent<'_>);

    /// Called once when the load fails, before the error propagates.
    fn on_failure(&self, _error: &LoadError) {}
}

/// Observer that discards all events.
#[derive(Debug, Default)]
pub struct NullObserver;

impl LoadObserver for NullObserver {
    fn on_event(&self, _event: &LoadEvent<'_>) {}
}

/// Forwards load events to `tracing`. Used by the CLI binary.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_event(&self, event: &LoadEvent<'_>) {
        match event {
            LoadEvent::SessionOpened { path, fields } => {
                info!(path = %path.display(), fields = fields.len(), "session opened");
                for f in *fields {
                    debug!(index = f.index, name = %f.name, definition = %f.type_definition, "field");
                }
            }
            LoadEvent::TableDropped { table } => debug!(table, "dropped table"),
            LoadEvent::TableCreated { table } => info!(table, "created table"),
            LoadEvent::TableTruncated { table } => info!(table, "truncated table"),
            LoadEvent::BatchWritten {
                batch_index,
                rows,
                total_rows,
            } => {
                info!(batch = batch_index, rows, total = total_rows, "inserted rows");
            }
            LoadEvent::Finished {
                total_rows,
                elapsed,
            } => {
                info!(rows = total_rows, ms = elapsed.as_millis() as u64, "done");
            }
        }
    }

    fn on_failure(&self, err: &LoadError) {
        error!(%err, "load failed");
    }
}
