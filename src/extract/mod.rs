//! Spreadsheet-side engine.
//!
//! - [`schema`]: header-row schema inference
//! - [`batch`]: lazy batched row extraction
//! - [`controller`]: the session façade tying the two together
//! - [`observability`]: progress hooks injected into the orchestrator

pub mod batch;
pub mod controller;
pub mod observability;
pub mod schema;

pub use batch::{cell_to_value, BatchIter, RowBounds};
pub use controller::LoadController;
pub use observability::{LoadEvent, LoadObserver, NullObserver, TracingObserver};
pub use schema::infer_fields;
