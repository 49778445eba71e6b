use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use apbcp::destination::{BulkWriter, TableManager};
use apbcp::extract::{LoadEvent, LoadObserver};
use apbcp::loader::{load_spreadsheet, FormatFile, LoadOptions};
use apbcp::types::{FieldDescriptor, RowBatch};
use apbcp::{LoadError, LoadResult};
use rust_xlsxwriter::Workbook;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("apbcp-{name}-{nanos}.xlsx"))
}

fn write_people(path: &PathBuf, rows: &[(&str, &str)]) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Id").unwrap();
    ws.write_string(0, 1, "Name").unwrap();
    for (i, (id, name)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        ws.write_string(r, 0, *id).unwrap();
        ws.write_string(r, 1, *name).unwrap();
    }
    wb.save(path).unwrap();
}

/// Shared state of the in-memory destination, inspectable after the load.
#[derive(Default)]
struct MockState {
    ops: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    created_fields: Option<Vec<FieldDescriptor>>,
    fail_on_batch: Option<usize>,
    batches_written: usize,
    connects: usize,
}

struct MockDestination {
    state: Arc<Mutex<MockState>>,
}

impl TableManager for MockDestination {
    fn drop_table(&mut self, table: &str) -> LoadResult<()> {
        let mut s = self.state.lock().unwrap();
        s.ops.push(format!("drop {table}"));
        s.rows.clear();
        Ok(())
    }

    fn create_table(&mut self, table: &str, fields: &[FieldDescriptor]) -> LoadResult<()> {
        let mut s = self.state.lock().unwrap();
        s.ops.push(format!("create {table}"));
        s.created_fields = Some(fields.to_vec());
        s.rows.clear();
        Ok(())
    }

    fn truncate_table(&mut self, table: &str) -> LoadResult<()> {
        let mut s = self.state.lock().unwrap();
        s.ops.push(format!("truncate {table}"));
        s.rows.clear();
        Ok(())
    }
}

impl BulkWriter for MockDestination {
    fn write_batch(&mut self, table: &str, batch: &RowBatch) -> LoadResult<usize> {
        let mut s = self.state.lock().unwrap();
        if s.fail_on_batch == Some(s.batches_written) {
            return Err(LoadError::Destination {
                message: "simulated bulk-copy failure".to_string(),
            });
        }
        s.batches_written += 1;
        s.ops.push(format!("write {table} {}", batch.row_count()));
        for row in &batch.rows {
            s.rows
                .push(row.iter().map(|c| c.as_text().map(ToOwned::to_owned)).collect());
        }
        Ok(batch.row_count())
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl LoadObserver for RecordingObserver {
    fn on_event(&self, event: &LoadEvent<'_>) {
        let label = match event {
            LoadEvent::SessionOpened { fields, .. } => format!("session {}", fields.len()),
            LoadEvent::TableDropped { .. } => "dropped".to_string(),
            LoadEvent::TableCreated { .. } => "created".to_string(),
            LoadEvent::TableTruncated { .. } => "truncated".to_string(),
            LoadEvent::BatchWritten {
                batch_index, rows, ..
            } => format!("batch {batch_index} rows {rows}"),
            LoadEvent::Finished { total_rows, .. } => format!("finished {total_rows}"),
        };
        self.events.lock().unwrap().push(label);
    }

    fn on_failure(&self, error: &LoadError) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

fn run(
    path: &PathBuf,
    options: &LoadOptions,
    format: Option<&FormatFile>,
    state: &Arc<Mutex<MockState>>,
    observer: &RecordingObserver,
) -> LoadResult<u64> {
    let connect_state = state.clone();
    load_spreadsheet(
        path,
        "people",
        options,
        format,
        move || {
            connect_state.lock().unwrap().connects += 1;
            Ok(MockDestination {
                state: connect_state.clone(),
            })
        },
        observer,
    )
}

#[test]
fn full_sequence_is_drop_create_truncate_then_writes() {
    let path = tmp_file("sequence");
    write_people(&path, &[("1", "Alice"), ("2", "Bob"), ("3", "Carol")]);
    let state = Arc::new(Mutex::new(MockState::default()));
    let observer = RecordingObserver::default();

    let total = run(&path, &LoadOptions { batch_size: 2, ..Default::default() }, None, &state, &observer).unwrap();
    assert_eq!(total, 3);

    let s = state.lock().unwrap();
    assert_eq!(
        s.ops,
        vec!["drop people", "create people", "truncate people", "write people 2", "write people 1"]
    );
    let created = s.created_fields.as_ref().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].name, "Id");
    assert_eq!(
        s.rows[0],
        vec![Some("1".to_string()), Some("Alice".to_string())]
    );

    let events = observer.events.lock().unwrap();
    assert_eq!(
        *events,
        vec!["session 2", "dropped", "created", "truncated", "batch 0 rows 2", "batch 1 rows 1", "finished 3"]
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn nocreate_and_keep_skip_ddl_and_truncate() {
    let path = tmp_file("gates");
    write_people(&path, &[("1", "Alice")]);
    let state = Arc::new(Mutex::new(MockState::default()));
    let observer = RecordingObserver::default();

    let options = LoadOptions {
        create_table: false,
        truncate: false,
        ..Default::default()
    };
    run(&path, &options, None, &state, &observer).unwrap();

    let s = state.lock().unwrap();
    assert_eq!(s.ops, vec!["write people 1"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn write_failure_aborts_and_leaves_earlier_batches_in_place() {
    let path = tmp_file("partial");
    write_people(&path, &[("1", "a"), ("2", "b"), ("3", "c"), ("4", "d")]);
    let state = Arc::new(Mutex::new(MockState::default()));
    state.lock().unwrap().fail_on_batch = Some(1);
    let observer = RecordingObserver::default();

    let options = LoadOptions { batch_size: 2, ..Default::default() };
    let err = run(&path, &options, None, &state, &observer).unwrap_err();
    assert!(matches!(err, LoadError::Destination { .. }));

    // Documented partial-load behavior: the first batch stays, nothing is
    // rolled back, and no later batch is attempted.
    let s = state.lock().unwrap();
    assert_eq!(s.rows.len(), 2);
    assert_eq!(s.batches_written, 1);
    assert_eq!(observer.failures.lock().unwrap().len(), 1);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_fails_before_any_destination_connection() {
    let path = tmp_file("missing");
    let state = Arc::new(Mutex::new(MockState::default()));
    let observer = RecordingObserver::default();

    let err = run(&path, &LoadOptions::default(), None, &state, &observer).unwrap_err();
    assert!(matches!(err, LoadError::SourceNotFound { .. }));
    assert_eq!(state.lock().unwrap().connects, 0);
}

#[test]
fn reloading_the_same_sheet_is_idempotent() {
    let path = tmp_file("idempotent");
    write_people(&path, &[("1", "Alice"), ("2", "Bob")]);
    let state = Arc::new(Mutex::new(MockState::default()));
    let observer = RecordingObserver::default();

    let first = run(&path, &LoadOptions::default(), None, &state, &observer).unwrap();
    let rows_after_first = state.lock().unwrap().rows.clone();
    let second = run(&path, &LoadOptions::default(), None, &state, &observer).unwrap();
    let s = state.lock().unwrap();

    assert_eq!(first, second);
    assert_eq!(s.rows, rows_after_first);
    assert_eq!(s.created_fields.as_ref().unwrap().len(), 2);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn duplicate_header_names_reach_the_destination_untouched() {
    let path = tmp_file("dupes");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Name").unwrap();
    ws.write_string(0, 1, "Name").unwrap();
    ws.write_string(1, 0, "a").unwrap();
    ws.write_string(1, 1, "b").unwrap();
    wb.save(&path).unwrap();

    let state = Arc::new(Mutex::new(MockState::default()));
    let observer = RecordingObserver::default();
    run(&path, &LoadOptions::default(), None, &state, &observer).unwrap();

    // Whether duplicate column names are legal is the store's decision; the
    // loader must hand them over as-is.
    let s = state.lock().unwrap();
    let names: Vec<_> = s
        .created_fields
        .as_ref()
        .unwrap()
        .iter()
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(names, vec!["Name", "Name"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn format_file_overrides_column_types_before_ddl() {
    let path = tmp_file("format");
    write_people(&path, &[("1", "Alice")]);
    let state = Arc::new(Mutex::new(MockState::default()));
    let observer = RecordingObserver::default();

    let mut columns = std::collections::BTreeMap::new();
    columns.insert("Id".to_string(), "int not null".to_string());
    let format = FormatFile {
        default_type: Some("nvarchar(max) null".to_string()),
        columns,
    };

    run(&path, &LoadOptions::default(), Some(&format), &state, &observer).unwrap();

    let s = state.lock().unwrap();
    let created = s.created_fields.as_ref().unwrap();
    assert_eq!(created[0].type_definition, "int not null");
    assert_eq!(created[1].type_definition, "nvarchar(max) null");

    let _ = std::fs::remove_file(&path);
}
