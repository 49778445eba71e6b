use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use apbcp::extract::{LoadController, RowBounds};
use apbcp::LoadError;
use rust_xlsxwriter::Workbook;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("apbcp-{name}-{nanos}.xlsx"))
}

fn write_headers(path: &PathBuf, headers: &[&str]) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    for (col, h) in headers.iter().enumerate() {
        ws.write_string(0, col as u16, *h).unwrap();
    }
    // One body row so the sheet is not header-only.
    ws.write_string(1, 0, "x").unwrap();
    wb.save(path).unwrap();
}

fn open(path: &PathBuf) -> Result<LoadController, LoadError> {
    LoadController::open(path, 0, RowBounds::default())
}

#[test]
fn n_leading_header_cells_become_n_fields_in_order() {
    let path = tmp_file("headers");
    write_headers(&path, &["Id", "Name", "Email"]);

    let session = open(&path).unwrap();
    let fields = session.fields();
    assert_eq!(fields.len(), 3);
    for (i, name) in ["Id", "Name", "Email"].iter().enumerate() {
        assert_eq!(fields[i].index, i);
        assert_eq!(fields[i].name, *name);
        assert_eq!(fields[i].type_definition, "varchar(500) null");
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn header_scan_stops_at_first_empty_cell() {
    let path = tmp_file("gap");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Id").unwrap();
    ws.write_string(0, 1, "Name").unwrap();
    // column 2 left empty; column 3 populated but past the gap
    ws.write_string(0, 3, "Ignored").unwrap();
    wb.save(&path).unwrap();

    let session = open(&path).unwrap();
    let names: Vec<_> = session.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Id", "Name"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn numeric_and_bool_headers_are_coerced_to_display_text() {
    let path = tmp_file("coerce");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Id").unwrap();
    ws.write_number(0, 1, 2024.0).unwrap();
    ws.write_boolean(0, 2, true).unwrap();
    wb.save(&path).unwrap();

    let session = open(&path).unwrap();
    let names: Vec<_> = session.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Id", "2024", "true"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn whitespace_only_header_cell_is_rejected_with_its_index() {
    let path = tmp_file("blank-header");
    write_headers(&path, &["Id", "   "]);

    match open(&path).err() {
        Some(LoadError::InvalidColumnName { index }) => assert_eq!(index, 1),
        other => panic!("expected InvalidColumnName, got {other:?}"),
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_sheet_is_an_empty_schema() {
    let path = tmp_file("empty");
    let mut wb = Workbook::new();
    wb.add_worksheet();
    wb.save(&path).unwrap();

    assert!(matches!(open(&path), Err(LoadError::EmptySchema)));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn duplicate_header_names_are_preserved_not_deduplicated() {
    let path = tmp_file("dupes");
    write_headers(&path, &["Id", "Name", "Name"]);

    let session = open(&path).unwrap();
    let fields = session.fields();
    assert_eq!(fields[1].name, "Name");
    assert_eq!(fields[2].name, "Name");
    assert_ne!(fields[1].index, fields[2].index);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_source_not_found() {
    let path = tmp_file("never-written");
    assert!(matches!(open(&path), Err(LoadError::SourceNotFound { .. })));
}

#[test]
fn sheet_index_out_of_range_is_source_not_found() {
    let path = tmp_file("one-sheet");
    write_headers(&path, &["Id"]);

    let err = LoadController::open(&path, 5, RowBounds::default()).unwrap_err();
    assert!(matches!(err, LoadError::SourceNotFound { .. }));

    let _ = std::fs::remove_file(&path);
}
