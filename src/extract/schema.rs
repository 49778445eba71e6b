//! Schema inference from the header row.

use calamine::{Data, Range};

use crate::error::{LoadError, LoadResult};
use crate::types::FieldDescriptor;

/// Derive the ordered column list from row 1 of a worksheet.
///
/// One [`FieldDescriptor`] is created per populated leading header cell,
/// left to right; scanning stops at the first empty cell. Non-string cells
/// (numbers, dates, bools) are coerced to their display text. No body data
/// is inspected: every column gets the uniform default type clause.
///
/// Errors:
/// - [`LoadError::EmptySchema`] when row 1 has no populated cells
/// - [`LoadError::InvalidColumnName`] when a header cell is whitespace-only
/// - [`LoadError::CellRead`] when a header cell holds a stored error value
pub fn infer_fields(range: &Range<Data>) -> LoadResult<Vec<FieldDescriptor>> {
    let max_col = match range.end() {
        Some((_, col)) => col,
        None => return Err(LoadError::EmptySchema),
    };

    let mut fields = Vec::new();
    for col in 0..=max_col {
        let cell = range.get_value((0, col)).unwrap_or(&Data::Empty);
        // An empty-string cell counts as unpopulated, same as a missing one.
        if matches!(cell, Data::Empty) || matches!(cell, Data::String(s) if s.is_empty()) {
            break;
        }
        if let Data::Error(e) = cell {
            return Err(LoadError::CellRead {
                row: 1,
                column: format!("#{col}"),
                message: format!("header cell holds error value {e:?}"),
            });
        }

        let name = header_text(cell);
        if name.trim().is_empty() {
            return Err(LoadError::InvalidColumnName { index: col as usize });
        }
        fields.push(FieldDescriptor::new(col as usize, name));
    }

    if fields.is_empty() {
        return Err(LoadError::EmptySchema);
    }
    Ok(fields)
}

/// Render a header cell as column-name text.
fn header_text(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
