//! Lazy, batched extraction of body rows.

use calamine::{Data, Range};

use crate::error::{LoadError, LoadResult};
use crate::types::{CellValue, FieldDescriptor, RowBatch};

/// Row bounds for a load, 1-indexed against the whole sheet (the header is
/// row 1). `first_row` defaults to 2, the first row after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBounds {
    /// First sheet row to load (inclusive).
    pub first_row: u32,
    /// Last sheet row to load (inclusive); `None` means end of sheet.
    pub last_row: Option<u32>,
}

impl RowBounds {
    /// Resolve optional CLI bounds into concrete bounds.
    pub fn new(first_row: Option<u32>, last_row: Option<u32>) -> Self {
        Self {
            first_row: first_row.unwrap_or(2),
            last_row,
        }
    }
}

impl Default for RowBounds {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pull-based iterator over [`RowBatch`]es.
///
/// Single-pass and non-restartable: each call to `next` reads just enough
/// rows from the sheet to fill one batch, so peak memory is bounded by one
/// batch. Rows are yielded in strict source order. A wholly blank row is the
/// sheet's implicit end-of-data marker: it terminates the sequence and is
/// never loaded, regardless of populated rows further down. A stored error
/// cell fails the whole sequence and the batch containing it is never
/// yielded.
#[derive(Debug)]
pub struct BatchIter<'a> {
    range: &'a Range<Data>,
    fields: &'a [FieldDescriptor],
    batch_size: usize,
    /// Next sheet row to read, 0-based absolute.
    next_row: u32,
    /// Last sheet row to consider, 0-based absolute inclusive.
    end_row: u32,
    /// Used width of the sheet, for the blank-row check.
    max_col: u32,
    exhausted: bool,
}

impl<'a> BatchIter<'a> {
    pub(crate) fn new(
        range: &'a Range<Data>,
        fields: &'a [FieldDescriptor],
        bounds: RowBounds,
        batch_size: usize,
    ) -> LoadResult<Self> {
        if batch_size < 1 {
            return Err(LoadError::ArgumentValidation {
                message: format!("batch size must be >= 1, got {batch_size}"),
            });
        }
        if bounds.first_row < 1 {
            return Err(LoadError::ArgumentValidation {
                message: "first row is 1-indexed and must be >= 1".to_string(),
            });
        }

        let (sheet_end_row, max_col) = match range.end() {
            Some(end) => end,
            // Empty sheet: an iterator that is exhausted from the start.
            None => (0, 0),
        };
        let exhausted = range.end().is_none();

        let mut end_row = sheet_end_row;
        if let Some(last) = bounds.last_row {
            end_row = end_row.min(last.saturating_sub(1));
        }

        Ok(Self {
            range,
            fields,
            batch_size,
            next_row: bounds.first_row - 1,
            end_row,
            max_col,
            exhausted,
        })
    }

    fn row_is_blank(&self, row: u32) -> bool {
        (0..=self.max_col).all(|col| {
            cell_is_empty(self.range.get_value((row, col)).unwrap_or(&Data::Empty))
        })
    }

    fn extract_row(&self, row: u32) -> LoadResult<Vec<CellValue>> {
        let mut cells = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let cell = self
                .range
                .get_value((row, field.index as u32))
                .unwrap_or(&Data::Empty);
            // Report 1-based row number (Excel-like).
            cells.push(cell_to_value(cell, row + 1, field)?);
        }
        Ok(cells)
    }
}

impl Iterator for BatchIter<'_> {
    type Item = LoadResult<RowBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let mut rows = Vec::new();
        while rows.len() < self.batch_size && self.next_row <= self.end_row {
            let row = self.next_row;
            self.next_row += 1;

            if self.row_is_blank(row) {
                self.exhausted = true;
                break;
            }
            match self.extract_row(row) {
                Ok(cells) => rows.push(cells),
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
        if self.next_row > self.end_row {
            self.exhausted = true;
        }

        if rows.is_empty() {
            None
        } else {
            Some(Ok(RowBatch::new(rows)))
        }
    }
}

/// Convert one body cell into its destination representation.
///
/// `row` is the 1-based sheet row, used for diagnostics. Stored error values
/// (`#DIV/0!` and friends) are the one unconvertible case.
pub fn cell_to_value(cell: &Data, row: u32, field: &FieldDescriptor) -> LoadResult<CellValue> {
    match cell {
        Data::Empty => Ok(CellValue::Null),
        Data::String(s) => Ok(CellValue::Text(s.clone())),
        Data::Error(e) => Err(LoadError::CellRead {
            row,
            column: field.name.clone(),
            message: format!("cell holds error value {e:?}"),
        }),
        other => Ok(CellValue::Text(other.to_string())),
    }
}

fn cell_is_empty(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}
