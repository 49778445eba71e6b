//! Core data model for a load: inferred column descriptors, destination cell
//! values, and row batches.
//!
//! Every destination column shares one wide nullable text type; numeric and
//! date cells are coerced to their display text at extraction time and the
//! destination store performs the implicit conversion during bulk write.

/// Column-type clause applied to every inferred column unless overridden by
/// a format file.
pub const DEFAULT_COLUMN_TYPE: &str = "varchar(500) null";

/// Default number of rows per bulk-copy batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// One destination column, inferred from a header cell.
///
/// Created once during schema inference and immutable afterwards. Duplicate
/// header names are deliberately *not* deduplicated: two identical header
/// cells produce two descriptors differing only in `index`, and the
/// destination store decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Zero-based position in the source header row.
    pub index: usize,
    /// Column name, taken verbatim from the header cell text.
    pub name: String,
    /// Literal column-type clause used in `CREATE TABLE`.
    pub type_definition: String,
}

impl FieldDescriptor {
    /// Create a descriptor with the default column type.
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            type_definition: DEFAULT_COLUMN_TYPE.to_string(),
        }
    }
}

/// A single cell in its destination representation.
///
/// Destination columns are uniformly nullable text, so a cell is either null
/// or display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Missing/empty cell.
    Null,
    /// Cell content rendered as text.
    Text(String),
}

impl CellValue {
    /// Returns true for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the text content, or `None` for null cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) => Some(s.as_str()),
        }
    }
}

/// An ordered group of rows handed to the destination store in one bulk
/// write.
///
/// Invariants (maintained by the batcher): every row has exactly as many
/// values as there are field descriptors, missing trailing cells filled with
/// [`CellValue::Null`]; `row_count() <= batch_size`, and only the final
/// batch of a source may be smaller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBatch {
    /// Row-major cell storage, aligned positionally with the descriptors.
    pub rows: Vec<Vec<CellValue>>,
}

impl RowBatch {
    /// Create a batch from already-extracted rows.
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Number of rows in the batch.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the batch holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
