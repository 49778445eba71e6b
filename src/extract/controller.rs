//! The load session: one open spreadsheet, its inferred schema, and the
//! batches drawn from it.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{LoadError, LoadResult};
use crate::types::FieldDescriptor;

use super::batch::{BatchIter, RowBounds};
use super::schema;

/// Façade over schema inference and batching, bound to one spreadsheet.
///
/// The controller owns the session exclusively: the workbook is opened in
/// [`LoadController::open`], the selected worksheet is materialized into an
/// in-memory range (releasing the OS file handle), and the schema is
/// inferred once. Dropping the controller releases everything, on error
/// paths included.
#[derive(Debug)]
pub struct LoadController {
    path: PathBuf,
    range: Range<Data>,
    fields: Vec<FieldDescriptor>,
    bounds: RowBounds,
}

impl LoadController {
    /// Open a spreadsheet, select a sheet by zero-based index, and infer the
    /// column list from its header row.
    ///
    /// Fails with [`LoadError::SourceNotFound`] when the file is missing or
    /// unreadable, or when the sheet index does not reference an existing
    /// sheet.
    pub fn open(
        path: impl AsRef<Path>,
        sheet_index: usize,
        bounds: RowBounds,
    ) -> LoadResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoadError::SourceNotFound {
                message: format!("file {} does not exist", path.display()),
            });
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::SourceNotFound {
            message: format!("cannot open {}: {e}", path.display()),
        })?;
        let names = workbook.sheet_names().to_vec();
        let name = names
            .get(sheet_index)
            .ok_or_else(|| LoadError::SourceNotFound {
                message: format!(
                    "sheet index {sheet_index} out of range, workbook has {} sheet(s)",
                    names.len()
                ),
            })?;
        let range = workbook.worksheet_range(name)?;
        let fields = schema::infer_fields(&range)?;

        Ok(Self {
            path: path.to_path_buf(),
            range,
            fields,
            bounds,
        })
    }

    /// Path the session was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The field descriptors inferred at open time, in header order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Row bounds this session was opened with.
    pub fn bounds(&self) -> RowBounds {
        self.bounds
    }

    /// Lazy batch sequence over the body rows, bound to [`Self::fields`].
    ///
    /// No batch is materialized until pulled; the sequence is single-pass.
    pub fn batches(&self, batch_size: usize) -> LoadResult<BatchIter<'_>> {
        BatchIter::new(&self.range, &self.fields, self.bounds, batch_size)
    }
}
