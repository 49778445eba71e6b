//! Optional TOML format file.
//!
//! Overrides the uniform default column type, globally and per column:
//!
//! ```toml
//! default_type = "nvarchar(max) null"
//!
//! [columns]
//! Amount = "decimal(18,2) null"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LoadError, LoadResult};
use crate::types::FieldDescriptor;

/// Parsed format file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatFile {
    /// Replacement for the built-in default column type.
    pub default_type: Option<String>,
    /// Per-column type overrides, keyed by header name.
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
}

impl FormatFile {
    /// Read and parse a TOML format file.
    pub fn from_path(path: impl AsRef<Path>) -> LoadResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Apply the overrides to inferred fields.
    ///
    /// An override naming a column that does not exist in the header is
    /// rejected, so a typo cannot silently load a column as plain text.
    /// Duplicate header names all receive the same override.
    pub fn apply(&self, fields: &mut [FieldDescriptor]) -> LoadResult<()> {
        if let Some(ty) = &self.default_type {
            for field in fields.iter_mut() {
                field.type_definition = ty.clone();
            }
        }
        for (name, ty) in &self.columns {
            let mut matched = false;
            for field in fields.iter_mut().filter(|f| &f.name == name) {
                field.type_definition = ty.clone();
                matched = true;
            }
            if !matched {
                return Err(LoadError::ArgumentValidation {
                    message: format!("format file references unknown column '{name}'"),
                });
            }
        }
        Ok(())
    }
}
