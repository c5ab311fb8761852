use crate::error::RustyDatasetError;
use serde::Deserialize;
use std::num::NonZeroUsize;

/// Rows shown by default when a caller previews an imported table.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Options controlling how raw input becomes a table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportOptions {
    /// Maximum number of data rows to retain (`None` = unbounded).
    pub max_rows: Option<NonZeroUsize>,

    /// Rows callers are meant to display. Informational only.
    pub preview_rows: usize,

    /// Field delimiter for delimited text.
    pub delimiter: char,

    /// Drop records produced by physically blank lines in delimited text.
    pub skip_empty_lines: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            max_rows: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            delimiter: ',',
            skip_empty_lines: true,
        }
    }
}

impl ImportOptions {
    /// Parses the option object sent by the editor, e.g. `{"maxRows": 500}`.
    /// Missing fields take their defaults and unrecognized ones are ignored; `maxRows: 0` is rejected.
    pub fn from_json(json: &str) -> Result<Self, RustyDatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_rows(mut self, max_rows: NonZeroUsize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_preview_rows(mut self, preview_rows: usize) -> Self {
        self.preview_rows = preview_rows;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_skip_empty_lines(mut self, skip_empty_lines: bool) -> Self {
        self.skip_empty_lines = skip_empty_lines;
        self
    }

    /// Number of rows retained out of `rows` data rows.
    pub(crate) fn retained(&self, rows: usize) -> usize {
        self.max_rows
            .map(|max_rows| rows.min(max_rows.get()))
            .unwrap_or(rows)
    }
}
