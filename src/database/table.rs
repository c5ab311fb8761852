use crate::database::column::Column;
use indexmap::IndexMap;
use serde::Serialize;

/// A data row: raw cell strings keyed by column id, in header order.
pub type Row = IndexMap<String, String>;

/// Anything exposing columns and string-keyed rows can be profiled.
pub trait TabularSource {
    /// Column definitions in source order
    fn columns(&self) -> &[Column];

    /// Data rows in source order
    fn rows(&self) -> &[Row];
}

/// A validated table built from raw tabular input.
///
/// Cell values are kept exactly as imported; nothing is coerced.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Column definitions in header order
    pub columns: Vec<Column>,
    /// Retained data rows in source order
    pub rows: Vec<Row>,
    /// Number of rows retained
    pub row_count: usize,
    /// Number of data rows in the source before truncation
    pub raw_row_count: usize,
    /// Whether rows were dropped because of the row limit
    pub truncated: bool,
    /// Whether any column id differs from its raw header
    pub sanitized_headers: bool,
    /// Cell count of the header row
    pub expected_column_count: usize,
    /// Retained rows whose cell count differs from the header's
    pub inconsistent_row_count: usize,
    /// Number of rows callers are meant to display
    pub preview_rows: usize,
}

impl Table {
    /// Returns the first `preview_rows` rows (or fewer when the table is smaller).
    pub fn preview(&self) -> &[Row] {
        &self.rows[..self.preview_rows.min(self.rows.len())]
    }

    /// Looks up a column by id.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Reads the raw value of a cell.
    pub fn value(&self, row: usize, id: &str) -> Option<&str> {
        self.rows.get(row)?.get(id).map(String::as_str)
    }

    /// Returns the column ids in header order.
    pub fn column_ids(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.id.as_str()).collect()
    }
}

impl TabularSource for Table {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let rows: Vec<Row> = (1..=3)
            .map(|index| Row::from([("n".to_owned(), index.to_string())]))
            .collect();
        Table {
            columns: vec![Column::new("n", "N")],
            row_count: rows.len(),
            raw_row_count: rows.len(),
            rows,
            expected_column_count: 1,
            preview_rows: 2,
            ..Default::default()
        }
    }

    #[test]
    fn preview_slices_rows() {
        let mut table = table();
        assert_eq!(table.preview().len(), 2);
        table.preview_rows = 10;
        assert_eq!(table.preview().len(), 3);
        table.preview_rows = 0;
        assert!(table.preview().is_empty());
    }

    #[test]
    fn lookup_columns_and_values() {
        let table = table();
        assert_eq!(table.column("n").map(|column| column.raw_header.as_str()), Some("N"));
        assert!(table.column("missing").is_none());
        assert_eq!(table.value(2, "n"), Some("3"));
        assert_eq!(table.value(3, "n"), None);
        assert_eq!(table.column_ids(), vec!["n"]);
    }
}
