//! # Rusty Dataset
//!
//! Imports raw tabular data into a validated in-memory table and profiles it.
//!
//! ## Features
//!
//! - **CSV tokenization**: RFC 4180 style quoting with embedded delimiters, escaped
//!   quotes and line breaks inside quoted fields
//! - **Encoding detection**: UTF-8, UTF-16 (via byte order mark) and Windows-1252 fallback
//! - **Header sanitization**: Lowercase, unique, identifier-safe column ids
//! - **Row limits**: Truncation with raw and retained counts
//! - **Consistency diagnostics**: Ragged rows are padded or clipped and counted
//! - **Type inference**: Bool, number (currency, thousands, accounting negatives,
//!   percentages), date and string, with metric/dimension roles
//! - **Column statistics**: Null rate, distinct count, numeric range and mean, date range
//!
//! ## Entry points
//!
//! - [`parse_csv`] / [`parse_csv_bytes`] / [`parse_rows`]: build a [`Table`]
//! - [`infer_schema`] / [`infer_schema_json`]: profile its columns
//! - [`profile_csv`]: both steps at once
pub mod database;
pub mod error;
pub mod helpers;
pub mod importer;
pub mod inference;

pub use database::column::Column;
pub use database::column::ColumnRole;
pub use database::column::ColumnStats;
pub use database::column::ColumnType;
pub use database::column::InferredColumn;
pub use database::table::Row;
pub use database::table::Table;
pub use database::table::TabularSource;
pub use error::RustyDatasetError;
pub use helpers::csv::ParseError;
pub use importer::parse_csv;
pub use importer::parse_csv_bytes;
pub use importer::parse_rows;
pub use importer::ImportOptions;
pub use inference::infer_schema;
pub use inference::infer_schema_json;
pub use inference::InferenceOptions;
pub use inference::SchemaError;

/// Imports delimited bytes and infers the schema of the resulting table.
///
/// # Arguments
///
/// * `bytes` - Raw file contents in any supported encoding
/// * `import` - Row limit, preview size and delimiter
/// * `inference` - Threshold, null literals and type overrides
///
/// # Returns
///
/// * `Result<(Table, Vec<InferredColumn>), RustyDatasetError>` - The table and one profile per column
pub fn profile_csv(
    bytes: &[u8],
    import: &ImportOptions,
    inference: &InferenceOptions,
) -> Result<(Table, Vec<InferredColumn>), RustyDatasetError> {
    let table = parse_csv_bytes(bytes, import)?;
    let schema = infer_schema(&table, inference)?;
    Ok((table, schema))
}
