//! # Schema Inferrer
//!
//! Profiles every column of a table: an inferred type, a role (metric or
//! dimension) and descriptive statistics. Raw cell values are only read.
//!
//! Type inference priority (first rule accepting enough non-empty values wins):
//! 1. Bool - true/false, yes/no, y/n
//! 2. Number - plain or formatted numbers (currency, thousands, `(x)`, `x%`)
//! 3. Date - `YYYY-MM-DD`, `YYYY/MM/DD`, `M/D/YYYY`
//! 4. String - fallback for mixed, free-text or fully empty columns
use crate::database::column::Column;
use crate::database::column::ColumnType;
use crate::database::column::InferredColumn;
use crate::database::table::Row;
use crate::database::table::TabularSource;
use crate::error::RustyDatasetError;
use crate::inference::cell::read_as;
use crate::inference::cell::RULES;
use crate::inference::stats::StatsAccumulator;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::collections::HashSet;
use thiserror::Error;

pub mod cell;
pub(crate) mod stats;

/// Fraction of non-empty values a rule must accept for its type to be chosen.
/// Every value has to conform by default; lower it to tolerate stray values.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 1.0;

/// Errors raised for input that does not have the shape of a table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("invalid table: {0}")]
    InvalidTable(String),
}

impl SchemaError {
    /// Machine-checkable kind of the error.
    pub const fn kind(&self) -> &'static str {
        match self {
            SchemaError::InvalidTable(_) => "structurally invalid table",
        }
    }
}

/// Options controlling type detection.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InferenceOptions {
    /// Fraction of non-empty values a rule must accept, in (0, 1].
    pub match_threshold: f64,

    /// Literal values treated as missing, compared after trimming.
    pub nulls: HashSet<String>,

    /// Rows sampled for type detection (`None` = all rows).
    /// Null rates and statistics always cover every row.
    pub analyze_rows: Option<usize>,

    /// Column types fixed by the caller, keyed by column id; detection is skipped for them.
    pub columns: HashMap<String, ColumnType>,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        InferenceOptions {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            nulls: HashSet::from([String::new()]),
            analyze_rows: None,
            columns: HashMap::new(),
        }
    }
}

impl InferenceOptions {
    /// Parses an option object such as `{"nulls": ["", "NA"]}`.
    pub fn from_json(json: &str) -> Result<Self, RustyDatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_match_threshold(mut self, match_threshold: f64) -> Self {
        self.match_threshold = match_threshold;
        self
    }

    pub fn with_nulls<I, S>(mut self, nulls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nulls = nulls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_analyze_rows(mut self, analyze_rows: usize) -> Self {
        self.analyze_rows = Some(analyze_rows);
        self
    }

    pub fn with_column_type(mut self, id: impl Into<String>, kind: ColumnType) -> Self {
        self.columns.insert(id.into(), kind);
        self
    }

    /// Effective threshold; out-of-range values fall back to the default.
    fn threshold(&self) -> f64 {
        if self.match_threshold > 0.0 && self.match_threshold <= 1.0 {
            self.match_threshold
        } else {
            DEFAULT_MATCH_THRESHOLD
        }
    }

    /// Whether a trimmed value counts as missing.
    fn is_null(&self, value: &str) -> bool {
        value.is_empty() || self.nulls.contains(value)
    }
}

/// Picks the first rule accepted by at least `threshold` of the values.
/// Columns without any value are strings.
pub(crate) fn detect_type(values: &[&str], threshold: f64) -> ColumnType {
    if values.is_empty() {
        return ColumnType::String;
    }
    let required = threshold * values.len() as f64;
    RULES
        .iter()
        .find(|rule| {
            let matched = values
                .iter()
                .filter(|&&value| (rule.accept)(value).is_some())
                .count();
            matched as f64 >= required
        })
        .map(|rule| rule.kind)
        .unwrap_or(ColumnType::String)
}

/// Infers type, role and statistics of a single column.
fn infer_column(column: &Column, rows: &[Row], options: &InferenceOptions) -> InferredColumn {
    let values: Vec<Option<&str>> = rows
        .iter()
        .map(|row| {
            row.get(column.id.as_str())
                .map(|value| value.trim())
                .filter(|value| !options.is_null(value))
        })
        .collect();

    let kind = match options.columns.get(&column.id) {
        Some(&kind) => kind,
        None => {
            let sampled = options
                .analyze_rows
                .map(|analyze_rows| analyze_rows.min(values.len()))
                .unwrap_or(values.len());
            let sample: Vec<&str> = values[..sampled].iter().flatten().copied().collect();
            detect_type(&sample, options.threshold())
        }
    };

    let mut accumulator = StatsAccumulator::default();
    for value in &values {
        match value {
            Some(text) => accumulator.push(text, read_as(kind, text)),
            None => accumulator.push_missing(),
        }
    }
    let stats = accumulator.finish();
    debug!(
        "Column '{}' inferred as {} (null rate {:.3})",
        column.id, kind, stats.null_rate
    );
    InferredColumn::new(column.to_owned(), kind, stats)
}

/// Rejects column sets that cannot be addressed unambiguously.
fn validate(columns: &[Column]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for column in columns {
        if column.id.is_empty() {
            Err(SchemaError::InvalidTable("empty column id".to_owned()))?;
        }
        if !seen.insert(column.id.as_str()) {
            Err(SchemaError::InvalidTable(format!("duplicate column id '{}'", column.id)))?;
        }
    }
    Ok(())
}

/// Infers the schema of a table.
///
/// # Arguments
/// * `source` - A [`Table`](crate::Table) or any other [`TabularSource`]
/// * `options` - Threshold, null literals and sampling
///
/// # Returns
/// * `Result<Vec<InferredColumn>, SchemaError>` - One entry per column, in column order
///
/// # Errors
/// Fails only for structurally invalid input (empty or duplicated column ids).
/// Malformed cell values never fail; they push the column towards `string`.
pub fn infer_schema<S>(source: &S, options: &InferenceOptions) -> Result<Vec<InferredColumn>, SchemaError>
where
    S: TabularSource + ?Sized,
{
    validate(source.columns())?;
    let rows = source.rows();
    Ok(source
        .columns()
        .iter()
        .map(|column| infer_column(column, rows, options))
        .collect())
}

/// Column as received over the JSON boundary.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonColumn {
    id: String,
    #[serde(default)]
    raw_header: Option<String>,
}

/// Table as received over the JSON boundary; `null` cells are missing values.
#[derive(Deserialize)]
struct JsonTable {
    columns: Vec<JsonColumn>,
    rows: Vec<IndexMap<String, Option<String>>>,
}

/// A table rebuilt from JSON.
struct JsonSource {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl TabularSource for JsonSource {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl TryFrom<&serde_json::Value> for JsonSource {
    type Error = SchemaError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        if !value.is_object() {
            Err(SchemaError::InvalidTable("expected an object with columns and rows".to_owned()))?;
        }
        let table = JsonTable::deserialize(value).map_err(|error| SchemaError::InvalidTable(error.to_string()))?;
        Ok(JsonSource {
            columns: table
                .columns
                .into_iter()
                .map(|column| {
                    let raw_header = column.raw_header.unwrap_or_else(|| column.id.to_owned());
                    Column::new(column.id, raw_header)
                })
                .collect(),
            rows: table
                .rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .filter_map(|(id, value)| value.map(|value| (id, value)))
                        .collect()
                })
                .collect(),
        })
    }
}

/// Infers the schema of a loosely typed table object, e.g. one posted by the editor.
///
/// # Errors
/// Fails with [`SchemaError::InvalidTable`] when `columns` or `rows` is missing or
/// has the wrong shape.
pub fn infer_schema_json(value: &serde_json::Value, options: &InferenceOptions) -> Result<Vec<InferredColumn>, SchemaError> {
    let source = JsonSource::try_from(value)?;
    infer_schema(&source, options)
}
