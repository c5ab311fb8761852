use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Errors related to column type parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColumnError {
    #[error("Invalid column type '{0}'")]
    TypeError(String),
}

/// Semantic type inferred for a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ColumnType {
    /// Numeric values, possibly formatted as currency, percent or accounting negatives
    Number,
    /// Calendar dates
    Date,
    /// Boolean literals (true/false, yes/no, y/n)
    Bool,
    /// Anything else
    String,
}

/// Analytical role of a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    /// Aggregatable measure
    Metric,
    /// Grouping or labelling attribute
    Dimension,
}

impl ColumnType {
    /// Returns the string representation used at the UI boundary.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Bool => "bool",
            ColumnType::String => "string",
        }
    }

    /// Parses a column type from a string representation.
    /// Supports various aliases for each type.
    pub fn parse(name: &str) -> Result<Self, ColumnError> {
        match name.to_ascii_uppercase().as_str() {
            "BOOL" | "BOOLEAN" => Ok(Self::Bool),
            "NUMBER" | "INT" | "INTEGER" | "FLOAT" | "DOUBLE" | "DECIMAL" | "NUMERIC" => Ok(Self::Number),
            "DATE" => Ok(Self::Date),
            "TEXT" | "STRING" | "VARCHAR" => Ok(Self::String),
            _ => Err(ColumnError::TypeError(name.to_string())),
        }
    }

    /// Only numeric columns are metrics; every other type is a dimension.
    pub const fn role(&self) -> ColumnRole {
        match self {
            ColumnType::Number => ColumnRole::Metric,
            _ => ColumnRole::Dimension,
        }
    }
}

impl TryFrom<String> for ColumnType {
    type Error = ColumnError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name)
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnRole {
    /// Returns the string representation used at the UI boundary.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Metric => "metric",
            ColumnRole::Dimension => "dimension",
        }
    }
}

impl Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A column of an imported table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Sanitized, unique, lowercase identifier
    pub id: String,
    /// Header text exactly as it appeared in the source
    pub raw_header: String,
}

impl Column {
    pub fn new(id: impl Into<String>, raw_header: impl Into<String>) -> Self {
        Column {
            id: id.into(),
            raw_header: raw_header.into(),
        }
    }
}

/// Descriptive statistics of a column.
///
/// `min`, `max` and `mean` are only present for numeric columns,
/// `earliest` and `latest` only for date columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    /// Fraction of rows whose value is empty or missing
    pub null_rate: f64,
    /// Number of rows with a value
    pub non_null_count: usize,
    /// Number of distinct trimmed values
    pub distinct_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<NaiveDate>,
}

/// A column enriched with its inferred type, role and statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferredColumn {
    #[serde(flatten)]
    pub column: Column,
    pub inferred_type: ColumnType,
    pub inferred_role: ColumnRole,
    pub stats: ColumnStats,
}

impl InferredColumn {
    /// Builds an inferred column; the role always follows the type.
    pub fn new(column: Column, inferred_type: ColumnType, stats: ColumnStats) -> Self {
        InferredColumn {
            column,
            inferred_type,
            inferred_role: inferred_type.role(),
            stats,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.column.id
    }
}
