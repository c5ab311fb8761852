use thiserror::Error;

/// Main error type for the Rusty Dataset crate.
/// Aggregates errors from the tokenizer, the inferrer and option parsing.
#[derive(Error, Debug)]
pub enum RustyDatasetError {
    // Importer errors
    #[error("{0}")]
    ParseError(#[from] crate::helpers::csv::ParseError),

    // Inferrer errors
    #[error("{0}")]
    SchemaError(#[from] crate::inference::SchemaError),

    // Third-party library errors
    #[error("invalid options: {0}")]
    OptionsError(#[from] serde_json::Error),
}

impl RustyDatasetError {
    /// Machine-checkable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            RustyDatasetError::ParseError(error) => error.kind(),
            RustyDatasetError::SchemaError(error) => error.kind(),
            RustyDatasetError::OptionsError(_) => "invalid options",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::csv::ParseError;
    use crate::inference::SchemaError;

    #[test]
    fn kinds_pass_through() {
        let error = RustyDatasetError::from(ParseError::UnterminatedQuote { line: 3 });
        assert_eq!(error.kind(), "unterminated quote");
        assert_eq!(
            error.to_string(),
            "unterminated quote: quoted field opened on line 3 is never closed"
        );

        let error = RustyDatasetError::from(SchemaError::InvalidTable("missing field `rows`".to_owned()));
        assert_eq!(error.kind(), "structurally invalid table");
        assert_eq!(error.to_string(), "invalid table: missing field `rows`");
    }

    #[test]
    fn options_errors() {
        let error: RustyDatasetError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert_eq!(error.kind(), "invalid options");
        assert!(error.to_string().starts_with("invalid options: "));
    }
}
