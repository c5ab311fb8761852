//! # Dataset Importer
//!
//! Turns raw delimited text or a matrix of string rows into a [`Table`]:
//! sanitized column ids, rows keyed by id and import diagnostics.
//!
//! The first row is always the header. Data rows are never rejected:
//! rows narrower than the header are padded with empty strings, wider rows
//! lose their extra trailing cells, and both are counted as inconsistent.
use crate::database::header::sanitize_headers;
use crate::database::table::Row;
use crate::database::table::Table;
use crate::helpers::csv::CsvReader;
use crate::helpers::csv::ParseError;
use crate::helpers::text::decode_text;
use crate::helpers::text::strip_bom;
use log::debug;
use log::warn;

pub mod options;

pub use options::ImportOptions;
pub use options::DEFAULT_PREVIEW_ROWS;

/// Parses comma-delimited text whose first line is the header.
///
/// # Arguments
/// * `text` - Raw delimited text
/// * `options` - Row limit, preview size and delimiter
///
/// # Returns
/// * `Result<Table, ParseError>` - The table, or a parse error for malformed quoting
///
/// # Errors
/// Fails with [`ParseError::UnterminatedQuote`] when a quoted field is never closed and
/// with [`ParseError::UnexpectedQuote`] when a closing quote is followed by stray text.
pub fn parse_csv(text: &str, options: &ImportOptions) -> Result<Table, ParseError> {
    let records = CsvReader::new(strip_bom(text), options.delimiter)?
        .skip_empty_lines(options.skip_empty_lines)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parse_rows(&records, options))
}

/// Parses delimited text supplied as raw bytes, decoding it first.
///
/// Byte order marks select the encoding; otherwise UTF-8 is tried and
/// Windows-1252 is the fallback.
pub fn parse_csv_bytes(bytes: &[u8], options: &ImportOptions) -> Result<Table, ParseError> {
    parse_csv(&decode_text(bytes), options)
}

/// Normalizes a row matrix whose first row is the header.
///
/// # Arguments
/// * `rows` - Header row followed by data rows
/// * `options` - Row limit and preview size
///
/// # Returns
/// * `Table` - Malformed rows only show up in the diagnostics
pub fn parse_rows<R, S>(rows: &[R], options: &ImportOptions) -> Table
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let Some((header, data)) = rows.split_first() else {
        debug!("Import received no header row");
        return Table {
            preview_rows: options.preview_rows,
            ..Default::default()
        };
    };
    let header = header.as_ref();
    let expected_column_count = header.len();
    let (columns, sanitized_headers) = sanitize_headers(header);

    let raw_row_count = data.len();
    let retained = &data[..options.retained(raw_row_count)];
    let truncated = retained.len() < raw_row_count;

    let mut inconsistent_row_count = 0;
    let rows: Vec<Row> = retained
        .iter()
        .map(|record| {
            let cells = record.as_ref();
            if cells.len() != expected_column_count {
                inconsistent_row_count += 1;
            }
            columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    let value = cells.get(index).map(|cell| cell.as_ref()).unwrap_or_default();
                    (column.id.to_owned(), value.to_owned())
                })
                .collect()
        })
        .collect();

    if truncated {
        warn!("Import truncated to {} of {} rows", rows.len(), raw_row_count);
    }
    if inconsistent_row_count > 0 {
        warn!(
            "{} of {} rows do not have {} cells",
            inconsistent_row_count,
            rows.len(),
            expected_column_count
        );
    }
    debug!(
        "Imported {} columns and {} rows (sanitized headers: {})",
        columns.len(),
        rows.len(),
        sanitized_headers
    );

    Table {
        columns,
        row_count: rows.len(),
        rows,
        raw_row_count,
        truncated,
        sanitized_headers,
        expected_column_count,
        inconsistent_row_count,
        preview_rows: options.preview_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn limit(max_rows: usize) -> ImportOptions {
        ImportOptions::default().with_max_rows(NonZeroUsize::new(max_rows).unwrap())
    }

    #[test]
    fn parse_csv_with_quotes_and_duplicate_headers() {
        let text = "Name,,Name,Amount\n\"Alice\",\"Smith, Jr\",Alice,10\nBob,,Bob,20\n";
        let table = parse_csv(text, &ImportOptions::default()).unwrap();
        assert_eq!(table.column_ids(), vec!["name", "column_2", "name_2", "amount"]);
        assert!(table.sanitized_headers);
        assert_eq!(table.value(0, "column_2"), Some("Smith, Jr"));
        assert_eq!(table.value(1, "amount"), Some("20"));
        assert_eq!(table.row_count, 2);
        assert_eq!(table.raw_row_count, 2);
        assert!(!table.truncated);
        assert_eq!(table.inconsistent_row_count, 0);
    }

    #[test]
    fn parse_csv_unterminated_quote() {
        let error = parse_csv("name\n\"Alice", &ImportOptions::default()).unwrap_err();
        assert_eq!(error.kind(), "unterminated quote");
    }

    #[test]
    fn parse_csv_with_bom_and_crlf() {
        let table = parse_csv("\u{feff}id,label\r\n1,a\r\n", &ImportOptions::default()).unwrap();
        assert_eq!(table.column_ids(), vec!["id", "label"]);
        assert_eq!(table.value(0, "label"), Some("a"));
        assert!(!table.sanitized_headers);
    }

    #[test]
    fn parse_csv_bytes_decodes_input() {
        let table = parse_csv_bytes(b"\xEF\xBB\xBFcity\nM\xC3\xBCnchen\n", &ImportOptions::default()).unwrap();
        assert_eq!(table.value(0, "city"), Some("M\u{fc}nchen"));

        let table = parse_csv_bytes(b"city\nM\xFCnchen\n", &ImportOptions::default()).unwrap();
        assert_eq!(table.value(0, "city"), Some("M\u{fc}nchen"));
    }

    #[test]
    fn rows_keep_header_order() {
        let table = parse_csv("b,a\n1,2\n", &ImportOptions::default()).unwrap();
        let keys: Vec<&str> = table.rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(serde_json::to_string(&table.rows[0]).unwrap(), r#"{"b":"1","a":"2"}"#);
    }

    #[test]
    fn parse_csv_with_custom_delimiter() {
        let options = ImportOptions::default().with_delimiter('\t');
        let table = parse_csv("a\tb\n1\t2\n", &options).unwrap();
        assert_eq!(table.value(0, "b"), Some("2"));
    }

    #[test]
    fn parse_csv_blank_lines() {
        let text = "a,b\n1,2\n\n3,4\n\n";
        let table = parse_csv(text, &ImportOptions::default()).unwrap();
        assert_eq!(table.row_count, 2);
        assert_eq!(table.inconsistent_row_count, 0);

        let options = ImportOptions::default().with_skip_empty_lines(false);
        let table = parse_csv(text, &options).unwrap();
        assert_eq!(table.row_count, 4);
        assert_eq!(table.inconsistent_row_count, 2);
    }

    #[test]
    fn parse_rows_pads_and_drops_cells() {
        let rows = vec![vec!["A", "B"], vec!["1"], vec!["2", "3", "4"]];
        let table = parse_rows(&rows, &ImportOptions::default());
        assert_eq!(table.expected_column_count, 2);
        assert_eq!(table.inconsistent_row_count, 2);
        assert_eq!(table.value(0, "a"), Some("1"));
        assert_eq!(table.value(0, "b"), Some(""));
        assert_eq!(table.value(1, "b"), Some("3"));
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn parse_rows_truncates() {
        let rows = vec![vec!["A"], vec!["1"], vec!["2"], vec!["3"]];
        let table = parse_rows(&rows, &limit(2));
        assert!(table.truncated);
        assert_eq!(table.row_count, 2);
        assert_eq!(table.raw_row_count, 3);
        assert_eq!(table.value(1, "a"), Some("2"));
    }

    #[test]
    fn parse_rows_limit_not_reached() {
        let rows = vec![vec!["A"], vec!["1"], vec!["2"]];
        let table = parse_rows(&rows, &limit(2));
        assert!(!table.truncated);
        assert_eq!(table.row_count, 2);
        assert_eq!(table.raw_row_count, 2);
    }

    #[test]
    fn parse_rows_checks_consistency_after_truncation() {
        let rows = vec![vec!["A", "B"], vec!["1", "2"], vec!["3"], vec!["4"]];
        let table = parse_rows(&rows, &limit(2));
        assert_eq!(table.inconsistent_row_count, 1);
    }

    #[test]
    fn parse_rows_keeps_order_and_raw_values() {
        let rows = vec![vec!["Price"], vec![" $1,000 "], vec!["(5)"]];
        let table = parse_rows(&rows, &ImportOptions::default());
        assert_eq!(table.value(0, "price"), Some(" $1,000 "));
        assert_eq!(table.value(1, "price"), Some("(5)"));
    }

    #[test]
    fn parse_rows_preview_is_informational() {
        let rows = vec![vec!["A"], vec!["1"], vec!["2"], vec!["3"]];
        let options = limit(2).with_preview_rows(10);
        let table = parse_rows(&rows, &options);
        assert_eq!(table.preview_rows, 10);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.preview().len(), 2);
    }

    #[test]
    fn parse_rows_empty_input() {
        let rows: Vec<Vec<String>> = Vec::new();
        let table = parse_rows(&rows, &ImportOptions::default());
        assert!(table.columns.is_empty());
        assert_eq!(table.row_count, 0);
        assert_eq!(table.expected_column_count, 0);

        let table = parse_csv("", &ImportOptions::default()).unwrap();
        assert!(table.columns.is_empty());
    }

    #[test]
    fn parse_rows_header_only() {
        let table = parse_rows(&[vec!["a", "b"]], &ImportOptions::default());
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.row_count, 0);
        assert!(!table.truncated);
    }
}
