//! Profiles a delimited file and prints the table diagnostics and inferred schema as JSON.
//!
//! Usage: `profile_dataset <file.csv> [max_rows]`
use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use log::debug;
use log::info;
use rusty_dataset::profile_csv;
use rusty_dataset::ImportOptions;
use rusty_dataset::InferenceOptions;
use serde_json::json;
use std::num::NonZeroUsize;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: profile_dataset <file.csv> [max_rows]");
    };
    let mut import = ImportOptions::default();
    if let Some(max_rows) = args.next() {
        let max_rows: NonZeroUsize = max_rows
            .parse()
            .with_context(|| format!("max_rows must be a positive integer, got '{max_rows}'"))?;
        import = import.with_max_rows(max_rows);
    }

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {path}"))?;
    let (table, schema) = profile_csv(&bytes, &import, &InferenceOptions::default())
        .with_context(|| format!("Failed to profile {path}"))?;
    info!("Profiled {} columns of {}", schema.len(), path);
    for column in &schema {
        debug!("{}: {} {}", column.id(), column.inferred_type, column.inferred_role);
    }

    let report = json!({
        "rowCount": table.row_count,
        "rawRowCount": table.raw_row_count,
        "truncated": table.truncated,
        "sanitizedHeaders": table.sanitized_headers,
        "expectedColumnCount": table.expected_column_count,
        "inconsistentRowCount": table.inconsistent_row_count,
        "preview": table.preview(),
        "columns": schema,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
