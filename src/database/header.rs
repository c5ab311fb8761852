//! Header sanitization: turns raw header text into unique lowercase column ids.

use crate::database::column::Column;
use regex::Regex;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Runs of characters that are not allowed in a column id: anything but Unicode letters and decimal digits.
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").expect("Hardcode regex pattern"));

/// Sanitizes a single header: lower-cased, trimmed, non-alphanumeric runs collapsed
/// to `_` and leading/trailing `_` stripped. Letters outside ASCII are kept
/// (`Café` is `café`). May return an empty string.
pub fn sanitize_header(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    SEPARATOR
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_owned()
}

/// Hands out unique ids, suffixing `_2`, `_3`, ... in first-seen order.
#[derive(Debug, Default)]
struct IdRegistry {
    /// Ids already assigned
    used: HashSet<String>,
    /// Next suffix to try for each candidate id
    next_suffix: HashMap<String, usize>,
}

impl IdRegistry {
    fn claim(&mut self, candidate: String) -> String {
        if self.used.insert(candidate.clone()) {
            return candidate;
        }
        let mut suffix = self.next_suffix.get(&candidate).copied().unwrap_or(2);
        let id = loop {
            let id = format!("{candidate}_{suffix}");
            suffix += 1;
            if self.used.insert(id.clone()) {
                break id;
            }
        };
        self.next_suffix.insert(candidate, suffix);
        id
    }
}

/// Builds the columns of a header row.
///
/// # Arguments
/// * `headers` - Raw header cells in source order
///
/// # Returns
/// * `(Vec<Column>, bool)` - Columns in header order, and whether any id differs from its raw header
pub fn sanitize_headers<S: AsRef<str>>(headers: &[S]) -> (Vec<Column>, bool) {
    let mut registry = IdRegistry::default();
    let mut sanitized = false;
    let columns = headers
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.as_ref();
            let candidate = match sanitize_header(raw) {
                id if id.is_empty() => format!("column_{}", index + 1),
                id => id,
            };
            let id = registry.claim(candidate);
            if id != raw {
                sanitized = true;
            }
            Column::new(id, raw)
        })
        .collect();
    (columns, sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(headers: &[&str]) -> Vec<String> {
        sanitize_headers(headers)
            .0
            .into_iter()
            .map(|column| column.id)
            .collect()
    }

    #[test]
    fn sanitize_single_header() {
        assert_eq!(sanitize_header("  Order Date "), "order_date");
        assert_eq!(sanitize_header("Revenue ($)"), "revenue");
        assert_eq!(sanitize_header("__a--b__"), "a_b");
        assert_eq!(sanitize_header("%%%"), "");
        assert_eq!(sanitize_header("Q1/2024"), "q1_2024");
    }

    #[test]
    fn sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_header("Café"), "café");
        assert_eq!(sanitize_header("Straße"), "straße");
        assert_eq!(sanitize_header("名前"), "名前");
        assert_eq!(sanitize_header("Umsatz (€)"), "umsatz");
        assert_eq!(ids(&["名前", "Café", "CAFÉ"]), vec!["名前", "café", "café_2"]);
    }

    #[test]
    fn positional_fallback_for_empty_headers() {
        assert_eq!(ids(&["a", "", "  ", "?"]), vec!["a", "column_2", "column_3", "column_4"]);
    }

    #[test]
    fn collisions_get_suffixes_in_order() {
        assert_eq!(
            ids(&["Name", "", "Name", "Amount"]),
            vec!["name", "column_2", "name_2", "amount"]
        );
        assert_eq!(ids(&["x", "X", "x "]), vec!["x", "x_2", "x_3"]);
    }

    #[test]
    fn collisions_skip_ids_taken_by_other_headers() {
        assert_eq!(ids(&["a_2", "a", "a"]), vec!["a_2", "a", "a_3"]);
        assert_eq!(ids(&["column_2", ""]), vec!["column_2", "column_2_2"]);
    }

    #[test]
    fn sanitized_flag() {
        assert!(!sanitize_headers(&["name", "amount"]).1);
        assert!(sanitize_headers(&["Name", "amount"]).1);
        assert!(sanitize_headers(&["a", "a"]).1);
    }

    #[test]
    fn sanitizing_sanitized_ids_is_idempotent() {
        let first = ids(&["Name", "", "Name", "Total %"]);
        let (columns, sanitized) = sanitize_headers(&first);
        assert!(!sanitized);
        assert_eq!(columns.into_iter().map(|column| column.id).collect::<Vec<_>>(), first);
    }
}
