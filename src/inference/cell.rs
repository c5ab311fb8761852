//! Per-type cell rules: each one recognises and normalizes a raw cell string,
//! returning `None` rather than failing when the value does not fit.

use crate::database::column::ColumnType;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Currency symbols stripped before parsing a number.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '¢'];

/// Literals accepted as booleans (compared case-insensitively).
const TRUE_LITERALS: [&str; 3] = ["true", "yes", "y"];
const FALSE_LITERALS: [&str; 3] = ["false", "no", "n"];

/// Plain decimal with optional `,` thousands grouping and exponent.
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|\d{1,3}(?:,\d{3})+)?(?:\.\d*)?(?:[eE][+-]?\d+)?$").expect("Hardcode regex pattern")
});

/// `YYYY-MM-DD` or `YYYY/MM/DD`, one separator used throughout.
static YEAR_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})([-/])(\d{1,2})([-/])(\d{1,2})$").expect("Hardcode regex pattern")
});

/// `M/D/YYYY`, optionally zero-padded.
static YEAR_LAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("Hardcode regex pattern")
});

/// A cell value normalized by one of the rules.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
}

/// Recognises boolean literals: true/false, yes/no, y/n.
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim().to_lowercase();
    if TRUE_LITERALS.contains(&value.as_str()) {
        Some(true)
    } else if FALSE_LITERALS.contains(&value.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Splits a leading `+` or `-` off the text.
fn split_sign(text: &str) -> (Option<char>, &str) {
    match text.chars().next() {
        Some(sign @ ('-' | '+')) => (Some(sign), text[1..].trim_start()),
        _ => (None, text),
    }
}

/// Parses a formatted number.
///
/// Handles currency symbols (`$2,000`), thousands separators, accounting
/// negatives (`(3.50)` is `-3.5`) and percentages (`10%` is `0.1`).
/// Currency, percent, parentheses and sign may wrap each other in any
/// order (`$(3.50)`, `(5)%`, `-$5`, `$-5`), each at most once.
pub fn parse_number(value: &str) -> Option<f64> {
    let mut text = value.trim();
    let mut sign = None;
    let mut parenthesized = false;
    let mut percent = false;
    loop {
        let before = text;
        text = text.trim_matches(CURRENCY_SYMBOLS).trim();
        if !percent {
            if let Some(inner) = text.strip_suffix('%') {
                percent = true;
                text = inner.trim_end();
            }
        }
        if !parenthesized {
            if let Some(inner) = text.strip_prefix('(').and_then(|it| it.strip_suffix(')')) {
                parenthesized = true;
                text = inner.trim();
            }
        }
        if sign.is_none() {
            if let (Some(found), rest) = split_sign(text) {
                sign = Some(found);
                text = rest;
            }
        }
        if text == before {
            break;
        }
    }
    let negative = match sign {
        Some('-') if parenthesized => return None,
        Some('-') => true,
        _ => parenthesized,
    };

    if !text.chars().any(|char| char.is_ascii_digit()) || !DECIMAL.is_match(text) {
        return None;
    }
    let mut number = text.replace(',', "").parse::<f64>().ok()?;
    if negative {
        number = -number;
    }
    if percent {
        number /= 100.0;
    }
    Some(number).filter(|number| number.is_finite())
}

/// Parses a calendar date in one of `YYYY-MM-DD`, `YYYY/MM/DD` or `M/D/YYYY`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let (year, month, day) = if let Some(captures) = YEAR_FIRST.captures(value) {
        if captures[2] != captures[4] {
            return None;
        }
        (&captures[1], &captures[3], &captures[5]).parse_parts()?
    } else if let Some(captures) = YEAR_LAST.captures(value) {
        (&captures[3], &captures[1], &captures[2]).parse_parts()?
    } else {
        return None;
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Numeric conversion of captured (year, month, day) parts.
trait DateParts {
    fn parse_parts(&self) -> Option<(i32, u32, u32)>;
}

impl DateParts for (&str, &str, &str) {
    fn parse_parts(&self) -> Option<(i32, u32, u32)> {
        Some((self.0.parse().ok()?, self.1.parse().ok()?, self.2.parse().ok()?))
    }
}

/// A type detection rule: the type it proves and how it reads a cell.
#[derive(Copy, Clone)]
pub(crate) struct Rule {
    pub(crate) kind: ColumnType,
    pub(crate) accept: fn(&str) -> Option<CellValue>,
}

/// Detection rules in priority order; the first one that accepts enough values wins.
pub(crate) const RULES: [Rule; 3] = [
    Rule {
        kind: ColumnType::Bool,
        accept: |value| parse_bool(value).map(CellValue::Bool),
    },
    Rule {
        kind: ColumnType::Number,
        accept: |value| parse_number(value).map(CellValue::Number),
    },
    Rule {
        kind: ColumnType::Date,
        accept: |value| parse_date(value).map(CellValue::Date),
    },
];

/// Reads a value with the rule of a given column type (`None` for strings).
pub(crate) fn read_as(kind: ColumnType, value: &str) -> Option<CellValue> {
    RULES
        .iter()
        .find(|rule| rule.kind == kind)
        .and_then(|rule| (rule.accept)(value))
}
