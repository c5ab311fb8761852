use crate::database::column::ColumnStats;
use crate::inference::cell::CellValue;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Accumulates the statistics of one column, one row at a time.
#[derive(Debug, Default)]
pub(crate) struct StatsAccumulator<'a> {
    /// Rows seen
    rows: usize,
    /// Rows with an empty or missing value
    missing: usize,
    /// Distinct trimmed values
    distinct: HashSet<&'a str>,
    /// Normalized numbers
    numbers: Vec<f64>,
    /// Earliest and latest date
    dates: Option<(NaiveDate, NaiveDate)>,
}

impl<'a> StatsAccumulator<'a> {
    /// Records a row without a value.
    pub(crate) fn push_missing(&mut self) {
        self.rows += 1;
        self.missing += 1;
    }

    /// Records a present value together with its normalized form, if any.
    pub(crate) fn push(&mut self, text: &'a str, value: Option<CellValue>) {
        self.rows += 1;
        self.distinct.insert(text);
        match value {
            Some(CellValue::Number(number)) => self.numbers.push(number),
            Some(CellValue::Date(date)) => {
                self.dates = Some(match self.dates {
                    Some((earliest, latest)) => (earliest.min(date), latest.max(date)),
                    None => (date, date),
                });
            }
            _ => (),
        }
    }

    /// Produces the final statistics. A column without rows has a null rate of 0.
    pub(crate) fn finish(self) -> ColumnStats {
        let null_rate = if self.rows == 0 {
            0.0
        } else {
            self.missing as f64 / self.rows as f64
        };
        let (min, max, mean) = if self.numbers.is_empty() {
            (None, None, None)
        } else {
            let min = self.numbers.iter().copied().fold(f64::INFINITY, f64::min);
            let max = self.numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = self.numbers.iter().sum::<f64>() / self.numbers.len() as f64;
            (Some(min), Some(max), Some(mean))
        };
        ColumnStats {
            null_rate,
            non_null_count: self.rows - self.missing,
            distinct_count: self.distinct.len(),
            min,
            max,
            mean,
            earliest: self.dates.map(|(earliest, _)| earliest),
            latest: self.dates.map(|(_, latest)| latest),
        }
    }
}
