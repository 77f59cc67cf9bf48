use serde::Serialize;

use crate::{data::Value, frequency};

/// Summary statistics for one column, shaped by its semantic type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statistics {
    Numeric(NumericSummary),
    Categorical { top_values: Vec<String> },
}

impl Statistics {
    pub fn numeric(&self) -> Option<&NumericSummary> {
        match self {
            Statistics::Numeric(summary) => Some(summary),
            Statistics::Categorical { .. } => None,
        }
    }

    pub fn top_values(&self) -> &[String] {
        match self {
            Statistics::Numeric(_) => &[],
            Statistics::Categorical { top_values } => top_values,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Default)]
struct NumericAccumulator {
    values: Vec<f64>,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumericAccumulator {
    fn add_value(&mut self, numeric: f64) {
        self.sum += numeric;
        self.min = Some(self.min.map_or(numeric, |current| current.min(numeric)));
        self.max = Some(self.max.map_or(numeric, |current| current.max(numeric)));
        self.values.push(numeric);
    }

    fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum / self.values.len() as f64)
        }
    }

    fn median(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len().is_multiple_of(2) {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    fn finish(self) -> Option<NumericSummary> {
        Some(NumericSummary {
            mean: self.mean()?,
            median: self.median()?,
            min: self.min?,
            max: self.max?,
        })
    }
}

/// Mean, median, min and max over the values that parse as numbers.
///
/// Returns `None` when nothing parses, which cannot happen for a column the
/// profiler has typed quantitative.
pub fn numeric_summary<'a, I>(values: I) -> Option<NumericSummary>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut accumulator = NumericAccumulator::default();
    for numeric in values.into_iter().filter_map(Value::as_number) {
        accumulator.add_value(numeric);
    }
    accumulator.finish()
}

pub fn categorical_summary<'a, I>(values: I, top: usize) -> Statistics
where
    I: IntoIterator<Item = &'a Value>,
{
    Statistics::Categorical {
        top_values: frequency::top_values(values, top),
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(raw: &[&str]) -> Vec<Value> {
        raw.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn summary_over_even_count() {
        let values = numbers(&["1", "2", "3", "4"]);
        let summary = numeric_summary(&values).expect("summary");
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn median_of_odd_count_is_middle_element() {
        let values = numbers(&["9", "1", "5"]);
        let summary = numeric_summary(&values).expect("summary");
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.mean, 5.0);
    }

    #[test]
    fn summary_mixes_native_and_text_numbers() {
        let values = vec![Value::Number(-2.0), Value::from("4.5"), Value::Missing];
        let summary = numeric_summary(&values).expect("summary");
        assert_eq!(summary.min, -2.0);
        assert_eq!(summary.max, 4.5);
        assert_eq!(summary.median, 1.25);
    }

    #[test]
    fn summary_is_none_without_numbers() {
        assert!(numeric_summary(&numbers(&["a", "b"])).is_none());
    }

    #[test]
    fn format_number_trims_integral_values() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.125), "2.1250");
    }
}
