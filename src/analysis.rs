//! Numeric summary of a loaded dataset.

use std::fmt;

use log::{debug, info};

use crate::dataset::{format_float, Column, Dataset};

/// Name of the column whose mean is reported.
pub const SALARY_COLUMN: &str = "salary";

/// Line appended when the dataset has no numeric salary column.
pub const NO_SALARY_MESSAGE: &str = "No numeric data found for salary.";

/// Findings accumulated while analysing a dataset, one line per finding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Insights {
    text: String,
}

impl Insights {
    /// Creates an empty set of findings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finding as its own line.
    pub fn push_line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    /// Returns the accumulated text including the trailing newline of each finding.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Iterates over the individual findings.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

impl fmt::Display for Insights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Returns the indices of columns whose values are all numeric.
pub fn numeric_columns(dataset: &Dataset) -> Vec<usize> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| column.column_type().is_numeric())
        .map(|(index, _)| index)
        .collect()
}

/// Finds the numeric salary column, ignoring ASCII case.
pub fn salary_column(dataset: &Dataset) -> Option<usize> {
    let columns: &[Column] = dataset.columns();
    numeric_columns(dataset)
        .into_iter()
        .find(|&index| columns[index].name().eq_ignore_ascii_case(SALARY_COLUMN))
}

/// Arithmetic mean over the present values of a column; NaN when there are none.
pub fn column_mean(dataset: &Dataset, index: usize) -> f64 {
    let (sum, count) = dataset
        .column_values(index)
        .filter_map(|cell| cell.as_f64())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    sum / count as f64
}

/// Computes the report findings for `dataset`.
pub fn analyze(dataset: &Dataset) -> Insights {
    let mut insights = Insights::new();

    match salary_column(dataset) {
        Some(index) => {
            let mean = column_mean(dataset, index);
            debug!(
                "Mean of column '{}' is {}",
                dataset.columns()[index].name(),
                mean
            );
            insights.push_line(format!("Average salary: {}", format_float(mean)));
        }
        None => insights.push_line(NO_SALARY_MESSAGE),
    }

    info!("Analysis produced {} finding(s)", insights.lines().count());
    insights
}
