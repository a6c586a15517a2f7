//! Run configuration.

use std::path::{Path, PathBuf};

use crate::report::DEFAULT_SAMPLE_ROWS;
use crate::writer::DEFAULT_OUTPUT_FILE;

/// Default input file, relative to the working directory.
pub const DEFAULT_INPUT_FILE: &str = "data.csv";

/// Inputs and outputs of a single report run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    input_path: PathBuf,
    output_path: PathBuf,
    sample_rows: usize,
}

impl ReportConfig {
    /// Creates a configuration reading `input_path` and writing `Generated_Report.pdf` to the
    /// working directory.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }

    /// Returns the tab-delimited input file.
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Returns the report destination.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns how many leading rows are previewed and tabulated.
    pub fn sample_rows(&self) -> usize {
        self.sample_rows
    }

    /// Redirects the report and returns the updated configuration.
    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Sets the number of sample rows and returns the updated configuration.
    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = sample_rows;
        self
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_FILE)
    }
}
