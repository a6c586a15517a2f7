//! Error type shared by every stage of report generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Stage;

/// Failures that terminate a report run.
///
/// Every variant is terminal: the pipeline stops at the first error and no
/// output file is produced.  `AlreadyRun` is returned without doing any work.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File '{}' not found. Please ensure it exists in the directory.", path.display())]
    FileNotFound { path: PathBuf },

    #[error("File '{}' is empty. Please add valid data.", path.display())]
    EmptyInput { path: PathBuf },

    #[error("The file is improperly formatted or missing headers.")]
    MalformedInput,

    #[error("Unexpected error occurred while reading the file: {0}")]
    Parse(#[source] ParseFailure),

    #[error("The CSV file has no valid data.")]
    EmptyDataset,

    #[error("Unable to load fonts for rendering: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    #[error("Failed to render the PDF document: {0}")]
    Render(#[source] genpdf::error::Error),

    #[error("Failed to write report to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("The report pipeline has already run (stage: {stage}).")]
    AlreadyRun { stage: Stage },
}

/// Reasons a non-empty input could not be parsed into a dataset.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("failed to inspect input file: {0}")]
    Io(#[from] io::Error),
}

impl From<ParseFailure> for ReportError {
    fn from(failure: ParseFailure) -> Self {
        Self::Parse(failure)
    }
}

impl ReportError {
    /// Returns `true` when the error originates from missing or unreadable fonts.
    pub fn is_font_error(&self) -> bool {
        matches!(self, Self::FontLoad(_))
    }
}
