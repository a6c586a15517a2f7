//! Assembly of the report content from a dataset and its findings.

use log::{debug, warn};

use crate::analysis::Insights;
use crate::dataset::Dataset;
use crate::model::{Block, HorizontalAlignment, ReportDocument, Section, TableBlock};

/// Running header shown on every page.
pub const REPORT_TITLE: &str = "Automated Report Generation";

/// Title of the section holding the findings.
pub const ANALYSIS_SECTION_TITLE: &str = "Data Analysis Report";

/// Title of the section holding the sample table.
pub const SUMMARY_SECTION_TITLE: &str = "Data Summary";

/// Headers of the sample table.
pub const SUMMARY_COLUMNS: [&str; 3] = ["Name", "Department", "Salary"];

/// Width of every sample table column in millimetres.
pub const SUMMARY_COLUMN_WIDTH_MM: f64 = 40.0;

/// Number of leading rows shown in the sample table.
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

/// Builds the sample table from the first `sample_rows` rows.
///
/// Cells are taken by position: the first three dataset columns fill Name, Department and
/// Salary whatever they are called.  Rows with fewer columns get empty cells.
pub fn summary_table(dataset: &Dataset, sample_rows: usize) -> TableBlock {
    let mut table = TableBlock::new(
        SUMMARY_COLUMNS
            .iter()
            .map(|header| (*header, SUMMARY_COLUMN_WIDTH_MM)),
    )
    .with_alignment(HorizontalAlignment::Center);

    let available = dataset.columns().len();
    if available < SUMMARY_COLUMNS.len() {
        warn!(
            "Dataset has {} column(s); summary table cells beyond them are left empty",
            available
        );
    }

    let mapped: Vec<&str> = dataset
        .columns()
        .iter()
        .take(SUMMARY_COLUMNS.len())
        .map(|column| column.name())
        .collect();
    debug!(
        "Summary table maps columns {:?} onto {:?}",
        mapped, SUMMARY_COLUMNS
    );

    for row in dataset.head(sample_rows) {
        table.push_row(row.iter().map(ToString::to_string));
    }

    table
}

/// Builds the complete report content.
pub fn build_report(dataset: &Dataset, insights: &Insights, sample_rows: usize) -> ReportDocument {
    ReportDocument::new(REPORT_TITLE)
        .with_section(
            Section::new(ANALYSIS_SECTION_TITLE).with_block(Block::text(insights.as_str())),
        )
        .with_section(
            Section::new(SUMMARY_SECTION_TITLE)
                .with_block(Block::Table(summary_table(dataset, sample_rows))),
        )
}
