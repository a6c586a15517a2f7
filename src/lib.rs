//! Turns tab-delimited data into a PDF summary report.
//!
//! The crate is organised as a linear pipeline: [`dataset`] loads and validates the input,
//! [`analysis`] derives the findings, [`report`] assembles the [`model`] of the document,
//! [`builder`] renders it with `genpdf` and [`writer`] stores the bytes.  [`pipeline`] ties the
//! stages together.

pub mod analysis;
pub mod builder;
pub mod config;
pub mod dataset;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod writer;

pub use config::ReportConfig;
pub use error::ReportError;
pub use pipeline::{run, ReportPipeline, RunSummary, Stage};
