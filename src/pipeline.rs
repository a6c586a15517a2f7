//! The report run: load, validate, analyze, render, write.
//!
//! Stages run strictly in order and the first failure ends the run.  Rendering happens in
//! memory before anything is written, so a failed run never leaves an output file behind.

use std::fmt;
use std::path::PathBuf;

use log::{debug, info};

use crate::analysis::{analyze, Insights};
use crate::builder::render_report;
use crate::config::ReportConfig;
use crate::dataset::{self, Dataset};
use crate::error::ReportError;
use crate::model::ReportDocument;
use crate::report::build_report;
use crate::writer::write_report;

/// Progress of a run.  Stages only ever move forward; `Error` is terminal and can follow any
/// stage before `Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Loaded,
    Validated,
    Analyzed,
    Rendered,
    Written,
    Done,
    Error,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Loaded => "loaded",
            Self::Validated => "validated",
            Self::Analyzed => "analyzed",
            Self::Rendered => "rendered",
            Self::Written => "written",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub bytes_written: usize,
    pub insights: Insights,
    pub report: ReportDocument,
}

type ValidatedHook = dyn FnMut(&Dataset, usize);

/// A single report run over one input file.
pub struct ReportPipeline {
    config: ReportConfig,
    stage: Stage,
    on_validated: Option<Box<ValidatedHook>>,
}

impl ReportPipeline {
    /// Creates a pipeline for the given configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            stage: Stage::Start,
            on_validated: None,
        }
    }

    /// Registers a callback invoked with the dataset and the configured preview row count once
    /// the dataset has passed validation.  It is not called for inputs that fail to load or
    /// hold no rows.
    pub fn on_validated<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Dataset, usize) + 'static,
    {
        self.on_validated = Some(Box::new(hook));
        self
    }

    /// Returns the stage reached so far.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        debug!("Stage {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// Runs every stage and writes the report.
    ///
    /// A pipeline runs once.  Any failure moves it to [`Stage::Error`]; calling `run` again
    /// after the first call returns [`ReportError::AlreadyRun`] and leaves the stage as is.
    pub fn run(&mut self) -> Result<RunSummary, ReportError> {
        if self.stage != Stage::Start {
            return Err(ReportError::AlreadyRun { stage: self.stage });
        }

        info!("Generating report from {}", self.config.input_path().display());
        let result = self.run_stages();
        if let Err(err) = &result {
            debug!("Run failed after stage {}: {}", self.stage, err);
            self.stage = Stage::Error;
        }
        result
    }

    fn run_stages(&mut self) -> Result<RunSummary, ReportError> {
        let dataset = Dataset::load(self.config.input_path())?;
        self.advance(Stage::Loaded);

        dataset::validate(&dataset)?;
        self.advance(Stage::Validated);
        if let Some(hook) = self.on_validated.as_mut() {
            hook(&dataset, self.config.sample_rows());
        }

        let insights = analyze(&dataset);
        self.advance(Stage::Analyzed);

        let report = build_report(&dataset, &insights, self.config.sample_rows());
        let pdf = render_report(&report)?;
        self.advance(Stage::Rendered);

        write_report(self.config.output_path(), &pdf.bytes)?;
        self.advance(Stage::Written);

        let summary = RunSummary {
            output_path: self.config.output_path().to_path_buf(),
            bytes_written: pdf.bytes.len(),
            insights,
            report,
        };
        self.advance(Stage::Done);
        Ok(summary)
    }
}

/// Runs the pipeline for `config` without hooks.
pub fn run(config: ReportConfig) -> Result<RunSummary, ReportError> {
    ReportPipeline::new(config).run()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{ReportPipeline, Stage};
    use crate::config::ReportConfig;
    use crate::error::ReportError;

    #[test]
    fn missing_input_ends_in_error_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = ReportPipeline::new(ReportConfig::new(dir.path().join("none.tsv")));

        assert!(matches!(
            pipeline.run(),
            Err(ReportError::FileNotFound { .. })
        ));
        assert_eq!(pipeline.stage(), Stage::Error);
    }

    #[test]
    fn validated_hook_is_skipped_for_empty_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("headers.tsv");
        std::fs::write(&input, "Name\tDepartment\tSalary\n").unwrap();

        let calls = Rc::new(Cell::new(0));
        let calls_hook = calls.clone();
        let mut pipeline = ReportPipeline::new(ReportConfig::new(&input))
            .on_validated(move |_, _| calls_hook.set(calls_hook.get() + 1));

        assert!(matches!(pipeline.run(), Err(ReportError::EmptyDataset)));
        assert_eq!(calls.get(), 0);
        assert_eq!(pipeline.stage(), Stage::Error);
    }

    #[test]
    fn validated_hook_sees_rows_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.tsv");
        std::fs::write(
            &input,
            "Name\tDepartment\tSalary\nAlice\tEng\t50000\nBob\tSales\t40000\n",
        )
        .unwrap();
        let config = ReportConfig::new(&input).with_output_path(dir.path().join("out.pdf"));

        let seen = Rc::new(Cell::new(None));
        let seen_hook = seen.clone();
        let mut pipeline = ReportPipeline::new(config)
            .on_validated(move |dataset, rows| seen_hook.set(Some((dataset.len(), rows))));

        // Rendering may fail without fonts; the hook runs before that either way.
        let result = pipeline.run();
        assert_eq!(seen.get(), Some((2, 5)));
        match result {
            Ok(_) => assert_eq!(pipeline.stage(), Stage::Done),
            Err(err) => {
                assert!(err.is_font_error(), "unexpected failure: {err}");
                assert_eq!(pipeline.stage(), Stage::Error);
            }
        }
    }

    #[test]
    fn second_run_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = ReportPipeline::new(ReportConfig::new(dir.path().join("none.tsv")));

        assert!(pipeline.run().is_err());
        assert!(matches!(
            pipeline.run(),
            Err(ReportError::AlreadyRun {
                stage: Stage::Error
            })
        ));
        assert_eq!(pipeline.stage(), Stage::Error);
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Validated.to_string(), "validated");
        assert_eq!(Stage::Error.to_string(), "error");
        assert!(Stage::Rendered < Stage::Written);
    }
}
