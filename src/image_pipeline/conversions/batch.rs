//! Sequential directory conversion.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::negative_to_positive::NegativeConversionPipeline,
    output::ImageWriter,
    source::{ImageSource, SourceFormat},
};

/// What the batch does when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure and return its error
    #[default]
    Abort,
    /// Record the failure and move on to the next file
    Continue,
}

/// Outcome of a directory conversion.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written
    pub converted: Vec<PathBuf>,
    /// Inputs ignored because their extension is not a known image format
    pub skipped: Vec<PathBuf>,
    /// Inputs that failed, with the reason
    pub failed: Vec<(PathBuf, ConversionError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Walks an input directory and converts every recognized image, one file at a time.
pub struct BatchConverter<S: ImageSource, W: ImageWriter> {
    pipeline: NegativeConversionPipeline<S, W>,
    policy: FailurePolicy,
    print_timings: bool,
}

impl<S: ImageSource, W: ImageWriter> BatchConverter<S, W> {
    pub fn new(pipeline: NegativeConversionPipeline<S, W>, policy: FailurePolicy) -> Self {
        Self {
            pipeline,
            policy,
            print_timings: false,
        }
    }

    /// Prints a per-step timing summary after each file.
    pub fn with_timings(mut self, enable: bool) -> Self {
        self.print_timings = enable;
        self
    }

    pub fn pipeline(&self) -> &NegativeConversionPipeline<S, W> {
        &self.pipeline
    }

    /// Converts every image below `input_dir` into `output_dir`.
    ///
    /// Files are visited recursively in file-name order and written flat into
    /// `output_dir` as `<stem>.<tiff|jpeg>`. Anything under `output_dir` itself is
    /// not revisited.
    pub fn convert_directory<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchReport> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();

        std::fs::create_dir_all(output_dir).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", output_dir.display(), e))
        })?;
        let input_root = input_dir.canonicalize().map_err(|e| {
            ConversionError::InputReadError(format!("{}: {}", input_dir.display(), e))
        })?;
        let output_root = output_dir.canonicalize()?;

        info!(
            input = %input_root.display(),
            output = %output_root.display(),
            policy = ?self.policy,
            "Starting batch conversion"
        );

        let mut report = BatchReport::default();
        let mut produced = HashSet::new();
        let nested_output = output_root != input_root && output_root.starts_with(&input_root);

        let entries = WalkDir::new(&input_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(nested_output && entry.path().starts_with(&output_root)));

        for entry in entries {
            let entry = entry.map_err(|e| ConversionError::InputReadError(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let input_path = entry.path();
            if SourceFormat::from_path(input_path).is_none() {
                warn!(path = %input_path.display(), "Skipping file with unrecognized extension");
                report.skipped.push(input_path.to_path_buf());
                continue;
            }

            let output_path = self.pipeline.output_path_for(input_path, output_dir);
            if !produced.insert(output_path.clone()) {
                warn!(
                    path = %output_path.display(),
                    "Output name already used in this batch, overwriting"
                );
            }

            match self.pipeline.convert_file_with_timings(input_path, &output_path) {
                Ok(timings) => {
                    if self.print_timings {
                        timings.print_summary();
                    }
                    report.converted.push(output_path);
                }
                Err(e) => {
                    error!(path = %input_path.display(), "Could not convert: {}", e);
                    match self.policy {
                        FailurePolicy::Abort => return Err(e),
                        FailurePolicy::Continue => {
                            report.failed.push((input_path.to_path_buf(), e))
                        }
                    }
                }
            }
        }

        info!(
            converted = report.converted.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Batch conversion finished"
        );
        Ok(report)
    }
}
