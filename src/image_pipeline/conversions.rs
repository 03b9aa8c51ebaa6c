//! Pipeline conversions module
//!
//! This module contains orchestration logic for single-file and directory conversions.

mod batch;
mod negative_to_positive;
mod timing;

#[cfg(test)]
mod tests;

pub use batch::{BatchConverter, BatchReport, FailurePolicy};
pub use negative_to_positive::NegativeConversionPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
