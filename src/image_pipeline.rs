//! Image processing pipeline module
//!
//! This module turns scanned film negatives into positives, with separate modules for
//! decoding sources, the tone engine, encoding outputs and conversion orchestration.

pub mod common;
pub mod config;
pub mod conversions;
pub mod debayer;
pub mod output;
pub mod raw;
pub mod source;
pub mod tone;

pub use common::{
    ConversionError,
    Result,
    Rgb16Image,
};

pub use config::{
    ConversionConfig,
    ConversionConfigBuilder,
};

pub use raw::{
    RawImageData,
    RawImageReader,
    RawLoaderReader,
};

pub use source::{
    ImageSource,
    SourceFormat,
    StandardImageSource,
};

pub use output::{
    ImageWriter,
    OutputFormat,
    StandardImageWriter,
    TiffCompression,
};

pub use tone::{
    ChannelStatistics,
    Palette,
    SampleRegion,
    ToneCurve,
    ToneMapping,
    ToneRange,
    ToneTransformation,
};

pub use conversions::{
    BatchConverter,
    BatchReport,
    FailurePolicy,
    NegativeConversionPipeline,
    PipelineTimings,
};
