//! Conversion configuration

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::output::types::{OutputFormat, TiffCompression};
use crate::image_pipeline::tone::ToneCurve;

/// Configuration for negative to positive conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Fraction of the frame sampled for black/white points, in (0, 1]
    pub sample_fraction: f64,
    /// Percentile rank used as the black point reference (shadows start here)
    pub low_cut: f64,
    /// Percentile rank used as the white point reference (highlights start here)
    pub high_cut: f64,
    /// Tone curve applied between the black and white points
    pub curve: ToneCurve,
    /// Sample a centered square instead of an aspect-preserving crop
    pub center_weighted: bool,
    /// Output container
    pub output_format: OutputFormat,
    /// Compression method to use for TIFF output
    pub compression: TiffCompression,
    /// Predictor value for TIFF compression (2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Whether to reject zero-sized images before conversion
    pub validate_dimensions: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sample_fraction: 0.8,
            low_cut: 0.01,
            high_cut: 0.99,
            curve: ToneCurve::Linear,
            center_weighted: false,
            output_format: OutputFormat::Tiff,
            compression: TiffCompression::DeflateBalanced,
            predictor: Some(2),
            jpeg_quality: 95,
            validate_dimensions: true,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    /// Checks the sampling parameters and encoder settings.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ConversionError::InvalidParameter(msg));

        if !(self.sample_fraction > 0.0 && self.sample_fraction <= 1.0) {
            return invalid(format!(
                "sample fraction must be in (0, 1], got {}",
                self.sample_fraction
            ));
        }
        for (name, cut) in [("low cut", self.low_cut), ("high cut", self.high_cut)] {
            if !(0.0..=1.0).contains(&cut) {
                return invalid(format!("{name} must be in [0, 1], got {cut}"));
            }
        }
        if self.low_cut >= self.high_cut {
            return invalid(format!(
                "low cut ({}) must be below high cut ({})",
                self.low_cut, self.high_cut
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return invalid(format!(
                "JPEG quality must be in [1, 100], got {}",
                self.jpeg_quality
            ));
        }
        Ok(())
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    sample_fraction: Option<f64>,
    low_cut: Option<f64>,
    high_cut: Option<f64>,
    curve: Option<ToneCurve>,
    center_weighted: Option<bool>,
    output_format: Option<OutputFormat>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    jpeg_quality: Option<u8>,
    validate_dimensions: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn sample_fraction(mut self, fraction: f64) -> Self {
        self.sample_fraction = Some(fraction);
        self
    }

    pub fn low_cut(mut self, cut: f64) -> Self {
        self.low_cut = Some(cut);
        self
    }

    pub fn high_cut(mut self, cut: f64) -> Self {
        self.high_cut = Some(cut);
        self
    }

    pub fn curve(mut self, curve: ToneCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn center_weighted(mut self, enable: bool) -> Self {
        self.center_weighted = Some(enable);
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            sample_fraction: self.sample_fraction.unwrap_or(default.sample_fraction),
            low_cut: self.low_cut.unwrap_or(default.low_cut),
            high_cut: self.high_cut.unwrap_or(default.high_cut),
            curve: self.curve.unwrap_or(default.curve),
            center_weighted: self.center_weighted.unwrap_or(default.center_weighted),
            output_format: self.output_format.unwrap_or(default.output_format),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConversionConfig::builder()
            .sample_fraction(0.5)
            .low_cut(0.02)
            .high_cut(0.97)
            .curve(ToneCurve::Sigmoid)
            .center_weighted(true)
            .output_format(OutputFormat::Jpeg)
            .compression(TiffCompression::Lzw)
            .predictor(None)
            .jpeg_quality(80)
            .validate_dimensions(false)
            .build();

        assert_eq!(config.sample_fraction, 0.5);
        assert_eq!(config.low_cut, 0.02);
        assert_eq!(config.high_cut, 0.97);
        assert_eq!(config.curve, ToneCurve::Sigmoid);
        assert!(config.center_weighted);
        assert_eq!(config.output_format, OutputFormat::Jpeg);
        assert_eq!(config.compression, TiffCompression::Lzw);
        assert_eq!(config.predictor, None);
        assert_eq!(config.jpeg_quality, 80);
        assert!(!config.validate_dimensions);
    }

    #[test]
    fn test_builder_defaults() {
        let config = ConversionConfig::builder().build();

        assert_eq!(config.sample_fraction, 0.8);
        assert_eq!(config.low_cut, 0.01);
        assert_eq!(config.high_cut, 0.99);
        assert_eq!(config.curve, ToneCurve::Linear);
        assert_eq!(config.output_format, OutputFormat::Tiff);
        assert_eq!(config.predictor, Some(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_parameters() {
        let bad = [
            ConversionConfig::builder().sample_fraction(0.0).build(),
            ConversionConfig::builder().sample_fraction(1.2).build(),
            ConversionConfig::builder().sample_fraction(f64::NAN).build(),
            ConversionConfig::builder().low_cut(-0.1).build(),
            ConversionConfig::builder().high_cut(1.5).build(),
            ConversionConfig::builder().low_cut(0.6).high_cut(0.4).build(),
            ConversionConfig::builder().low_cut(0.5).high_cut(0.5).build(),
            ConversionConfig::builder().jpeg_quality(0).build(),
            ConversionConfig::builder().jpeg_quality(101).build(),
        ];

        for config in bad {
            assert!(
                matches!(config.validate(), Err(ConversionError::InvalidParameter(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validation_accepts_full_frame_and_extreme_cuts() {
        let config = ConversionConfig::builder()
            .sample_fraction(1.0)
            .low_cut(0.0)
            .high_cut(1.0)
            .build();

        assert!(config.validate().is_ok());
    }
}
