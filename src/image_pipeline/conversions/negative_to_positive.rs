use tracing::{debug, info, info_span, instrument};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    common::types::Rgb16Image,
    config::ConversionConfig,
    conversions::timing::PipelineTimings,
    output::{ImageWriter, StandardImageWriter},
    source::{ImageSource, SourceFormat, StandardImageSource},
    tone::{Palette, SampleRegion, ToneTransformation},
};

/// Turns scanned negatives into positives: decode, sample, tone map, encode.
pub struct NegativeConversionPipeline<S: ImageSource, W: ImageWriter> {
    source: S,
    writer: W,
    config: ConversionConfig,
}

impl NegativeConversionPipeline<StandardImageSource, StandardImageWriter> {
    pub fn new(config: ConversionConfig) -> Result<Self> {
        Self::with_custom(StandardImageSource::new(), StandardImageWriter, config)
    }
}

/// Runs `step` inside its own span and records its duration.
fn timed<T>(timings: &mut PipelineTimings, name: &str, step: impl FnOnce() -> T) -> T {
    let _span = info_span!("pipeline_step", step = name).entered();
    timings.time(name, step)
}

impl<S: ImageSource, W: ImageWriter> NegativeConversionPipeline<S, W> {
    pub fn with_custom(source: S, writer: W, config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            writer,
            config,
        })
    }

    fn validate_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width as usize, height as usize));
        }

        Ok(())
    }

    /// Measures black and white points of `image` without mapping it.
    pub fn analyze(&self, image: &Rgb16Image) -> Result<ToneTransformation> {
        let (width, height) = image.dimensions();
        let region = SampleRegion::compute(
            width,
            height,
            self.config.sample_fraction,
            self.config.center_weighted,
        );
        debug!(?region, center_weighted = self.config.center_weighted, "Sample region");

        let palette = Palette::sample(image, &region);
        ToneTransformation::build(&palette, self.config.low_cut, self.config.high_cut)
    }

    /// Produces the positive of an already decoded negative.
    pub fn develop(&self, image: &Rgb16Image) -> Result<Rgb16Image> {
        self.develop_timed(image, &mut PipelineTimings::new())
    }

    fn develop_timed(&self, image: &Rgb16Image, timings: &mut PipelineTimings) -> Result<Rgb16Image> {
        timed(timings, "validate_dimensions", || {
            self.validate_dimensions(image.width(), image.height())
        })?;

        let transformation = timed(timings, "sample_palette", || self.analyze(image))?;
        let mapping = transformation.to_mapping(self.config.curve);
        info!(
            curve = %self.config.curve,
            red = ?transformation.red,
            green = ?transformation.green,
            blue = ?transformation.blue,
            "Tone mapping ready"
        );

        Ok(timed(timings, "apply_mapping", || mapping.apply(image)))
    }

    fn decode_and_develop(
        &self,
        input_data: &[u8],
        format: SourceFormat,
        timings: &mut PipelineTimings,
    ) -> Result<Rgb16Image> {
        let negative = timed(timings, "decode", || self.source.read_image(input_data, format))?;
        debug!(width = negative.width(), height = negative.height(), "Decoded negative");
        self.develop_timed(&negative, timings)
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], format: SourceFormat, output: &mut dyn Write) -> Result<()> {
        self.convert_with_timings(input_data, format, output).map(|_| ())
    }

    pub fn convert_with_timings(
        &self,
        input_data: &[u8],
        format: SourceFormat,
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        info!("Starting negative conversion");

        let positive = self.decode_and_develop(input_data, format, &mut timings)?;
        timed(&mut timings, "encode", || {
            self.writer.write_image(&positive, output, &self.config)
        })?;

        info!(
            width = positive.width(),
            height = positive.height(),
            elapsed_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Conversion complete"
        );
        Ok(timings)
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        self.convert_file_with_timings(input_path, output_path).map(|_| ())
    }

    pub fn convert_file_with_timings<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let format = Self::source_format(input_path)?;
        let input_data = timed(&mut timings, "read_input_file", || std::fs::read(input_path))
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", input_path.display(), e)))?;

        // Nothing is created on disk until the positive exists.
        let positive = self.decode_and_develop(&input_data, format, &mut timings)?;

        let output_file = timed(&mut timings, "create_output_file", || {
            std::fs::File::create(output_path)
        })
        .map_err(|e| ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e)))?;

        timed(&mut timings, "encode", || -> Result<()> {
            let mut output = BufWriter::new(output_file);
            self.writer.write_image(&positive, &mut output, &self.config)?;
            output.flush()?;
            Ok(())
        })?;

        info!(
            output = %output_path.display(),
            elapsed_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Successfully processed and saved"
        );
        Ok(timings)
    }

    /// Decodes `input_path` and reports its black and white points.
    pub fn analyze_file<P: AsRef<Path>>(&self, input_path: P) -> Result<ToneTransformation> {
        let input_path = input_path.as_ref();
        let format = Self::source_format(input_path)?;
        let input_data = std::fs::read(input_path)
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", input_path.display(), e)))?;

        let negative = self.source.read_image(&input_data, format)?;
        self.validate_dimensions(negative.width(), negative.height())?;
        self.analyze(&negative)
    }

    /// `<output_dir>/<input stem>.<format extension>`
    pub fn output_path_for(&self, input_path: &Path, output_dir: &Path) -> PathBuf {
        let mut name = input_path
            .file_stem()
            .unwrap_or(input_path.as_os_str())
            .to_os_string();
        name.push(".");
        name.push(self.config.output_format.extension());
        output_dir.join(name)
    }

    fn source_format(input_path: &Path) -> Result<SourceFormat> {
        SourceFormat::from_path(input_path)
            .ok_or_else(|| ConversionError::UnsupportedFormat(input_path.display().to_string()))
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}
