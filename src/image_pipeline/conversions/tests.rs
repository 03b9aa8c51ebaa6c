#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};
    use std::sync::{Arc, Mutex};

    use image::{ImageFormat, Rgb};

    use crate::image_pipeline::common::error::{ConversionError, Result};
    use crate::image_pipeline::common::types::{CHANNEL_MAX, Rgb16Image};
    use crate::image_pipeline::config::ConversionConfig;
    use crate::image_pipeline::conversions::{
        BatchConverter, FailurePolicy, NegativeConversionPipeline, PipelineTimings,
    };
    use crate::image_pipeline::output::{ImageWriter, OutputFormat};
    use crate::image_pipeline::source::{ImageSource, SourceFormat};
    use crate::image_pipeline::tone::{ToneCurve, ToneRange};

    const RASTER: SourceFormat = SourceFormat::Raster(ImageFormat::Tiff);

    struct MockSource {
        should_fail: bool,
        mock_data: Option<Rgb16Image>,
    }

    impl ImageSource for MockSource {
        fn read_image(&self, data: &[u8], _format: SourceFormat) -> Result<Rgb16Image> {
            if self.should_fail || data.starts_with(b"corrupt") {
                return Err(ConversionError::DecodeError("Mock decode error".to_string()));
            }
            Ok(self.mock_data.clone().unwrap_or_else(negative))
        }
    }

    struct MockWriter {
        should_fail: bool,
        written_data: Arc<Mutex<Vec<Rgb16Image>>>,
    }

    impl ImageWriter for MockWriter {
        fn write_image(&self, image: &Rgb16Image, output: &mut dyn Write, _config: &ConversionConfig) -> Result<()> {
            if self.should_fail {
                return Err(ConversionError::EncodeError("Mock encode error".to_string()));
            }
            output.write_all(b"positive")?;
            self.written_data.lock().unwrap().push(image.clone());
            Ok(())
        }
    }

    /// Orange-masked negative: each channel spans its own window.
    fn negative() -> Rgb16Image {
        Rgb16Image::from_fn(100, 100, |x, y| {
            let t = (x + y * 100) as u16;
            Rgb([20000 + t * 4, 10000 + t * 3, 5000 + t * 2])
        })
    }

    fn pipeline_with(
        source: MockSource,
        writer_fails: bool,
        config: ConversionConfig,
    ) -> (NegativeConversionPipeline<MockSource, MockWriter>, Arc<Mutex<Vec<Rgb16Image>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let writer = MockWriter {
            should_fail: writer_fails,
            written_data: written.clone(),
        };
        let pipeline = NegativeConversionPipeline::with_custom(source, writer, config).unwrap();
        (pipeline, written)
    }

    fn ok_source() -> MockSource {
        MockSource { should_fail: false, mock_data: None }
    }

    #[test]
    fn test_successful_conversion() {
        let (pipeline, written) = pipeline_with(ok_source(), false, ConversionConfig::default());

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake negative", RASTER, &mut output);

        assert!(result.is_ok());
        assert_eq!(output.into_inner(), b"positive");
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_positive_is_inverted_and_stretched() {
        let config = ConversionConfig::builder()
            .sample_fraction(1.0)
            .low_cut(0.0)
            .high_cut(1.0)
            .build();
        let (pipeline, _) = pipeline_with(ok_source(), false, config);

        let positive = pipeline.develop(&negative()).unwrap();

        // Densest corner of the negative becomes black, thinnest becomes white.
        assert_eq!(positive.get_pixel(0, 0).0, [CHANNEL_MAX; 3]);
        assert_eq!(positive.get_pixel(99, 99).0, [0; 3]);
        let mid = positive.get_pixel(50, 50).0;
        assert!(mid.iter().all(|&v| v > 0 && v < CHANNEL_MAX));
    }

    #[test]
    fn test_analyze_reports_channel_windows() {
        let config = ConversionConfig::builder()
            .sample_fraction(1.0)
            .low_cut(0.0)
            .high_cut(1.0)
            .build();
        let (pipeline, _) = pipeline_with(ok_source(), false, config);

        let transformation = pipeline.analyze(&negative()).unwrap();

        assert_eq!(transformation.red, ToneRange::new(20000, 20000 + 9999 * 4));
        assert_eq!(transformation.green, ToneRange::new(10000, 10000 + 9999 * 3));
        assert_eq!(transformation.blue, ToneRange::new(5000, 5000 + 9999 * 2));
        assert!((transformation.steepness + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_curve_is_selected_from_config() {
        let config = ConversionConfig::builder()
            .sample_fraction(1.0)
            .curve(ToneCurve::Sigmoid)
            .build();
        let (pipeline, _) = pipeline_with(ok_source(), false, config);
        let image = negative();

        let positive = pipeline.develop(&image).unwrap();
        let expected = pipeline.analyze(&image).unwrap().to_sigmoid().apply(&image);

        assert_eq!(positive, expected);
    }

    #[test]
    fn test_reader_failure() {
        let source = MockSource { should_fail: true, mock_data: None };
        let (pipeline, written) = pipeline_with(source, false, ConversionConfig::default());

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake negative", RASTER, &mut output);

        assert!(matches!(result.unwrap_err(), ConversionError::DecodeError(_)));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_writer_failure() {
        let (pipeline, _) = pipeline_with(ok_source(), true, ConversionConfig::default());

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake negative", RASTER, &mut output);

        assert!(matches!(result.unwrap_err(), ConversionError::EncodeError(_)));
    }

    #[test]
    fn test_dimension_validation_failure() {
        let source = MockSource {
            should_fail: false,
            mock_data: Some(Rgb16Image::new(0, 10)),
        };
        let (pipeline, _) = pipeline_with(source, false, ConversionConfig::default());

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake negative", RASTER, &mut output);

        assert!(matches!(result.unwrap_err(), ConversionError::InvalidDimensions(0, 10)));
    }

    #[test]
    fn test_empty_image_without_validation_has_no_statistics() {
        let source = MockSource {
            should_fail: false,
            mock_data: Some(Rgb16Image::new(0, 10)),
        };
        let config = ConversionConfig::builder().validate_dimensions(false).build();
        let (pipeline, _) = pipeline_with(source, false, config);

        let mut output = Cursor::new(Vec::new());
        let result = pipeline.convert(b"fake negative", RASTER, &mut output);

        assert!(matches!(result.unwrap_err(), ConversionError::EmptyStatistics));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let writer = MockWriter { should_fail: false, written_data: written };
        let config = ConversionConfig::builder().low_cut(0.9).high_cut(0.1).build();

        let result = NegativeConversionPipeline::with_custom(ok_source(), writer, config);

        assert!(matches!(result, Err(ConversionError::InvalidParameter(_))));
    }

    #[test]
    fn test_set_config_validates() {
        let (mut pipeline, _) = pipeline_with(ok_source(), false, ConversionConfig::default());

        let bad = ConversionConfig::builder().sample_fraction(0.0).build();
        assert!(pipeline.set_config(bad).is_err());
        assert_eq!(pipeline.config().sample_fraction, 0.8);

        let good = ConversionConfig::builder().output_format(OutputFormat::Jpeg).build();
        assert!(pipeline.set_config(good).is_ok());
        assert_eq!(pipeline.config().output_format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_timings_cover_every_step() {
        let (pipeline, _) = pipeline_with(ok_source(), false, ConversionConfig::default());

        let mut output = Cursor::new(Vec::new());
        let timings = pipeline
            .convert_with_timings(b"fake negative", RASTER, &mut output)
            .unwrap();

        for step in ["decode", "validate_dimensions", "sample_palette", "apply_mapping", "encode"] {
            assert!(timings.get_step(step).is_some(), "missing step {step}");
        }
        assert_eq!(timings.steps().len(), 5);
    }

    #[test]
    fn test_timings_accumulate_repeated_steps() {
        let mut timings = PipelineTimings::new();
        timings.add_step("encode", std::time::Duration::from_millis(2));
        timings.add_step("encode", std::time::Duration::from_millis(3));

        assert_eq!(timings.get_step("encode"), Some(std::time::Duration::from_millis(5)));
        assert_eq!(timings.total_duration(), std::time::Duration::from_millis(5));
    }

    #[test]
    fn test_output_path_for() {
        let (pipeline, _) = pipeline_with(ok_source(), false, ConversionConfig::default());

        let path = pipeline.output_path_for("scans/roll.01.tif".as_ref(), "out".as_ref());

        assert_eq!(path, std::path::Path::new("out/roll.01.tiff"));
    }

    #[test]
    fn test_batch_continue_records_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(input.join("nested")).unwrap();
        std::fs::write(input.join("a.tif"), b"negative").unwrap();
        std::fs::write(input.join("b.tif"), b"corrupt").unwrap();
        std::fs::write(input.join("nested/c.png"), b"negative").unwrap();
        std::fs::write(input.join("notes.txt"), b"scanner settings").unwrap();
        let output = dir.path().join("out");

        let (pipeline, written) = pipeline_with(ok_source(), false, ConversionConfig::default());
        let report = BatchConverter::new(pipeline, FailurePolicy::Continue)
            .convert_directory(&input, &output)
            .unwrap();

        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("b.tif"));
        assert!(!report.is_success());
        assert!(output.join("a.tiff").exists());
        assert!(output.join("c.tiff").exists());
        assert!(!output.join("b.tiff").exists());
        assert_eq!(written.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_batch_abort_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("a.tif"), b"corrupt").unwrap();
        std::fs::write(input.join("b.tif"), b"negative").unwrap();
        let output = dir.path().join("out");

        let (pipeline, written) = pipeline_with(ok_source(), false, ConversionConfig::default());
        let result = BatchConverter::new(pipeline, FailurePolicy::Abort)
            .convert_directory(&input, &output);

        assert!(matches!(result, Err(ConversionError::DecodeError(_))));
        assert!(written.lock().unwrap().is_empty());
        assert!(output.is_dir());
    }

    #[test]
    fn test_batch_ignores_output_nested_in_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().to_path_buf();
        std::fs::write(input.join("a.tif"), b"negative").unwrap();
        let output = input.join("positives");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(output.join("old.tiff"), b"negative").unwrap();

        let (pipeline, _) = pipeline_with(ok_source(), false, ConversionConfig::default());
        let report = BatchConverter::new(pipeline, FailurePolicy::Abort)
            .convert_directory(&input, &output)
            .unwrap();

        assert_eq!(report.converted, vec![output.join("a.tiff")]);
    }

    #[test]
    fn test_batch_missing_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, _) = pipeline_with(ok_source(), false, ConversionConfig::default());

        let result = BatchConverter::new(pipeline, FailurePolicy::Continue)
            .convert_directory(dir.path().join("missing"), dir.path().join("out"));

        assert!(matches!(result, Err(ConversionError::InputReadError(_))));
    }
}
