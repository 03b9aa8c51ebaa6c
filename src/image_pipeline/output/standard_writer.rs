use std::io::Write;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::common::types::Rgb16Image;
use crate::image_pipeline::config::ConversionConfig;
use crate::image_pipeline::output::types::{OutputFormat, TiffCompression};
use crate::image_pipeline::output::writer::ImageWriter;

pub struct StandardImageWriter;

impl StandardImageWriter {
    fn write_tiff(&self, image: &Rgb16Image, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", image.width(), image.height());

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder.write_image::<tiff::encoder::colortype::RGB16>(
            image.width(),
            image.height(),
            image.as_raw(),
        ).map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }

    fn write_jpeg(&self, image: &Rgb16Image, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        debug!("Encoding JPEG image: {}x{}, quality {}", image.width(), image.height(), config.jpeg_quality);

        let rgb8 = DynamicImage::ImageRgb16(image.clone()).into_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality)
            .encode_image(&rgb8)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("JPEG encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

impl ImageWriter for StandardImageWriter {
    fn write_image(&self, image: &Rgb16Image, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        match config.output_format {
            OutputFormat::Tiff => self.write_tiff(image, output, config),
            OutputFormat::Jpeg => self.write_jpeg(image, output, config),
        }
    }
}
