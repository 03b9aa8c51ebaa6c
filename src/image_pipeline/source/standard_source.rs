//! Decodes input files into the 16-bit RGB buffer the tone engine works on.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::Rgb16Image;
use crate::image_pipeline::debayer::CpuDebayer;
use crate::image_pipeline::raw::{RawImageReader, RawLoaderReader};
use crate::image_pipeline::source::reader::ImageSource;
use crate::image_pipeline::source::types::SourceFormat;

/// Default source: rawloader + CPU debayer for RAW captures, the `image` crate otherwise.
///
/// Whatever the input depth, the result is 16 bits per channel; 8-bit scans are scaled
/// up by the `image` crate and alpha is dropped.
pub struct StandardImageSource<R: RawImageReader = RawLoaderReader> {
    raw_reader: R,
}

impl StandardImageSource<RawLoaderReader> {
    pub fn new() -> Self {
        Self {
            raw_reader: RawLoaderReader,
        }
    }
}

impl Default for StandardImageSource<RawLoaderReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RawImageReader> StandardImageSource<R> {
    pub fn with_raw_reader(raw_reader: R) -> Self {
        Self { raw_reader }
    }

    fn read_raw(&self, data: &[u8]) -> Result<Rgb16Image> {
        let raw = self.raw_reader.read_raw(data)?;
        let rgb = CpuDebayer::new()
            .and_then(|debayer| debayer.process(&raw))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        Rgb16Image::from_raw(rgb.width as u32, rgb.height as u32, rgb.data).ok_or_else(|| {
            ConversionError::DecodeError(format!(
                "Debayered buffer does not match {}x{}",
                rgb.width, rgb.height
            ))
        })
    }

    fn read_raster(&self, data: &[u8], format: image::ImageFormat) -> Result<Rgb16Image> {
        let decoded = image::load_from_memory_with_format(data, format)
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;
        debug!(
            "Decoded {:?} {}x{} ({:?})",
            format,
            decoded.width(),
            decoded.height(),
            decoded.color()
        );
        Ok(decoded.into_rgb16())
    }
}

impl<R: RawImageReader> ImageSource for StandardImageSource<R> {
    fn read_image(&self, data: &[u8], format: SourceFormat) -> Result<Rgb16Image> {
        match format {
            SourceFormat::Raw => self.read_raw(data),
            SourceFormat::Raster(format) => self.read_raster(data, format),
        }
    }
}
