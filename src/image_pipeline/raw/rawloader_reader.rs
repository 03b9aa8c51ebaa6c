//! RAW image reader implementation using the rawloader library.
//!
//! This module provides support for reading various RAW image formats (ARW, CR2, NEF, DNG, etc.)
//! using the rawloader library. It handles decoding RAW sensor data and extracting the
//! calibration metadata the debayer stage needs to produce a neutral RGB image.

use std::io::Cursor;

use tracing::debug;
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::RawImageData;
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
///
/// This reader supports any RAW format that rawloader can decode, including but not limited to:
/// - Sony ARW
/// - Canon CR2
/// - Nikon NEF
/// - Fujifilm RAF
/// - Adobe DNG
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// This method:
    /// 1. Decodes the RAW file using rawloader
    /// 2. Converts the data to u16 format (handles both integer and float RAW data)
    /// 3. Calculates the actual bits per sample from the sensor's white level metadata
    /// 4. Carries over black/white levels, white balance and the color matrix
    ///
    /// # Arguments
    ///
    /// * `data` - Raw bytes of the RAW image file
    ///
    /// # Returns
    ///
    /// * `Ok(RawImageData)` - Successfully decoded image with metadata
    /// * `Err(ConversionError::DecodeError)` - Failed to decode the RAW file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use c41invert_rs::image_pipeline::{RawImageReader, RawLoaderReader};
    ///
    /// let reader = RawLoaderReader;
    /// let raw_bytes = std::fs::read("negative.arw").unwrap();
    /// let image_data = reader.read_raw(&raw_bytes).unwrap();
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;

        debug!("Decoded image: {}x{}, {} component(s) per pixel", width, height, decoded.cpp);

        // Integer data is cast directly, float data (normalized 0.0-1.0) is scaled to u16 range
        let pixels: Vec<u16> = match &decoded.data {
            RawloaderImageData::Integer(values) => values.clone(),
            RawloaderImageData::Float(values) => {
                values.iter().map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).collect()
            }
        };

        let expected = width * height * decoded.cpp;
        if pixels.len() < expected {
            return Err(ConversionError::DecodeError(format!(
                "RAW payload holds {} samples, {}x{}x{} expected",
                pixels.len(),
                width,
                height,
                decoded.cpp
            )));
        }

        // The white level is the largest value the sensor produces, which gives its
        // effective bit depth (4095 -> 12 bits, 16383 -> 14 bits).
        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - max_white_level.leading_zeros()
        };

        debug!(
            "Calculated bits_per_sample: {} (max white level: {}), CFA {}",
            bits_per_sample, max_white_level, decoded.cfa.name
        );

        Ok(RawImageData {
            width,
            height,
            data: pixels,
            components_per_pixel: decoded.cpp,
            bits_per_sample,
            cfa_pattern: decoded.cfa.name.clone(),
            blacklevels: decoded.blacklevels,
            whitelevels: decoded.whitelevels,
            wb_coeffs: decoded.wb_coeffs,
            cam_to_xyz: decoded.cam_to_xyz(),
        })
    }
}
