//! RAW image data types

/// Represents decoded RAW sensor data together with the calibration needed to develop it
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Raw pixel data (single channel Bayer pattern, or interleaved RGB when
    /// `components_per_pixel` is 3)
    pub data: Vec<u16>,
    /// Samples per pixel (1 for mosaiced sensors, 3 for linear RGB files)
    pub components_per_pixel: usize,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    /// Color filter array layout, e.g. "RGGB"
    pub cfa_pattern: String,
    /// Per-channel black levels
    pub blacklevels: [u16; 4],
    /// Per-channel white levels
    pub whitelevels: [u16; 4],
    /// As-shot white balance multipliers (R, G, B, G2)
    pub wb_coeffs: [f32; 4],
    /// Camera to XYZ matrix (3x4, fourth column for the second green)
    pub cam_to_xyz: [[f32; 4]; 3],
}
