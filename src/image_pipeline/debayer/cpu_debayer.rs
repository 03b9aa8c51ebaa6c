use anyhow::{Result, bail};
use tracing::{debug, info, warn};
use std::io::Cursor;
use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use crate::image_pipeline::{RawImageData, debayer::RgbImageData};

/// Standard XYZ to sRGB D65 matrix
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [ 3.2404542, -1.5371385, -0.4985314],
    [-0.9692660,  1.8760108,  0.0415560],
    [ 0.0556434, -0.2040259,  1.0572252],
];

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

pub struct CpuDebayer;

impl CpuDebayer {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }

    /// Demosaics (when needed) and color-converts RAW sensor data to 16-bit sRGB.
    ///
    /// The result is gamma encoded like a scanner's output, so RAW and raster negatives are
    /// sampled in the same tonal domain.
    pub fn process(&self, raw_image: &RawImageData) -> Result<RgbImageData> {
        let width = raw_image.width;
        let height = raw_image.height;
        info!("Starting CPU debayering for image {}x{}", width, height);

        let camera_rgb = match raw_image.components_per_pixel {
            1 => self.demosaic(raw_image)?,
            3 => raw_image.data[..width * height * 3].to_vec(),
            n => bail!("Unsupported RAW layout with {} components per pixel", n),
        };

        let cam_to_srgb = camera_to_srgb(&raw_image.cam_to_xyz);

        // Black level -> normalize -> white balance -> camera matrix -> sRGB curve, per pixel
        let black_level = raw_image.blacklevels[0] as f32;
        let white_level = raw_image.whitelevels[0] as f32;
        let range = (white_level - black_level).max(1.0);
        let wb = white_balance(&raw_image.wb_coeffs);
        debug!("Black level {}, white level {}, white balance {:?}", black_level, white_level, wb);

        let rgb_data: Vec<u16> = camera_rgb
            .chunks_exact(3)
            .flat_map(|px| {
                let lin: [f32; 3] = std::array::from_fn(|c| {
                    ((px[c] as f32 - black_level).max(0.0) / range) * wb[c]
                });
                std::array::from_fn::<u16, 3, _>(|r| {
                    let out = cam_to_srgb[r][0] * lin[0]
                        + cam_to_srgb[r][1] * lin[1]
                        + cam_to_srgb[r][2] * lin[2];
                    (linear_to_srgb(out.clamp(0.0, 1.0)) * 65535.0).round() as u16
                })
            })
            .collect();

        Ok(RgbImageData {
            width,
            height,
            data: rgb_data,
        })
    }

    fn demosaic(&self, raw_image: &RawImageData) -> Result<Vec<u16>> {
        let width = raw_image.width;
        let height = raw_image.height;

        // bayer crate only supports 8 and 16 bit
        let (bayer_depth, raster_depth, bytes_per_pixel) = if raw_image.bits_per_sample <= 8 {
            (BayerDepth::Depth8, RasterDepth::Depth8, 1)
        } else {
            (BayerDepth::Depth16LE, RasterDepth::Depth16, 2)
        };

        let bayer_bytes: Vec<u8> = if bytes_per_pixel == 1 {
            raw_image.data.iter().map(|&val| val as u8).collect()
        } else {
            raw_image.data.iter().flat_map(|&val| val.to_le_bytes()).collect()
        };

        let output_buf_size = width * height * 3 * bytes_per_pixel;
        let mut output_buf = vec![0u8; output_buf_size];
        let mut cursor = Cursor::new(&bayer_bytes[..]);
        let cfa = cfa_from_pattern(&raw_image.cfa_pattern);

        debug!(
            "Running demosaic with depth={:?}, CFA={:?}, algo=Linear, {} -> {} bytes",
            bayer_depth,
            cfa,
            bayer_bytes.len(),
            output_buf_size
        );

        let mut output_raster = RasterMut::new(width, height, raster_depth, &mut output_buf);
        bayer::run_demosaic(&mut cursor, bayer_depth, cfa, Demosaic::Linear, &mut output_raster)
            .map_err(|e| anyhow::anyhow!("Demosaic failed: {:?}", e))?;

        Ok(if bytes_per_pixel == 1 {
            output_buf.iter().map(|&b| b as u16).collect()
        } else {
            output_buf
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect()
        })
    }
}

fn cfa_from_pattern(pattern: &str) -> CFA {
    match pattern.get(..4).unwrap_or_default().to_ascii_uppercase().as_str() {
        "RGGB" => CFA::RGGB,
        "BGGR" => CFA::BGGR,
        "GRBG" => CFA::GRBG,
        "GBRG" => CFA::GBRG,
        other => {
            warn!("Unsupported CFA pattern {:?}, assuming RGGB", other);
            CFA::RGGB
        }
    }
}

/// White balance multipliers relative to green; unknown coefficients read as neutral.
fn white_balance(coeffs: &[f32; 4]) -> [f32; 3] {
    let green = coeffs[1];
    if !green.is_finite() || green <= 0.0 {
        return [1.0; 3];
    }
    let ratio = |c: f32| if c.is_finite() && c > 0.0 { c / green } else { 1.0 };
    [ratio(coeffs[0]), 1.0, ratio(coeffs[2])]
}

/// sRGB transfer curve (IEC 61966-2-1), linear light in, encoded value out.
fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Combines camera->XYZ with XYZ->sRGB, rows normalized so white stays white.
fn camera_to_srgb(cam_to_xyz: &[[f32; 4]; 3]) -> [[f32; 3]; 3] {
    let mut cam_to_srgb = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            cam_to_srgb[r][c] = (0..3).map(|k| XYZ_TO_SRGB[r][k] * cam_to_xyz[k][c]).sum();
        }
        let row_sum: f32 = cam_to_srgb[r].iter().sum();
        if !row_sum.is_finite() || row_sum.abs() < f32::EPSILON {
            return IDENTITY;
        }
        for value in cam_to_srgb[r].iter_mut() {
            *value /= row_sum;
        }
    }
    cam_to_srgb
}
