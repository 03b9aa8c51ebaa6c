//! Per-channel tone curves and their application to whole images.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::common::types::{CHANNEL_MAX, CHANNELS, Rgb16Image};
use crate::image_pipeline::tone::range::ToneRange;

/// Images below this many pixels are mapped on the calling thread.
const PARALLEL_THRESHOLD: usize = 100_000;

/// Logistic slope for a percentile window of width 1.0.
const SIGMOID_SLOPE: f64 = 6.0;
const MIN_SIGMOID_SLOPE: f64 = 1.0;
const MAX_SIGMOID_SLOPE: f64 = 20.0;

/// Curve family selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneCurve {
    #[default]
    Linear,
    Sigmoid,
}

impl fmt::Display for ToneCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneCurve::Linear => write!(f, "linear"),
            ToneCurve::Sigmoid => write!(f, "sigmoid"),
        }
    }
}

impl FromStr for ToneCurve {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(ToneCurve::Linear),
            "sigmoid" | "s-curve" => Ok(ToneCurve::Sigmoid),
            other => Err(ConversionError::InvalidParameter(format!(
                "unknown tone curve `{other}`"
            ))),
        }
    }
}

/// Inverting tone map built from a [`ToneTransformation`](super::ToneTransformation).
///
/// Both variants turn a channel's `[low, high]` window into the full output range while
/// reversing polarity; they differ only in how the window is traversed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneMapping {
    /// Straight line from `low -> CHANNEL_MAX` to `high -> 0`, clipped outside.
    Linear { ranges: [ToneRange; CHANNELS] },
    /// Logistic roll-off across the window, gentler at both ends.
    Sigmoid {
        ranges: [ToneRange; CHANNELS],
        steepness: f64,
    },
}

impl ToneMapping {
    pub fn ranges(&self) -> &[ToneRange; CHANNELS] {
        match self {
            ToneMapping::Linear { ranges } | ToneMapping::Sigmoid { ranges, .. } => ranges,
        }
    }

    pub fn curve(&self) -> ToneCurve {
        match self {
            ToneMapping::Linear { .. } => ToneCurve::Linear,
            ToneMapping::Sigmoid { .. } => ToneCurve::Sigmoid,
        }
    }

    /// Maps one value of `channel` (0 = red, 1 = green, 2 = blue).
    ///
    /// # Panics
    ///
    /// Panics if `channel >= CHANNELS`.
    pub fn map(&self, channel: usize, value: u16) -> u16 {
        let t = self.ranges()[channel]
            .inverted_position(value)
            .clamp(0.0, 1.0);

        let t = match self {
            ToneMapping::Linear { .. } => t,
            ToneMapping::Sigmoid { steepness, .. } => logistic(t, sigmoid_slope(*steepness)),
        };

        (t * f64::from(CHANNEL_MAX)).round() as u16
    }

    /// Tabulates the mapping of every possible value of each channel.
    pub fn lookup_tables(&self) -> [Vec<u16>; CHANNELS] {
        std::array::from_fn(|channel| {
            (0..=CHANNEL_MAX)
                .map(|value| self.map(channel, value))
                .collect()
        })
    }

    /// Produces the positive of `image` in a newly allocated buffer.
    pub fn apply(&self, image: &Rgb16Image) -> Rgb16Image {
        let (width, height) = image.dimensions();
        let mut output = Rgb16Image::new(width, height);
        if width == 0 || height == 0 {
            return output;
        }

        let tables = self.lookup_tables();
        let map_row = |(dst, src): (&mut [u16], &[u16])| {
            let pixels = dst
                .chunks_exact_mut(CHANNELS)
                .zip(src.chunks_exact(CHANNELS));
            for (out_px, in_px) in pixels {
                for (channel, table) in tables.iter().enumerate() {
                    out_px[channel] = table[usize::from(in_px[channel])];
                }
            }
        };

        let row_len = width as usize * CHANNELS;
        let source: &[u16] = image.as_raw();
        let target: &mut [u16] = &mut output;
        if (width as usize) * (height as usize) < PARALLEL_THRESHOLD {
            target
                .chunks_exact_mut(row_len)
                .zip(source.chunks_exact(row_len))
                .for_each(map_row);
        } else {
            target
                .par_chunks_exact_mut(row_len)
                .zip(source.par_chunks_exact(row_len))
                .for_each(map_row);
        }

        output
    }
}

/// Slope of the logistic curve for a percentile window of signed width `steepness`.
///
/// Wider windows already compress more of the histogram, so they get a flatter curve.
fn sigmoid_slope(steepness: f64) -> f64 {
    let width = steepness.abs();
    if !width.is_finite() || width < f64::EPSILON {
        return MAX_SIGMOID_SLOPE;
    }
    (SIGMOID_SLOPE / width).clamp(MIN_SIGMOID_SLOPE, MAX_SIGMOID_SLOPE)
}

/// Logistic curve centered on 0.5 and rescaled so that 0 and 1 are fixed points.
fn logistic(t: f64, slope: f64) -> f64 {
    let raw = |x: f64| 1.0 / (1.0 + (-slope * (x - 0.5)).exp());
    let (floor, ceiling) = (raw(0.0), raw(1.0));
    ((raw(t) - floor) / (ceiling - floor)).clamp(0.0, 1.0)
}
