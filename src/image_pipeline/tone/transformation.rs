use tracing::{debug, warn};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::tone::mapping::{ToneCurve, ToneMapping};
use crate::image_pipeline::tone::palette::Palette;
use crate::image_pipeline::tone::range::ToneRange;

const CHANNEL_NAMES: [&str; 3] = ["red", "green", "blue"];

/// Per-channel black/white points plus the percentile window they were taken from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneTransformation {
    pub red: ToneRange,
    pub green: ToneRange,
    pub blue: ToneRange,
    /// `low_cut - high_cut`; negative for a well-formed window.
    pub steepness: f64,
}

impl ToneTransformation {
    pub fn new(red: ToneRange, green: ToneRange, blue: ToneRange, steepness: f64) -> Self {
        Self {
            red,
            green,
            blue,
            steepness,
        }
    }

    /// Reads the `low_cut` and `high_cut` percentiles of every channel in `palette`.
    ///
    /// Fails with `EmptyStatistics` when the palette holds no samples. A channel whose
    /// window collapses is only reported; the mapping handles it.
    pub fn build(palette: &Palette, low_cut: f64, high_cut: f64) -> Result<Self> {
        let mut ranges = [ToneRange::FULL; 3];
        for ((range, stats), name) in ranges
            .iter_mut()
            .zip(palette.channels())
            .zip(CHANNEL_NAMES)
        {
            *range = ToneRange::new(stats.percentile(low_cut)?, stats.percentile(high_cut)?);
            debug!(
                channel = name,
                low = range.low,
                high = range.high,
                "Sampled black and white points"
            );
            if range.is_degenerate() {
                warn!(
                    channel = name,
                    low = range.low,
                    high = range.high,
                    "Degenerate tone range, channel will not be stretched"
                );
            }
        }

        let [red, green, blue] = ranges;
        Ok(Self::new(red, green, blue, low_cut - high_cut))
    }

    pub fn ranges(&self) -> [ToneRange; 3] {
        [self.red, self.green, self.blue]
    }

    pub fn to_linear(&self) -> ToneMapping {
        ToneMapping::Linear {
            ranges: self.ranges(),
        }
    }

    pub fn to_sigmoid(&self) -> ToneMapping {
        ToneMapping::Sigmoid {
            ranges: self.ranges(),
            steepness: self.steepness,
        }
    }

    pub fn to_mapping(&self, curve: ToneCurve) -> ToneMapping {
        match curve {
            ToneCurve::Linear => self.to_linear(),
            ToneCurve::Sigmoid => self.to_sigmoid(),
        }
    }
}
