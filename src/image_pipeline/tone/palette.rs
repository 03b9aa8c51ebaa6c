use image::Rgb;
use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::types::Rgb16Image;
use crate::image_pipeline::tone::region::SampleRegion;
use crate::image_pipeline::tone::statistics::ChannelStatistics;

/// Regions below this many pixels are scanned on the calling thread.
const PARALLEL_THRESHOLD: u64 = 100_000;

/// Channel statistics for the red, green and blue planes of a sample region.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    pub red: ChannelStatistics,
    pub green: ChannelStatistics,
    pub blue: ChannelStatistics,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pixel: Rgb<u16>) {
        let Rgb([r, g, b]) = pixel;
        self.red.add(r);
        self.green.add(g);
        self.blue.add(b);
    }

    pub fn merge(mut self, other: Palette) -> Self {
        self.red.merge(&other.red);
        self.green.merge(&other.green);
        self.blue.merge(&other.blue);
        self
    }

    pub fn channels(&self) -> [&ChannelStatistics; 3] {
        [&self.red, &self.green, &self.blue]
    }

    pub fn len(&self) -> u64 {
        self.red.len()
    }

    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }

    /// Accumulates every pixel of `region` into a new palette.
    ///
    /// Large regions are split by row across the rayon pool; the partial palettes are
    /// merged before this returns, so every sample is in place before any percentile
    /// is read.
    pub fn sample(image: &Rgb16Image, region: &SampleRegion) -> Self {
        debug!(
            "Sampling palette from {}x{} region at ({}, {})",
            region.width(),
            region.height(),
            region.min_x,
            region.min_y
        );

        let scan_row = |mut palette: Palette, y: u32| {
            for x in region.min_x..region.max_x {
                palette.add(*image.get_pixel(x, y));
            }
            palette
        };

        if region.area() < PARALLEL_THRESHOLD {
            return (region.min_y..region.max_y).fold(Palette::new(), scan_row);
        }

        (region.min_y..region.max_y)
            .into_par_iter()
            .fold(Palette::new, scan_row)
            .reduce(Palette::new, Palette::merge)
    }
}
