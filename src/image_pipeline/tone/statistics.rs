//! Per-channel sample statistics.

use std::cell::OnceCell;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// One bucket per representable 16-bit channel value.
const NUM_BUCKETS: usize = 1 << 16;

/// Multiset of channel samples collected from the sample region.
///
/// Samples are 16-bit, so the multiset is stored exactly as a count histogram. The
/// cumulative table backing percentile queries is built on the first query and reused
/// until another sample is added.
#[derive(Debug, Clone)]
pub struct ChannelStatistics {
    counts: Vec<u64>,
    total: u64,
    cumulative: OnceCell<Vec<u64>>,
}

impl Default for ChannelStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelStatistics {
    pub fn new() -> Self {
        Self {
            counts: vec![0; NUM_BUCKETS],
            total: 0,
            cumulative: OnceCell::new(),
        }
    }

    pub fn add(&mut self, value: u16) {
        self.counts[usize::from(value)] += 1;
        self.total += 1;
        self.cumulative.take();
    }

    /// Folds the samples of `other` into this set.
    pub fn merge(&mut self, other: &ChannelStatistics) {
        for (count, extra) in self.counts.iter_mut().zip(&other.counts) {
            *count += extra;
        }
        self.total += other.total;
        self.cumulative.take();
    }

    pub fn len(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns the sample at rank `p` (0.0 = smallest, 1.0 = largest).
    ///
    /// Uses the nearest rank `round(p * (n - 1))` over the sorted samples. `p` is clamped
    /// to `[0, 1]`; a NaN rank reads as 0.
    pub fn percentile(&self, p: f64) -> Result<u16> {
        if self.total == 0 {
            return Err(ConversionError::EmptyStatistics);
        }

        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let rank = (p * (self.total - 1) as f64).round() as u64;

        let cumulative = self.cumulative.get_or_init(|| {
            self.counts
                .iter()
                .scan(0u64, |running, &count| {
                    *running += count;
                    Some(*running)
                })
                .collect()
        });

        // First bucket whose running count passes the rank holds the sample.
        let bucket = cumulative.partition_point(|&seen| seen <= rank);
        Ok(bucket.min(NUM_BUCKETS - 1) as u16)
    }
}
