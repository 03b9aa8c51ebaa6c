use std::cmp::Ordering;

use crate::image_pipeline::common::types::CHANNEL_MAX;

/// Black and white points for one channel, in source channel values.
///
/// `low <= high` is not enforced: a window with `low == high` flattens the channel and a
/// reversed window falls back to the full-range identity stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRange {
    pub low: u16,
    pub high: u16,
}

impl ToneRange {
    /// The whole channel domain. Mapping through it is a plain inversion.
    pub const FULL: ToneRange = ToneRange {
        low: 0,
        high: CHANNEL_MAX,
    };

    pub fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    pub fn is_degenerate(&self) -> bool {
        self.low >= self.high
    }

    /// Unclamped position of `value` in the window, reversed: `high` gives 0.0 and
    /// `low` gives 1.0.
    pub fn inverted_position(&self, value: u16) -> f64 {
        match self.low.cmp(&self.high) {
            Ordering::Less => {
                (f64::from(self.high) - f64::from(value))
                    / (f64::from(self.high) - f64::from(self.low))
            }
            Ordering::Equal => 0.0,
            Ordering::Greater => ToneRange::FULL.inverted_position(value),
        }
    }
}
