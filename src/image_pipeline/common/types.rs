//! Shared image types

use image::{ImageBuffer, Rgb};

/// 16-bit RGB image every source is normalized to before tone work.
pub type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// Largest representable channel value.
pub const CHANNEL_MAX: u16 = u16::MAX;

/// Number of color channels the engine works on.
pub const CHANNELS: usize = 3;
