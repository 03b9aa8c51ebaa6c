//! Film negative to positive conversion.
//!
//! Samples a negative's tonal range, inverts it through a linear or sigmoid tone curve
//! and writes the positive as TIFF or JPEG.

pub mod image_pipeline;
pub mod logger;
