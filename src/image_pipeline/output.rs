//! Output writing module
//!
//! This module encodes positives as 16-bit TIFF (with various compression options) or JPEG.

mod writer;
mod standard_writer;
pub mod types;


pub use writer::ImageWriter;
pub use standard_writer::StandardImageWriter;
pub use types::{OutputFormat, TiffCompression};
