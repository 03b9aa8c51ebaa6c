//! Camera RAW decoding
//!
//! Negatives shot with a digital camera arrive as RAW captures. This module decodes them
//! into mosaiced sensor data with the calibration the debayer needs.

mod rawloader_reader;
mod reader;
pub mod types;

pub use rawloader_reader::RawLoaderReader;
pub use reader::RawImageReader;
pub use types::RawImageData;
