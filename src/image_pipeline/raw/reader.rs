use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawImageData;

/// Decodes an in-memory camera RAW capture into sensor data plus calibration.
///
/// Implementations must not demosaic; `StandardImageSource` hands the result to the
/// CPU debayer.
pub trait RawImageReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData>;
}
