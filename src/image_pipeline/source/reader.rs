use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::Rgb16Image;
use crate::image_pipeline::source::types::SourceFormat;

pub trait ImageSource {
    fn read_image(&self, data: &[u8], format: SourceFormat) -> Result<Rgb16Image>;
}
