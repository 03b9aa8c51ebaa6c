use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::Rgb16Image;
use crate::image_pipeline::config::ConversionConfig;

pub trait ImageWriter {
    fn write_image(&self, image: &Rgb16Image, output: &mut dyn Write, config: &ConversionConfig) -> Result<()>;
}
