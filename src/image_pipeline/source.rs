//! Image source module
//!
//! Turns input files (camera RAW or common raster formats) into 16-bit RGB images.

mod reader;
mod standard_source;
pub mod types;


pub use reader::ImageSource;
pub use standard_source::StandardImageSource;
pub use types::{RAW_EXTENSIONS, SourceFormat};
