//! Source format detection

use std::path::Path;

use image::ImageFormat;

/// File extensions routed through the RAW decoder.
pub const RAW_EXTENSIONS: &[&str] = &[
    "cr2", "nef", "nrw", "raf", "arw", "srf", "sr2", "dng", "orf", "rw2", "pef", "srw",
];

/// How an input file is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Camera RAW capture, demosaiced before tone work
    Raw,
    /// Any raster format the `image` crate decodes (TIFF, PNG, JPEG, ...)
    Raster(ImageFormat),
}

impl SourceFormat {
    /// Picks the decoder from the file extension, case-insensitively.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;

        if RAW_EXTENSIONS.contains(&extension.as_str()) {
            return Some(SourceFormat::Raw);
        }

        ImageFormat::from_extension(&extension)
            .filter(|format| format.reading_enabled())
            .map(SourceFormat::Raster)
    }
}
