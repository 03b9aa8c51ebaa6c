//! Output encoding types

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::ConversionError;

/// Container the positive is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 16-bit RGB TIFF (lossless)
    #[default]
    Tiff,
    /// 8-bit RGB JPEG (lossy, quality controlled)
    Jpeg,
}

impl OutputFormat {
    /// File extension used for converted files.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tiff => "tiff",
            OutputFormat::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            other => Err(ConversionError::UnsupportedFormat(format!(
                "{other} (expected TIFF or JPEG)"
            ))),
        }
    }
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced (default)
    #[default]
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

impl fmt::Display for TiffCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TiffCompression::None => "none",
            TiffCompression::Lzw => "lzw",
            TiffCompression::DeflateFast => "deflate-fast",
            TiffCompression::DeflateBalanced => "deflate-balanced",
            TiffCompression::DeflateBest => "deflate-best",
        };
        f.write_str(name)
    }
}

impl FromStr for TiffCompression {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => Ok(TiffCompression::None),
            "lzw" => Ok(TiffCompression::Lzw),
            "deflate-fast" => Ok(TiffCompression::DeflateFast),
            "deflate" | "deflate-balanced" => Ok(TiffCompression::DeflateBalanced),
            "deflate-best" => Ok(TiffCompression::DeflateBest),
            other => Err(ConversionError::InvalidParameter(format!(
                "unknown TIFF compression `{other}`"
            ))),
        }
    }
}
