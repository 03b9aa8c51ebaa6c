//! Common utilities module
//!
//! This module contains shared error and image types used across the image pipeline.

pub mod error;
pub mod types;

pub use error::{ConversionError, Result};
pub use types::{Rgb16Image, CHANNELS, CHANNEL_MAX};
