//! Tone engine
//!
//! Samples a region of a negative, derives per-channel black and white points from the
//! sampled percentiles and maps every pixel through an inverting tone curve.

mod mapping;
mod palette;
mod range;
mod region;
mod statistics;
mod transformation;


pub use mapping::{ToneCurve, ToneMapping};
pub use palette::Palette;
pub use range::ToneRange;
pub use region::SampleRegion;
pub use statistics::ChannelStatistics;
pub use transformation::ToneTransformation;
