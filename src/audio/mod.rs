//! Audio Module
//!
//! Buffers, decoding of synthesized clips, sample-rate conversion, and export.

mod buffer;
mod decode;
mod encode;
mod error;
pub mod resample;

pub use buffer::{AudioBuffer, AudioSpec};
pub use decode::decode;
pub use encode::encode;
pub use error::AudioError;
