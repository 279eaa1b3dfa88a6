//! Narration Module
//!
//! Turns QA pairs into a single two-voice track and exports it.

mod assembler;
mod session;
mod settings;
mod track;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::Assembler;
pub use session::{EXPORT_BASENAME, NarrationExport, NarrationSession};
pub use settings::{NarrationSettings, PAUSE_RANGE_MS};
pub use track::{Segment, SegmentKind, Track};
