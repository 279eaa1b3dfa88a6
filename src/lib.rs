//! duovox - Two-Voice Narration of Question/Answer PDFs
//!
//! Extracts the text of a PDF interview, splits it into question/answer
//! pairs at the `Pergunta` / `Resposta` markers, synthesizes questions and
//! answers with two distinct voices, and assembles a single audio file with
//! a fixed pause after every utterance.
//!
//! ## Pipeline
//!
//! - **document:** PDF bytes to text, page by page (lopdf)
//! - **segmenter:** text to ordered QA pairs
//! - **tts:** one OpenAI speech request per utterance
//! - **audio:** decode, resample, concatenate, and encode (symphonia, rubato, hound, LAME)
//! - **narration:** the assembler and the export named `entrevista_2vozes.<format>`
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//!
//! # Preview what will be narrated
//! duovox inspect entrevista.pdf
//!
//! # Narrate with custom voices
//! duovox generate entrevista.pdf --question-voice nova --answer-voice onyx --format wav
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod narration;
pub mod segmenter;
pub mod tts;
pub mod utils;

// Re-export commonly used types
pub use error::{ErrorCode, NarrationError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
