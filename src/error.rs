//! Pipeline error type
//!
//! Component errors fold into [`NarrationError`]; every variant is terminal
//! for the current run.

use thiserror::Error;

use crate::audio::AudioError;
use crate::document::ExtractionError;
use crate::tts::SynthesisError;

#[derive(Debug, Error)]
pub enum NarrationError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Speech synthesis failed for {utterance}: {source}")]
    Synthesis {
        /// Which utterance failed, e.g. "question 3"
        utterance: String,
        #[source]
        source: SynthesisError,
    },

    #[error("Audio processing failed: {0}")]
    Audio(#[from] AudioError),

    /// Generation was requested with zero QA pairs
    #[error("No question/answer pairs found; nothing to narrate")]
    EmptyInput,

    #[error("Invalid marker pattern: {0}")]
    Markers(#[from] regex::Error),
}

/// Process exit codes reported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Internal = 1,
    InvalidDocument = 2,
    EmptyInput = 3,
    Synthesis = 4,
    Audio = 5,
    Config = 6,
}

impl ErrorCode {
    pub fn exit_code(self) -> i32 {
        self as i32
    }

    /// Classify an error surfaced by the CLI by the first known cause.
    pub fn for_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<NarrationError>() {
                return e.code();
            }
            if cause.downcast_ref::<SynthesisError>().is_some() {
                return ErrorCode::Synthesis;
            }
            if cause.downcast_ref::<ExtractionError>().is_some() {
                return ErrorCode::InvalidDocument;
            }
            if cause.downcast_ref::<toml::de::Error>().is_some() {
                return ErrorCode::Config;
            }
        }
        ErrorCode::Internal
    }
}

impl NarrationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            NarrationError::Extraction(_) => ErrorCode::InvalidDocument,
            NarrationError::Synthesis { .. } => ErrorCode::Synthesis,
            NarrationError::Audio(_) => ErrorCode::Audio,
            NarrationError::EmptyInput => ErrorCode::EmptyInput,
            NarrationError::Markers(_) => ErrorCode::Config,
        }
    }
}
