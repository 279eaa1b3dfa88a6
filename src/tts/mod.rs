//! Speech Synthesis Module
//!
//! Text-to-speech behind the [`SpeechSynthesizer`] trait, with an OpenAI
//! implementation used by the CLI.

mod error;
mod openai;
mod voice;

pub use error::SynthesisError;
pub use openai::{DEFAULT_TTS_MODEL, OPENAI_BASE_URL, OpenAiSpeechClient};
pub use voice::{AudioFormat, Voice};

use async_trait::async_trait;

/// Converts one utterance into encoded audio bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` spoken by `voice`, encoded as `format`.
    async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        format: AudioFormat,
    ) -> Result<Vec<u8>, SynthesisError>;
}
