use thiserror::Error;

/// A single utterance could not be synthesized
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// No API key configured for the provider
    #[error("OpenAI API key not set (export OPENAI_API_KEY or set [tts].api_key)")]
    MissingApiKey,

    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("Failed to send TTS request: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("OpenAI TTS error ({status}): {body}")]
    Api { status: u16, body: String },
}
