use thiserror::Error;

use super::AudioSpec;

#[derive(Debug, Error)]
pub enum AudioError {
    /// Synthesized bytes are not a readable stream of the expected format
    #[error("Failed to decode audio: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("No decodable audio track found")]
    NoAudioTrack,

    #[error("Audio stream does not declare a sample rate")]
    UnknownSampleRate,

    #[error("Cannot append {found} audio to a {expected} buffer")]
    SpecMismatch { expected: AudioSpec, found: AudioSpec },

    #[error("Unsupported channel count: {0} (only mono and stereo are supported)")]
    UnsupportedChannels(u16),

    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("MP3 encoding failed: {0}")]
    Mp3(String),
}
