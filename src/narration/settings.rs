//! Per-run narration settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::audio::AudioSpec;
use crate::tts::{AudioFormat, Voice};

/// Bounds of the pause accepted from users, in milliseconds
pub const PAUSE_RANGE_MS: std::ops::RangeInclusive<u64> = 200..=1500;

/// Voices, pause, export format, and track layout; constant for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationSettings {
    /// Voice reading the questions (default: "alloy")
    #[serde(default = "default_question_voice")]
    pub question_voice: Voice,

    /// Voice reading the answers (default: "verse")
    #[serde(default = "default_answer_voice")]
    pub answer_voice: Voice,

    /// Silence after every utterance, in milliseconds (default: 500)
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Synthesis and export format (default: "mp3")
    #[serde(default)]
    pub format: AudioFormat,

    /// Maximum synthesis requests in flight (default: 1, sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Sample rate of the assembled track (default: 24000, the provider's native rate)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Channels of the assembled track, 1 or 2 (default: 1)
    #[serde(default = "default_channels")]
    pub channels: u16,
}

fn default_question_voice() -> Voice {
    Voice::Alloy
}

fn default_answer_voice() -> Voice {
    Voice::Verse
}

fn default_pause_ms() -> u64 {
    500
}

fn default_concurrency() -> usize {
    1
}

fn default_sample_rate() -> u32 {
    24_000
}

fn default_channels() -> u16 {
    1
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            question_voice: default_question_voice(),
            answer_voice: default_answer_voice(),
            pause_ms: default_pause_ms(),
            format: AudioFormat::default(),
            concurrency: default_concurrency(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

impl NarrationSettings {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn track_spec(&self) -> AudioSpec {
        AudioSpec::new(self.sample_rate, self.channels)
    }
}
