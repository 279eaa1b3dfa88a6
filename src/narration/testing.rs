//! Deterministic synthesizer for exercising the pipeline without the network

use std::sync::Mutex;

use async_trait::async_trait;

use crate::audio::{self, AudioBuffer, AudioSpec};
use crate::tts::{AudioFormat, SpeechSynthesizer, SynthesisError, Voice};

/// Native rate of the fake clips
pub const FAKE_SPEC: AudioSpec = AudioSpec {
    sample_rate: 24_000,
    channels: 1,
};

/// Length of the clip rendered for `text`: 10 ms per character plus 10 ms
pub fn tone_frames(text: &str) -> usize {
    240 * (text.chars().count() + 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub text: String,
    pub voice: Voice,
    pub format: AudioFormat,
}

/// Renders a constant-level clip per voice and records every request
#[derive(Debug, Default)]
pub struct FakeSynthesizer {
    calls: Mutex<Vec<Call>>,
    fail_on: Option<String>,
}

impl FakeSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any request whose text equals `text`.
    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn amplitude(voice: Voice) -> f32 {
        let index = Voice::ALL.iter().position(|v| *v == voice).unwrap_or(0);
        0.1 + index as f32 * 0.05
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        format: AudioFormat,
    ) -> Result<Vec<u8>, SynthesisError> {
        self.calls.lock().unwrap().push(Call {
            text: text.to_string(),
            voice,
            format,
        });

        if self.fail_on.as_deref() == Some(text) {
            return Err(SynthesisError::Api {
                status: 500,
                body: "upstream unavailable".to_string(),
            });
        }

        let clip = AudioBuffer::new(vec![Self::amplitude(voice); tone_frames(text)], FAKE_SPEC);
        Ok(audio::encode(&clip, format).expect("fake clip encodes"))
    }
}
