//! In-memory audio buffers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::AudioError;

/// Sample rate and channel layout of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioSpec {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Number of frames covering `duration` at this sample rate
    pub fn frames_for(&self, duration: Duration) -> usize {
        (duration.as_millis() * self.sample_rate as u128 / 1000) as usize
    }
}

impl fmt::Display for AudioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{}ch", n),
        };
        write!(f, "{} Hz {}", self.sample_rate, layout)
    }
}

/// Decoded audio: interleaved `f32` samples in [-1.0, 1.0]
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub spec: AudioSpec,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, spec: AudioSpec) -> Self {
        Self { samples, spec }
    }

    pub fn empty(spec: AudioSpec) -> Self {
        Self::new(Vec::new(), spec)
    }

    /// Digital silence lasting `duration`
    pub fn silence(duration: Duration, spec: AudioSpec) -> Self {
        let frames = spec.frames_for(duration);
        Self::new(vec![0.0; frames * spec.channels as usize], spec)
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.spec.channels == 0 {
            return 0;
        }
        self.samples.len() / self.spec.channels as usize
    }

    pub fn duration(&self) -> Duration {
        if self.spec.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.spec.sample_rate as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append `other` sample-for-sample; both buffers must share a spec.
    pub fn append(&mut self, other: &AudioBuffer) -> Result<(), AudioError> {
        if other.spec != self.spec {
            return Err(AudioError::SpecMismatch {
                expected: self.spec,
                found: other.spec,
            });
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }

    /// Concatenate buffers in order into one buffer of `spec`.
    pub fn concat<'a, I>(spec: AudioSpec, buffers: I) -> Result<AudioBuffer, AudioError>
    where
        I: IntoIterator<Item = &'a AudioBuffer>,
    {
        let mut out = AudioBuffer::empty(spec);
        for buffer in buffers {
            out.append(buffer)?;
        }
        Ok(out)
    }

    /// Change the channel layout between mono and stereo.
    ///
    /// Downmixing averages channels; upmixing duplicates the mono signal.
    pub fn remix(self, channels: u16) -> Result<AudioBuffer, AudioError> {
        let from = self.spec.channels;
        if from == channels {
            return Ok(self);
        }
        if from == 0 {
            return Err(AudioError::UnsupportedChannels(from));
        }

        let spec = AudioSpec::new(self.spec.sample_rate, channels);
        let samples = match channels {
            1 => self
                .samples
                .chunks(from as usize)
                .map(|frame| frame.iter().sum::<f32>() / from as f32)
                .collect(),
            2 if from == 1 => self.samples.iter().flat_map(|&s| [s, s]).collect(),
            _ => return Err(AudioError::UnsupportedChannels(channels)),
        };
        Ok(AudioBuffer::new(samples, spec))
    }

    /// Convert to `target` layout and sample rate.
    pub fn conform(self, target: AudioSpec) -> Result<AudioBuffer, AudioError> {
        let remixed = self.remix(target.channels)?;
        super::resample::resample(&remixed, target.sample_rate)
    }

    /// Samples as 16-bit signed PCM
    pub fn to_i16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
            .collect()
    }
}
