//! The assembled narration track and its segment map

use std::fmt;
use std::time::Duration;

use crate::audio::{self, AudioBuffer, AudioError, AudioSpec};
use crate::tts::AudioFormat;

/// What a stretch of the track contains; indices are 1-based pair numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Question(usize),
    Answer(usize),
    Silence,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Question(n) => write!(f, "question {}", n),
            SegmentKind::Answer(n) => write!(f, "answer {}", n),
            SegmentKind::Silence => f.write_str("silence"),
        }
    }
}

/// One contiguous stretch of the track, in frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start_frame: usize,
    pub frames: usize,
}

/// Final concatenated audio
#[derive(Debug, Clone)]
pub struct Track {
    audio: AudioBuffer,
    segments: Vec<Segment>,
}

impl Track {
    /// Concatenate `sequence` in order, recording where each part lands.
    pub fn from_sequence(
        spec: AudioSpec,
        sequence: &[(SegmentKind, &AudioBuffer)],
    ) -> Result<Self, AudioError> {
        let mut segments = Vec::with_capacity(sequence.len());
        let mut start_frame = 0;
        for (kind, buffer) in sequence {
            segments.push(Segment {
                kind: *kind,
                start_frame,
                frames: buffer.frames(),
            });
            start_frame += buffer.frames();
        }

        let audio = AudioBuffer::concat(spec, sequence.iter().map(|(_, buffer)| *buffer))?;
        Ok(Self { audio, segments })
    }

    pub fn audio(&self) -> &AudioBuffer {
        &self.audio
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn duration(&self) -> Duration {
        self.audio.duration()
    }

    /// Interleaved samples covered by `segment`
    pub fn segment_samples(&self, segment: &Segment) -> &[f32] {
        let channels = self.audio.spec.channels as usize;
        let start = segment.start_frame * channels;
        let end = start + segment.frames * channels;
        &self.audio.samples[start..end]
    }

    /// Encode the whole track as a file in `format`.
    pub fn export(&self, format: AudioFormat) -> Result<Vec<u8>, AudioError> {
        audio::encode(&self.audio, format)
    }
}
