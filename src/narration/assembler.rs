//! Audio Assembler
//!
//! Synthesizes every utterance, decodes and conforms the clips to the track
//! spec, and concatenates them with a shared silence buffer:
//! question 1, silence, answer 1, silence, question 2, ...

use futures::{StreamExt, TryStreamExt, stream};

use super::{NarrationSettings, SegmentKind, Track};
use crate::audio::{self, AudioBuffer, AudioSpec};
use crate::error::NarrationError;
use crate::segmenter::QaPair;
use crate::tts::{AudioFormat, SpeechSynthesizer, Voice};

/// One synthesis request
#[derive(Debug, Clone, Copy)]
struct Utterance<'a> {
    kind: SegmentKind,
    text: &'a str,
    voice: Voice,
}

fn utterances<'a>(pairs: &'a [QaPair], settings: &NarrationSettings) -> Vec<Utterance<'a>> {
    pairs
        .iter()
        .enumerate()
        .flat_map(|(i, pair)| {
            [
                Utterance {
                    kind: SegmentKind::Question(i + 1),
                    text: pair.question.as_str(),
                    voice: settings.question_voice,
                },
                Utterance {
                    kind: SegmentKind::Answer(i + 1),
                    text: pair.answer.as_str(),
                    voice: settings.answer_voice,
                },
            ]
        })
        .collect()
}

pub struct Assembler<S> {
    synthesizer: S,
}

impl<S: SpeechSynthesizer> Assembler<S> {
    pub fn new(synthesizer: S) -> Self {
        Self { synthesizer }
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Build the narration track for `pairs`.
    ///
    /// Fails with [`NarrationError::EmptyInput`] before any synthesis call when
    /// `pairs` is empty. The first failing utterance aborts the run and all
    /// audio produced so far is dropped.
    pub async fn assemble(
        &self,
        pairs: &[QaPair],
        settings: &NarrationSettings,
    ) -> Result<Track, NarrationError> {
        if pairs.is_empty() {
            return Err(NarrationError::EmptyInput);
        }

        let spec = settings.track_spec();
        let silence = AudioBuffer::silence(settings.pause(), spec);
        let utterances = utterances(pairs, settings);

        tracing::info!(
            "Assembling {} pair(s): {} utterance(s), voices {}/{}, pause {} ms, {} in flight",
            pairs.len(),
            utterances.len(),
            settings.question_voice,
            settings.answer_voice,
            settings.pause_ms,
            settings.concurrency.max(1),
        );

        // `buffered` yields results in submission order regardless of which
        // request finishes first.
        let clips: Vec<AudioBuffer> = stream::iter(&utterances)
            .map(|utterance| self.render(utterance, settings.format, spec))
            .buffered(settings.concurrency.max(1))
            .try_collect()
            .await?;

        let mut sequence = Vec::with_capacity(clips.len() * 2);
        for (utterance, clip) in utterances.iter().zip(&clips) {
            sequence.push((utterance.kind, clip));
            sequence.push((SegmentKind::Silence, &silence));
        }

        let track = Track::from_sequence(spec, &sequence)?;
        tracing::info!(
            "Assembled track: {} segment(s), {:.1}s",
            track.segments().len(),
            track.duration().as_secs_f64()
        );
        Ok(track)
    }

    async fn render(
        &self,
        utterance: &Utterance<'_>,
        format: AudioFormat,
        spec: AudioSpec,
    ) -> Result<AudioBuffer, NarrationError> {
        tracing::debug!("Synthesizing {} with {}", utterance.kind, utterance.voice);

        let bytes = self
            .synthesizer
            .synthesize(utterance.text, utterance.voice, format)
            .await
            .map_err(|source| NarrationError::Synthesis {
                utterance: utterance.kind.to_string(),
                source,
            })?;

        let clip = audio::decode(bytes, format)?;
        Ok(clip.conform(spec)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::testing::{FakeSynthesizer, tone_frames};
    use crate::tts::{MockSpeechSynthesizer, SynthesisError};
    use std::time::Duration;

    fn settings() -> NarrationSettings {
        NarrationSettings {
            format: AudioFormat::Wav,
            ..NarrationSettings::default()
        }
    }

    fn example_pairs() -> Vec<QaPair> {
        vec![
            QaPair::new("What is 2+2?", "4."),
            QaPair::new("Capital of France?", "Paris."),
        ]
    }

    #[tokio::test]
    async fn test_track_interleaves_questions_answers_and_silence() {
        let assembler = Assembler::new(FakeSynthesizer::new());
        let settings = settings();
        let track = assembler.assemble(&example_pairs(), &settings).await.unwrap();

        let kinds: Vec<SegmentKind> = track.segments().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Question(1),
                SegmentKind::Silence,
                SegmentKind::Answer(1),
                SegmentKind::Silence,
                SegmentKind::Question(2),
                SegmentKind::Silence,
                SegmentKind::Answer(2),
                SegmentKind::Silence,
            ]
        );

        let pause_frames = settings.track_spec().frames_for(Duration::from_millis(500));
        let texts = ["What is 2+2?", "4.", "Capital of France?", "Paris."];
        for (i, segment) in track.segments().iter().enumerate() {
            if i % 2 == 1 {
                assert_eq!(segment.frames, pause_frames);
                assert!(track.segment_samples(segment).iter().all(|&s| s == 0.0));
            } else {
                assert_eq!(segment.frames, tone_frames(texts[i / 2]));
            }
        }

        let total: usize = track.segments().iter().map(|s| s.frames).sum();
        assert_eq!(track.audio().frames(), total);
    }

    #[tokio::test]
    async fn test_voices_assigned_per_side() {
        let synth = FakeSynthesizer::new();
        let assembler = Assembler::new(synth);
        let settings = NarrationSettings {
            question_voice: Voice::Shimmer,
            answer_voice: Voice::Onyx,
            ..settings()
        };
        assembler.assemble(&example_pairs(), &settings).await.unwrap();

        let calls = assembler.synthesizer().calls();
        let voices: Vec<Voice> = calls.iter().map(|c| c.voice).collect();
        assert_eq!(
            voices,
            vec![Voice::Shimmer, Voice::Onyx, Voice::Shimmer, Voice::Onyx]
        );
        let texts: Vec<&str> = calls.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["What is 2+2?", "4.", "Capital of France?", "Paris."]);
        assert!(calls.iter().all(|c| c.format == AudioFormat::Wav));
    }

    #[tokio::test]
    async fn test_question_and_answer_clips_land_in_their_segments() {
        let assembler = Assembler::new(FakeSynthesizer::new());
        let settings = NarrationSettings {
            question_voice: Voice::Alloy,
            answer_voice: Voice::Verse,
            ..settings()
        };
        let track = assembler.assemble(&example_pairs(), &settings).await.unwrap();

        let alloy = FakeSynthesizer::amplitude(Voice::Alloy);
        let verse = FakeSynthesizer::amplitude(Voice::Verse);
        for segment in track.segments() {
            let samples = track.segment_samples(segment);
            let expected = match segment.kind {
                SegmentKind::Question(_) => alloy,
                SegmentKind::Answer(_) => verse,
                SegmentKind::Silence => 0.0,
            };
            assert!(
                samples.iter().all(|&s| (s - expected).abs() < 1e-3),
                "{} has unexpected content",
                segment.kind
            );
        }
    }

    #[tokio::test]
    async fn test_empty_pairs_fail_without_synthesis() {
        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_synthesize().never();

        let assembler = Assembler::new(mock);
        let result = assembler.assemble(&[], &settings()).await;
        assert!(matches!(result, Err(NarrationError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_synthesis_failure_aborts_remaining_calls() {
        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_synthesize()
            .times(1)
            .returning(|_, _, _| {
                Err(SynthesisError::Api {
                    status: 400,
                    body: "invalid voice".to_string(),
                })
            });

        let assembler = Assembler::new(mock);
        let err = assembler
            .assemble(&example_pairs(), &settings())
            .await
            .unwrap_err();

        match err {
            NarrationError::Synthesis { utterance, source } => {
                assert_eq!(utterance, "question 1");
                assert!(source.to_string().contains("400"));
            }
            other => panic!("expected synthesis error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_on_later_utterance_discards_everything() {
        let synth = FakeSynthesizer::failing_on("Paris.");
        let assembler = Assembler::new(synth);
        let err = assembler
            .assemble(&example_pairs(), &settings())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NarrationError::Synthesis { ref utterance, .. } if utterance == "answer 2"
        ));
        assert_eq!(assembler.synthesizer().calls().len(), 4);
    }

    #[tokio::test]
    async fn test_undecodable_clip_is_audio_error() {
        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_synthesize()
            .returning(|_, _, _| Ok(b"not audio".to_vec()));

        let assembler = Assembler::new(mock);
        let err = assembler
            .assemble(&example_pairs(), &settings())
            .await
            .unwrap_err();
        assert!(matches!(err, NarrationError::Audio(_)));
    }

    #[tokio::test]
    async fn test_empty_strings_are_still_synthesized() {
        let assembler = Assembler::new(FakeSynthesizer::new());
        let pairs = vec![QaPair::new("", "")];
        let track = assembler.assemble(&pairs, &settings()).await.unwrap();
        assert_eq!(track.segments().len(), 4);
        assert_eq!(assembler.synthesizer().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_run_matches_sequential_structure() {
        let sequential = Assembler::new(FakeSynthesizer::new())
            .assemble(&example_pairs(), &settings())
            .await
            .unwrap();

        let concurrent_settings = NarrationSettings {
            concurrency: 4,
            ..settings()
        };
        let concurrent = Assembler::new(FakeSynthesizer::new())
            .assemble(&example_pairs(), &concurrent_settings)
            .await
            .unwrap();

        assert_eq!(sequential.segments(), concurrent.segments());
        assert_eq!(sequential.audio(), concurrent.audio());
    }

    #[tokio::test]
    async fn test_rerun_is_structurally_identical() {
        let assembler = Assembler::new(FakeSynthesizer::new());
        let first = assembler.assemble(&example_pairs(), &settings()).await.unwrap();
        let second = assembler.assemble(&example_pairs(), &settings()).await.unwrap();
        assert_eq!(first.segments(), second.segments());
        assert_eq!(
            first.export(AudioFormat::Wav).unwrap(),
            second.export(AudioFormat::Wav).unwrap()
        );
    }

    #[tokio::test]
    async fn test_clips_conformed_to_stereo_track() {
        let assembler = Assembler::new(FakeSynthesizer::new());
        let settings = NarrationSettings {
            channels: 2,
            sample_rate: 48_000,
            ..settings()
        };
        let track = assembler.assemble(&example_pairs(), &settings).await.unwrap();
        assert_eq!(track.audio().spec, AudioSpec::new(48_000, 2));
        let pause = track.segments()[1];
        assert_eq!(pause.frames, 24_000);
        // 24 kHz clips doubled to 48 kHz
        let question = track.segments()[0];
        assert_eq!(question.frames, tone_frames("What is 2+2?") * 2);
    }
}
