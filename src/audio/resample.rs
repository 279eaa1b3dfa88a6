//! Sample rate conversion using rubato

use rubato::{FastFixedIn, PolynomialDegree, Resampler};

use super::{AudioBuffer, AudioError, AudioSpec};

const CHUNK_SIZE: usize = 1024;

/// Resample `audio` to `target_rate`, keeping its channel layout.
///
/// The output length is `frames * target_rate / source_rate`, rounded, with
/// the resampler's startup delay removed.
pub fn resample(audio: &AudioBuffer, target_rate: u32) -> Result<AudioBuffer, AudioError> {
    let source_rate = audio.spec.sample_rate;
    if target_rate == 0 {
        return Err(AudioError::InvalidSampleRate(target_rate));
    }
    if source_rate == target_rate {
        return Ok(audio.clone());
    }
    if source_rate == 0 {
        return Err(AudioError::InvalidSampleRate(source_rate));
    }

    let channels = audio.spec.channels as usize;
    let spec = AudioSpec::new(target_rate, audio.spec.channels);
    if audio.is_empty() || channels == 0 {
        return Ok(AudioBuffer::empty(spec));
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let mut resampler =
        FastFixedIn::<f32>::new(ratio, 1.0, PolynomialDegree::Cubic, CHUNK_SIZE, channels)
            .map_err(|e| AudioError::Resample(e.to_string()))?;

    let planar = deinterleave(&audio.samples, channels);
    let frames = audio.frames();
    let expected = (frames as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let needed = expected + delay;

    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(needed); channels];
    let mut pos = 0;
    while output[0].len() < needed {
        // Past the end of the input the chunk is all zeros, flushing the delay line.
        let chunk: Vec<Vec<f32>> = planar
            .iter()
            .map(|channel| {
                let start = pos.min(channel.len());
                let end = (pos + CHUNK_SIZE).min(channel.len());
                let mut block = channel[start..end].to_vec();
                block.resize(CHUNK_SIZE, 0.0);
                block
            })
            .collect();

        let processed = resampler
            .process(&chunk, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        for (out, block) in output.iter_mut().zip(processed) {
            out.extend(block);
        }
        pos += CHUNK_SIZE;
    }

    for channel in &mut output {
        channel.drain(..delay);
        channel.truncate(expected);
    }

    tracing::debug!(
        "Resampled {} frames {} Hz -> {} frames {} Hz",
        frames,
        source_rate,
        expected,
        target_rate
    );

    Ok(AudioBuffer::new(interleave(&output), spec))
}

fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    (0..channels)
        .map(|c| samples.iter().skip(c).step_by(channels).copied().collect())
        .collect()
}

fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let frames = planar.first().map_or(0, Vec::len);
    (0..frames)
        .flat_map(|i| planar.iter().map(move |channel| channel[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_resample_needed() {
        let audio = AudioBuffer::new(vec![0.1; 1000], AudioSpec::new(24_000, 1));
        let result = resample(&audio, 24_000).unwrap();
        assert_eq!(result, audio);
    }

    #[test]
    fn test_downsample_exact_length() {
        let audio = AudioBuffer::new(vec![0.0; 4800], AudioSpec::new(48_000, 1));
        let result = resample(&audio, 24_000).unwrap();
        assert_eq!(result.spec.sample_rate, 24_000);
        assert_eq!(result.frames(), 2400);
    }

    #[test]
    fn test_upsample_stereo_keeps_layout() {
        let audio = AudioBuffer::new(vec![0.0; 3200], AudioSpec::new(16_000, 2));
        let result = resample(&audio, 24_000).unwrap();
        assert_eq!(result.spec, AudioSpec::new(24_000, 2));
        assert_eq!(result.frames(), 2400);
        assert_eq!(result.samples.len(), 4800);
    }

    #[test]
    fn test_resample_keeps_duration_of_tone() {
        let samples: Vec<f32> = (0..22_050)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 22_050.0).sin() * 0.5)
            .collect();
        let audio = AudioBuffer::new(samples, AudioSpec::new(22_050, 1));
        let result = resample(&audio, 24_000).unwrap();
        assert_eq!(result.frames(), 24_000);
        let peak = result.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak > 0.4 && peak < 0.6, "peak was {}", peak);
    }

    #[test]
    fn test_empty_input() {
        let audio = AudioBuffer::empty(AudioSpec::new(44_100, 1));
        let result = resample(&audio, 24_000).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.spec.sample_rate, 24_000);
    }

    #[test]
    fn test_zero_target_rate_rejected() {
        let audio = AudioBuffer::new(vec![0.0; 10], AudioSpec::new(24_000, 1));
        assert!(matches!(
            resample(&audio, 0),
            Err(AudioError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn test_interleave_round_trip() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let planar = deinterleave(&samples, 2);
        assert_eq!(planar, vec![vec![1.0, 3.0, 5.0], vec![2.0, 4.0, 6.0]]);
        assert_eq!(interleave(&planar), samples);
    }
}
