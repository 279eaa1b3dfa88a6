//! Export of assembled audio to WAV (hound) or MP3 (LAME)

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};

use super::{AudioBuffer, AudioError};
use crate::tts::AudioFormat;

/// Upper bound on the bytes LAME emits when flushing
const MP3_FLUSH_RESERVE: usize = 7200;

/// Encode `buffer` into a complete file in `format`.
pub fn encode(buffer: &AudioBuffer, format: AudioFormat) -> Result<Vec<u8>, AudioError> {
    let bytes = match format {
        AudioFormat::Wav => encode_wav(buffer)?,
        AudioFormat::Mp3 => encode_mp3(buffer)?,
    };
    tracing::debug!(
        "Encoded {} frames ({}) to {} bytes of {}",
        buffer.frames(),
        buffer.spec,
        bytes.len(),
        format
    );
    Ok(bytes)
}

/// 16-bit PCM WAV
fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>, AudioError> {
    let spec = WavSpec {
        channels: buffer.spec.channels,
        sample_rate: buffer.spec.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in buffer.to_i16() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// 128 kbps constant-bitrate MP3
fn encode_mp3(buffer: &AudioBuffer) -> Result<Vec<u8>, AudioError> {
    let channels = buffer.spec.channels;
    if !(1..=2).contains(&channels) {
        return Err(AudioError::UnsupportedChannels(channels));
    }

    let mut builder =
        Builder::new().ok_or_else(|| AudioError::Mp3("failed to allocate LAME encoder".into()))?;
    builder.set_num_channels(channels as u8).map_err(lame_error)?;
    builder
        .set_sample_rate(buffer.spec.sample_rate)
        .map_err(lame_error)?;
    builder.set_brate(Bitrate::Kbps128).map_err(lame_error)?;
    builder.set_quality(Quality::Good).map_err(lame_error)?;
    let mut encoder = builder.build().map_err(lame_error)?;

    let pcm = buffer.to_i16();
    let mut out = Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(pcm.len()));
    if channels == 1 {
        encoder
            .encode_to_vec(MonoPcm(pcm.as_slice()), &mut out)
            .map_err(lame_error)?;
    } else {
        encoder
            .encode_to_vec(InterleavedPcm(pcm.as_slice()), &mut out)
            .map_err(lame_error)?;
    }

    out.reserve(MP3_FLUSH_RESERVE);
    encoder
        .flush_to_vec::<FlushNoGap>(&mut out)
        .map_err(lame_error)?;

    Ok(out)
}

fn lame_error<E: std::fmt::Debug>(e: E) -> AudioError {
    AudioError::Mp3(format!("{:?}", e))
}
