//! File decoders that turn WAV or MP3 bytes into a [`SampleBuffer`].
//!
//! These sit outside the render core: the renderer only ever sees decoded
//! buffers. Enabled by the `decode` feature.

use std::io::Cursor;

use log::debug;

use crate::dsp::buffer::SampleBuffer;
use crate::error::{FadeMixError, Result};

fn decode_error(e: impl std::fmt::Display) -> FadeMixError {
    FadeMixError::Decode(e.to_string())
}

/// Decode a file, picking the format from its magic bytes.
pub fn decode(bytes: &[u8]) -> Result<SampleBuffer> {
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        decode_wav(bytes)
    } else {
        decode_mp3(bytes)
    }
}

/// Decode a RIFF/WAVE file (integer PCM up to 32 bits, or 32-bit float).
pub fn decode_wav(bytes: &[u8]) -> Result<SampleBuffer> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(decode_error)?;
    let spec = reader.spec();
    debug!(
        "decoding WAV: {}Hz, {} channel(s), {} bits {:?}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
    );

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(decode_error)?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(decode_error)?
        }
    };

    SampleBuffer::from_interleaved(spec.sample_rate, spec.channels as usize, &samples)
}

/// Decode an MPEG audio stream frame by frame.
pub fn decode_mp3(bytes: &[u8]) -> Result<SampleBuffer> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(bytes));
    let mut pcm: Vec<i16> = Vec::new();
    let mut format: Option<(i32, usize)> = None;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                let layout = (frame.sample_rate, frame.channels);
                match format {
                    None => format = Some(layout),
                    Some(expected) if expected != layout => {
                        return Err(FadeMixError::Decode(format!(
                            "MP3 stream changes format mid-file ({}Hz/{}ch -> {}Hz/{}ch)",
                            expected.0, expected.1, layout.0, layout.1
                        )));
                    }
                    Some(_) => {}
                }
                pcm.extend_from_slice(&frame.data);
            }
            Err(minimp3::Error::Eof) => break,
            Err(minimp3::Error::SkippedData) => continue,
            Err(e) => return Err(FadeMixError::Decode(format!("{e:?}"))),
        }
    }

    let (sample_rate, channels) =
        format.ok_or_else(|| FadeMixError::Decode("no MPEG audio frames found".to_string()))?;
    let sample_rate = u32::try_from(sample_rate).map_err(decode_error)?;
    debug!(
        "decoded MP3: {}Hz, {} channel(s), {} samples",
        sample_rate,
        channels,
        pcm.len()
    );
    SampleBuffer::from_i16(sample_rate, channels, &pcm)
}
