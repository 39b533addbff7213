//! WAV encoder — serializes a `SampleBuffer` as 16-bit PCM RIFF/WAVE.

use log::{debug, warn};

use super::buffer::SampleBuffer;

/// Size of the canonical RIFF + fmt + data header.
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;
const FMT_CHUNK_LEN: u32 = 16;
const PCM_FORMAT: u16 = 1;

/// Quantize one float sample to signed 16-bit PCM.
///
/// The input is clamped to `[-1, 1]`; negative values scale by 32768 and
/// non-negative ones by 32767 so both ends of the `i16` range are reachable.
/// NaN encodes as silence.
pub fn quantize(sample: f32) -> i16 {
    let s = (sample as f64).clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0).round() as i16
    } else {
        (s * 32767.0).round() as i16
    }
}

/// Interleaved i16 PCM for every frame of `buffer`.
pub fn to_pcm_i16(buffer: &SampleBuffer) -> Vec<i16> {
    buffer.interleaved().into_iter().map(quantize).collect()
}

/// Encode a buffer to a WAV file as bytes.
///
/// Frames are quantized straight out of the planar channels; samples outside
/// `[-1, 1]` are clamped and counted.
pub fn encode_wav(buffer: &SampleBuffer) -> Vec<u8> {
    let channels = buffer.channel_count();
    let frames = buffer.frame_count();
    let data_len = frames * channels * BYTES_PER_SAMPLE;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_len);
    write_header(
        &mut wav,
        buffer.sample_rate(),
        channels as u16,
        u32::try_from(data_len).unwrap_or(u32::MAX),
    );

    let mut clamped = 0usize;
    for i in 0..frames {
        for lane in buffer.channels() {
            let sample = lane[i];
            if sample.abs() > 1.0 {
                clamped += 1;
            }
            wav.extend_from_slice(&quantize(sample).to_le_bytes());
        }
    }

    if clamped > 0 {
        warn!("{clamped} sample(s) outside [-1, 1] were clamped during encoding");
    }
    debug!(
        "encoded {frames} frame(s) x {channels} channel(s) into {} WAV bytes",
        wav.len()
    );
    wav
}

/// RIFF descriptor, `fmt ` chunk and `data` chunk header for 16-bit PCM.
fn write_header(wav: &mut Vec<u8>, sample_rate: u32, channels: u16, data_len: u32) {
    let block_align = channels * BYTES_PER_SAMPLE as u16;
    let byte_rate = sample_rate.saturating_mul(u32::from(block_align));
    let fields: [&[u8]; 13] = [
        b"RIFF",
        &data_len.saturating_add(36).to_le_bytes(),
        b"WAVE",
        b"fmt ",
        &FMT_CHUNK_LEN.to_le_bytes(),
        &PCM_FORMAT.to_le_bytes(),
        &channels.to_le_bytes(),
        &sample_rate.to_le_bytes(),
        &byte_rate.to_le_bytes(),
        &block_align.to_le_bytes(),
        &BITS_PER_SAMPLE.to_le_bytes(),
        b"data",
        &data_len.to_le_bytes(),
    ];
    for field in fields {
        wav.extend_from_slice(field);
    }
}
