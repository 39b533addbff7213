//! Decoded audio held in memory.

use crate::error::{FadeMixError, Result};

/// Largest channel layout the core accepts.
pub const MAX_CHANNELS: usize = 2;

/// An immutable block of decoded audio: one `f32` sequence per channel,
/// all of equal length, at a single sample rate.
///
/// Samples are nominally in `[-1.0, 1.0]`; rendered mixes may exceed that
/// range until they are quantized by the WAV encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Build a buffer from planar channel data.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(FadeMixError::InvalidSampleRate);
        }
        if channels.is_empty() || channels.len() > MAX_CHANNELS {
            return Err(FadeMixError::UnsupportedChannelCount(channels.len()));
        }
        let expected = channels[0].len();
        if let Some((channel, data)) = channels
            .iter()
            .enumerate()
            .find(|(_, data)| data.len() != expected)
        {
            return Err(FadeMixError::ChannelLengthMismatch {
                channel,
                expected,
                found: data.len(),
            });
        }
        Ok(SampleBuffer {
            sample_rate,
            channels,
        })
    }

    /// Single-channel buffer.
    pub fn mono(sample_rate: u32, data: Vec<f32>) -> Result<Self> {
        Self::new(sample_rate, vec![data])
    }

    /// A zero-filled buffer of `frames` frames.
    pub fn silent(sample_rate: u32, channel_count: usize, frames: usize) -> Result<Self> {
        Self::new(sample_rate, vec![vec![0.0; frames]; channel_count])
    }

    /// Split interleaved samples (`L R L R ...`) into planar channels.
    pub fn from_interleaved(sample_rate: u32, channel_count: usize, samples: &[f32]) -> Result<Self> {
        if channel_count == 0 || channel_count > MAX_CHANNELS {
            return Err(FadeMixError::UnsupportedChannelCount(channel_count));
        }
        if samples.len() % channel_count != 0 {
            return Err(FadeMixError::InterleavedLength {
                len: samples.len(),
                channels: channel_count,
            });
        }
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &s) in channels.iter_mut().zip(frame) {
                channel.push(s);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// Create from interleaved 16-bit signed PCM data.
    pub fn from_i16(sample_rate: u32, channel_count: usize, pcm: &[i16]) -> Result<Self> {
        let data: Vec<f32> = pcm.iter().map(|&s| s as f32 / 32768.0).collect();
        Self::from_interleaved(sample_rate, channel_count, &data)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Length in seconds: `frame_count / sample_rate`.
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel. Panics if `index >= channel_count()`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Interleave the channels frame by frame (`L R L R ...` for stereo).
    pub fn interleaved(&self) -> Vec<f32> {
        let ch = self.channel_count();
        let mut out = Vec::with_capacity(self.frame_count() * ch);
        for i in 0..self.frame_count() {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_from_frames() {
        let buf = SampleBuffer::mono(8, vec![0.0; 32]).unwrap();
        assert_eq!(buf.frame_count(), 32);
        assert_eq!(buf.channel_count(), 1);
        assert!((buf.duration() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_unequal_channels() {
        let err = SampleBuffer::new(44100, vec![vec![0.0; 4], vec![0.0; 3]]).unwrap_err();
        assert_eq!(
            err,
            FadeMixError::ChannelLengthMismatch {
                channel: 1,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_bad_layouts() {
        assert_eq!(
            SampleBuffer::new(0, vec![vec![0.0]]).unwrap_err(),
            FadeMixError::InvalidSampleRate
        );
        assert_eq!(
            SampleBuffer::new(44100, vec![]).unwrap_err(),
            FadeMixError::UnsupportedChannelCount(0)
        );
        assert_eq!(
            SampleBuffer::silent(44100, 3, 10).unwrap_err(),
            FadeMixError::UnsupportedChannelCount(3)
        );
    }

    #[test]
    fn interleave_round_trip() {
        let samples = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let buf = SampleBuffer::from_interleaved(48000, 2, &samples).unwrap();
        assert_eq!(buf.frame_count(), 3);
        assert_eq!(buf.channel(0), &[0.1, 0.2, 0.3]);
        assert_eq!(buf.channel(1), &[-0.1, -0.2, -0.3]);
        assert_eq!(buf.interleaved(), samples.to_vec());
    }

    #[test]
    fn interleaved_length_must_divide() {
        let err = SampleBuffer::from_interleaved(48000, 2, &[0.0; 5]).unwrap_err();
        assert_eq!(err, FadeMixError::InterleavedLength { len: 5, channels: 2 });
    }

    #[test]
    fn from_i16_scales_to_unit_range() {
        let buf = SampleBuffer::from_i16(44100, 1, &[i16::MIN, 0, 16384]).unwrap();
        assert_eq!(buf.channel(0), &[-1.0, 0.0, 0.5]);
    }

    #[test]
    fn empty_buffer_is_valid() {
        let buf = SampleBuffer::silent(44100, 2, 0).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.duration(), 0.0);
        assert!(buf.interleaved().is_empty());
    }
}
