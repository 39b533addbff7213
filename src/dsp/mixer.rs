//! Mixer — sums track contributions per output channel.
//!
//! Mixing is purely additive: no master gain, limiting or normalization is
//! applied. Anything outside `[-1, 1]` is left for the WAV encoder to clamp.

use super::buffer::SampleBuffer;
use crate::error::Result;

/// A planar summing accumulator, one `f64` lane per output channel.
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    channels: Vec<Vec<f64>>,
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            channels: Vec::new(),
        }
    }

    /// Prepare `channel_count` zeroed lanes of `num_frames` frames.
    pub fn clear(&mut self, channel_count: usize, num_frames: usize) {
        self.channels.clear();
        self.channels.resize(channel_count, vec![0.0; num_frames]);
    }

    /// Add a sample to a channel at the given frame. Out-of-range writes are ignored.
    pub fn add(&mut self, channel: usize, index: usize, sample: f64) {
        if let Some(slot) = self.channels.get_mut(channel).and_then(|c| c.get_mut(index)) {
            *slot += sample;
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Collapse the accumulated sums into a `SampleBuffer`, unscaled.
    pub fn output(self, sample_rate: u32) -> Result<SampleBuffer> {
        let channels = self
            .channels
            .into_iter()
            .map(|lane| lane.into_iter().map(|s| s as f32).collect())
            .collect();
        SampleBuffer::new(sample_rate, channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let mut m = Mixer::new();
        m.clear(2, 128);
        assert_eq!(m.channel_count(), 2);
        let out = m.output(44100).unwrap();
        assert_eq!(out.frame_count(), 128);
        assert!(out.channels().iter().flatten().all(|&s| s == 0.0));
    }

    #[test]
    fn accumulates_samples() {
        let mut m = Mixer::new();
        m.clear(2, 4);
        m.add(0, 0, 0.5);
        m.add(0, 0, 0.25);
        m.add(1, 1, 1.0);
        let out = m.output(8000).unwrap();
        assert_eq!(out.channel(0), &[0.75, 0.0, 0.0, 0.0]);
        assert_eq!(out.channel(1), &[0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn sums_are_not_limited() {
        let mut m = Mixer::new();
        m.clear(1, 1);
        m.add(0, 0, 0.9);
        m.add(0, 0, 0.9);
        let out = m.output(8000).unwrap();
        assert!((out.channel(0)[0] - 1.8).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_add_is_ignored() {
        let mut m = Mixer::new();
        m.clear(1, 2);
        m.add(0, 5, 1.0);
        m.add(3, 0, 1.0);
        let out = m.output(8000).unwrap();
        assert!(out.channel(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn clear_resets_previous_sums() {
        let mut m = Mixer::new();
        m.clear(1, 3);
        m.add(0, 1, 0.5);
        m.clear(2, 2);
        assert_eq!(m.channel_count(), 2);
        let out = m.output(8000).unwrap();
        assert_eq!(out.frame_count(), 2);
        assert!(out.channels().iter().flatten().all(|&s| s == 0.0));
    }
}
