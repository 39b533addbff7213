//! Batched mix descriptions for callers that can only pass flat arrays.
//!
//! A `MixLayout` is a JSON document describing how one concatenated float
//! array splits into per-track interleaved buffers, along with each track's
//! mix settings:
//!
//! ```json
//! {
//!   "sampleRate": 44100,
//!   "tracks": [
//!     { "channels": 2, "frames": 88200, "params": { "volume": 0.8, "fadeIn": 1.0 } },
//!     { "channels": 1, "frames": 22050, "params": { "loop": true } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::dsp::buffer::SampleBuffer;
use crate::dsp::renderer::{RenderContext, TrackParams, TrackSpec, combine};
use crate::error::{FadeMixError, Result};

/// Shape and settings of one track inside the concatenated sample array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLayout {
    /// Interleaved channel count (1 or 2).
    pub channels: usize,
    /// Frames (samples per channel).
    pub frames: usize,
    #[serde(default)]
    pub params: TrackParams,
}

impl TrackLayout {
    fn sample_len(&self) -> Result<usize> {
        self.channels
            .checked_mul(self.frames)
            .ok_or_else(|| overflow(self.channels, self.frames))
    }
}

fn overflow(channels: usize, frames: usize) -> FadeMixError {
    FadeMixError::InvalidLayout(format!(
        "{channels} channel(s) x {frames} frame(s) overflows the sample count"
    ))
}

/// A combine job described as JSON over one flat sample array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixLayout {
    pub sample_rate: u32,
    pub tracks: Vec<TrackLayout>,
}

impl MixLayout {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| FadeMixError::InvalidLayout(e.to_string()))
    }

    /// Total number of interleaved samples the layout expects.
    pub fn sample_len(&self) -> Result<usize> {
        self.tracks.iter().try_fold(0usize, |total, track| {
            total
                .checked_add(track.sample_len()?)
                .ok_or_else(|| overflow(track.channels, track.frames))
        })
    }

    /// Cut `samples` into one buffer per track, in layout order.
    pub fn split(&self, samples: &[f32]) -> Result<Vec<SampleBuffer>> {
        let expected = self.sample_len()?;
        if samples.len() != expected {
            return Err(FadeMixError::InvalidLayout(format!(
                "expected {expected} samples, got {}",
                samples.len()
            )));
        }

        let mut offset = 0;
        self.tracks
            .iter()
            .map(|track| {
                let len = track.sample_len()?;
                let chunk = &samples[offset..offset + len];
                offset += len;
                SampleBuffer::from_interleaved(self.sample_rate, track.channels, chunk)
            })
            .collect()
    }

    /// Split and combine into a stereo mix.
    pub fn render(&self, samples: &[f32]) -> Result<SampleBuffer> {
        let buffers = self.split(samples)?;
        let specs = buffers
            .iter()
            .zip(&self.tracks)
            .map(|(buffer, track)| TrackSpec::new(buffer, track.params.clone()))
            .collect();
        combine(specs, RenderContext::stereo(self.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"{
        "sampleRate": 10,
        "tracks": [
            { "channels": 1, "frames": 20, "params": { "volume": 0.5 } },
            { "channels": 2, "frames": 10, "params": { "volume": 1.0, "loop": true } }
        ]
    }"#;

    fn samples() -> Vec<f32> {
        let mut data = vec![1.0; 20];
        for _ in 0..10 {
            data.extend_from_slice(&[0.25, -0.25]);
        }
        data
    }

    #[test]
    fn parses_layout() {
        let layout = MixLayout::from_json(LAYOUT).unwrap();
        assert_eq!(layout.sample_rate, 10);
        assert_eq!(layout.tracks.len(), 2);
        assert!(layout.tracks[1].params.looped);
        assert_eq!(layout.sample_len().unwrap(), 40);
    }

    #[test]
    fn splits_in_order() {
        let layout = MixLayout::from_json(LAYOUT).unwrap();
        let buffers = layout.split(&samples()).unwrap();
        assert_eq!(buffers[0].channel_count(), 1);
        assert_eq!(buffers[0].frame_count(), 20);
        assert_eq!(buffers[1].channel_count(), 2);
        assert_eq!(buffers[1].channel(1)[0], -0.25);
    }

    #[test]
    fn renders_combined_mix() {
        let layout = MixLayout::from_json(LAYOUT).unwrap();
        let mix = layout.render(&samples()).unwrap();
        assert_eq!(mix.channel_count(), 2);
        assert_eq!(mix.frame_count(), 20);
        // The looped stereo track keeps playing across the whole mix.
        assert!((mix.channel(0)[15] - 0.75).abs() < 1e-6);
        assert!((mix.channel(1)[15] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn rejects_wrong_sample_count() {
        let layout = MixLayout::from_json(LAYOUT).unwrap();
        let err = layout.split(&[0.0; 39]).unwrap_err();
        assert!(matches!(err, FadeMixError::InvalidLayout(_)));
    }

    #[test]
    fn oversized_frame_counts_are_rejected() {
        let json = format!(
            r#"{{"sampleRate":8000,"tracks":[{{"channels":2,"frames":{}}}]}}"#,
            usize::MAX / 2 + 1
        );
        let layout = MixLayout::from_json(&json).unwrap();
        assert!(matches!(layout.sample_len(), Err(FadeMixError::InvalidLayout(_))));
        assert!(matches!(layout.split(&[]), Err(FadeMixError::InvalidLayout(_))));
        assert!(matches!(layout.render(&[]), Err(FadeMixError::InvalidLayout(_))));
    }

    #[test]
    fn summed_track_lengths_must_not_overflow() {
        let half = usize::MAX / 2 + 1;
        let json = format!(
            r#"{{"sampleRate":8000,"tracks":[{{"channels":1,"frames":{half}}},{{"channels":1,"frames":{half}}}]}}"#
        );
        let layout = MixLayout::from_json(&json).unwrap();
        assert!(matches!(layout.split(&[]), Err(FadeMixError::InvalidLayout(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = MixLayout::from_json("{\"tracks\": 3}").unwrap_err();
        assert!(matches!(err, FadeMixError::InvalidLayout(_)));
    }

    #[test]
    fn params_default_when_missing() {
        let layout =
            MixLayout::from_json(r#"{"sampleRate":8000,"tracks":[{"channels":1,"frames":4}]}"#)
                .unwrap();
        assert_eq!(layout.tracks[0].params, TrackParams::default());
    }
}
