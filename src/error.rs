//! Error types for buffer construction, render validation and decoding.

use thiserror::Error;

/// Errors produced by the fade/mix core.
///
/// Every variant is deterministic: the same inputs always produce the same
/// error, and validation errors are raised before any sample is rendered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FadeMixError {
    /// A render request with no tracks.
    #[error("Please add at least one track to process")]
    NoTracks,

    /// `fade_in + fade_out` is longer than the track's effective duration.
    #[error(
        "For track {}, the combined fade-in and fade-out durations ({:.1}s) exceed the track's effective duration ({:.1}s)",
        track_label(*index, name.as_deref()),
        fade_in + fade_out,
        effective_duration
    )]
    FadeExceedsDuration {
        index: usize,
        name: Option<String>,
        fade_in: f64,
        fade_out: f64,
        effective_duration: f64,
    },

    /// Volume must be a finite, non-negative gain.
    #[error("Track {} has an invalid volume: {volume}", index + 1)]
    InvalidVolume { index: usize, volume: f64 },

    /// A track's source rate differs from the render rate.
    #[error("Track {} is at {found}Hz but the render runs at {expected}Hz", index + 1)]
    SampleRateMismatch {
        index: usize,
        expected: u32,
        found: u32,
    },

    #[error("Sample rate must be positive")]
    InvalidSampleRate,

    /// Only mono and stereo layouts are supported.
    #[error("Unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannelCount(usize),

    #[error("Channel {channel} has {found} frames, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        found: usize,
    },

    /// Interleaved input whose length is not a multiple of the channel count.
    #[error("Interleaved buffer of {len} samples does not divide into {channels} channels")]
    InterleavedLength { len: usize, channels: usize },

    /// A batched mix description that does not match its sample data.
    #[error("Invalid mix layout: {0}")]
    InvalidLayout(String),

    /// Raised by the bundled decoders, never by rendering.
    #[error("Error decoding audio data: {0}")]
    Decode(String),
}

fn track_label(index: usize, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("\"{name}\""),
        None => format!("#{}", index + 1),
    }
}

/// Result type for fade/mix operations.
pub type Result<T> = std::result::Result<T, FadeMixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_error_names_track_and_durations() {
        let err = FadeMixError::FadeExceedsDuration {
            index: 2,
            name: Some("drums.wav".to_string()),
            fade_in: 1.5,
            fade_out: 1.0,
            effective_duration: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("\"drums.wav\""), "got: {msg}");
        assert!(msg.contains("(2.5s)"), "got: {msg}");
        assert!(msg.contains("(2.0s)"), "got: {msg}");
    }

    #[test]
    fn unnamed_track_uses_position() {
        let err = FadeMixError::FadeExceedsDuration {
            index: 0,
            name: None,
            fade_in: 3.0,
            fade_out: 3.0,
            effective_duration: 4.0,
        };
        assert!(err.to_string().starts_with("For track #1,"));
    }
}
