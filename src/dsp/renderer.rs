//! Offline renderer — fades, loops and mixes tracks into a single buffer.
//!
//! Rendering is closed-form: every output frame is computed directly from the
//! source samples and the track's fade envelope, then summed in a [`Mixer`].

use log::debug;
use serde::{Deserialize, Serialize};

use super::buffer::{MAX_CHANNELS, SampleBuffer};
use super::envelope::FadeEnvelope;
use super::mixer::Mixer;
use super::wav::encode_wav;
use crate::error::{FadeMixError, Result};

/// Volume given to a newly added track.
pub const DEFAULT_TRACK_VOLUME: f64 = 0.75;

/// Output format of a render: rate and channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub sample_rate: u32,
    pub channel_count: usize,
}

impl RenderContext {
    pub fn new(sample_rate: u32, channel_count: usize) -> Result<Self> {
        let ctx = RenderContext {
            sample_rate,
            channel_count,
        };
        ctx.check()?;
        Ok(ctx)
    }

    /// Stereo output at `sample_rate`, the layout every mixdown uses.
    pub fn stereo(sample_rate: u32) -> Self {
        RenderContext {
            sample_rate,
            channel_count: 2,
        }
    }

    fn check(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(FadeMixError::InvalidSampleRate);
        }
        if self.channel_count == 0 || self.channel_count > MAX_CHANNELS {
            return Err(FadeMixError::UnsupportedChannelCount(self.channel_count));
        }
        Ok(())
    }
}

/// Per-track mix settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackParams {
    /// Display label used in error messages (e.g. the file name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Linear gain: 0 = silent, 1 = unity, > 1 amplifies.
    pub volume: f64,
    /// Tile the source to fill the whole render.
    #[serde(rename = "loop")]
    pub looped: bool,
    /// Fade-in length in seconds.
    pub fade_in: f64,
    /// Fade-out length in seconds.
    pub fade_out: f64,
}

impl Default for TrackParams {
    fn default() -> Self {
        TrackParams {
            name: None,
            volume: DEFAULT_TRACK_VOLUME,
            looped: false,
            fade_in: 0.0,
            fade_out: 0.0,
        }
    }
}

impl TrackParams {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn looping(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn with_fades(mut self, fade_in: f64, fade_out: f64) -> Self {
        self.fade_in = fade_in;
        self.fade_out = fade_out;
        self
    }

    /// Fade lengths with negatives treated as zero.
    fn fades(&self) -> (f64, f64) {
        (self.fade_in.max(0.0), self.fade_out.max(0.0))
    }
}

/// One input of a render: a borrowed source and its settings.
#[derive(Debug, Clone)]
pub struct TrackSpec<'a> {
    pub source: &'a SampleBuffer,
    pub params: TrackParams,
}

impl<'a> TrackSpec<'a> {
    pub fn new(source: &'a SampleBuffer, params: TrackParams) -> Self {
        TrackSpec { source, params }
    }

    /// Seconds this track's envelope spans: the whole render when looping,
    /// otherwise the source's own length.
    pub fn effective_duration(&self, target_duration: f64) -> f64 {
        if self.params.looped {
            target_duration
        } else {
            self.source.duration()
        }
    }

    /// The track's gain envelope over its effective duration.
    pub fn envelope(&self, target_duration: f64) -> FadeEnvelope {
        let (fade_in, fade_out) = self.params.fades();
        FadeEnvelope::new(
            self.params.volume,
            fade_in,
            fade_out,
            self.effective_duration(target_duration),
        )
    }
}

/// A full render job. Track order is summation order only.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub tracks: Vec<TrackSpec<'a>>,
    /// Length of the output in seconds.
    pub target_duration: f64,
    pub context: RenderContext,
}

impl<'a> RenderRequest<'a> {
    /// Combine mode: the output lasts as long as the longest source.
    pub fn combine(tracks: Vec<TrackSpec<'a>>, context: RenderContext) -> Self {
        let target_duration = tracks
            .iter()
            .map(|t| t.source.duration())
            .fold(0.0, f64::max);
        RenderRequest {
            tracks,
            target_duration,
            context,
        }
    }

    /// Fade mode: one non-looping track at unity volume, rendered to stereo
    /// at the source's own rate and length.
    pub fn fade(source: &'a SampleBuffer, fade_in: f64, fade_out: f64) -> Self {
        let params = TrackParams::default()
            .with_volume(1.0)
            .with_fades(fade_in, fade_out);
        RenderRequest {
            tracks: vec![TrackSpec::new(source, params)],
            target_duration: source.duration(),
            context: RenderContext::stereo(source.sample_rate()),
        }
    }

    /// `round(sample_rate * target_duration)`.
    pub fn target_frame_count(&self) -> usize {
        (self.context.sample_rate as f64 * self.target_duration).round() as usize
    }
}

/// Check a request without rendering anything.
///
/// Rejects empty requests, bad output layouts, mismatched source rates,
/// invalid volumes and any track whose fades overrun its effective duration.
pub fn validate(request: &RenderRequest<'_>) -> Result<()> {
    if request.tracks.is_empty() {
        return Err(FadeMixError::NoTracks);
    }
    request.context.check()?;

    for (index, track) in request.tracks.iter().enumerate() {
        let found = track.source.sample_rate();
        if found != request.context.sample_rate {
            return Err(FadeMixError::SampleRateMismatch {
                index,
                expected: request.context.sample_rate,
                found,
            });
        }

        let volume = track.params.volume;
        if !volume.is_finite() || volume < 0.0 {
            return Err(FadeMixError::InvalidVolume { index, volume });
        }

        let envelope = track.envelope(request.target_duration);
        if !envelope.fits() {
            return Err(FadeMixError::FadeExceedsDuration {
                index,
                name: track.params.name.clone(),
                fade_in: envelope.fade_in,
                fade_out: envelope.fade_out,
                effective_duration: envelope.duration,
            });
        }
    }
    Ok(())
}

/// Render a request into a freshly allocated buffer.
///
/// No normalization is applied to the sum; samples may leave `[-1, 1]`.
pub fn render(request: &RenderRequest<'_>) -> Result<SampleBuffer> {
    validate(request)?;

    let ctx = request.context;
    let frames = request.target_frame_count();
    debug!(
        "rendering {} track(s): {} frames at {}Hz, {} channel(s)",
        request.tracks.len(),
        frames,
        ctx.sample_rate,
        ctx.channel_count
    );

    let mut mixer = Mixer::new();
    mixer.clear(ctx.channel_count, frames);
    for track in &request.tracks {
        mix_track(
            &mut mixer,
            track,
            request.target_duration,
            frames,
            ctx.sample_rate as f64,
        );
    }
    mixer.output(ctx.sample_rate)
}

/// Add one track's gained samples into the mixer.
fn mix_track(
    mixer: &mut Mixer,
    track: &TrackSpec<'_>,
    target_duration: f64,
    target_frames: usize,
    sample_rate: f64,
) {
    let source = track.source;
    let source_frames = source.frame_count();
    if source_frames == 0 {
        return;
    }

    // Non-looping tracks go silent once their source runs out.
    let playing = if track.params.looped {
        target_frames
    } else {
        source_frames.min(target_frames)
    };
    let envelope = track.envelope(target_duration);

    // Mono sources feed every output channel.
    let lanes: Vec<&[f32]> = (0..mixer.channel_count())
        .map(|c| source.channel(if c < source.channel_count() { c } else { 0 }))
        .collect();

    for i in 0..playing {
        let gain = envelope.gain(i as f64 / sample_rate);
        if gain == 0.0 {
            continue;
        }
        let src_index = if track.params.looped {
            i % source_frames
        } else {
            i
        };
        for (c, lane) in lanes.iter().enumerate() {
            mixer.add(c, i, lane[src_index] as f64 * gain);
        }
    }
}

/// Single-track fade: ramp `source` in over `fade_in` and out over `fade_out` seconds.
pub fn apply_fade(source: &SampleBuffer, fade_in: f64, fade_out: f64) -> Result<SampleBuffer> {
    render(&RenderRequest::fade(source, fade_in, fade_out))
}

/// Mix tracks into one buffer as long as the longest source.
pub fn combine(tracks: Vec<TrackSpec<'_>>, context: RenderContext) -> Result<SampleBuffer> {
    render(&RenderRequest::combine(tracks, context))
}

/// Render a request straight to WAV bytes (16-bit PCM).
pub fn render_wav(request: &RenderRequest<'_>) -> Result<Vec<u8>> {
    Ok(encode_wav(&render(request)?))
}
