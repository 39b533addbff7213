//! Fade envelope — piecewise-linear gain over a track's timeline.
//!
//! The envelope is defined by four control points:
//! `(0, 0)`, `(fade_in, volume)`, `(duration - fade_out, volume)`, `(duration, 0)`,
//! linearly interpolated in between and zero outside `[0, duration]`.

/// Gain of a track at time `t` (seconds).
///
/// A zero-length fade skips its ramp: with `fade_in == 0` the gain is
/// `volume` from `t = 0`, with `fade_out == 0` it holds `volume` through
/// `t = duration`. Beyond the timeline the gain is always 0.
pub fn gain(t: f64, volume: f64, fade_in: f64, fade_out: f64, duration: f64) -> f64 {
    if !(0.0..=duration).contains(&t) {
        return 0.0;
    }

    let ramp_up = if fade_in > 0.0 { t / fade_in } else { 1.0 };
    let ramp_down = if fade_out > 0.0 {
        (duration - t) / fade_out
    } else {
        1.0
    };

    // Ramps only overlap when the fades overrun the timeline; the lower one wins.
    volume * ramp_up.min(ramp_down).clamp(0.0, 1.0)
}

/// A fade envelope bound to one track's parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEnvelope {
    /// Peak gain (1.0 = unity).
    pub volume: f64,
    /// Ramp-up length in seconds.
    pub fade_in: f64,
    /// Ramp-down length in seconds.
    pub fade_out: f64,
    /// Time at which the ramp-down reaches zero.
    pub duration: f64,
}

impl FadeEnvelope {
    pub fn new(volume: f64, fade_in: f64, fade_out: f64, duration: f64) -> Self {
        FadeEnvelope {
            volume,
            fade_in,
            fade_out,
            duration,
        }
    }

    /// Gain at time `t` (seconds).
    pub fn gain(&self, t: f64) -> f64 {
        gain(t, self.volume, self.fade_in, self.fade_out, self.duration)
    }

    /// True if the fades fit inside the timeline.
    pub fn fits(&self) -> bool {
        self.fade_in + self.fade_out <= self.duration
    }
}
