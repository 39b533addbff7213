//! Built-in demo material: a two-second kick drum loop.

use std::f64::consts::PI;

use super::buffer::SampleBuffer;
use crate::error::{FadeMixError, Result};

/// Length of the demo beat in seconds.
pub const EXAMPLE_BEAT_SECONDS: u32 = 2;

/// Kick onsets in seconds.
const KICK_TIMES: [f64; 4] = [0.0, 0.5, 1.0, 1.5];
const KICK_LENGTH_SECONDS: f64 = 0.1;
const KICK_START_HZ: f64 = 150.0;
/// Pitch drop over the kick, applied quadratically.
const KICK_DROP_HZ: f64 = 100.0;
const KICK_PEAK: f64 = 0.9;

/// A mono buffer with four pitch-dropping sine kicks, one every half second.
pub fn example_beat(sample_rate: u32) -> Result<SampleBuffer> {
    let frame_count = sample_rate
        .checked_mul(EXAMPLE_BEAT_SECONDS)
        .ok_or(FadeMixError::InvalidSampleRate)? as usize;
    let mut data = vec![0.0f32; frame_count];
    for &at in &KICK_TIMES {
        add_kick(&mut data, (sample_rate as f64 * at).floor() as usize, sample_rate as f64);
    }
    SampleBuffer::mono(sample_rate, data)
}

fn add_kick(data: &mut [f32], start: usize, sample_rate: f64) {
    let kick_length = sample_rate * KICK_LENGTH_SECONDS;
    let mut i = 0usize;
    while (i as f64) < kick_length {
        let Some(slot) = data.get_mut(start + i) else {
            break;
        };
        let progress = i as f64 / kick_length;
        let frequency = KICK_START_HZ - KICK_DROP_HZ * progress * progress;
        let amplitude = (1.0 - progress) * KICK_PEAK;
        *slot += ((i as f64 / sample_rate) * 2.0 * PI * frequency).sin() as f32 * amplitude as f32;
        i += 1;
    }
}
