#[cfg(feature = "decode")]
pub mod decode;
pub mod dsp;
pub mod error;
pub mod layout;

pub use crate::dsp::buffer::SampleBuffer;
pub use crate::dsp::renderer::{RenderContext, RenderRequest, TrackParams, TrackSpec};
pub use crate::error::FadeMixError;

use crate::dsp::renderer::apply_fade;
use crate::dsp::wav::encode_wav;
use crate::layout::MixLayout;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the fademix-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Fade one interleaved buffer and return the stereo result.
pub fn fade_interleaved(
    samples: &[f32],
    channels: usize,
    sample_rate: u32,
    fade_in: f64,
    fade_out: f64,
) -> error::Result<SampleBuffer> {
    let source = SampleBuffer::from_interleaved(sample_rate, channels, samples)?;
    apply_fade(&source, fade_in, fade_out)
}

/// Combine the tracks described by a JSON `MixLayout` over concatenated samples.
pub fn combine_interleaved(samples: &[f32], layout_json: &str) -> error::Result<SampleBuffer> {
    MixLayout::from_json(layout_json)?.render(samples)
}

/// WASM-exposed: apply a fade-in/fade-out and encode the result as a WAV byte array.
#[wasm_bindgen]
pub fn apply_fade_wav(
    samples: &[f32],
    channels: usize,
    sample_rate: u32,
    fade_in: f64,
    fade_out: f64,
) -> Result<Vec<u8>, JsValue> {
    let faded = fade_interleaved(samples, channels, sample_rate, fade_in, fade_out)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(encode_wav(&faded))
}

/// WASM-exposed: apply a fade and return interleaved stereo f32 samples for preview playback.
#[wasm_bindgen]
pub fn apply_fade_samples(
    samples: &[f32],
    channels: usize,
    sample_rate: u32,
    fade_in: f64,
    fade_out: f64,
) -> Result<Vec<f32>, JsValue> {
    let faded = fade_interleaved(samples, channels, sample_rate, fade_in, fade_out)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(faded.interleaved())
}

/// WASM-exposed: mix the tracks of a JSON layout and encode the stereo mix as WAV.
#[wasm_bindgen]
pub fn combine_tracks_wav(samples: &[f32], layout_json: &str) -> Result<Vec<u8>, JsValue> {
    let mix = combine_interleaved(samples, layout_json)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(encode_wav(&mix))
}

/// WASM-exposed: mix the tracks of a JSON layout into interleaved stereo f32 samples.
#[wasm_bindgen]
pub fn combine_tracks_samples(
    samples: &[f32],
    layout_json: &str,
) -> Result<Vec<f32>, JsValue> {
    let mix = combine_interleaved(samples, layout_json)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(mix.interleaved())
}

/// WASM-exposed: the built-in two-second demo beat as mono f32 samples.
#[wasm_bindgen]
pub fn example_beat_samples(sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let beat = dsp::example::example_beat(sample_rate)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(beat.channel(0).to_vec())
}

/// WASM-exposed: default mix settings for a newly added track, as a JS object.
#[wasm_bindgen]
pub fn default_track_params() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&TrackParams::default())
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}
