//! DSP core — pure Rust offline fading, mixing and WAV encoding.
//!
//! Everything here is synchronous and allocation-owning: renders borrow
//! their input buffers read-only and return a fresh `SampleBuffer`, so the
//! same sources can be rendered from several threads at once.

pub mod buffer;
pub mod envelope;
pub mod example;
pub mod mixer;
pub mod renderer;
pub mod wav;
