//! wavebank - Block-based multi-channel oscillator bank
//!
//! Each channel blends sine, band-limited square and sawtooth, an integrated
//! triangle, white noise and a harmonic wavetable, then runs the mix through
//! a one-pole smoothing filter. Phase, integrator and filter memory carry
//! over between blocks so consecutive renders join without clicks.

pub mod config;
pub mod engine;
pub mod error;
pub mod synth;

pub use config::PatchConfig;
pub use engine::{Engine, Pipeline, RenderRequest, RenderResult};
pub use error::ConfigError;
