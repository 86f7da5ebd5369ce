//! Synthesis primitives
//!
//! Contains the oscillator bank, its PolyBLEP and wavetable helpers, the noise
//! source, the smoothing filter, and per-channel config and state.

mod channel;
mod filter;
mod noise;
mod oscillator;
mod polyblep;
mod wavetable;

pub use channel::{ChannelConfig, ChannelState, ChannelStates, MixLevels, MAX_LEVEL};
pub use filter::{OnePole, DEFAULT_CUTOFF};
pub use noise::NoiseSource;
pub use oscillator::{
    phase_increment, sawtooth, sine, square, wrap_phase, Oscillator, OscillatorBlock, Waveform,
    INTEGRATOR_LEAK, MAX_INCREMENT,
};
pub use polyblep::{is_correctable, poly_blep, poly_blep_block};
pub use wavetable::{Harmonics, Wavetable, WavetableCache, HARMONIC_COUNT, TABLE_SIZE};
