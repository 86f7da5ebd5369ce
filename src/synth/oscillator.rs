//! Oscillator bank
//!
//! One phase accumulator per channel drives six generators: sine,
//! band-limited square and sawtooth, a triangle integrated from the square,
//! white noise, and a harmonic wavetable. Each block they are mixed, scaled
//! and offset into a single channel of output.

use std::f64::consts::TAU;

use super::channel::ChannelConfig;
use super::noise::NoiseSource;
use super::polyblep::{is_correctable, poly_blep};
use super::wavetable::Wavetable;

/// Decay applied to the triangle integrator every sample
pub const INTEGRATOR_LEAK: f64 = 0.995;

/// Largest `|frequency / sample_rate|` a channel may run at. Keeps the
/// triangle integrator, which grows with the increment, far from overflow.
pub const MAX_INCREMENT: f64 = 1.0e6;

/// Waveform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    /// White noise (uniform random)
    Noise,
    /// Harmonic wavetable
    Wavetable,
}

impl Waveform {
    /// All waveforms, in mix order
    pub const ALL: [Waveform; 6] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Noise,
        Waveform::Wavetable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
            Waveform::Noise => "noise",
            Waveform::Wavetable => "wavetable",
        }
    }
}

/// Wrap any value into [0, 1). Non-finite input maps to 0.
#[inline]
pub fn wrap_phase(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    let t = x.rem_euclid(1.0);
    // rem_euclid rounds tiny negative inputs up to exactly 1.0
    if t >= 1.0 {
        0.0
    } else {
        t
    }
}

/// Cycles advanced per sample, or 0 when the ratio is not finite
#[inline]
pub fn phase_increment(frequency: f64, sample_rate: f64) -> f64 {
    let dt = frequency / sample_rate;
    if dt.is_finite() {
        dt
    } else {
        0.0
    }
}

#[inline]
pub fn sine(t: f64) -> f64 {
    (TAU * t).sin()
}

/// Pulse wave high for `t < bias`, with PolyBLEP residuals at the wrap and
/// at the bias-shifted phase.
#[inline]
pub fn square(t: f64, dt: f64, bias: f64) -> f64 {
    let naive = if t < bias { 1.0 } else { -1.0 };
    naive - poly_blep(t, dt) + poly_blep(wrap_phase(t + bias), dt)
}

/// Rising ramp from -1 to 1 with a PolyBLEP residual at the wrap
#[inline]
pub fn sawtooth(t: f64, dt: f64) -> f64 {
    2.0 * t - 1.0 - poly_blep(t, dt)
}

/// One channel's rendered block and the memory to carry into the next one
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorBlock {
    pub samples: Vec<f64>,
    /// Wrapped phase of the last generated sample
    pub phase: f64,
    /// Triangle integrator after the last sample
    pub integrator: f64,
}

/// Renders one channel's block from its config and wavetable
pub struct Oscillator<'a> {
    config: &'a ChannelConfig,
    table: &'a Wavetable,
    sample_rate: f64,
}

impl<'a> Oscillator<'a> {
    pub fn new(config: &'a ChannelConfig, table: &'a Wavetable, sample_rate: f64) -> Self {
        Self {
            config,
            table,
            sample_rate,
        }
    }

    pub fn phase_increment(&self) -> f64 {
        phase_increment(self.config.frequency, self.sample_rate)
    }

    /// Whether the square and sawtooth get PolyBLEP correction at this
    /// increment. Negative and above-Nyquist/2 increments do not.
    pub fn is_band_limited(&self) -> bool {
        is_correctable(self.phase_increment())
    }

    /// Generate `block_length` samples starting at `phase` with the triangle
    /// integrator at `integrator`.
    ///
    /// The returned phase is that of the last sample in the block, not one
    /// increment past it; the next block therefore repeats that phase as its
    /// first sample.
    pub fn render(
        &self,
        block_length: usize,
        phase: f64,
        integrator: f64,
        noise: &mut NoiseSource,
    ) -> OscillatorBlock {
        let dt = self.phase_increment();
        let mix = &self.config.mix;
        let bias = self.config.bias;
        let mut y = integrator;

        let samples = (0..block_length)
            .map(|n| {
                let t = wrap_phase(phase + dt * n as f64);

                let sq = square(t, dt, bias);
                // Leaky integration; must run in sample order
                y = INTEGRATOR_LEAK * y + dt * sq;

                let mixed = mix.sine * sine(t)
                    + mix.square * sq
                    + mix.sawtooth * sawtooth(t, dt)
                    + mix.triangle * (4.0 * y)
                    + mix.noise * noise.next_sample()
                    + mix.wavetable * self.table.read(t);

                mixed * self.config.amplitude + self.config.offset
            })
            .collect();

        if !y.is_finite() {
            tracing::debug!(increment = dt, "triangle integrator overflowed, resetting");
            y = 0.0;
        }

        let last = block_length.saturating_sub(1);
        OscillatorBlock {
            samples,
            phase: wrap_phase(phase + dt * last as f64),
            integrator: y,
        }
    }
}
