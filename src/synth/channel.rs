//! Per-channel configuration and persistent state

use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::oscillator::{Waveform, MAX_INCREMENT};
use super::wavetable::Harmonics;
use crate::error::ConfigError;

/// Largest magnitude accepted for a channel's amplitude or offset
pub const MAX_LEVEL: f64 = 1.0e3;

/// Level of each waveform in a channel's mix, each in [0, 1].
///
/// Levels need not sum to 1. Inside an explicit `mix:` block, levels left
/// out are 0; a channel with no `mix:` at all is pure sine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default = "MixLevels::silent")]
pub struct MixLevels {
    pub sine: f64,
    pub square: f64,
    pub sawtooth: f64,
    pub triangle: f64,
    pub noise: f64,
    pub wavetable: f64,
}

impl MixLevels {
    /// Everything muted
    pub fn silent() -> Self {
        Self {
            sine: 0.0,
            square: 0.0,
            sawtooth: 0.0,
            triangle: 0.0,
            noise: 0.0,
            wavetable: 0.0,
        }
    }

    /// A single waveform at `level`, all others muted
    pub fn only(waveform: Waveform, level: f64) -> Self {
        let mut mix = Self::silent();
        mix.set(waveform, level);
        mix
    }

    pub fn get(&self, waveform: Waveform) -> f64 {
        match waveform {
            Waveform::Sine => self.sine,
            Waveform::Square => self.square,
            Waveform::Sawtooth => self.sawtooth,
            Waveform::Triangle => self.triangle,
            Waveform::Noise => self.noise,
            Waveform::Wavetable => self.wavetable,
        }
    }

    pub fn set(&mut self, waveform: Waveform, level: f64) {
        let slot = match waveform {
            Waveform::Sine => &mut self.sine,
            Waveform::Square => &mut self.square,
            Waveform::Sawtooth => &mut self.sawtooth,
            Waveform::Triangle => &mut self.triangle,
            Waveform::Noise => &mut self.noise,
            Waveform::Wavetable => &mut self.wavetable,
        };
        *slot = level;
    }
}

impl Default for MixLevels {
    /// Pure sine
    fn default() -> Self {
        Self::only(Waveform::Sine, 1.0)
    }
}

/// Everything the synthesis core needs to know about one channel for one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Oscillator frequency in Hz
    pub frequency: f64,
    /// Linear gain applied after mixing
    pub amplitude: f64,
    pub mix: MixLevels,
    /// Added after amplitude scaling
    pub offset: f64,
    /// Square wave duty cycle, 0-1
    pub bias: f64,
    /// Reserved. Accepted and validated, no effect on synthesis.
    pub phase_shift: f64,
    /// Reserved. Accepted, no effect on synthesis.
    pub smooth_pitch: bool,
    /// Harmonic amplitudes for the wavetable oscillator
    pub harmonics: Harmonics,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            amplitude: 1.0,
            mix: MixLevels::default(),
            offset: 0.0,
            bias: 0.5,
            phase_shift: 0.0,
            smooth_pitch: false,
            harmonics: Harmonics::default(),
        }
    }
}

impl ChannelConfig {
    /// Config with the given frequency, all else at defaults
    pub fn with_frequency(frequency: f64) -> Self {
        Self {
            frequency,
            ..Self::default()
        }
    }

    /// Whether any reserved field carries a non-default value
    pub fn uses_reserved_fields(&self) -> bool {
        self.phase_shift != 0.0 || self.smooth_pitch
    }

    /// Check every field against its documented range.
    ///
    /// Values outside a range are rejected, not clamped. `channel` is only
    /// used to label the error.
    pub fn validate(&self, channel: usize) -> Result<(), ConfigError> {
        finite(channel, "frequency", self.frequency)?;
        within(channel, "amplitude", self.amplitude, -MAX_LEVEL, MAX_LEVEL)?;
        within(channel, "offset", self.offset, -MAX_LEVEL, MAX_LEVEL)?;
        finite(channel, "phase_shift", self.phase_shift)?;
        within(channel, "bias", self.bias, 0.0, 1.0)?;

        for waveform in Waveform::ALL {
            let field = format!("mix.{}", waveform.name());
            within(channel, &field, self.mix.get(waveform), 0.0, 1.0)?;
        }

        for (h, &amplitude) in self.harmonics.as_slice().iter().enumerate() {
            let field = format!("harmonics[{}]", h);
            within(channel, &field, amplitude, -1.0, 1.0)?;
        }

        Ok(())
    }

    /// [`validate`](Self::validate), plus a check that the frequency stays
    /// within `MAX_INCREMENT` cycles per sample at `sample_rate`.
    pub fn validate_at(&self, channel: usize, sample_rate: f64) -> Result<(), ConfigError> {
        self.validate(channel)?;

        if (self.frequency / sample_rate).abs() > MAX_INCREMENT {
            let limit = MAX_INCREMENT * sample_rate;
            return Err(ConfigError::OutOfRange {
                channel,
                field: "frequency".to_string(),
                value: self.frequency,
                min: -limit,
                max: limit,
            });
        }
        Ok(())
    }
}

fn finite(channel: usize, field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            channel,
            field: field.to_string(),
            value,
        })
    }
}

fn within(channel: usize, field: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    finite(channel, field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            channel,
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Memory one channel carries from block to block
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    /// Position in the oscillation cycle, always in [0, 1)
    pub phase: f64,
    /// Leaky integrator feeding the triangle wave
    pub integrator: f64,
    /// Last output of the smoothing filter
    pub filter: f64,
}

/// State for every channel.
///
/// Each channel's phase, integrator and filter memory live together in one
/// record, so resizing can never leave them at different lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelStates {
    channels: Vec<ChannelState>,
}

impl ChannelStates {
    /// `count` zeroed channels
    pub fn new(count: usize) -> Self {
        Self {
            channels: vec![ChannelState::default(); count],
        }
    }

    pub fn from_states(channels: Vec<ChannelState>) -> Self {
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Grow with zeroed channels or truncate; surviving channels are untouched
    pub fn resize_channels(&mut self, count: usize) {
        if count != self.channels.len() {
            tracing::debug!(from = self.channels.len(), to = count, "resizing channel state");
        }
        self.channels.resize(count, ChannelState::default());
    }

    pub fn as_slice(&self) -> &[ChannelState] {
        &self.channels
    }
}

impl Index<usize> for ChannelStates {
    type Output = ChannelState;

    fn index(&self, channel: usize) -> &ChannelState {
        &self.channels[channel]
    }
}
