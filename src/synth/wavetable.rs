//! Harmonic wavetables
//!
//! A wavetable here is one cycle of an additive waveform: the sum of the
//! first sixteen harmonics of a sine, each with its own amplitude, normalized
//! to a peak of 1.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::ConfigError;

/// Number of samples in one wavetable cycle
pub const TABLE_SIZE: usize = 1024;

/// Number of harmonic amplitudes defining a wavetable
pub const HARMONIC_COUNT: usize = 16;

/// Amplitudes of harmonics 1 through 16, each nominally in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Harmonics([f64; HARMONIC_COUNT]);

impl Harmonics {
    pub fn new(amplitudes: [f64; HARMONIC_COUNT]) -> Self {
        Self(amplitudes)
    }

    /// Fundamental only (a plain sine table)
    pub fn fundamental() -> Self {
        let mut amplitudes = [0.0; HARMONIC_COUNT];
        amplitudes[0] = 1.0;
        Self(amplitudes)
    }

    /// All harmonics at zero
    pub fn silent() -> Self {
        Self([0.0; HARMONIC_COUNT])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Exact comparison, distinguishing `0.0` from `-0.0`
    pub fn bitwise_eq(&self, other: &Harmonics) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Default for Harmonics {
    fn default() -> Self {
        Self::fundamental()
    }
}

impl TryFrom<Vec<f64>> for Harmonics {
    type Error = ConfigError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let found = values.len();
        let amplitudes: [f64; HARMONIC_COUNT] =
            values.try_into().map_err(|_| ConfigError::HarmonicCount {
                expected: HARMONIC_COUNT,
                found,
            })?;
        Ok(Self(amplitudes))
    }
}

impl From<Harmonics> for Vec<f64> {
    fn from(harmonics: Harmonics) -> Self {
        harmonics.0.to_vec()
    }
}

/// One normalized cycle built from a set of harmonics
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    samples: Vec<f64>,
}

impl Wavetable {
    /// Sum the harmonics into a table of `TABLE_SIZE` entries and divide by
    /// the peak magnitude. An all-zero table is returned as-is.
    pub fn from_harmonics(harmonics: &Harmonics) -> Self {
        let mut samples: Vec<f64> = (0..TABLE_SIZE)
            .map(|k| {
                let phase = k as f64 / TABLE_SIZE as f64;
                harmonics
                    .as_slice()
                    .iter()
                    .enumerate()
                    .fold(0.0, |acc, (h, &gain)| {
                        acc + gain * (TAU * (h + 1) as f64 * phase).sin()
                    })
            })
            .collect();

        let peak = samples.iter().fold(0.0f64, |acc, &s| acc.max(s.abs()));
        if peak > 0.0 {
            for sample in &mut samples {
                *sample /= peak;
            }
        }

        Self { samples }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Largest absolute value in the table
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |acc, &s| acc.max(s.abs()))
    }

    /// Linearly interpolated read at fractional phase `t` in [0, 1)
    #[inline]
    pub fn read(&self, t: f64) -> f64 {
        let position = (t * TABLE_SIZE as f64).rem_euclid(TABLE_SIZE as f64);
        let whole = position.floor();
        let frac = position - whole;
        let i0 = (whole as usize) % TABLE_SIZE;
        let i1 = (i0 + 1) % TABLE_SIZE;
        (1.0 - frac) * self.samples[i0] + frac * self.samples[i1]
    }
}

#[derive(Debug, Clone)]
struct CachedTable {
    harmonics: Harmonics,
    table: Wavetable,
}

/// Per-channel wavetables, rebuilt only when a channel's harmonics change
#[derive(Debug, Clone, Default)]
pub struct WavetableCache {
    slots: Vec<Option<CachedTable>>,
}

impl WavetableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of channel slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grow with empty slots or drop trailing ones
    pub fn resize_channels(&mut self, channels: usize) {
        self.slots.resize_with(channels, || None);
    }

    /// Table for `channel`, rebuilding it if the harmonics differ from the
    /// ones it was built from.
    pub fn table_for(&mut self, channel: usize, harmonics: &Harmonics) -> &Wavetable {
        if self.slots.len() <= channel {
            self.slots.resize_with(channel + 1, || None);
        }
        let slot = &mut self.slots[channel];

        let fresh = matches!(slot, Some(cached) if cached.harmonics.bitwise_eq(harmonics));
        if !fresh {
            *slot = None;
        }

        &slot
            .get_or_insert_with(|| {
                tracing::debug!(channel, "rebuilding wavetable");
                CachedTable {
                    harmonics: *harmonics,
                    table: Wavetable::from_harmonics(harmonics),
                }
            })
            .table
    }
}
