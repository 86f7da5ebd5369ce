//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::synth::{ChannelConfig, DEFAULT_CUTOFF};

/// A complete patch: render settings plus one config per channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchConfig {
    /// Render settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Smoothing filter settings
    #[serde(default)]
    pub filter: FilterConfig,

    /// Noise generator settings
    #[serde(default)]
    pub noise: NoiseConfig,

    /// Oscillator channels
    pub channels: Vec<ChannelConfig>,
}

impl PatchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate audio settings
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.block_length == 0 || self.audio.block_length > 65536 {
            bail!("Block length must be between 1 and 65536");
        }

        if !(self.filter.cutoff.is_finite() && self.filter.cutoff > 0.0) {
            bail!("Filter cutoff must be a positive frequency");
        }

        if self.channels.is_empty() {
            bail!("At least one channel is required");
        }
        for (index, channel) in self.channels.iter().enumerate() {
            channel.validate_at(index, f64::from(self.audio.sample_rate))?;
            if channel.uses_reserved_fields() {
                tracing::warn!(
                    channel = index,
                    "phase_shift and smooth_pitch are reserved and have no effect"
                );
            }
        }

        Ok(())
    }

    /// Length of one block in seconds
    pub fn block_duration_secs(&self) -> f64 {
        self.audio.block_length as f64 / f64::from(self.audio.sample_rate)
    }
}

/// Render settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Samples per channel per block (default: 735)
    #[serde(default = "default_block_length")]
    pub block_length: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            block_length: default_block_length(),
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_block_length() -> usize { 735 }

/// Smoothing filter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// One-pole cutoff in Hz (default: 8000)
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { cutoff: default_cutoff() }
    }
}

fn default_cutoff() -> f64 { DEFAULT_CUTOFF }

/// Noise generator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Fixed seed for reproducible renders (None = seed from entropy)
    pub seed: Option<u64>,
}
