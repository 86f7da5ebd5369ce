//! One-pole smoothing filter
//!
//! A first-order low-pass run over each channel after mixing, taking the edge
//! off the raw oscillator output. Its single memory value is carried between
//! blocks by the caller.

use std::f64::consts::TAU;

/// Cutoff used when none is configured
pub const DEFAULT_CUTOFF: f64 = 8000.0;

/// One-pole low-pass: `y = alpha * y + (1 - alpha) * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePole {
    cutoff: f64,
    sample_rate: f64,
    alpha: f64,
}

impl OnePole {
    /// Create a filter with the given cutoff in Hz
    pub fn new(cutoff: f64, sample_rate: f64) -> Self {
        Self {
            cutoff,
            sample_rate,
            alpha: (-TAU * cutoff / sample_rate).exp(),
        }
    }

    /// Filter at the default 8 kHz cutoff
    pub fn smoothing(sample_rate: f64) -> Self {
        Self::new(DEFAULT_CUTOFF, sample_rate)
    }

    /// Get cutoff frequency
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Feedback coefficient
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Process a single sample, updating `memory`
    #[inline]
    pub fn process(&self, input: f64, memory: &mut f64) -> f64 {
        *memory = self.alpha * *memory + (1.0 - self.alpha) * input;
        *memory
    }

    /// Filter a buffer in place, in sample order, starting from and updating
    /// `memory`
    pub fn process_buffer(&self, buffer: &mut [f64], memory: &mut f64) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample, memory);
        }
    }
}
