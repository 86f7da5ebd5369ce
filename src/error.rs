//! Error types for render requests and channel configuration

use thiserror::Error;

/// A malformed render request or channel configuration.
///
/// Returned before any channel state is touched, so a failed call leaves the
/// caller's state exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Config and state sequences disagree on the channel count
    #[error("channel count mismatch: {configs} configs but {states} states")]
    ChannelCountMismatch { configs: usize, states: usize },

    #[error("sample rate must be a positive finite number, got {0}")]
    InvalidSampleRate(f64),

    #[error("block length must be at least one sample")]
    EmptyBlock,

    #[error("expected {expected} harmonic amplitudes, got {found}")]
    HarmonicCount { expected: usize, found: usize },

    #[error("channel {channel}: {field} must be finite, got {value}")]
    NonFinite {
        channel: usize,
        field: String,
        value: f64,
    },

    #[error("channel {channel}: {field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        channel: usize,
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("smoothing cutoff must be a positive finite frequency, got {0}")]
    InvalidCutoff(f64),
}
