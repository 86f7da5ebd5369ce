//! Block render pipeline
//!
//! Turns a set of channel configs plus the channels' carried-over state into
//! one block of filtered multi-channel audio and the state for the next block.

mod recorder;

pub use recorder::Recorder;

use serde::Serialize;

use crate::config::PatchConfig;
use crate::error::ConfigError;
use crate::synth::{
    ChannelConfig, ChannelState, ChannelStates, NoiseSource, OnePole, Oscillator,
    WavetableCache, DEFAULT_CUTOFF,
};

/// Everything needed to render one block
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub sample_rate: f64,
    pub block_length: usize,
    pub channels: &'a [ChannelConfig],
    pub states: &'a [ChannelState],
}

impl<'a> RenderRequest<'a> {
    pub fn new(
        sample_rate: f64,
        block_length: usize,
        channels: &'a [ChannelConfig],
        states: &'a [ChannelState],
    ) -> Self {
        Self {
            sample_rate,
            block_length,
            channels,
            states,
        }
    }

    /// Reject anything that would make the render ill-defined
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.len() != self.states.len() {
            return Err(ConfigError::ChannelCountMismatch {
                configs: self.channels.len(),
                states: self.states.len(),
            });
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.block_length == 0 {
            return Err(ConfigError::EmptyBlock);
        }
        for (channel, config) in self.channels.iter().enumerate() {
            config.validate_at(channel, self.sample_rate)?;
        }
        Ok(())
    }
}

/// One rendered block, channel-major, with the state to carry forward
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderResult {
    samples: Vec<Vec<f64>>,
    states: Vec<ChannelState>,
}

impl RenderResult {
    pub fn channel_count(&self) -> usize {
        self.samples.len()
    }

    /// Samples per channel
    pub fn block_length(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, channel: usize) -> Option<&[f64]> {
        self.samples.get(channel).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f64>] {
        &self.samples
    }

    /// Updated state, one entry per channel
    pub fn states(&self) -> &[ChannelState] {
        &self.states
    }

    /// Output label for a channel, counted from 1
    pub fn channel_name(channel: usize) -> String {
        format!("oscillator_{}", channel + 1)
    }

    /// Each channel's block paired with its label
    pub fn labeled(&self) -> impl Iterator<Item = (String, &[f64])> + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, block)| (Self::channel_name(i), block.as_slice()))
    }
}

/// Oscillator bank plus smoothing filter, without any channel state of its own.
///
/// Holds only what is shared across calls but carries no audio memory: the
/// filter cutoff, the noise source, and cached wavetables.
#[derive(Debug, Clone)]
pub struct Pipeline {
    cutoff: f64,
    noise: NoiseSource,
    tables: WavetableCache,
}

impl Pipeline {
    /// Pipeline at the default smoothing cutoff
    pub fn new(noise: NoiseSource) -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            noise,
            tables: WavetableCache::new(),
        }
    }

    /// Pipeline with a custom smoothing cutoff in Hz
    pub fn with_cutoff(cutoff: f64, noise: NoiseSource) -> Result<Self, ConfigError> {
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(ConfigError::InvalidCutoff(cutoff));
        }
        Ok(Self {
            cutoff,
            ..Self::new(noise)
        })
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Render one block.
    ///
    /// Validation happens before any work, and the request's states are
    /// never modified; the updated states come back in the result.
    pub fn render(&mut self, request: &RenderRequest<'_>) -> Result<RenderResult, ConfigError> {
        request.validate()?;

        let channel_count = request.channels.len();
        self.tables.resize_channels(channel_count);

        let mut samples = Vec::with_capacity(channel_count);
        let mut states = Vec::with_capacity(channel_count);

        for (channel, (config, state)) in request.channels.iter().zip(request.states).enumerate() {
            let table = self.tables.table_for(channel, &config.harmonics);
            let oscillator = Oscillator::new(config, table, request.sample_rate);

            let dt = oscillator.phase_increment();
            if dt != 0.0 && !oscillator.is_band_limited() {
                tracing::debug!(channel, increment = dt, "PolyBLEP disabled for this channel");
            }

            let block = oscillator.render(
                request.block_length,
                state.phase,
                state.integrator,
                &mut self.noise,
            );
            samples.push(block.samples);
            states.push(ChannelState {
                phase: block.phase,
                integrator: block.integrator,
                filter: state.filter,
            });
        }

        let filter = OnePole::new(self.cutoff, request.sample_rate);
        for (block, state) in samples.iter_mut().zip(states.iter_mut()) {
            filter.process_buffer(block, &mut state.filter);
        }

        Ok(RenderResult { samples, states })
    }
}

/// Owns channel state between calls and threads it through the pipeline
#[derive(Debug, Clone)]
pub struct Engine {
    pipeline: Pipeline,
    states: ChannelStates,
}

impl Engine {
    /// Engine with `channels` zeroed channels
    pub fn new(channels: usize, pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            states: ChannelStates::new(channels),
        }
    }

    /// Engine sized and configured for a patch
    pub fn from_patch(patch: &PatchConfig) -> Result<Self, ConfigError> {
        let noise = match patch.noise.seed {
            Some(seed) => NoiseSource::seeded(seed),
            None => NoiseSource::from_entropy(),
        };
        let pipeline = Pipeline::with_cutoff(patch.filter.cutoff, noise)?;
        Ok(Self::new(patch.channels.len(), pipeline))
    }

    pub fn channel_count(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &ChannelStates {
        &self.states
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Change the channel count. Surviving channels keep their state, new
    /// ones start from zero.
    pub fn resize_channels(&mut self, channels: usize) {
        self.states.resize_channels(channels);
    }

    /// Render one block and keep the updated state. On error the stored
    /// state is left as it was.
    pub fn render(
        &mut self,
        sample_rate: f64,
        block_length: usize,
        channels: &[ChannelConfig],
    ) -> Result<RenderResult, ConfigError> {
        let request = RenderRequest::new(sample_rate, block_length, channels, self.states.as_slice());
        let result = self.pipeline.render(&request)?;
        self.states = ChannelStates::from_states(result.states().to_vec());
        Ok(result)
    }

    /// Render one block of a patch at its configured rate and length
    pub fn render_patch(&mut self, patch: &PatchConfig) -> Result<RenderResult, ConfigError> {
        self.render(
            f64::from(patch.audio.sample_rate),
            patch.audio.block_length,
            &patch.channels,
        )
    }
}
