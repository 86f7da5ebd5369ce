//! WAV file recorder
//!
//! Writes rendered blocks to a multi-channel 32-bit float WAV file.

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::RenderResult;

/// WAV file recorder
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    channels: usize,
    frames_written: u64,
}

impl Recorder {
    /// Create a new recorder
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `sample_rate` - Sample rate in Hz
    /// * `channels` - Number of interleaved channels
    pub fn new(path: &Path, sample_rate: u32, channels: usize) -> Result<Self> {
        if channels == 0 {
            bail!("cannot record zero channels");
        }
        let channel_count = u16::try_from(channels)
            .with_context(|| format!("too many channels for a WAV file: {}", channels))?;

        let spec = WavSpec {
            channels: channel_count,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            channels,
            frames_written: 0,
        })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of frames (one sample per channel) written
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / self.sample_rate as f64
    }

    /// Interleave and write channel-major blocks of equal length
    pub fn write_channels(&mut self, channels: &[Vec<f64>]) -> Result<()> {
        if channels.len() != self.channels {
            bail!(
                "recorder expects {} channels, got {}",
                self.channels,
                channels.len()
            );
        }
        let frames = channels.first().map_or(0, Vec::len);
        if channels.iter().any(|c| c.len() != frames) {
            bail!("channel blocks differ in length");
        }

        for n in 0..frames {
            for channel in channels {
                self.writer
                    .write_sample(channel[n] as f32)
                    .context("failed to write sample")?;
            }
        }
        self.frames_written += frames as u64;
        Ok(())
    }

    /// Write a rendered block
    pub fn write_block(&mut self, block: &RenderResult) -> Result<()> {
        self.write_channels(block.channels())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to properly close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}
