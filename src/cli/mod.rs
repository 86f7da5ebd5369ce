//! CLI interface for wavebank

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Multi-channel oscillator bank renderer
#[derive(Parser)]
#[command(name = "wavebank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a patch to a WAV file
    Render {
        /// Patch file path
        #[arg(short, long, default_value = "wavebank.yaml")]
        config: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        length: RenderLength,
    },

    /// Print rendered blocks as JSON
    Dump {
        /// Patch file path
        #[arg(short, long, default_value = "wavebank.yaml")]
        config: PathBuf,

        /// Number of consecutive blocks to print
        #[arg(short, long, default_value = "1")]
        blocks: usize,
    },

    /// Validate a patch file
    Check {
        /// Patch file path
        #[arg(short, long, default_value = "wavebank.yaml")]
        config: PathBuf,
    },

    /// Generate an example patch file
    Init,
}

/// How much audio to render, either as a block count or in seconds
#[derive(Args)]
#[group(required = false, multiple = false)]
pub struct RenderLength {
    /// Number of blocks
    #[arg(short, long)]
    pub blocks: Option<usize>,

    /// Duration in seconds (rounded up to whole blocks)
    #[arg(short, long)]
    pub duration: Option<f64>,
}

impl RenderLength {
    /// Seconds rendered when neither option is given
    pub const DEFAULT_SECS: f64 = 10.0;

    /// Resolve to a block count at the given rate and block length
    pub fn blocks(&self, sample_rate: u32, block_length: usize) -> usize {
        if let Some(blocks) = self.blocks {
            return blocks;
        }
        let secs = self.duration.unwrap_or(Self::DEFAULT_SECS).max(0.0);
        let samples = (secs * f64::from(sample_rate)).ceil() as usize;
        samples.div_ceil(block_length.max(1))
    }
}
