//! wavebank - Multi-channel oscillator bank renderer

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wavebank::config;
use wavebank::engine::{Engine, Recorder, RenderResult};
use wavebank::synth::ChannelState;

mod cli;

use cli::{Cli, Commands};

/// One channel of one block, as printed by `dump`
#[derive(Serialize)]
struct ChannelDump<'a> {
    name: String,
    samples: &'a [f64],
    state: &'a ChannelState,
}

#[derive(Serialize)]
struct BlockDump<'a> {
    block: usize,
    channels: Vec<ChannelDump<'a>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config: config_path,
            output,
            length,
        } => {
            tracing::info!(path = ?config_path, "loading patch");
            let patch = config::load_config(&config_path)?;

            let sample_rate = patch.audio.sample_rate;
            let block_length = patch.audio.block_length;
            let blocks = length.blocks(sample_rate, block_length);

            tracing::info!(
                channels = patch.channels.len(),
                sample_rate,
                block_length,
                blocks,
                output = ?output,
                "rendering"
            );

            let mut engine = Engine::from_patch(&patch)?;
            let mut recorder = Recorder::new(&output, sample_rate, patch.channels.len())?;

            let blocks_per_second = (f64::from(sample_rate) / block_length as f64).ceil().max(1.0) as usize;
            for i in 0..blocks {
                let block = engine.render_patch(&patch)?;
                recorder.write_block(&block)?;

                // Progress update every second of audio
                if i % blocks_per_second == 0 {
                    tracing::debug!(seconds = recorder.duration_secs(), "progress");
                }
            }

            let seconds = recorder.duration_secs();
            recorder.finalize()?;
            tracing::info!(output = ?output, seconds, "recorded");
        }

        Commands::Dump {
            config: config_path,
            blocks,
        } => {
            let patch = config::load_config(&config_path)?;
            let mut engine = Engine::from_patch(&patch)?;

            for block in 0..blocks {
                let result = engine.render_patch(&patch)?;
                let dump = BlockDump {
                    block,
                    channels: dump_channels(&result),
                };
                println!("{}", serde_json::to_string(&dump)?);
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking patch at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(patch) => {
                    println!("Patch is valid!");
                    println!("  Sample rate: {} Hz", patch.audio.sample_rate);
                    println!(
                        "  Block length: {} samples ({:.2} ms)",
                        patch.audio.block_length,
                        patch.block_duration_secs() * 1000.0
                    );
                    println!("  Smoothing cutoff: {} Hz", patch.filter.cutoff);
                    match patch.noise.seed {
                        Some(seed) => println!("  Noise seed: {}", seed),
                        None => println!("  Noise seed: entropy"),
                    }
                    println!("  Channels: {}", patch.channels.len());
                    for (i, channel) in patch.channels.iter().enumerate() {
                        println!(
                            "    - {}: {} Hz, amplitude {}, offset {}",
                            RenderResult::channel_name(i),
                            channel.frequency,
                            channel.amplitude,
                            channel.offset
                        );
                    }
                }
                Err(e) => {
                    println!("Patch is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../wavebank.example.yaml");

            let path = "wavebank.yaml";
            if std::path::Path::new(path).exists() {
                println!("wavebank.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created wavebank.yaml with example patch.");
            }
        }
    }

    Ok(())
}

fn dump_channels(result: &RenderResult) -> Vec<ChannelDump<'_>> {
    result
        .labeled()
        .zip(result.states())
        .map(|((name, samples), state)| ChannelDump {
            name,
            samples,
            state,
        })
        .collect()
}
