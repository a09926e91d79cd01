//! Hopfield - Command Line Tool
//!
//! Train a network on a directory of black/white PNG images and recall
//! stored images from noisy or partial probes.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hopfield::{
    utils, BipolarVector, CancelToken, EnergyTrajectory, EventRecorder, HopfieldConfig,
    HopfieldNetwork, Observer, RunMode, Termination,
};
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hopfield")]
#[command(about = "Hopfield network image autoassociation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Learn weights from a directory of PNG images and save them
    Train {
        /// Directory of training images
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Where to write the trained network
        #[arg(short, long, default_value = "model.bin")]
        output: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = 64)]
        width: usize,

        /// Image height in pixels
        #[arg(long, default_value_t = 64)]
        height: usize,
    },

    /// Relax a probe image toward the nearest stored image
    Recall {
        /// Directory of training images (ignored with --model)
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Previously trained network
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Probe image
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the recalled image
        #[arg(short, long, default_value = "recalled.png")]
        output: PathBuf,

        /// Run without per-flip reporting
        #[arg(long)]
        instant: bool,

        /// Flip this many random pixels of the probe first
        #[arg(long, default_value_t = 0)]
        noise: usize,

        /// Seed for --noise
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Image width in pixels (ignored with --model)
        #[arg(long, default_value_t = 64)]
        width: usize,

        /// Image height in pixels (ignored with --model)
        #[arg(long, default_value_t = 64)]
        height: usize,

        /// Updates between energy reports
        #[arg(long, default_value_t = 25)]
        snapshot_interval: usize,

        /// Pause after each update in visual mode
        #[arg(long, default_value_t = 0)]
        step_delay_ms: u64,

        /// Write the energy trajectory as JSON
        #[arg(long)]
        trajectory: Option<PathBuf>,

        /// Write every run event as JSON
        #[arg(long)]
        events: Option<PathBuf>,
    },
}

/// Logs run progress and optionally records events.
struct ConsoleObserver {
    flips: usize,
    recorder: Option<EventRecorder>,
}

impl Observer for ConsoleObserver {
    fn on_flip(&mut self, index: usize, value: i8) {
        self.flips += 1;
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_flip(index, value);
        }
    }

    fn on_energy(&mut self, trajectory: &EnergyTrajectory) {
        let (low, high) = trajectory.bounds();
        tracing::debug!(
            updates = trajectory.len() - 1,
            energy = trajectory.last(),
            low,
            high,
            flips = self.flips,
            "energy"
        );
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_energy(trajectory);
        }
    }

    fn on_state(&mut self, state: &BipolarVector) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_state(state);
        }
    }

    fn on_finished(&mut self, termination: Termination) {
        match termination {
            Termination::Converged { iterations } => {
                println!("Converged after {} iterations", iterations)
            }
            Termination::Cancelled => println!("Run cancelled"),
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.on_finished(termination);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hopfield=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            output,
            width,
            height,
        } => {
            let mut net = HopfieldNetwork::with_config(HopfieldConfig::new(width, height))?;
            net.train_from_dir(&data)
                .with_context(|| format!("training on {}", data.display()))?;
            net.save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(
                patterns = net.num_patterns()?,
                path = %output.display(),
                "saved trained network"
            );
            Ok(())
        }
        Commands::Recall {
            data,
            model,
            input,
            output,
            instant,
            noise,
            seed,
            width,
            height,
            snapshot_interval,
            step_delay_ms,
            trajectory,
            events,
        } => {
            let mut net = match model {
                Some(path) => HopfieldNetwork::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => {
                    let mut net = HopfieldNetwork::with_config(HopfieldConfig::new(width, height))?;
                    net.train_from_dir(&data)
                        .with_context(|| format!("training on {}", data.display()))?;
                    net
                }
            };
            if snapshot_interval == 0 {
                bail!("--snapshot-interval must be at least 1");
            }

            let codec = net.codec()?;
            let mut probe = codec
                .load_png(&input)
                .with_context(|| format!("reading probe {}", input.display()))?;
            if noise > 0 {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                probe = utils::corrupt(&probe, noise, &mut rng)?;
            }

            let config = net
                .config()
                .clone()
                .with_mode(if instant { RunMode::Instant } else { RunMode::Visual })
                .with_snapshot_interval(snapshot_interval)
                .with_step_delay_ms(step_delay_ms);
            net.set_config(config)?;

            let mut observer = ConsoleObserver {
                flips: 0,
                recorder: events.as_ref().map(|_| EventRecorder::new()),
            };
            let outcome = net.run(&probe, &mut observer, &CancelToken::new())?;

            codec.save_png(&output, &outcome.final_state)?;
            println!(
                "Recalled image written to {} ({} pixels changed, final energy {:.3})",
                output.display(),
                probe.hamming_distance(&outcome.final_state)?,
                outcome.trajectory.last()
            );

            if let Some(path) = trajectory {
                let json = serde_json::to_string_pretty(outcome.trajectory.as_slice())?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            if let (Some(path), Some(recorder)) = (events, observer.recorder) {
                std::fs::write(&path, recorder.to_json()?)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            Ok(())
        }
    }
}
