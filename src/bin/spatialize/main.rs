//! spatialize - render a WAV file through the 3D spatialization pipeline
//!
//! Run with: cargo run --bin spatialize -- input.wav -o output.wav --x 5 --reverb 0.4

mod app;

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::Level;

use app::Spatialize;
use saavy_spatial::dsp::Oversample;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OversampleArg {
    None,
    X2,
    X4,
}

impl From<OversampleArg> for Oversample {
    fn from(arg: OversampleArg) -> Self {
        match arg {
            OversampleArg::None => Oversample::None,
            OversampleArg::X2 => Oversample::X2,
            OversampleArg::X4 => Oversample::X4,
        }
    }
}

/// Place a recording in 3D space: panning, orbit, reverb, ear filtering, distortion.
#[derive(Debug, Parser)]
#[command(name = "spatialize", version)]
pub struct Cli {
    /// Input WAV file (mono or stereo)
    input: PathBuf,

    /// Output WAV file (16-bit stereo PCM)
    #[arg(short, long)]
    output: PathBuf,

    /// TOML file with effect settings; flags below override its fields
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Source position, left (-) / right (+)
    #[arg(long, allow_negative_numbers = true)]
    x: Option<f32>,

    /// Source position, down (-) / up (+)
    #[arg(long, allow_negative_numbers = true)]
    y: Option<f32>,

    /// Source position, front (-) / behind (+)
    #[arg(long, allow_negative_numbers = true)]
    z: Option<f32>,

    /// Reverb amount, 0.0 - 1.0
    #[arg(long)]
    reverb: Option<f32>,

    /// Room size (reverb decay), 0.0 - 1.0
    #[arg(long)]
    room_size: Option<f32>,

    /// Distortion amount, 0.0 - 1.0
    #[arg(long)]
    distortion: Option<f32>,

    /// Orbit the source at SPEED revolutions per second
    #[arg(long, value_name = "SPEED", allow_negative_numbers = true)]
    surround: Option<f32>,

    /// Apply the pseudo-binaural ear filters
    #[arg(long)]
    binaural: bool,

    /// Seed for impulse synthesis (reproducible renders)
    #[arg(long)]
    seed: Option<u64>,

    /// Convolve with raw (unnormalized) impulses
    #[arg(long)]
    no_normalize: bool,

    /// Waveshaper oversampling
    #[arg(long, value_enum, default_value = "x4")]
    oversample: OversampleArg,

    /// Write the settings used for the render to this TOML file
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    Spatialize::from_cli(&cli)?.run()
}
