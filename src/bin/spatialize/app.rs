//! Spatialize - load, render on a worker thread, encode, write

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::RingBuffer;

use saavy_spatial::{
    EffectSettings, PcmEncoder, Position3D, RenderOptions, RenderStage, SampleBuffer,
    SpatialRenderer,
};

use super::Cli;

/// Room for every stage transition of one render.
const PROGRESS_CAPACITY: usize = 16;

pub struct Spatialize {
    input: PathBuf,
    output: PathBuf,
    settings: EffectSettings,
    options: RenderOptions,
    seed: Option<u64>,
    save_settings: Option<PathBuf>,
}

impl Spatialize {
    /// Resolve settings: defaults, then the TOML file, then individual flags.
    pub fn from_cli(cli: &Cli) -> EyreResult<Self> {
        let mut settings = match &cli.settings {
            Some(path) => load_settings(path)?,
            None => EffectSettings::default(),
        };

        let position = settings.position;
        settings.position = Position3D::new(
            cli.x.unwrap_or(position.x),
            cli.y.unwrap_or(position.y),
            cli.z.unwrap_or(position.z),
        );
        if let Some(reverb) = cli.reverb {
            settings.reverb_amount = reverb;
        }
        if let Some(room_size) = cli.room_size {
            settings.room_size = room_size;
        }
        if let Some(distortion) = cli.distortion {
            settings.distortion_amount = distortion;
        }
        if let Some(speed) = cli.surround {
            settings = settings.with_surround(speed);
        }
        if cli.binaural {
            settings.binaural_enabled = true;
        }

        let options = RenderOptions {
            normalize_impulses: !cli.no_normalize,
            oversample: cli.oversample.into(),
            ..RenderOptions::default()
        };

        Ok(Self {
            input: cli.input.clone(),
            output: cli.output.clone(),
            settings,
            options,
            seed: cli.seed,
            save_settings: cli.save_settings.clone(),
        })
    }

    pub fn run(self) -> EyreResult<()> {
        self.settings.validate().wrap_err("refusing to render")?;

        let input = read_wav(&self.input)?;
        tracing::info!(
            path = %self.input.display(),
            frames = input.frames(),
            channels = input.channel_count(),
            sample_rate = input.sample_rate(),
            "loaded input"
        );

        let renderer = match self.seed {
            Some(seed) => SpatialRenderer::seeded(seed),
            None => SpatialRenderer::new(),
        };

        // Render off the main thread; stage updates come back over the ring.
        let (producer, mut consumer) = RingBuffer::<RenderStage>::new(PROGRESS_CAPACITY);
        let settings = self.settings;
        let options = self.options;
        let worker = thread::spawn(move || {
            renderer
                .options(options)
                .progress(producer)
                .render(&input, &settings)
        });

        loop {
            while let Ok(stage) = consumer.pop() {
                tracing::info!(stage = stage.label(), "render");
            }
            if worker.is_finished() {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        while let Ok(stage) = consumer.pop() {
            tracing::info!(stage = stage.label(), "render");
        }

        let result = worker
            .join()
            .map_err(|_| eyre!("render thread panicked"))?
            .wrap_err("render failed")?;

        let bytes = PcmEncoder::encode(&result.buffer).wrap_err("failed to encode output")?;
        std::fs::write(&self.output, &bytes)
            .wrap_err_with(|| format!("failed to write {}", self.output.display()))?;
        tracing::info!(path = %self.output.display(), bytes = bytes.len(), "wrote output");

        if let Some(path) = &self.save_settings {
            let text = toml::to_string_pretty(&result.settings)
                .wrap_err("failed to serialize settings")?;
            std::fs::write(path, text)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        }

        Ok(())
    }
}

fn load_settings(path: &Path) -> EyreResult<EffectSettings> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read settings from {}", path.display()))?;
    toml::from_str(&text).wrap_err_with(|| format!("invalid settings file {}", path.display()))
}

/// Decode a WAV file to floating point with hound.
fn read_wav(path: &Path) -> EyreResult<SampleBuffer> {
    let mut reader = hound::WavReader::open(path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .wrap_err("failed to decode float samples")?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .wrap_err("failed to decode integer samples")?
        }
    };

    Ok(SampleBuffer::from_interleaved(
        &samples,
        spec.channels as usize,
        spec.sample_rate,
    )?)
}
