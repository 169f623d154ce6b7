use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dsp::convolution::{convolve, normalization_scale};
use crate::dsp::mix::{apply_dry_wet, apply_gain};
use crate::dsp::{DryWetGains, Ear, ImpulseResponse, PointSourcePanner, WaveShaper};
use crate::error::{Result, SpatialError};
use crate::io::pcm::PcmEncoder;
use crate::io::SampleBuffer;
use crate::render::progress::{CancelToken, ProgressSink, RenderStage};
use crate::render::settings::{EffectSettings, RenderOptions};
use crate::spatial::Trajectory;

/// Output of one render: the stereo buffer plus the settings that made it.
///
/// The buffer is not clamped; [`PcmEncoder`] clamps while quantizing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub buffer: SampleBuffer,
    pub settings: EffectSettings,
}

impl RenderResult {
    /// Encode the rendered buffer as a 16-bit WAVE file.
    pub fn encode(&self) -> Result<Vec<u8>> {
        PcmEncoder::encode(&self.buffer)
    }
}

/// Offline spatializer. Owns the random source used for impulse synthesis.
///
/// One renderer can be reused for many renders; every call synthesizes its
/// own impulses and trajectory and shares nothing with other calls.
pub struct SpatialRenderer<R = StdRng> {
    rng: R,
    options: RenderOptions,
    panner: PointSourcePanner,
    cancel: Option<CancelToken>,
    progress: Option<Box<dyn ProgressSink>>,
}

impl SpatialRenderer<StdRng> {
    /// Renderer seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Renderer whose impulses are reproducible for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SpatialRenderer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SpatialRenderer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            options: RenderOptions::default(),
            panner: PointSourcePanner::default(),
            cancel: None,
            progress: None,
        }
    }

    pub fn options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Report stage transitions to `sink` (e.g. an `rtrb::Producer<RenderStage>`).
    pub fn progress<P: ProgressSink + 'static>(mut self, sink: P) -> Self {
        self.progress = Some(Box::new(sink));
        self
    }

    /// Run the full pipeline on `input`.
    ///
    /// Settings are validated before anything is allocated. An empty input
    /// yields an empty stereo result. Output length and sample rate match the
    /// input; the channel count is always 2.
    pub fn render(&mut self, input: &SampleBuffer, settings: &EffectSettings) -> Result<RenderResult> {
        settings.validate()?;

        let sample_rate = input.sample_rate();
        if input.is_empty() {
            tracing::debug!(sample_rate, "empty input, returning empty render");
            return Ok(RenderResult {
                buffer: SampleBuffer::silence(2, 0, sample_rate)?,
                settings: *settings,
            });
        }

        let non_finite = input
            .channels()
            .iter()
            .flat_map(|c| c.iter())
            .filter(|s| !s.is_finite())
            .count();
        if non_finite > 0 {
            tracing::warn!(non_finite, "input contains non-finite samples");
        }

        tracing::debug!(
            frames = input.frames(),
            channels = input.channel_count(),
            sample_rate,
            ?settings,
            "rendering"
        );

        self.stage(RenderStage::Trajectory)?;
        let trajectory = Trajectory::compute(
            settings.position,
            settings.surround_enabled,
            settings.surround_speed,
            input.duration(),
        );
        tracing::debug!(waypoints = trajectory.len(), "trajectory computed");

        self.stage(RenderStage::Panning)?;
        let mut feed = self.panner.process(input, &trajectory)?;

        if settings.binaural_enabled {
            self.stage(RenderStage::Binaural)?;
            feed = self.binaural(&feed, sample_rate)?;
        }

        let [mut left, mut right] = if settings.reverb_amount > 0.0 {
            self.stage(RenderStage::Reverb)?;
            let mut wet = self.reverb(&feed, settings, sample_rate)?;

            self.stage(RenderStage::Mix)?;
            let gains = DryWetGains::from_reverb(settings.reverb_amount);
            tracing::debug!(dry = gains.dry, wet = gains.wet, "mixing");
            for (dry, wet) in feed.iter().zip(wet.iter_mut()) {
                apply_dry_wet(dry, wet, gains);
            }
            wet
        } else {
            feed
        };

        if settings.distortion_amount > 0.0 {
            self.stage(RenderStage::Distortion)?;
            let shaper = WaveShaper::from_amount(settings.distortion_amount, self.options.oversample);
            shaper.process(&mut left);
            shaper.process(&mut right);
        }

        self.stage(RenderStage::Done)?;
        Ok(RenderResult {
            buffer: SampleBuffer::stereo(left, right, sample_rate)?,
            settings: *settings,
        })
    }

    /// Split the panned pair, filter each side with its ear impulse, merge.
    fn binaural(&mut self, panned: &[Vec<f32>; 2], sample_rate: u32) -> Result<[Vec<f32>; 2]> {
        let left_ir = ImpulseResponse::ear(&mut self.rng, sample_rate, Ear::Left)?;
        let right_ir = ImpulseResponse::ear(&mut self.rng, sample_rate, Ear::Right)?;
        tracing::debug!(ir_frames = left_ir.frames(), "ear impulses synthesized");

        let left = self.convolve_impulse(&panned[0], &left_ir, 0)?;
        self.check_cancelled()?;
        let right = self.convolve_impulse(&panned[1], &right_ir, 0)?;
        self.check_cancelled()?;
        Ok([left, right])
    }

    /// Wet path: each feed channel convolved with the matching reverb IR channel.
    fn reverb(
        &mut self,
        feed: &[Vec<f32>; 2],
        settings: &EffectSettings,
        sample_rate: u32,
    ) -> Result<[Vec<f32>; 2]> {
        let ir = ImpulseResponse::reverb(
            &mut self.rng,
            sample_rate,
            settings.reverb_amount * 3.0,
            settings.room_size,
        )?;
        tracing::debug!(ir_frames = ir.frames(), decay = settings.room_size, "reverb impulse synthesized");

        let left = self.convolve_impulse(&feed[0], &ir, 0)?;
        self.check_cancelled()?;
        let right = self.convolve_impulse(&feed[1], &ir, 1)?;
        self.check_cancelled()?;
        Ok([left, right])
    }

    fn convolve_impulse(&self, signal: &[f32], ir: &ImpulseResponse, channel: usize) -> Result<Vec<f32>> {
        let mut out = convolve(signal, ir.buffer.channel(channel), self.options.fft_block_size)?;
        if self.options.normalize_impulses {
            let channels: Vec<&[f32]> = ir.buffer.channels().iter().map(Vec::as_slice).collect();
            apply_gain(&mut out, normalization_scale(&channels, ir.buffer.sample_rate()));
        }
        Ok(out)
    }

    fn report(&mut self, stage: RenderStage) {
        tracing::trace!(stage = stage.label(), "stage");
        if let Some(sink) = self.progress.as_mut() {
            sink.report(stage);
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(SpatialError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Check for cancellation, then announce the next stage.
    fn stage(&mut self, stage: RenderStage) -> Result<()> {
        self.check_cancelled()?;
        self.report(stage);
        Ok(())
    }
}
