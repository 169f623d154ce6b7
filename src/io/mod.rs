// Purpose - buffers handed between stages, PCM container output

pub mod pcm;

use crate::error::{Result, SpatialError};

/// Mono or stereo; the pipeline never carries more channels than this.
pub const MAX_CHANNELS: usize = 2;

/// Planar multi-channel audio: one `Vec<f32>` per channel, all the same length.
///
/// Produced once by a stage and then only read; the next stage allocates its
/// own output rather than writing into its input.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap decoded channels. Rejects zero sample rates, ragged channels and
    /// anything other than one or two channels.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SpatialError::InvalidBuffer("sample rate must be positive".into()));
        }
        if !(1..=MAX_CHANNELS).contains(&channels.len()) {
            return Err(SpatialError::InvalidBuffer(format!(
                "expected a mono or stereo buffer, got {} channels",
                channels.len()
            )));
        }
        let frames = channels[0].len();
        if let Some(bad) = channels.iter().position(|c| c.len() != frames) {
            return Err(SpatialError::InvalidBuffer(format!(
                "channel {bad} has {} frames, expected {frames}",
                channels[bad].len()
            )));
        }
        Ok(Self { channels, sample_rate })
    }

    /// Single-channel buffer.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    pub fn stereo(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![left, right], sample_rate)
    }

    /// Silent buffer of the given shape.
    pub fn silence(channel_count: usize, frames: usize, sample_rate: u32) -> Result<Self> {
        if !(1..=MAX_CHANNELS).contains(&channel_count) {
            return Err(SpatialError::InvalidBuffer(format!(
                "expected a mono or stereo buffer, got {channel_count} channels"
            )));
        }
        let channels = (0..channel_count)
            .map(|_| crate::error::zeroed(frames))
            .collect::<Result<Vec<_>>>()?;
        Self::new(channels, sample_rate)
    }

    /// Split interleaved samples (frame-major) into planar channels.
    pub fn from_interleaved(samples: &[f32], channel_count: usize, sample_rate: u32) -> Result<Self> {
        if !(1..=MAX_CHANNELS).contains(&channel_count) {
            return Err(SpatialError::InvalidBuffer(format!(
                "expected a mono or stereo buffer, got {channel_count} channels"
            )));
        }
        if samples.len() % channel_count != 0 {
            return Err(SpatialError::InvalidBuffer(format!(
                "{} interleaved samples do not divide into {channel_count} channels",
                samples.len()
            )));
        }
        let frames = samples.len() / channel_count;
        let mut channels = Vec::with_capacity(channel_count);
        for c in 0..channel_count {
            let mut channel = crate::error::zeroed(frames)?;
            for (i, sample) in channel.iter_mut().enumerate() {
                *sample = samples[i * channel_count + c];
            }
            channels.push(channel);
        }
        Self::new(channels, sample_rate)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Duration in seconds (`frames / sample_rate`).
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Frame-major copy: frame 0 ch0, frame 0 ch1, frame 1 ch0, ...
    pub fn interleaved(&self) -> Vec<f32> {
        let channel_count = self.channel_count();
        let mut out = Vec::with_capacity(self.frames() * channel_count);
        for i in 0..self.frames() {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }
}
