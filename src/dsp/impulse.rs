//! Synthetic Impulse Responses
//!
//! Convolving a signal with an impulse response (IR) imprints the IR's
//! character on it. Instead of measured rooms and heads, both IRs here are
//! generated from shaped noise.
//!
//! # Reverb IR
//!
//! Stereo noise under a polynomial decay envelope:
//!
//! ```text
//! n      = i / length                     (0 → 1 across the IR)
//! left   = (1 - n)^(3 × decay) × U(-1, 1)
//! right  = (1 - n)^(3 × decay) × U(-1, 1) × U(0.5, 1)
//! ```
//!
//! Larger `decay` makes the envelope fall off faster (a drier room). The
//! extra random factor on the right channel decorrelates the two sides so the
//! tail sounds wide.
//!
//! # Ear IR (pseudo-HRTF)
//!
//! A 100 ms mono burst per ear. The right ear starts 0.3 ms later and is 20%
//! quieter, which roughly imitates interaural time and level differences.
//! This is an approximation for a sense of width, not a measured HRTF.
//!
//! Both generators draw from a caller-supplied random source, so seeding the
//! source makes a render reproducible.

use rand::Rng;

use crate::error::{zeroed, Result};
use crate::io::SampleBuffer;

/// Length of each ear impulse in seconds.
pub const EAR_IMPULSE_SECONDS: f64 = 0.1;
/// Interaural delay applied to the right ear.
pub const RIGHT_EAR_DELAY_SECONDS: f64 = 0.0003;
/// Level of the right ear relative to the left.
pub const RIGHT_EAR_GAIN: f32 = 0.8;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ear {
    Left,
    Right,
}

impl Ear {
    fn delay_seconds(self) -> f64 {
        match self {
            Ear::Left => 0.0,
            Ear::Right => RIGHT_EAR_DELAY_SECONDS,
        }
    }

    fn gain(self) -> f32 {
        match self {
            Ear::Left => 1.0,
            Ear::Right => RIGHT_EAR_GAIN,
        }
    }
}

/// The parameters an impulse was generated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpulseKind {
    Reverb { duration_secs: f32, decay: f32 },
    Ear(Ear),
}

/// An impulse buffer tagged with how it was made. Generated fresh per render.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    pub buffer: SampleBuffer,
    pub kind: ImpulseKind,
}

impl ImpulseResponse {
    pub fn frames(&self) -> usize {
        self.buffer.frames()
    }

    /// Decaying stereo noise for convolution reverb.
    ///
    /// The IR is `round(sample_rate × duration_secs)` frames long; a zero or
    /// negative duration gives an empty IR.
    pub fn reverb<R: Rng>(
        rng: &mut R,
        sample_rate: u32,
        duration_secs: f32,
        decay: f32,
    ) -> Result<Self> {
        let length = (sample_rate as f64 * duration_secs.max(0.0) as f64).round() as usize;
        let exponent = 3.0 * decay;

        let mut left = zeroed(length)?;
        let mut right = zeroed(length)?;

        for i in 0..length {
            let n = i as f32 / length as f32;
            let envelope = (1.0 - n).powf(exponent);
            left[i] = envelope * (rng.gen::<f32>() * 2.0 - 1.0);
            let spread = rng.gen::<f32>() * 0.5 + 0.5;
            right[i] = envelope * (rng.gen::<f32>() * 2.0 - 1.0) * spread;
        }

        tracing::trace!(length, duration_secs, decay, "synthesized reverb impulse");

        Ok(Self {
            buffer: SampleBuffer::stereo(left, right, sample_rate)?,
            kind: ImpulseKind::Reverb {
                duration_secs,
                decay,
            },
        })
    }

    /// 100 ms mono ear filter approximating interaural time/level difference.
    pub fn ear<R: Rng>(rng: &mut R, sample_rate: u32, ear: Ear) -> Result<Self> {
        let length = (sample_rate as f64 * EAR_IMPULSE_SECONDS).round() as usize;
        let delay_frames = (ear.delay_seconds() * sample_rate as f64).floor() as usize;
        let gain = ear.gain();

        let mut samples = zeroed(length)?;
        for (i, sample) in samples.iter_mut().enumerate().skip(delay_frames) {
            let n = i as f32 / length as f32;
            let amplitude = (1.0 - n).powi(2) * (rng.gen::<f32>() * 0.1 - 0.05);
            *sample = amplitude * gain;
        }

        tracing::trace!(length, delay_frames, ?ear, "synthesized ear impulse");

        Ok(Self {
            buffer: SampleBuffer::mono(samples, sample_rate)?,
            kind: ImpulseKind::Ear(ear),
        })
    }
}
