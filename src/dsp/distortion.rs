//! Distortion / Waveshaping
//!
//! A waveshaper pushes every sample through a fixed transfer curve stored as
//! a lookup table. Curves that bend away from the identity line add
//! harmonics; the more they bend, the harsher the result.
//!
//! # The Curve
//!
//! The table holds 44100 entries spanning x ∈ [-1, 1):
//!
//! ```text
//! x        = 2i / 44100 - 1
//! curve[i] = (3 + k) × x × 20° / (π + k × |x|)        20° = π/9 rad
//! ```
//!
//! `k` is the drive ("amount"). At k = 0 the curve is a gentle straight line
//! with slope 3·(π/9)/π = 1/3. As k grows the denominator starts to dominate
//! for large |x|, so the ends flatten out toward ±(π/9) while the middle gets
//! steeper: classic soft saturation.
//!
//! # Table Lookup
//!
//! An input sample in [-1, 1] maps onto the table index range:
//!
//! ```text
//! v = (len - 1) / 2 × (x + 1)
//! ```
//!
//! and the output is interpolated linearly between the two neighbouring
//! entries. Inputs outside [-1, 1] stick to the first/last entry.
//!
//! # Oversampling
//!
//! Nonlinear shaping creates harmonics above Nyquist that fold back as
//! aliasing. Shaping at 2× or 4× the rate (linear upsample, shape every
//! sub-sample, average back down) keeps most of that folding out of the
//! audible band. This is a cheap stand-in for a polyphase resampler.
//!
//! The sub-samples interpolate from the previous input sample (0 before the
//! first) to the current one, and averaging them acts as a short low-pass.
//! Compared with `Oversample::None` the output is slightly smoothed and lags
//! by roughly half a sample, so the two modes are not sample-aligned.

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of entries in a distortion table.
pub const CURVE_LEN: usize = 44_100;

/// Build the transfer table for drive `amount` (the caller pre-scales, e.g.
/// `distortion × 400`).
pub fn build_curve(amount: f32) -> Vec<f32> {
    let k = amount as f64;
    let deg20 = PI / 9.0;
    (0..CURVE_LEN)
        .map(|i| {
            let x = (i as f64 * 2.0) / CURVE_LEN as f64 - 1.0;
            ((3.0 + k) * x * deg20 / (PI + k * x.abs())) as f32
        })
        .collect()
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Oversample {
    None,
    X2,
    #[default]
    X4,
}

impl Oversample {
    pub fn factor(self) -> usize {
        match self {
            Oversample::None => 1,
            Oversample::X2 => 2,
            Oversample::X4 => 4,
        }
    }
}

/// Table-lookup waveshaper.
pub struct WaveShaper {
    curve: Vec<f32>,
    oversample: Oversample,
}

impl WaveShaper {
    pub fn new(curve: Vec<f32>, oversample: Oversample) -> Self {
        Self { curve, oversample }
    }

    /// Shaper for the distortion control in [0, 1].
    pub fn from_amount(distortion: f32, oversample: Oversample) -> Self {
        Self::new(build_curve(distortion * 400.0), oversample)
    }

    pub fn curve(&self) -> &[f32] {
        &self.curve
    }

    /// Map one sample through the curve.
    #[inline]
    pub fn shape(&self, input: f32) -> f32 {
        let len = self.curve.len();
        match len {
            0 => return input,
            1 => return self.curve[0],
            _ => {}
        }
        if input.is_nan() {
            return input;
        }

        let v = (len - 1) as f32 * 0.5 * (input + 1.0);
        if v <= 0.0 {
            return self.curve[0];
        }
        if v >= (len - 1) as f32 {
            return self.curve[len - 1];
        }

        let k = v as usize;
        let frac = v - k as f32;
        let a = self.curve[k];
        let b = self.curve[(k + 1).min(len - 1)];
        a + (b - a) * frac
    }

    /// Shape a whole channel in place.
    pub fn process(&self, buffer: &mut [f32]) {
        let factor = self.oversample.factor();
        if factor == 1 {
            for sample in buffer.iter_mut() {
                *sample = self.shape(*sample);
            }
            return;
        }

        let step = 1.0 / factor as f32;
        let mut previous = 0.0f32;
        for sample in buffer.iter_mut() {
            let current = *sample;
            let mut acc = 0.0;
            for k in 1..=factor {
                let sub = previous + (current - previous) * (k as f32 * step);
                acc += self.shape(sub);
            }
            previous = current;
            *sample = acc * step;
        }
    }
}
