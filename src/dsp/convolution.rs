use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{zeroed, Result};

/*
Convolution
===========

Convolution slides an impulse response (IR) across a signal and sums the
overlapping products:

    y[n] = Σ x[n - k] × h[k]        k = 0 .. ir_len - 1

Done directly this costs signal_len × ir_len multiplies. A 3-second reverb
IR at 44.1 kHz has 132 300 taps, so a minute of audio would need ~3.5e11
operations. Instead we work in the frequency domain, where convolution is a
pointwise multiply.


Overlap-Add
-----------

The signal is cut into blocks of B samples. Each block is zero-padded to an
FFT size N ≥ B + ir_len - 1 (so the circular convolution does not wrap),
transformed, multiplied by the IR spectrum, transformed back, and added into
the output at the block's offset:

    block 0:  [x0 x1 .. xB-1 | 0 0 0 .. 0]  ─FFT─ × H ─IFFT─  y0 ..............
    block 1:                [xB .. x2B-1 | 0 0 .. 0]  ─FFT─ × H ─IFFT─  y1 ....
                            ↑ tails overlap and are summed

B is at least the IR length rounded up to a power of two, so N = 2B and
each FFT does useful work for half its length.


Truncation
----------

The full result is signal_len + ir_len - 1 samples long. The renderer keeps
only the first signal_len samples: the reverb tail is cut at the end of the
input.


Normalization
-------------

Raw noise IRs carry far more energy than the dry signal. Before convolving,
an IR can be scaled by its RMS power so the wet level roughly matches the
dry level:

    power = sqrt(Σ h² / (channels × length))      floored at 0.000125
    scale = 0.00125 / power × 44100 / sample_rate
*/

/// IRs at or below this length are convolved directly.
const DIRECT_MAX_TAPS: usize = 64;
/// Gain calibration used by impulse normalization.
const GAIN_CALIBRATION: f32 = 0.00125;
const GAIN_CALIBRATION_SAMPLE_RATE: f32 = 44_100.0;
const MIN_POWER: f32 = 0.000125;

/// Time-domain reference convolution, truncated to `signal.len()`.
pub fn convolve_direct(signal: &[f32], ir: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0; signal.len()];
    direct_into(signal, ir, &mut out);
    out
}

fn direct_into(signal: &[f32], ir: &[f32], out: &mut [f32]) {
    for (n, y) in out.iter_mut().enumerate() {
        let taps = ir.len().min(n + 1);
        let mut acc = 0.0;
        for k in 0..taps {
            acc += signal[n - k] * ir[k];
        }
        *y = acc;
    }
}

/// Scale factor that brings an IR to a calibrated RMS level.
pub fn normalization_scale(channels: &[&[f32]], sample_rate: u32) -> f32 {
    let length = channels.first().map_or(0, |c| c.len());
    let count = channels.len() * length;
    if count == 0 {
        return 1.0;
    }

    let energy: f32 = channels
        .iter()
        .flat_map(|c| c.iter())
        .map(|s| s * s)
        .sum();
    let mut power = (energy / count as f32).sqrt();
    if !power.is_finite() || power < MIN_POWER {
        power = MIN_POWER;
    }

    let mut scale = GAIN_CALIBRATION / power;
    if sample_rate > 0 {
        scale *= GAIN_CALIBRATION_SAMPLE_RATE / sample_rate as f32;
    }
    scale
}

/// FFT overlap-add convolver with a precomputed IR spectrum.
pub struct Convolver {
    ir_len: usize,
    block_size: usize,
    fft_size: usize,
    ir_spectrum: Vec<Complex<f32>>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl Convolver {
    /// Plan FFTs for `ir`, cutting the signal into blocks of at least `min_block` samples.
    pub fn new(ir: &[f32], min_block: usize) -> Self {
        let block_size = min_block.max(ir.len()).max(1).next_power_of_two();
        let fft_size = block_size * 2;

        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        let mut ir_spectrum = vec![Complex::new(0.0, 0.0); fft_size];
        for (bin, &h) in ir_spectrum.iter_mut().zip(ir) {
            bin.re = h;
        }
        forward.process(&mut ir_spectrum);

        Self {
            ir_len: ir.len(),
            block_size,
            fft_size,
            ir_spectrum,
            forward,
            inverse,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Convolve `signal` with the IR, keeping only the first `signal.len()` samples.
    pub fn process(&self, signal: &[f32]) -> Result<Vec<f32>> {
        let mut out = zeroed(signal.len())?;
        if self.ir_len == 0 || signal.is_empty() {
            return Ok(out);
        }

        let norm = 1.0 / self.fft_size as f32;
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft_size];

        for (block_index, block) in signal.chunks(self.block_size).enumerate() {
            let offset = block_index * self.block_size;

            for (slot, &x) in scratch.iter_mut().zip(block) {
                *slot = Complex::new(x, 0.0);
            }
            for slot in scratch[block.len()..].iter_mut() {
                *slot = Complex::new(0.0, 0.0);
            }

            self.forward.process(&mut scratch);
            for (bin, h) in scratch.iter_mut().zip(&self.ir_spectrum) {
                *bin = *bin * *h;
            }
            self.inverse.process(&mut scratch);

            let valid = (block.len() + self.ir_len - 1).min(out.len() - offset);
            for (y, bin) in out[offset..offset + valid].iter_mut().zip(&scratch) {
                *y += bin.re * norm;
            }
        }

        tracing::trace!(
            frames = signal.len(),
            ir_len = self.ir_len,
            fft_size = self.fft_size,
            "convolved"
        );
        Ok(out)
    }
}

/// Convolve `signal` with `ir`, truncated to the signal length.
///
/// Short IRs use the direct form; longer ones go through [`Convolver`].
pub fn convolve(signal: &[f32], ir: &[f32], min_block: usize) -> Result<Vec<f32>> {
    if ir.len() <= DIRECT_MAX_TAPS {
        let mut out = zeroed(signal.len())?;
        direct_into(signal, ir, &mut out);
        return Ok(out);
    }
    Convolver::new(ir, min_block).process(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signal(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| ((i as f32 * 0.37).sin() + (i as f32 * 0.011).cos()) * 0.4)
            .collect()
    }

    fn test_ir(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (1.0 - i as f32 / len as f32).powi(2) * ((i * 7919 % 13) as f32 / 6.0 - 1.0))
            .collect()
    }

    #[test]
    fn test_direct_identity() {
        let signal = test_signal(32);
        assert_eq!(convolve_direct(&signal, &[1.0]), signal);
    }

    #[test]
    fn test_direct_delay() {
        let signal = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(convolve_direct(&signal, &[0.0, 0.0, 1.0]), vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_fft_matches_direct() {
        let signal = test_signal(5_000);
        let ir = test_ir(700);
        let expected = convolve_direct(&signal, &ir);

        let actual = Convolver::new(&ir, 256).process(&signal).unwrap();
        assert_eq!(actual.len(), signal.len());
        for (a, e) in actual.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-3, "fft {a} vs direct {e}");
        }
    }

    #[test]
    fn test_ir_longer_than_signal() {
        let signal = test_signal(100);
        let ir = test_ir(1_000);
        let expected = convolve_direct(&signal, &ir);
        let actual = convolve(&signal, &ir, 64).unwrap();
        for (a, e) in actual.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-3);
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert!(convolve(&[], &test_ir(300), 64).unwrap().is_empty());
        assert_eq!(Convolver::new(&[], 64).process(&[1.0, 2.0]).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_zero_signal_stays_zero() {
        let out = convolve(&vec![0.0; 4_096], &test_ir(500), 512).unwrap();
        assert!(out.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn test_block_size_covers_ir() {
        let conv = Convolver::new(&test_ir(3_000), 2_048);
        assert_eq!(conv.block_size(), 4_096);
    }

    #[test]
    fn test_normalization_scale() {
        // constant 0.5 => power 0.5
        let ir = vec![0.5f32; 100];
        let scale = normalization_scale(&[&ir, &ir], 44_100);
        assert!((scale - 0.0025).abs() < 1e-7);

        // sample-rate compensation
        let scale_48k = normalization_scale(&[&ir], 48_000);
        assert!((scale_48k - 0.0025 * 44_100.0 / 48_000.0).abs() < 1e-7);

        // silent IR hits the power floor
        let silent = vec![0.0f32; 10];
        assert!((normalization_scale(&[&silent], 44_100) - 10.0).abs() < 1e-4);
    }
}
