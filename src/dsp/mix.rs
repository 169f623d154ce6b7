//! Dry/wet gain mixing.

/*
Dry/Wet Mixing
==============

The renderer keeps two versions of the positioned signal:

  dry   the signal as it leaves the panner (or binaural stage)
  wet   the same signal convolved with the reverb impulse

and blends them with weights derived from the single reverb control r:

    dry_gain = 1 - r × 0.5
    wet_gain = r × 0.5

    output = dry × dry_gain + wet × wet_gain

The weights always sum to 1.0, so r = 1.0 is an even 50/50 blend, never
fully wet. A linear crossfade rather than equal-power: the loudness dip in
the middle is small at these ratios and the wet path is already
level-calibrated by impulse normalization.

    r      dry    wet
    0.0    1.00   0.00
    0.3    0.85   0.15
    1.0    0.50   0.50


Clipping Risk
-------------

Even with weights summing to 1.0, the wet signal itself can exceed ±1.0
(convolution sums many products). Nothing here clamps: clamping happens
exactly once, when samples are quantized for the PCM container.
*/

/// Weights for blending dry and wet signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DryWetGains {
    pub dry: f32,
    pub wet: f32,
}

impl DryWetGains {
    /// Gains for a reverb amount in [0, 1].
    pub fn from_reverb(amount: f32) -> Self {
        let wet = amount.clamp(0.0, 1.0) * 0.5;
        Self { dry: 1.0 - wet, wet }
    }

    #[inline]
    pub fn blend(&self, dry: f32, wet: f32) -> f32 {
        dry * self.dry + wet * self.wet
    }
}

/// Blend `dry` into `wet` in place: `wet[i] = dry[i] × gains.dry + wet[i] × gains.wet`.
#[inline]
pub fn apply_dry_wet(dry: &[f32], wet: &mut [f32], gains: DryWetGains) {
    debug_assert_eq!(dry.len(), wet.len());

    for (w, &d) in wet.iter_mut().zip(dry.iter()) {
        *w = gains.blend(d, *w);
    }
}

/// Scale a buffer in place.
#[inline]
pub fn apply_gain(buffer: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gains_from_reverb() {
        assert_eq!(DryWetGains::from_reverb(0.0), DryWetGains { dry: 1.0, wet: 0.0 });
        assert_eq!(DryWetGains::from_reverb(1.0), DryWetGains { dry: 0.5, wet: 0.5 });
        let g = DryWetGains::from_reverb(0.3);
        assert!((g.dry - 0.85).abs() < 1e-6);
        assert!((g.wet - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for r in [0.0, 0.1, 0.5, 0.77, 1.0] {
            let g = DryWetGains::from_reverb(r);
            assert!((g.dry + g.wet - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_apply_dry_wet_all_dry() {
        let dry = [1.0, 0.5, -0.5, -1.0];
        let mut wet = [0.3, 0.3, 0.3, 0.3];

        apply_dry_wet(&dry, &mut wet, DryWetGains::from_reverb(0.0));

        assert_eq!(wet, [1.0, 0.5, -0.5, -1.0]);
    }

    #[test]
    fn test_apply_dry_wet_half() {
        let dry = [1.0, 1.0, 1.0, 1.0];
        let mut wet = [0.0, 0.0, 0.0, 0.0];

        apply_dry_wet(&dry, &mut wet, DryWetGains::from_reverb(1.0));

        assert_eq!(wet, [0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_mix_can_exceed_one() {
        let dry = [1.0];
        let mut wet = [3.0];

        apply_dry_wet(&dry, &mut wet, DryWetGains::from_reverb(1.0));

        assert_eq!(wet[0], 2.0); // not clamped here
    }

    #[test]
    fn test_apply_gain() {
        let mut buffer = [1.0, -2.0];
        apply_gain(&mut buffer, 0.5);
        assert_eq!(buffer, [0.5, -1.0]);
    }
}
