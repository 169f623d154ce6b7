//! Point-Source Panning
//!
//! Places a mono or stereo signal at a 3D position relative to a listener at
//! the origin (facing -z, +y up, +x to the right).
//!
//! # Azimuth
//!
//! Only the horizontal direction matters for left/right placement. The
//! source direction is projected onto the horizontal plane and measured
//! against the listener's right axis:
//!
//! ```text
//!                 0° (front, -z)
//!                    │
//!        -90° ───────●─────── +90°
//!       (left, -x)   │   (right, +x)
//!                    │
//!                 ±180° (behind, +z)
//! ```
//!
//! Sources behind the listener fold onto the front half (150° pans like 30°),
//! since plain equal-power panning cannot tell front from back.
//!
//! # Equal-Power Gains
//!
//! Mono source, pan position p = (az + 90) / 180 ∈ [0, 1]:
//!
//! ```text
//! left  = cos(p × π/2)
//! right = sin(p × π/2)
//! ```
//!
//! left² + right² = 1, so perceived loudness stays constant as the source
//! moves. A stereo source keeps both channels and bleeds the far channel
//! into the near side as the source moves off-centre.
//!
//! # Distance
//!
//! Inverse model with reference distance 1, max distance 10000 and rolloff 1:
//!
//! ```text
//! d    = clamp(distance, ref, max)
//! gain = ref / (ref + rolloff × (d - ref))
//! ```
//!
//! There is no directional cone (inner/outer angles are both 360°), so the
//! cone gain is always 1.

use std::f32::consts::FRAC_PI_2;

use crate::error::{zeroed, Result};
use crate::io::SampleBuffer;
use crate::spatial::{Position3D, Trajectory};

pub const REF_DISTANCE: f32 = 1.0;
pub const MAX_DISTANCE: f32 = 10_000.0;
pub const ROLLOFF_FACTOR: f32 = 1.0;

/// Panning gains for one source position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGains {
    /// Horizontal angle in degrees, folded into [-90, 90].
    pub azimuth: f32,
    pub left: f32,
    pub right: f32,
    /// Inverse-distance attenuation.
    pub distance: f32,
}

impl PanGains {
    /// Place a mono sample.
    #[inline]
    pub fn apply_mono(&self, sample: f32) -> [f32; 2] {
        let s = sample * self.distance;
        [s * self.left, s * self.right]
    }

    /// Place a stereo frame.
    #[inline]
    pub fn apply_stereo(&self, left: f32, right: f32) -> [f32; 2] {
        let (l, r) = if self.azimuth <= 0.0 {
            (left + right * self.left, right * self.right)
        } else {
            (left * self.left, right + left * self.right)
        };
        [l * self.distance, r * self.distance]
    }
}

/// Inverse-distance, cone-less point source panner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSourcePanner {
    pub ref_distance: f32,
    pub max_distance: f32,
    pub rolloff: f32,
}

impl Default for PointSourcePanner {
    fn default() -> Self {
        Self {
            ref_distance: REF_DISTANCE,
            max_distance: MAX_DISTANCE,
            rolloff: ROLLOFF_FACTOR,
        }
    }
}

/// Horizontal angle of `position` in degrees: 0 front, +90 right, -90 left, ±180 behind.
pub fn azimuth(position: &Position3D) -> f32 {
    let horizontal = position.horizontal_radius();
    if horizontal == 0.0 || !horizontal.is_finite() {
        return 0.0;
    }
    let right = (position.x / horizontal).clamp(-1.0, 1.0);
    let front = -position.z / horizontal;

    let mut az = right.acos().to_degrees();
    if front < 0.0 {
        az = 360.0 - az;
    }
    if (0.0..=270.0).contains(&az) {
        90.0 - az
    } else {
        450.0 - az
    }
}

impl PointSourcePanner {
    pub fn distance_gain(&self, distance: f32) -> f32 {
        if self.ref_distance <= 0.0 {
            return 0.0;
        }
        let d = if distance.is_nan() {
            self.ref_distance
        } else {
            distance.clamp(self.ref_distance, self.max_distance.max(self.ref_distance))
        };
        self.ref_distance / (self.ref_distance + self.rolloff * (d - self.ref_distance))
    }

    /// Gains for a source at `position`. `mono` selects the mono or stereo law.
    pub fn gains(&self, position: &Position3D, mono: bool) -> PanGains {
        let mut az = azimuth(position).clamp(-180.0, 180.0);
        if az < -90.0 {
            az = -180.0 - az;
        } else if az > 90.0 {
            az = 180.0 - az;
        }

        let pan = if mono {
            (az + 90.0) / 180.0
        } else if az <= 0.0 {
            (az + 90.0) / 90.0
        } else {
            az / 90.0
        };

        PanGains {
            azimuth: az,
            left: (pan * FRAC_PI_2).cos(),
            right: (pan * FRAC_PI_2).sin(),
            distance: self.distance_gain(position.distance()),
        }
    }

    /// Pan a whole buffer along `trajectory`, producing a stereo pair.
    ///
    /// Static paths compute gains once; moving paths recompute per frame with
    /// the position ramped between waypoints.
    pub fn process(&self, input: &SampleBuffer, trajectory: &Trajectory) -> Result<[Vec<f32>; 2]> {
        let mono = input.channel_count() == 1;

        let frames = input.frames();
        let mut left = zeroed(frames)?;
        let mut right = zeroed(frames)?;
        let sample_rate = input.sample_rate() as f64;

        let fixed = if trajectory.is_static() {
            Some(self.gains(&trajectory.position_at(0.0), mono))
        } else {
            None
        };

        for i in 0..frames {
            let gains = match fixed {
                Some(g) => g,
                None => self.gains(&trajectory.position_at(i as f64 / sample_rate), mono),
            };
            let [l, r] = if mono {
                gains.apply_mono(input.channel(0)[i])
            } else {
                gains.apply_stereo(input.channel(0)[i], input.channel(1)[i])
            };
            left[i] = l;
            right[i] = r;
        }

        Ok([left, right])
    }
}
