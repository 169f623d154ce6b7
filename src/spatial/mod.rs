//! Virtual source placement around a listener at the origin.
//!
//! Coordinates follow the listener's frame: +x is to the right, +y is up and
//! the listener faces -z.

/// Time-sampled source paths (static or circular orbit).
pub mod trajectory;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use trajectory::{Trajectory, Waypoint};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position3D {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Distance from the listener.
    pub fn distance(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance from the vertical axis, i.e. the orbit radius in the x/z plane.
    pub fn horizontal_radius(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Component-wise linear interpolation (`t = 0` is `self`, `t = 1` is `other`).
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}
