#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::Oversample;
use crate::error::{Result, SpatialError};
use crate::spatial::Position3D;
use crate::MAX_BLOCK_SIZE;

/*
Effect Settings
===============

One value describes a whole render. It is copied into the renderer and never
mutated while a render runs.

  position            where the source sits (listener at the origin)
  reverb_amount       0.0 - 1.0  reverb length (× 3 seconds) and wet level
  room_size           0.0 - 1.0  reverb decay exponent (larger = faster falloff)
  distortion_amount   0.0 - 1.0  waveshaper drive (× 400); 0 bypasses
  surround_enabled    orbit the source around the listener
  surround_speed      revolutions per second (> 0)
  binaural_enabled    run the pseudo-HRTF ear filters

Example usage:

  // Source to the right, small room
  let settings = EffectSettings::room().with_position(Position3D::new(5.0, 0.0, 0.0));

  // Orbiting source with ear filtering
  let settings = EffectSettings::orbit(0.25).with_binaural(true);
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSettings {
    pub position: Position3D,
    pub reverb_amount: f32,
    pub room_size: f32,
    pub distortion_amount: f32,
    pub surround_enabled: bool,
    pub surround_speed: f32,
    pub binaural_enabled: bool,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            position: Position3D::ORIGIN,
            reverb_amount: 0.3,
            room_size: 0.5,
            distortion_amount: 0.0,
            surround_enabled: false,
            surround_speed: 0.5,
            binaural_enabled: false,
        }
    }
}

fn check_unit(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SpatialError::InvalidSettings(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

impl EffectSettings {
    /// Dry settings: no reverb, no effects, source at the origin.
    pub fn dry() -> Self {
        Self {
            reverb_amount: 0.0,
            ..Self::default()
        }
    }

    /// Small room (short, tight)
    pub fn room() -> Self {
        Self {
            reverb_amount: 0.2,
            room_size: 0.8,
            ..Self::default()
        }
    }

    /// Large hall (long, slow decay)
    pub fn hall() -> Self {
        Self {
            reverb_amount: 0.7,
            room_size: 0.3,
            ..Self::default()
        }
    }

    /// Source circling the listener at `speed` revolutions per second.
    pub fn orbit(speed: f32) -> Self {
        Self {
            position: Position3D::new(5.0, 0.0, 0.0),
            surround_enabled: true,
            surround_speed: speed,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: Position3D) -> Self {
        self.position = position;
        self
    }

    pub fn with_reverb(mut self, amount: f32) -> Self {
        self.reverb_amount = amount;
        self
    }

    pub fn with_room_size(mut self, size: f32) -> Self {
        self.room_size = size;
        self
    }

    pub fn with_distortion(mut self, amount: f32) -> Self {
        self.distortion_amount = amount;
        self
    }

    /// Enable the orbit at `speed` revolutions per second.
    pub fn with_surround(mut self, speed: f32) -> Self {
        self.surround_enabled = true;
        self.surround_speed = speed;
        self
    }

    pub fn with_binaural(mut self, enabled: bool) -> Self {
        self.binaural_enabled = enabled;
        self
    }

    /// Reject settings that cannot be rendered. Runs before any buffer is allocated.
    pub fn validate(&self) -> Result<()> {
        if !self.position.is_finite() {
            return Err(SpatialError::InvalidSettings(format!(
                "position must be finite, got ({}, {}, {})",
                self.position.x, self.position.y, self.position.z
            )));
        }
        if !self.surround_speed.is_finite() || self.surround_speed <= 0.0 {
            return Err(SpatialError::InvalidSettings(format!(
                "surround speed must be a positive number of revolutions per second, got {}",
                self.surround_speed
            )));
        }
        check_unit("reverb amount", self.reverb_amount)?;
        check_unit("room size", self.room_size)?;
        check_unit("distortion amount", self.distortion_amount)?;
        Ok(())
    }
}

/// Renderer configuration. Unlike [`EffectSettings`] these are not user-facing
/// sound parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Scale every impulse to a calibrated RMS level before convolving.
    pub normalize_impulses: bool,
    pub oversample: Oversample,
    /// Minimum overlap-add partition size.
    pub fft_block_size: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            normalize_impulses: true,
            oversample: Oversample::X4,
            fft_block_size: MAX_BLOCK_SIZE,
        }
    }
}
