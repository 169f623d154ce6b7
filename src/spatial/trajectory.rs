use std::f64::consts::TAU;

use super::Position3D;

/*
Orbit Trajectory
================

A surround render moves the source around the listener on a horizontal circle:

            -z (front)
               │
          ╭────┼────╮
         ╱     │     ╲
   -x ──┼──────●──────┼── +x      ● = listener
         ╲     │     ╱
          ╰────┼────╯
               │
            +z (behind)

  radius      sqrt(x² + z²) of the configured position, or 5 when the source
              sits on the vertical axis (radius 0)
  start       atan2(z, x), 0 when undefined
  sweep       duration × revolutions-per-second × 2π
  height      y never changes

The path is sampled at 101 evenly spaced waypoints (t = 0, 0.01, … 1.0) so
both ends of the render are exact. Between waypoints the position ramps
linearly, so the source glides instead of jumping.
*/

/// Orbit radius used when the configured position has no horizontal extent.
pub const FALLBACK_RADIUS: f32 = 5.0;
/// Number of segments the orbit is divided into (101 waypoints).
pub const ORBIT_STEPS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Seconds from the start of the render.
    pub time: f64,
    pub position: Position3D,
}

/// Source position over time, consumed once by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    waypoints: Vec<Waypoint>,
}

impl Trajectory {
    /// A source that never moves.
    pub fn fixed(position: Position3D) -> Self {
        Self {
            waypoints: vec![Waypoint {
                time: 0.0,
                position,
            }],
        }
    }

    /// Compute the path for one render.
    ///
    /// Without surround this is a single waypoint at the configured position;
    /// with surround it is a constant-rate orbit spanning `[0, duration]`.
    pub fn compute(
        position: Position3D,
        surround_enabled: bool,
        surround_speed: f32,
        duration: f64,
    ) -> Self {
        if !surround_enabled {
            return Self::fixed(position);
        }

        let mut radius = position.horizontal_radius();
        if radius == 0.0 || !radius.is_finite() {
            radius = FALLBACK_RADIUS;
        }

        let mut start_angle = (position.z as f64).atan2(position.x as f64);
        if start_angle.is_nan() {
            start_angle = 0.0;
        }

        let total_angle = duration * surround_speed as f64 * TAU;

        let waypoints = (0..=ORBIT_STEPS)
            .map(|i| {
                let t = i as f64 / ORBIT_STEPS as f64;
                let angle = start_angle + t * total_angle;
                Waypoint {
                    time: t * duration,
                    position: Position3D::new(
                        (radius as f64 * angle.cos()) as f32,
                        position.y,
                        (radius as f64 * angle.sin()) as f32,
                    ),
                }
            })
            .collect();

        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// True when the source stays put for the whole render.
    pub fn is_static(&self) -> bool {
        self.waypoints.len() <= 1
    }

    /// Position at `time`, ramping linearly between neighbouring waypoints.
    ///
    /// Before the first waypoint the first position holds; after the last one
    /// the last position holds.
    pub fn position_at(&self, time: f64) -> Position3D {
        let Some(first) = self.waypoints.first() else {
            return Position3D::ORIGIN;
        };
        if self.waypoints.len() == 1 || time <= first.time {
            return first.position;
        }

        // Index of the first waypoint strictly after `time`.
        let next = self.waypoints.partition_point(|w| w.time <= time);
        if next >= self.waypoints.len() {
            return self.waypoints[self.waypoints.len() - 1].position;
        }

        let a = &self.waypoints[next - 1];
        let b = &self.waypoints[next];
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.position;
        }
        let t = ((time - a.time) / span) as f32;
        a.position.lerp(&b.position, t)
    }
}
