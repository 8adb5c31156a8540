use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Position (µm) and velocity (µm/s) of a particle centre.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: DVec2,
    pub velocity: DVec2,
}

impl Point {
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
        }
    }

    pub fn with_velocity(position: DVec2, velocity: DVec2) -> Self {
        Self { position, velocity }
    }

    /// Advances the position along the current velocity.
    pub fn advance(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Damps the deviation from `local_velocity` by `factor`.
    pub fn cool_toward(&mut self, local_velocity: DVec2, factor: f64) {
        self.velocity = local_velocity + (self.velocity - local_velocity) * factor;
    }

    /// Plain distance ignoring any periodic image.
    pub fn euclidean_distance(&self, other: &Point) -> f64 {
        self.position.distance(other.position)
    }
}
