//! Central (normal) contact force laws.
//!
//! Magnitudes follow the sign convention of the pair normal, which points from the particle
//! receiving the force toward its partner: negative values push the partners apart.

use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_CENTRAL_VISCOSITY, DEFAULT_SPRING_CONSTANT, DEFAULT_TENSILE_DECAY,
    REPULSION_DISTANCE_FLOOR,
};

/// Elastic plus viscous law acting along the line of centres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralLaw {
    pub spring_constant: f64,
    pub viscosity: f64,
}

impl Default for CentralLaw {
    fn default() -> Self {
        Self {
            spring_constant: DEFAULT_SPRING_CONSTANT,
            viscosity: DEFAULT_CENTRAL_VISCOSITY,
        }
    }
}

impl CentralLaw {
    /// Repulsive elastic magnitude for centres `distance` apart that touch at `contact_diameter`.
    ///
    /// `blend` mixes a Hookean term with a 1/d term that diverges as the centres meet. Both
    /// terms have slope `-k` at first contact, so the blend does not change the small-overlap
    /// stiffness. Zero once the pair no longer overlaps.
    pub fn elastic(&self, distance: f64, contact_diameter: f64, blend: f64) -> f64 {
        if distance >= contact_diameter {
            return 0.0;
        }
        let k = self.spring_constant;
        let floor = contact_diameter * REPULSION_DISTANCE_FLOOR;
        let hookean = -k * (1.0 - blend) * (contact_diameter - distance);
        let divergent =
            -k * blend * contact_diameter * (contact_diameter / distance.max(floor) - 1.0);
        hookean + divergent
    }

    /// Viscous magnitude for the relative velocity projected on the normal.
    pub fn viscous(&self, normal_speed: f64) -> f64 {
        self.viscosity * normal_speed
    }

    /// Central force of an ordinary contact; both parts vanish once the disks separate.
    pub fn contact(
        &self,
        distance: f64,
        contact_diameter: f64,
        normal_speed: f64,
        blend: f64,
    ) -> NormalForce {
        if distance >= contact_diameter {
            return NormalForce::default();
        }
        NormalForce {
            elastic: self.elastic(distance, contact_diameter, blend),
            viscous: self.viscous(normal_speed),
        }
    }
}

/// Law used by a permanent link stretched beyond its equilibrium distance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TensileLaw {
    /// Hookean pull `k (d - d_eq)`.
    #[default]
    Linear,
    /// Pull saturating at `k d_eq decay` for large stretch.
    Exponential { decay: f64 },
}

impl TensileLaw {
    pub fn exponential() -> Self {
        TensileLaw::Exponential {
            decay: DEFAULT_TENSILE_DECAY,
        }
    }

    /// Attractive (positive) magnitude for `distance >= equilibrium_distance`.
    pub fn force(&self, spring_constant: f64, distance: f64, equilibrium_distance: f64) -> f64 {
        match *self {
            TensileLaw::Linear => -spring_constant * (equilibrium_distance - distance),
            TensileLaw::Exponential { decay } => {
                let length = equilibrium_distance * decay;
                if length <= 0.0 {
                    return 0.0;
                }
                let stretch = (distance - equilibrium_distance) / length;
                spring_constant * (1.0 - (-stretch).exp()) * length
            }
        }
    }
}

impl CentralLaw {
    /// Elastic magnitude of a permanent link anchored at `equilibrium_distance`.
    pub fn permanent_elastic(
        &self,
        distance: f64,
        equilibrium_distance: f64,
        blend: f64,
        tensile: TensileLaw,
    ) -> f64 {
        if distance >= equilibrium_distance {
            tensile.force(self.spring_constant, distance, equilibrium_distance)
        } else {
            self.elastic(distance, equilibrium_distance, blend)
        }
    }
}

/// Central force split into its elastic and viscous parts.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NormalForce {
    pub elastic: f64,
    pub viscous: f64,
}

impl NormalForce {
    pub fn total(&self) -> f64 {
        self.elastic + self.viscous
    }
}
