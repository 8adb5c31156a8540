use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Common math types re-exported for convenience.
pub use glam::{DMat2, DVec2};

use crate::config::{
    DEFAULT_CENTRAL_VISCOSITY, DEFAULT_FRICTION_COEFFICIENT, DEFAULT_SPRING_CONSTANT,
    DEFAULT_TANGENTIAL_SPRING_CONSTANT, DEFAULT_TANGENTIAL_VISCOSITY,
};
use crate::dynamics::{
    central::CentralLaw,
    friction::{FrictionLaw, PermanentLinkLaw},
};

/// Stable index of a particle inside its ensemble.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ParticleId(pub u32);

impl ParticleId {
    /// Id for the particle stored at `index`; `None` past `u32::MAX`.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of the tangential interface between two touching particles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceType {
    /// Elastic tangential spring, below the Coulomb cap.
    #[default]
    Stick,
    /// Sliding at the Coulomb cap.
    Slip,
    /// Bonded link that never slides and can carry tension.
    Permanent,
}

impl InterfaceType {
    /// Whether the friction position accumulates tangential motion.
    pub fn stores_stretch(self) -> bool {
        matches!(self, InterfaceType::Stick | InterfaceType::Permanent)
    }
}

/// Force-law parameters shared by every contact of an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactModel {
    pub central: CentralLaw,
    pub friction: FrictionLaw,
    pub permanent: PermanentLinkLaw,
}

impl Default for ContactModel {
    fn default() -> Self {
        Self {
            central: CentralLaw {
                spring_constant: DEFAULT_SPRING_CONSTANT,
                viscosity: DEFAULT_CENTRAL_VISCOSITY,
            },
            friction: FrictionLaw {
                spring_constant: DEFAULT_TANGENTIAL_SPRING_CONSTANT,
                viscosity: DEFAULT_TANGENTIAL_VISCOSITY,
                coefficient: DEFAULT_FRICTION_COEFFICIENT,
            },
            permanent: PermanentLinkLaw::default(),
        }
    }
}

impl ContactModel {
    /// Model without any dissipation or friction, only the central elastic law.
    pub fn frictionless(spring_constant: f64) -> Self {
        Self {
            central: CentralLaw {
                spring_constant,
                viscosity: 0.0,
            },
            friction: FrictionLaw {
                spring_constant: 0.0,
                viscosity: 0.0,
                coefficient: 0.0,
            },
            permanent: PermanentLinkLaw::default(),
        }
    }
}

/// Physical material from which the simulation constants are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialModel {
    /// Young's modulus in Pa.
    pub youngs_modulus: f64,
    /// Density in kg/m³.
    pub density: f64,
    /// Mean particle radius in µm.
    pub mean_radius: f64,
    /// Ratio between the large and the small radius of a bimodal ensemble.
    pub bimodal_factor: f64,
}

impl Default for MaterialModel {
    fn default() -> Self {
        Self {
            youngs_modulus: 10_000.0,
            density: 1_000.0,
            mean_radius: 10.0,
            bimodal_factor: 1.4,
        }
    }
}

impl MaterialModel {
    /// Central spring constant in mg/s² per m of depth.
    pub fn spring_constant(&self) -> f64 {
        PI / 8.0 * self.youngs_modulus * 1e6
    }

    /// Mass of a disk of the mean radius, in mg per m of depth.
    pub fn mean_mass(&self) -> f64 {
        self.mass_for_radius(self.mean_radius)
    }

    pub fn mass_for_radius(&self, radius: f64) -> f64 {
        PI * radius * radius * self.density * 1e-6
    }

    /// Characteristic oscillation time of a contact between two mean particles.
    pub fn time_constant(&self) -> f64 {
        let b = self.bimodal_factor.max(1.0 / self.bimodal_factor);
        (self.mean_mass() / self.spring_constant()).sqrt() / b.sqrt()
    }

    /// Mean radius giving `count` bimodal disks the requested packing fraction in the box.
    ///
    /// Large and small disks have radii `sqrt(b)` and `1/sqrt(b)` times the mean radius.
    pub fn radius_for_packing_fraction(
        &self,
        size: DVec2,
        packing_fraction: f64,
        count: usize,
    ) -> f64 {
        let b = self.bimodal_factor;
        (size.x * size.y * packing_fraction / count.max(1) as f64 / PI / ((b + 1.0 / b) / 2.0))
            .sqrt()
    }
}
