//! Global configuration constants for the Granular Shear kernel.
//!
//! Lengths are in µm, masses in mg per metre of depth and times in seconds.

/// Default width of the simulation box (µm).
pub const DEFAULT_BOX_WIDTH: f64 = 500.0;

/// Default height of the simulation box (µm).
pub const DEFAULT_BOX_HEIGHT: f64 = 500.0;

/// Default central spring constant.
pub const DEFAULT_SPRING_CONSTANT: f64 = 1.0;

/// Default central viscosity.
pub const DEFAULT_CENTRAL_VISCOSITY: f64 = 0.01;

/// Default tangential spring constant.
pub const DEFAULT_TANGENTIAL_SPRING_CONSTANT: f64 = 1.0;

/// Default tangential viscosity.
pub const DEFAULT_TANGENTIAL_VISCOSITY: f64 = 0.01;

/// Default Coulomb friction coefficient.
pub const DEFAULT_FRICTION_COEFFICIENT: f64 = 0.1;

/// Default cooling factor applied once per step.
pub const DEFAULT_COOL_FACTOR: f64 = 0.97;

/// Default blend between the Hookean and the 1/d repulsion.
pub const DEFAULT_CENTRAL_REPULSION_COEFFICIENT: f64 = 0.0;

/// Coupling of the expected local spin to the shear flow when cooling rotation.
pub const DEFAULT_ROTATION_COOLING_COEFFICIENT: f64 = 0.0;

/// Relative decay length of the exponential tensile law.
pub const DEFAULT_TENSILE_DECAY: f64 = 0.2;

/// Smallest separation, as a fraction of the contact diameter, used by the 1/d repulsion.
pub const REPULSION_DISTANCE_FLOOR: f64 = 1.0 / 1000.0;

/// Default seed for the degenerate-direction generator.
pub const DEFAULT_RNG_SEED: u64 = 0x5eed_2d0f;

/// Converts simulation forces (mg·µm/s² per m depth) to N/m.
pub const FORCE_TO_SI: f64 = 1e-12;

/// Converts µm to m.
pub const LENGTH_TO_SI: f64 = 1e-6;

/// Converts simulation torques and moments of inertia to SI.
pub const MOMENT_TO_SI: f64 = 1e-18;

/// Converts mg to kg.
pub const MASS_TO_SI: f64 = 1e-6;
