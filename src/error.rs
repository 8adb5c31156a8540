//! Error types for ensemble construction and management.

use thiserror::Error;

use crate::core::types::ParticleId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShearError {
    #[error("Invalid box size: {0} x {1} (both sides must be positive and finite)")]
    InvalidBoxSize(f64, f64),

    #[error("Invalid radius for particle: {0}")]
    InvalidRadius(f64),

    #[error("Invalid mass for particle: {0}")]
    InvalidMass(f64),

    #[error("Central repulsion coefficient {0} is outside [0, 1]")]
    InvalidRepulsionCoefficient(f64),

    #[error("Ensemble is full: particle index {0} does not fit a particle id")]
    TooManyParticles(usize),

    #[error("Unknown particle: {0}")]
    UnknownParticle(ParticleId),

    #[error("Particle {0} cannot be linked to itself")]
    SelfLink(ParticleId),

    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f64),

    #[error("Cooling factor {0} is outside [0, 1]")]
    InvalidCoolingFactor(f64),
}

pub type Result<T> = std::result::Result<T, ShearError>;
