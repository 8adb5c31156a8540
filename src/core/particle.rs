use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{
    config::DEFAULT_CENTRAL_REPULSION_COEFFICIENT,
    core::{point::Point, types::ParticleId},
    error::{Result, ShearError},
};

/// Frictional disk of the ensemble.
///
/// Masses are per metre of depth; the moment of inertia is that of a solid disk, `m·r²/2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    pub point: Point,
    pub radius: f64,
    mass: f64,
    inertia: f64,
    /// Rotation angle in radians.
    pub angle: f64,
    /// Angular velocity in rad/s, counter-clockwise positive.
    pub angular_velocity: f64,
    /// Force accumulated during the current step.
    pub force: DVec2,
    /// Torque accumulated during the current step.
    pub torque: f64,
    repulsion_coefficient: f64,
}

impl Particle {
    pub fn new(position: DVec2, radius: f64, mass: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ShearError::InvalidRadius(radius));
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(ShearError::InvalidMass(mass));
        }
        Ok(Self {
            id: ParticleId::default(),
            point: Point::new(position),
            radius,
            mass,
            inertia: 0.5 * mass * radius * radius,
            angle: 0.0,
            angular_velocity: 0.0,
            force: DVec2::ZERO,
            torque: 0.0,
            repulsion_coefficient: DEFAULT_CENTRAL_REPULSION_COEFFICIENT,
        })
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.point.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn position(&self) -> DVec2 {
        self.point.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.point.velocity
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn repulsion_coefficient(&self) -> f64 {
        self.repulsion_coefficient
    }

    /// Sets the blend between the Hookean and the 1/d central repulsion.
    pub fn set_repulsion_coefficient(&mut self, coefficient: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&coefficient) {
            return Err(ShearError::InvalidRepulsionCoefficient(coefficient));
        }
        self.repulsion_coefficient = coefficient;
        Ok(())
    }

    pub fn apply_force(&mut self, force: DVec2) {
        self.force += force;
    }

    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    pub fn clear_accumulators(&mut self) {
        self.force = DVec2::ZERO;
        self.torque = 0.0;
    }

    /// Uncompressed cross-section area.
    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn momentum(&self) -> DVec2 {
        self.mass * self.point.velocity
    }

    /// Orbital plus spin angular momentum about the origin.
    pub fn angular_momentum(&self) -> f64 {
        self.mass * self.point.position.perp_dot(self.point.velocity)
            + self.inertia * self.angular_velocity
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.point.velocity.length_squared() + self.spin_energy()
    }

    pub fn spin_energy(&self) -> f64 {
        0.5 * self.inertia * self.angular_velocity * self.angular_velocity
    }
}
