use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{
    collision::lees_edwards::Frame, config::DEFAULT_ROTATION_COOLING_COEFFICIENT,
    core::particle::Particle,
};

/// Explicit Euler integrator stepping particles forward in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Integrator {
    /// Fraction of the local flow velocity `γ̇ (y - h/2)` taken as the expected spin when
    /// cooling.
    pub rotation_cooling_coefficient: f64,
}

impl Default for Integrator {
    fn default() -> Self {
        Self {
            rotation_cooling_coefficient: DEFAULT_ROTATION_COOLING_COEFFICIENT,
        }
    }
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts the accumulated force into velocity and returns the force used.
    pub fn integrate_velocity(&self, particle: &mut Particle, dt: f64) -> DVec2 {
        let force = particle.force;
        particle.point.velocity += force / particle.mass() * dt;
        particle.force = DVec2::ZERO;
        force
    }

    /// Converts the accumulated torque into angular velocity and returns the torque used.
    pub fn integrate_rotation(&self, particle: &mut Particle, dt: f64) -> f64 {
        let torque = particle.torque;
        particle.angular_velocity += torque / particle.inertia() * dt;
        particle.torque = 0.0;
        torque
    }

    /// Damps the deviation from the local shear flow rather than the absolute motion.
    pub fn cool(&self, particle: &mut Particle, frame: &Frame, factor: f64) {
        let flow = frame.local_flow_velocity(particle.position().y);
        particle.point.cool_toward(DVec2::new(flow, 0.0), factor);

        let spin = self.rotation_cooling_coefficient * flow;
        particle.angular_velocity = spin + factor * (particle.angular_velocity - spin);
    }

    pub fn integrate_position(&self, particle: &mut Particle, dt: f64) {
        particle.point.advance(dt);
        particle.angle += particle.angular_velocity * dt;
    }

    /// Moves a particle along with a change of the imposed shear rate.
    ///
    /// Adding the local flow difference avoids a shock wave travelling in from the edges;
    /// the spin follows the change of flow vorticity.
    pub fn apply_shear_rate_change(&self, particle: &mut Particle, frame: &Frame, delta: f64) {
        particle.point.velocity.x += (particle.position().y - 0.5 * frame.height()) * delta;
        particle.angular_velocity -= 0.5 * delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn particle_at(y: f64) -> Particle {
        Particle::new(DVec2::new(5.0, y), 2.0, 4.0).unwrap()
    }

    #[test]
    fn acceleration_consumes_accumulators() {
        let integrator = Integrator::new();
        let mut particle = particle_at(1.0);
        particle.apply_force(DVec2::new(8.0, -4.0));
        particle.apply_torque(16.0);

        let force = integrator.integrate_velocity(&mut particle, 0.5);
        let torque = integrator.integrate_rotation(&mut particle, 0.5);
        assert_eq!(force, DVec2::new(8.0, -4.0));
        assert_eq!(torque, 16.0);
        assert_eq!(particle.velocity(), DVec2::new(1.0, -0.5));
        // I = 4 * 2² / 2 = 8
        assert_relative_eq!(particle.angular_velocity, 1.0);
        assert_eq!(particle.force, DVec2::ZERO);
        assert_eq!(particle.torque, 0.0);
    }

    #[test]
    fn cooling_targets_the_shear_flow() {
        let mut frame = Frame::lees_edwards(10.0, 10.0).unwrap();
        frame.shear_rate = 2.0;
        let integrator = Integrator {
            rotation_cooling_coefficient: 0.5,
        };
        let mut particle = particle_at(8.0)
            .with_velocity(DVec2::new(0.0, 2.0))
            .with_angular_velocity(1.0);
        integrator.cool(&mut particle, &frame, 0.5);
        // flow at y = 8 is 6, expected spin 3
        assert_relative_eq!(particle.velocity().x, 3.0);
        assert_relative_eq!(particle.velocity().y, 1.0);
        assert_relative_eq!(particle.angular_velocity, 2.0);
    }

    #[test]
    fn shear_rate_change_follows_local_flow() {
        let frame = Frame::lees_edwards(10.0, 10.0).unwrap();
        let integrator = Integrator::new();
        let mut particle = particle_at(2.0);
        integrator.apply_shear_rate_change(&mut particle, &frame, 0.4);
        assert_relative_eq!(particle.velocity().x, -1.2);
        assert_relative_eq!(particle.angular_velocity, -0.2);
    }

    #[test]
    fn movement_advances_position_and_angle() {
        let integrator = Integrator::new();
        let mut particle = particle_at(0.0)
            .with_velocity(DVec2::new(1.0, 1.0))
            .with_angular_velocity(0.5);
        integrator.integrate_position(&mut particle, 2.0);
        assert_eq!(particle.position(), DVec2::new(7.0, 2.0));
        assert_eq!(particle.angle, 1.0);
    }
}
