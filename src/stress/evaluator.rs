use glam::DVec2;
use serde::Serialize;

use crate::{
    collision::lees_edwards::Frame,
    config::{FORCE_TO_SI, LENGTH_TO_SI, MASS_TO_SI, MOMENT_TO_SI},
    core::particle::Particle,
    dynamics::forces::{ForceRegister, PairMoment, ParticleMoment},
    stress::tensor::StressTensor,
};

/// Stress decompositions of one step, in SI units (N/m).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct StressTensors {
    pub love_weber: StressTensor,
    pub unbalanced_force: StressTensor,
    pub external_force: StressTensor,
    pub linear_acceleration: StressTensor,
    pub spin_kinetic: StressTensor,
    pub unbalanced_torque: StressTensor,
    pub internal_torque: StressTensor,
    /// Kinetic stress of the motion relative to the shear flow; not part of `overall`.
    pub peculiar_momentum: StressTensor,
    /// Love-Weber plus internal torque plus spin.
    pub overall: StressTensor,
    pub quasistatic_shear_stress: f64,
    pub externally_applied_shear_stress: f64,
}

impl StressTensors {
    pub fn tensors(&self) -> [(&'static str, &StressTensor); 9] {
        [
            ("love_weber", &self.love_weber),
            ("unbalanced_force", &self.unbalanced_force),
            ("external_force", &self.external_force),
            ("linear_acceleration", &self.linear_acceleration),
            ("spin_kinetic", &self.spin_kinetic),
            ("unbalanced_torque", &self.unbalanced_torque),
            ("internal_torque", &self.internal_torque),
            ("peculiar_momentum", &self.peculiar_momentum),
            ("overall", &self.overall),
        ]
    }

    /// Flat labelled row of every tensor component followed by the two shear stresses.
    pub fn components(&self) -> Vec<(String, f64)> {
        const AXES: [&str; 2] = ["x", "y"];
        let mut row = Vec::with_capacity(9 * 4 + 2);
        for (name, tensor) in self.tensors() {
            for (i, a) in AXES.iter().enumerate() {
                for (j, b) in AXES.iter().enumerate() {
                    row.push((format!("{name}_{a}{b}"), tensor.component(i, j)));
                }
            }
        }
        row.push((
            "quasistatic_shear_stress".to_string(),
            self.quasistatic_shear_stress,
        ));
        row.push((
            "externally_applied_shear_stress".to_string(),
            self.externally_applied_shear_stress,
        ));
        row
    }
}

/// Turns a filled force register into macroscopic stress tensors.
///
/// The evaluator holds only the box size; it never mutates the register or the particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressEvaluator {
    size: DVec2,
}

impl StressEvaluator {
    pub fn new(size: DVec2) -> Self {
        Self { size }
    }

    pub fn for_frame(frame: &Frame) -> Self {
        Self::new(frame.size)
    }

    /// Box area in m² per metre of depth.
    pub fn area(&self) -> f64 {
        self.size.x * LENGTH_TO_SI * self.size.y * LENGTH_TO_SI
    }

    fn center(&self) -> DVec2 {
        self.size * 0.5
    }

    /// `Σ F ⊗ Δx / (2A)` over internal pair forces, with `Δx` from source to target.
    pub fn love_weber(&self, register: &ForceRegister) -> StressTensor {
        let mut sum = StressTensor::ZERO;
        for entry in register.pair_forces() {
            sum += StressTensor::dyad(entry.force * FORCE_TO_SI, entry.branch * LENGTH_TO_SI);
        }
        sum * (0.5 / self.area())
    }

    /// `Σ F ⊗ (x - c) / A` over the net particle forces.
    pub fn unbalanced_force(&self, register: &ForceRegister) -> StressTensor {
        let center = self.center();
        let mut sum = StressTensor::ZERO;
        for entry in register.total_forces() {
            sum += StressTensor::dyad(
                entry.force * FORCE_TO_SI,
                (entry.position - center) * LENGTH_TO_SI,
            );
        }
        sum * (1.0 / self.area())
    }

    /// Reaction the surroundings must supply: `-Σ F ⊗ (x - c) / A` over external forces.
    pub fn external_force(&self, register: &ForceRegister) -> StressTensor {
        let center = self.center();
        let mut sum = StressTensor::ZERO;
        for entry in register.external_forces() {
            sum += StressTensor::dyad(
                entry.force * FORCE_TO_SI,
                (entry.position - center) * LENGTH_TO_SI,
            );
        }
        -(sum * (1.0 / self.area()))
    }

    fn torque_tensor(&self, total_moment: f64) -> StressTensor {
        StressTensor::antisymmetric(total_moment * MOMENT_TO_SI / (2.0 * self.area()))
    }

    pub fn internal_torque(&self, register: &ForceRegister) -> StressTensor {
        let total: f64 = register.internal_moments().iter().map(|m: &PairMoment| m.moment).sum();
        self.torque_tensor(total)
    }

    pub fn unbalanced_torque(&self, register: &ForceRegister) -> StressTensor {
        let total: f64 = register
            .unbalanced_moments()
            .map(|m: &ParticleMoment| m.moment)
            .sum();
        self.torque_tensor(total)
    }

    /// Evaluates every decomposition for the current register contents.
    ///
    /// `particles` supplies the spin and peculiar-momentum terms and should contain the
    /// particles free to move.
    pub fn evaluate<'a, I>(
        &self,
        register: &ForceRegister,
        particles: I,
        shear_rate: f64,
    ) -> StressTensors
    where
        I: IntoIterator<Item = &'a Particle>,
    {
        let area = self.area();
        let half_height = 0.5 * self.size.y;

        let mut spin_energy = 0.0;
        let mut peculiar = StressTensor::ZERO;
        for particle in particles {
            spin_energy += particle.inertia()
                * MOMENT_TO_SI
                * particle.angular_velocity
                * particle.angular_velocity
                / 2.0;

            let mut relative = particle.velocity();
            relative.x -= shear_rate * (particle.position().y - half_height);
            peculiar += StressTensor::dyad(relative, relative)
                * (particle.mass() * MASS_TO_SI * LENGTH_TO_SI * LENGTH_TO_SI);
        }

        let love_weber = self.love_weber(register);
        let unbalanced_force = self.unbalanced_force(register);
        let external_force = self.external_force(register);
        let spin_kinetic = StressTensor::diagonal(-spin_energy / area);
        let internal_torque = self.internal_torque(register);
        let overall = love_weber + internal_torque + spin_kinetic;

        StressTensors {
            love_weber,
            unbalanced_force,
            external_force,
            linear_acceleration: unbalanced_force,
            spin_kinetic,
            unbalanced_torque: self.unbalanced_torque(register),
            internal_torque,
            peculiar_momentum: -(peculiar * (1.0 / area)),
            overall,
            quasistatic_shear_stress: -overall.xy(),
            externally_applied_shear_stress: -external_force.xy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::types::ParticleId,
        dynamics::forces::{ForceChannel, PairForce, ParticleForce},
    };
    use approx::assert_relative_eq;

    fn evaluator() -> StressEvaluator {
        StressEvaluator::new(DVec2::new(100.0, 200.0))
    }

    #[test]
    fn empty_register_gives_zero_tensors() {
        let tensors = evaluator().evaluate(&ForceRegister::new(), [], 1.0);
        for (name, tensor) in tensors.tensors() {
            assert!(tensor.is_zero(), "{name} should be zero");
        }
        assert_eq!(tensors.quasistatic_shear_stress, 0.0);
    }

    #[test]
    fn love_weber_counts_each_pair_from_both_sides() {
        let mut register = ForceRegister::new();
        let force = DVec2::new(-3.0, 0.0);
        let branch = DVec2::new(8.0, 2.0);
        for (target, source, sign) in [(0, 1, 1.0), (1, 0, -1.0)] {
            register.record_force(
                Some(ForceChannel::Internal),
                PairForce {
                    target: ParticleId(target),
                    source: ParticleId(source),
                    force: force * sign,
                    branch: branch * sign,
                    position: DVec2::ZERO,
                },
            );
        }
        let evaluator = evaluator();
        let tensor = evaluator.love_weber(&register);
        let area = evaluator.area();
        assert_relative_eq!(tensor.xx(), -3.0e-12 * 8.0e-6 / area, max_relative = 1e-12);
        assert_relative_eq!(tensor.xy(), -3.0e-12 * 2.0e-6 / area, max_relative = 1e-12);
        assert_eq!(tensor.yx(), 0.0);
    }

    #[test]
    fn external_forces_enter_with_reversed_sign() {
        let mut register = ForceRegister::new();
        let entry = PairForce {
            target: ParticleId(0),
            source: ParticleId(1),
            force: DVec2::new(2.0, 0.0),
            branch: DVec2::ZERO,
            position: DVec2::new(50.0, 150.0),
        };
        register.record_force(Some(ForceChannel::External), entry);
        register.record_total_force(ParticleForce {
            target: ParticleId(0),
            force: entry.force,
            position: entry.position,
        });
        let tensors = evaluator().evaluate(&register, [], 0.0);
        assert_relative_eq!(tensors.external_force.xy(), -tensors.unbalanced_force.xy());
        assert!(tensors.unbalanced_force.xy() > 0.0);
        assert_eq!(tensors.linear_acceleration, tensors.unbalanced_force);
        assert_eq!(
            tensors.externally_applied_shear_stress,
            -tensors.external_force.xy()
        );
    }

    #[test]
    fn moments_build_antisymmetric_tensors() {
        let mut register = ForceRegister::new();
        register.record_moment(
            Some(ForceChannel::Internal),
            PairMoment {
                target: ParticleId(0),
                source: ParticleId(1),
                moment: 4.0,
            },
        );
        register.record_unbalanced_moment(ParticleMoment {
            target: ParticleId(0),
            moment: -1.0,
        });
        let evaluator = evaluator();
        let tensors = evaluator.evaluate(&register, [], 0.0);
        let expected = 4.0e-18 / (2.0 * evaluator.area());
        assert_relative_eq!(tensors.internal_torque.yx(), expected, max_relative = 1e-12);
        assert_relative_eq!(tensors.internal_torque.xy(), -expected, max_relative = 1e-12);
        assert!(tensors.unbalanced_torque.yx() < 0.0);
        assert_eq!(tensors.overall, tensors.internal_torque);
    }

    #[test]
    fn peculiar_momentum_ignores_affine_flow() {
        let shear_rate = 0.5;
        let y = 180.0;
        let particle = Particle::new(DVec2::new(10.0, y), 5.0, 2.0)
            .unwrap()
            .with_velocity(DVec2::new(shear_rate * (y - 100.0), 0.0));
        let tensors = evaluator().evaluate(&ForceRegister::new(), [&particle], shear_rate);
        assert!(tensors.peculiar_momentum.is_zero());

        let moving = particle.clone().with_velocity(DVec2::new(0.0, 3.0));
        let tensors = evaluator().evaluate(&ForceRegister::new(), [&moving], shear_rate);
        assert!(tensors.peculiar_momentum.yy() < 0.0);
    }

    #[test]
    fn component_row_is_labelled() {
        let tensors = StressTensors {
            quasistatic_shear_stress: 1.5,
            ..StressTensors::default()
        };
        let row = tensors.components();
        assert_eq!(row.len(), 38);
        assert_eq!(row[0].0, "love_weber_xx");
        assert_eq!(row[33].0, "overall_xy");
        assert_eq!(row[36], ("quasistatic_shear_stress".to_string(), 1.5));
    }
}
