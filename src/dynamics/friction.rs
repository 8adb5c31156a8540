use serde::{Deserialize, Serialize};

use crate::{
    collision::lees_edwards::PairGeometry,
    config::{
        DEFAULT_FRICTION_COEFFICIENT, DEFAULT_TANGENTIAL_SPRING_CONSTANT,
        DEFAULT_TANGENTIAL_VISCOSITY,
    },
    core::{
        contact::Contact,
        particle::Particle,
        types::InterfaceType,
    },
    dynamics::central::{CentralLaw, NormalForce, TensileLaw},
};

/// Tangential spring-dashpot capped by Coulomb friction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionLaw {
    pub spring_constant: f64,
    pub viscosity: f64,
    /// Coulomb coefficient relating the cap to the central elastic force.
    pub coefficient: f64,
}

impl Default for FrictionLaw {
    fn default() -> Self {
        Self {
            spring_constant: DEFAULT_TANGENTIAL_SPRING_CONSTANT,
            viscosity: DEFAULT_TANGENTIAL_VISCOSITY,
            coefficient: DEFAULT_FRICTION_COEFFICIENT,
        }
    }
}

impl FrictionLaw {
    /// Force the interface would need to stay stuck.
    pub fn adherence(&self, contact: &Contact, tangential_speed: f64) -> f64 {
        self.viscosity * tangential_speed + self.spring_constant * contact.friction_position
    }

    /// Runs the stick/slip transition of a frictional contact and returns the applied force.
    ///
    /// Sliding releases the tangential spring on the shared contact, so both partners see the
    /// reset in the same step.
    pub fn resolve(
        &self,
        contact: &mut Contact,
        tangential_speed: f64,
        normal_elastic: f64,
    ) -> f64 {
        let adherence = self.adherence(contact, tangential_speed);
        let cap = self.coefficient * normal_elastic.abs();
        if adherence.abs() <= cap {
            contact.interface = InterfaceType::Stick;
            adherence
        } else {
            contact.slip();
            adherence.signum() * cap
        }
    }
}

/// Bonded links between particles that were crosslinked at construction.
///
/// The ratios scale the link relative to an ordinary frictional contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermanentLinkLaw {
    pub tensile: TensileLaw,
    pub central_ratio: f64,
    pub tangential_ratio: f64,
    /// Leave the viscous terms unscaled by the ratios.
    pub keep_viscosity_constant: bool,
}

impl Default for PermanentLinkLaw {
    fn default() -> Self {
        Self {
            tensile: TensileLaw::Linear,
            central_ratio: 1.0,
            tangential_ratio: 1.0,
            keep_viscosity_constant: true,
        }
    }
}

impl PermanentLinkLaw {
    fn viscous_scale(&self, ratio: f64) -> f64 {
        if self.keep_viscosity_constant { 1.0 } else { ratio }
    }

    /// Central force of a link, active at any separation.
    pub fn central(
        &self,
        law: &CentralLaw,
        contact: &Contact,
        geometry: &PairGeometry,
        blend: f64,
    ) -> NormalForce {
        let elastic = law.permanent_elastic(
            geometry.distance,
            contact.equilibrium_distance,
            blend,
            self.tensile,
        );
        NormalForce {
            elastic: self.central_ratio * elastic,
            viscous: self.viscous_scale(self.central_ratio) * law.viscous(geometry.normal_speed()),
        }
    }

    /// Uncapped tangential force of a link.
    pub fn tangential(&self, law: &FrictionLaw, contact: &Contact, tangential_speed: f64) -> f64 {
        self.tangential_ratio * law.spring_constant * contact.friction_position
            + self.viscous_scale(self.tangential_ratio) * law.viscosity * tangential_speed
    }
}

/// Relative sliding speed of the two surfaces at the contact point.
///
/// Counter-clockwise spin of either partner moves its surface against the tangent.
pub fn tangential_speed(geometry: &PairGeometry, target: &Particle, source: &Particle) -> f64 {
    geometry.relative_velocity.dot(geometry.tangent)
        - (target.radius * target.angular_velocity + source.radius * source.angular_velocity)
}

/// Centre forces and spin torques that carry one tangential contact force.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TangentialCouple {
    /// Force on the target along the tangent; the source receives the opposite.
    pub force: f64,
    pub target_torque: f64,
    pub source_torque: f64,
}

/// Splits a tangential force into a pair of centre forces and two torques.
///
/// Each visit of an ordered pair carries half of the contact force. The couple of the two
/// centre forces is `distance * force / 2`; it is shared in proportion to the radii so that
/// angular momentum is conserved at any compression.
pub fn split_couple(
    force: f64,
    distance: f64,
    target_radius: f64,
    source_radius: f64,
) -> TangentialCouple {
    let half = 0.5 * force;
    let radii = target_radius + source_radius;
    TangentialCouple {
        force: half,
        target_torque: distance * half * target_radius / radii,
        source_torque: distance * half * source_radius / radii,
    }
}
