//! Force application for one ordered visit of a contact.

use crate::{
    collision::lees_edwards::{Frame, PairGeometry},
    core::{contact::Contact, particle::Particle, types::ContactModel},
    dynamics::{
        central::NormalForce,
        forces::{ForceChannel, ForceRegister, PairForce, PairMoment},
        friction::{split_couple, tangential_speed},
    },
};

/// Whether a particle follows its own dynamics.
///
/// With wall-driven shear, particles reaching into the bottom or top edge are carried by
/// the walls instead.
pub(crate) fn is_mobile(wall_driven: bool, frame: &Frame, particle: &Particle) -> bool {
    if !wall_driven {
        return true;
    }
    let y = particle.position().y;
    particle.radius < y && y < frame.height() - particle.radius
}

/// Mutable views of two distinct particles.
pub(crate) fn pair_mut(
    particles: &mut [Particle],
    a: usize,
    b: usize,
) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(a, b);
    if a < b {
        let (low, high) = particles.split_at_mut(b);
        (&mut low[a], &mut high[0])
    } else {
        let (low, high) = particles.split_at_mut(a);
        (&mut high[0], &mut low[b])
    }
}

/// Read-only state shared by every visit of a step.
pub(crate) struct VisitContext<'a> {
    pub model: &'a ContactModel,
    pub frame: &'a Frame,
    pub wall_driven: bool,
}

impl VisitContext<'_> {
    /// An ordinary contact whose disks no longer overlap carries no force.
    fn separated(
        &self,
        contact: &Contact,
        geometry: &PairGeometry,
        target: &Particle,
        source: &Particle,
    ) -> bool {
        !contact.is_permanent() && geometry.distance >= target.radius + source.radius
    }

    fn normal_force(
        &self,
        contact: &Contact,
        geometry: &PairGeometry,
        target: &Particle,
        source: &Particle,
    ) -> NormalForce {
        let blend = 0.5 * (target.repulsion_coefficient() + source.repulsion_coefficient());
        if contact.is_permanent() {
            return self
                .model
                .permanent
                .central(&self.model.central, contact, geometry, blend);
        }
        self.model.central.contact(
            geometry.distance,
            target.radius + source.radius,
            geometry.normal_speed(),
            blend,
        )
    }

    /// Runs the tangential law once for the contact, as seen from `target`.
    ///
    /// The result is the same from either side, since both the tangent and the relative
    /// velocity flip with the point of view.
    pub fn tangential_force(
        &self,
        contact: &mut Contact,
        geometry: &PairGeometry,
        target: &Particle,
        source: &Particle,
    ) -> f64 {
        if self.separated(contact, geometry, target, source) {
            return 0.0;
        }
        let speed = tangential_speed(geometry, target, source);
        if contact.is_permanent() {
            self.model
                .permanent
                .tangential(&self.model.friction, contact, speed)
        } else {
            let normal = self.normal_force(contact, geometry, target, source);
            self.model.friction.resolve(contact, speed, normal.elastic)
        }
    }

    /// Applies the forces of `source` on `target`, and half of the tangential couple.
    ///
    /// The central force acts on the target only; the reciprocal force comes from the
    /// opposite visit. The couple of `tangential_force` acts on both partners. A separated
    /// pair is left untouched and nothing is recorded.
    pub fn visit(
        &self,
        register: &mut ForceRegister,
        contact: &Contact,
        geometry: &PairGeometry,
        tangential_force: f64,
        target: &mut Particle,
        source: &mut Particle,
    ) {
        if self.separated(contact, geometry, target, source) {
            return;
        }
        let target_mobile = is_mobile(self.wall_driven, self.frame, target);
        let source_mobile = is_mobile(self.wall_driven, self.frame, source);
        let crosses = geometry.crosses_boundary;
        let on_target = ForceChannel::route(target_mobile, source_mobile, crosses);
        let on_source = ForceChannel::route(source_mobile, target_mobile, crosses);

        let normal = self.normal_force(contact, geometry, target, source);
        let central = geometry.normal * normal.total();
        target.apply_force(central);
        register.record_force(
            on_target,
            PairForce {
                target: target.id,
                source: source.id,
                force: central,
                branch: geometry.branch(),
                position: target.position(),
            },
        );

        let couple = split_couple(
            tangential_force,
            geometry.distance,
            target.radius,
            source.radius,
        );
        let tangential = geometry.tangent * couple.force;

        target.apply_force(tangential);
        source.apply_force(-tangential);
        target.apply_torque(couple.target_torque);
        source.apply_torque(couple.source_torque);

        register.record_force(
            on_target,
            PairForce {
                target: target.id,
                source: source.id,
                force: tangential,
                branch: geometry.branch(),
                position: target.position(),
            },
        );
        register.record_force(
            on_source,
            PairForce {
                target: source.id,
                source: target.id,
                force: -tangential,
                branch: geometry.delta,
                position: source.position(),
            },
        );
        register.record_moment(
            on_target,
            PairMoment {
                target: target.id,
                source: source.id,
                moment: couple.target_torque,
            },
        );
        register.record_moment(
            on_source,
            PairMoment {
                target: source.id,
                source: target.id,
                moment: couple.source_torque,
            },
        );
    }
}
