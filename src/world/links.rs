//! Permanent links between crosslinked particles.

use log::debug;

use super::Ensemble;
use crate::{
    core::{
        contact::{Contact, PairKey},
        types::{InterfaceType, ParticleId},
    },
    error::{Result, ShearError},
};

impl Ensemble {
    /// Bonds two particles at the touching distance of their radii.
    ///
    /// An existing contact between them is replaced by the link.
    pub fn establish_permanent_link(&mut self, a: ParticleId, b: ParticleId) -> Result<()> {
        if a == b {
            return Err(ShearError::SelfLink(a));
        }
        let equilibrium = self.checked(a)?.radius + self.checked(b)?.radius;
        self.contacts
            .insert(PairKey::new(a, b), Contact::permanent(equilibrium));
        debug!("linked {a} and {b} at {equilibrium} µm");
        Ok(())
    }

    /// Turns a permanent link back into a sliding contact.
    ///
    /// Returns false when the pair was not linked. The contact is dropped by the next
    /// neighbor update once the pair separates.
    pub fn cut_permanent_link(&mut self, a: ParticleId, b: ParticleId) -> Result<bool> {
        self.checked(a)?;
        self.checked(b)?;
        match self.contacts.get_mut(a, b) {
            Some(contact) if contact.is_permanent() => {
                contact.interface = InterfaceType::Slip;
                contact.equilibrium_distance = 0.0;
                contact.friction_position = 0.0;
                debug!("cut link between {a} and {b}");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Particles permanently linked to `id`.
    ///
    /// With `physical_only`, partners reached through a periodic edge are left out.
    pub fn permanently_connected(
        &self,
        id: ParticleId,
        physical_only: bool,
    ) -> Result<Vec<ParticleId>> {
        let position = self.checked(id)?.position();
        let half = 0.5 * self.frame.size;
        let partners = self
            .contacts
            .partners_of(id)
            .filter(|(_, contact)| contact.is_permanent())
            .filter_map(|(other, _)| self.particle(other).map(|p| (other, p.position())))
            .filter(|(_, other)| {
                let delta = (*other - position).abs();
                !physical_only || (delta.x < half.x && delta.y < half.y)
            })
            .map(|(other, _)| other)
            .collect();
        Ok(partners)
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use crate::{
        collision::lees_edwards::Frame,
        core::{particle::Particle, types::ContactModel},
        dynamics::forces::ForceRegister,
    };

    use super::*;

    fn chain() -> Ensemble {
        let frame = Frame::lees_edwards(100.0, 100.0).unwrap();
        let particles = [
            DVec2::new(50.0, 50.0),
            DVec2::new(70.0, 50.0),
            DVec2::new(95.0, 50.0),
        ]
        .map(|position| Particle::new(position, 10.0, 1.0).unwrap());
        let mut ensemble = Ensemble::new(frame, ContactModel::default(), ForceRegister::new())
            .with_particles(particles)
            .unwrap();
        ensemble
            .add_particle(Particle::new(DVec2::new(5.0, 50.0), 10.0, 1.0).unwrap())
            .unwrap();
        ensemble
    }

    #[test]
    fn links_are_listed_for_both_partners() {
        let mut ensemble = chain();
        ensemble
            .establish_permanent_link(ParticleId(0), ParticleId(1))
            .unwrap();
        ensemble
            .establish_permanent_link(ParticleId(2), ParticleId(1))
            .unwrap();
        let contact = ensemble.contacts().get(ParticleId(1), ParticleId(0)).unwrap();
        assert_eq!(contact.equilibrium_distance, 20.0);
        assert_eq!(
            ensemble.permanently_connected(ParticleId(1), false).unwrap(),
            vec![ParticleId(0), ParticleId(2)]
        );
        assert_eq!(
            ensemble.permanently_connected(ParticleId(0), true).unwrap(),
            vec![ParticleId(1)]
        );
    }

    #[test]
    fn physical_filter_drops_links_through_the_edge() {
        let mut ensemble = chain();
        ensemble
            .establish_permanent_link(ParticleId(2), ParticleId(3))
            .unwrap();
        assert_eq!(
            ensemble.permanently_connected(ParticleId(3), false).unwrap(),
            vec![ParticleId(2)]
        );
        assert!(ensemble
            .permanently_connected(ParticleId(3), true)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn invalid_links_are_rejected() {
        let mut ensemble = chain();
        assert_eq!(
            ensemble.establish_permanent_link(ParticleId(1), ParticleId(1)),
            Err(ShearError::SelfLink(ParticleId(1)))
        );
        assert_eq!(
            ensemble.establish_permanent_link(ParticleId(0), ParticleId(9)),
            Err(ShearError::UnknownParticle(ParticleId(9)))
        );
        assert!(ensemble.contacts().is_empty());
    }

    #[test]
    fn cutting_leaves_a_sliding_contact() {
        let mut ensemble = chain();
        ensemble
            .establish_permanent_link(ParticleId(0), ParticleId(1))
            .unwrap();
        assert!(ensemble.cut_permanent_link(ParticleId(1), ParticleId(0)).unwrap());
        assert!(!ensemble.cut_permanent_link(ParticleId(1), ParticleId(0)).unwrap());

        let contact = *ensemble.contacts().get(ParticleId(0), ParticleId(1)).unwrap();
        assert_eq!(contact.interface, InterfaceType::Slip);
        assert_eq!(contact.friction_position, 0.0);
        assert_eq!(ensemble.contacts().permanent_count(), 0);
    }
}
