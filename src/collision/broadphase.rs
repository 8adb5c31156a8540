use std::collections::BTreeSet;

use log::{Level, log_enabled};

use crate::{
    collision::lees_edwards::Frame,
    core::{
        contact::{ContactSet, PairKey},
        particle::Particle,
    },
};

/// Outcome of one neighbor update.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NeighborUpdate {
    pub overlapping: usize,
    pub created: usize,
    pub removed: usize,
}

/// Whether two particles overlap through their nearest periodic image.
///
/// Pairs further apart vertically than their radii sum are rejected before the image search,
/// unless under Lees-Edwards they may still touch through the top/bottom edge.
pub fn in_contact(a: &Particle, b: &Particle, frame: &Frame) -> bool {
    let reach = a.radius + b.radius;
    let dy = (b.position().y - a.position().y).abs();
    if dy > reach && (!frame.is_lees_edwards() || dy < frame.height() - reach) {
        return false;
    }
    frame.distance(a.position(), b.position()) < reach
}

/// All-pairs neighbor search.
///
/// Scanning every pair keeps the search exact under any shear offset; the optional parallel
/// scan only reads particle data and yields the same ordered pair list.
#[derive(Debug, Default, Clone)]
pub struct BroadPhase {
    parallel: bool,
    pair_tests: usize,
}

impl BroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel
    }

    /// Number of pairs tested by the last scan.
    pub fn pair_tests(&self) -> usize {
        self.pair_tests
    }

    /// Overlapping pairs, in ascending index order.
    pub fn overlapping_pairs(&mut self, particles: &[Particle], frame: &Frame) -> Vec<PairKey> {
        let n = particles.len();
        self.pair_tests = n * n.saturating_sub(1) / 2;

        #[cfg(feature = "parallel")]
        if self.parallel {
            use rayon::prelude::*;
            return (0..n)
                .into_par_iter()
                .flat_map_iter(|i| {
                    ((i + 1)..n).filter_map(move |j| {
                        in_contact(&particles[i], &particles[j], frame)
                            .then(|| PairKey::new(particles[i].id, particles[j].id))
                    })
                })
                .collect();
        }

        let mut pairs = Vec::new();
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                if in_contact(a, b, frame) {
                    pairs.push(PairKey::new(a.id, b.id));
                }
            }
        }
        pairs
    }

    /// Creates stick contacts for new overlaps and drops lost frictional contacts.
    ///
    /// Permanent links are never removed here.
    pub fn update(
        &mut self,
        particles: &[Particle],
        frame: &Frame,
        contacts: &mut ContactSet,
    ) -> NeighborUpdate {
        let overlapping: BTreeSet<PairKey> =
            self.overlapping_pairs(particles, frame).into_iter().collect();

        let before = contacts.len();
        contacts.retain(|key, contact| contact.is_permanent() || overlapping.contains(key));
        let removed = before - contacts.len();
        if removed > 0 {
            log::debug!("{removed} contacts released");
        }

        let mut created = 0;
        for key in &overlapping {
            if contacts.insert_stick(*key) {
                created += 1;
                if log_enabled!(Level::Debug) {
                    log::debug!("contact {}-{} created", key.low(), key.high());
                }
            }
        }

        NeighborUpdate {
            overlapping: overlapping.len(),
            created,
            removed,
        }
    }
}
