//! Per-step log of the forces and moments applied to particles.
//!
//! Entries snapshot the geometry they were recorded with, so the stress evaluator can read
//! the register without consulting the particles again.

use std::collections::{BTreeMap, HashMap};

use glam::DVec2;

use crate::core::types::ParticleId;

/// Register a contribution is logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceChannel {
    /// Between two mobile particles inside the primary cell.
    Internal,
    /// From an immobile particle or through a periodic edge.
    External,
}

impl ForceChannel {
    /// Routing of a contribution on `target` from `source`; `None` drops it.
    pub fn route(target_mobile: bool, source_mobile: bool, crosses_boundary: bool) -> Option<Self> {
        if !target_mobile {
            None
        } else if !source_mobile || crosses_boundary {
            Some(ForceChannel::External)
        } else {
            Some(ForceChannel::Internal)
        }
    }
}

/// Force on `target` exerted by `source`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairForce {
    pub target: ParticleId,
    pub source: ParticleId,
    pub force: DVec2,
    /// Shortest-image vector from the source to the target.
    pub branch: DVec2,
    /// Target position when recorded.
    pub position: DVec2,
}

/// Net force converted into acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleForce {
    pub target: ParticleId,
    pub force: DVec2,
    pub position: DVec2,
}

/// Torque on `target` from its contact with `source`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairMoment {
    pub target: ParticleId,
    pub source: ParticleId,
    pub moment: f64,
}

/// Net torque converted into angular acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleMoment {
    pub target: ParticleId,
    pub moment: f64,
}

/// Write-then-read log of one step.
///
/// The ensemble owns its register; it is reset at the start of every step and read by the
/// stress evaluator after the step.
#[derive(Debug, Default, Clone)]
pub struct ForceRegister {
    pair_forces: Vec<PairForce>,
    total_forces: BTreeMap<ParticleId, ParticleForce>,
    external_forces: Vec<PairForce>,
    external_moments: Vec<PairMoment>,
    internal_moments: Vec<PairMoment>,
    unbalanced_moments: BTreeMap<ParticleId, ParticleMoment>,
}

impl ForceRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.pair_forces.clear();
        self.total_forces.clear();
        self.external_forces.clear();
        self.external_moments.clear();
        self.internal_moments.clear();
        self.unbalanced_moments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pair_forces.is_empty()
            && self.total_forces.is_empty()
            && self.external_forces.is_empty()
            && self.external_moments.is_empty()
            && self.internal_moments.is_empty()
            && self.unbalanced_moments.is_empty()
    }

    /// Logs a pair force in the register selected by `channel`.
    pub fn record_force(&mut self, channel: Option<ForceChannel>, entry: PairForce) {
        match channel {
            Some(ForceChannel::Internal) => self.pair_forces.push(entry),
            Some(ForceChannel::External) => self.external_forces.push(entry),
            None => {}
        }
    }

    /// Logs a pair moment in the register selected by `channel`.
    pub fn record_moment(&mut self, channel: Option<ForceChannel>, entry: PairMoment) {
        match channel {
            Some(ForceChannel::Internal) => self.internal_moments.push(entry),
            Some(ForceChannel::External) => self.external_moments.push(entry),
            None => {}
        }
    }

    /// Logs the net force of a particle, replacing an earlier entry for it.
    pub fn record_total_force(&mut self, entry: ParticleForce) {
        self.total_forces.insert(entry.target, entry);
    }

    /// Logs the net torque of a particle, replacing an earlier entry for it.
    pub fn record_unbalanced_moment(&mut self, entry: ParticleMoment) {
        self.unbalanced_moments.insert(entry.target, entry);
    }

    pub fn pair_forces(&self) -> &[PairForce] {
        &self.pair_forces
    }

    pub fn total_forces(&self) -> impl Iterator<Item = &ParticleForce> {
        self.total_forces.values()
    }

    pub fn total_force(&self, id: ParticleId) -> Option<&ParticleForce> {
        self.total_forces.get(&id)
    }

    pub fn external_forces(&self) -> &[PairForce] {
        &self.external_forces
    }

    pub fn external_moments(&self) -> &[PairMoment] {
        &self.external_moments
    }

    pub fn internal_moments(&self) -> &[PairMoment] {
        &self.internal_moments
    }

    pub fn unbalanced_moments(&self) -> impl Iterator<Item = &ParticleMoment> {
        self.unbalanced_moments.values()
    }

    /// Largest `|F(a,b) + F(b,a)|` over ordered pairs of the internal register.
    ///
    /// A correct pair law leaves this at rounding level; consumers rely on it without
    /// checking.
    pub fn reciprocity_defect(&self) -> f64 {
        let mut sums: HashMap<(ParticleId, ParticleId), DVec2> = HashMap::new();
        for entry in &self.pair_forces {
            *sums.entry((entry.target, entry.source)).or_default() += entry.force;
        }
        sums.iter()
            .map(|(&(target, source), &force)| {
                let reverse = sums.get(&(source, target)).copied().unwrap_or_default();
                (force + reverse).length()
            })
            .fold(0.0, f64::max)
    }
}
