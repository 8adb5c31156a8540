use log::{Level, log_enabled, warn};
use serde::Serialize;

use crate::core::types::ParticleId;
use std::time::Instant;

/// Simple scoped timer tracing the duration of a simulation phase.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("⏱️ start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("⏱️ end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Counters for non-fatal anomalies met while stepping.
///
/// Every anomaly is logged when it is counted; the step carries on without the affected
/// pair contribution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Pair force requested for two particles without a recorded contact.
    pub missing_relations: u64,
    /// Contacts that refer to a particle the ensemble does not hold.
    pub dangling_relations: u64,
    /// Pairs with coincident centres that needed a random direction.
    pub degenerate_directions: u64,
}

impl Diagnostics {
    pub fn missing_relation(&mut self, target: ParticleId, source: ParticleId) {
        self.missing_relations += 1;
        warn!("No contact between {target} and {source}; pair force skipped");
    }

    pub fn dangling_relation(&mut self, a: ParticleId, b: ParticleId) {
        self.dangling_relations += 1;
        warn!("Contact {a}-{b} refers to an unknown particle; skipped");
    }

    pub fn degenerate_direction(&mut self, a: ParticleId, b: ParticleId) {
        self.degenerate_directions += 1;
        if log_enabled!(Level::Debug) {
            log::debug!("Particles {a} and {b} share a centre; using a random direction");
        }
    }
}
