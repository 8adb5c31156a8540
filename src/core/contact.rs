//! Undirected contact edges between particles.
//!
//! A contact is stored once per unordered pair, so both partners read and write the same
//! interface state and friction position.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{InterfaceType, ParticleId};

/// Unordered pair of particle ids, stored with the lower id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: ParticleId,
    high: ParticleId,
}

impl PairKey {
    pub fn new(a: ParticleId, b: ParticleId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> ParticleId {
        self.low
    }

    pub fn high(&self) -> ParticleId {
        self.high
    }

    /// The partner of `id`, if `id` belongs to the pair.
    pub fn other(&self, id: ParticleId) -> Option<ParticleId> {
        if id == self.low {
            Some(self.high)
        } else if id == self.high {
            Some(self.low)
        } else {
            None
        }
    }

    pub fn is_self_pair(&self) -> bool {
        self.low == self.high
    }
}

/// Shared state of a contact.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub interface: InterfaceType,
    /// Tangential spring stretch in µm.
    pub friction_position: f64,
    /// Separation at which a permanent link carries no central force.
    pub equilibrium_distance: f64,
}

impl Contact {
    /// Fresh frictional contact.
    pub fn stick() -> Self {
        Self::default()
    }

    pub fn permanent(equilibrium_distance: f64) -> Self {
        Self {
            interface: InterfaceType::Permanent,
            friction_position: 0.0,
            equilibrium_distance,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.interface == InterfaceType::Permanent
    }

    /// Switches to sliding and releases the tangential spring.
    pub fn slip(&mut self) {
        self.interface = InterfaceType::Slip;
        self.friction_position = 0.0;
    }

    /// Integrates the tangential spring while the interface holds.
    pub fn accumulate_stretch(&mut self, tangential_speed: f64, dt: f64) {
        if self.interface.stores_stretch() {
            self.friction_position += tangential_speed * dt;
        }
    }
}

/// Deterministically ordered set of contacts keyed by unordered pair.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ContactSet {
    contacts: BTreeMap<PairKey, Contact>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, a: ParticleId, b: ParticleId) -> Option<&Contact> {
        self.contacts.get(&PairKey::new(a, b))
    }

    pub fn get_mut(&mut self, a: ParticleId, b: ParticleId) -> Option<&mut Contact> {
        self.contacts.get_mut(&PairKey::new(a, b))
    }

    pub fn contains(&self, a: ParticleId, b: ParticleId) -> bool {
        self.contacts.contains_key(&PairKey::new(a, b))
    }

    /// Inserts a stick contact unless the pair already has one. Returns whether it was created.
    pub fn insert_stick(&mut self, key: PairKey) -> bool {
        if self.contacts.contains_key(&key) {
            return false;
        }
        self.contacts.insert(key, Contact::stick());
        true
    }

    pub fn insert(&mut self, key: PairKey, contact: Contact) -> Option<Contact> {
        self.contacts.insert(key, contact)
    }

    pub fn remove(&mut self, key: &PairKey) -> Option<Contact> {
        self.contacts.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &Contact)> {
        self.contacts.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PairKey, &mut Contact)> {
        self.contacts.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PairKey> {
        self.contacts.keys()
    }

    /// Keeps only the contacts for which `keep` returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&PairKey, &mut Contact) -> bool,
    {
        self.contacts.retain(keep);
    }

    /// Partners of `id` together with the shared contact.
    pub fn partners_of(&self, id: ParticleId) -> impl Iterator<Item = (ParticleId, &Contact)> {
        self.contacts
            .iter()
            .filter_map(move |(key, contact)| key.other(id).map(|other| (other, contact)))
    }

    pub fn permanent_count(&self) -> usize {
        self.contacts.values().filter(|c| c.is_permanent()).count()
    }
}
