//! Core types describing particles, contacts, and shared parameters.

pub mod contact;
pub mod particle;
pub mod point;
pub mod types;

pub use contact::{Contact, ContactSet, PairKey};
pub use particle::Particle;
pub use point::Point;
pub use types::{ContactModel, InterfaceType, MaterialModel, ParticleId};
