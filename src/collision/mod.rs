//! Periodic shear geometry and neighbor detection.

pub mod broadphase;
pub mod lees_edwards;

pub use broadphase::{BroadPhase, NeighborUpdate, in_contact};
pub use lees_edwards::{BoundaryModel, Frame, ImageCount, PairGeometry, ShortestImage, Wrapped};
