//! Granular Shear – a 2D frictional disk kernel for Rust.
//!
//! The crate simulates an ensemble of soft frictional disks in a periodic box driven by
//! Lees-Edwards shear, and turns the forces recorded during each step into macroscopic
//! stress tensors. Contact laws, integration, geometry and stress evaluation live in
//! separate modules so the driver can sequence them freely.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod stress;
pub mod utils;
pub mod world;

pub use glam::{DMat2, DVec2};

pub use collision::{
    broadphase::BroadPhase,
    lees_edwards::{BoundaryModel, Frame, PairGeometry},
};
pub use core::{
    contact::{Contact, ContactSet, PairKey},
    particle::Particle,
    point::Point,
    types::{ContactModel, InterfaceType, MaterialModel, ParticleId},
};
pub use dynamics::{
    central::{CentralLaw, TensileLaw},
    forces::{ForceChannel, ForceRegister},
    friction::{FrictionLaw, PermanentLinkLaw},
    integrator::Integrator,
};
pub use error::{Result, ShearError};
pub use stress::{StressEvaluator, StressTensor, StressTensors};
pub use utils::{Diagnostics, StepProfiler};
pub use world::Ensemble;

/// High-level convenience wrapper that owns an [`Ensemble`] and evaluates its stress.
pub struct ShearSimulation {
    ensemble: Ensemble,
    evaluator: StressEvaluator,
}

impl ShearSimulation {
    /// Wraps an ensemble; the evaluator uses its box size.
    pub fn new(ensemble: Ensemble) -> Self {
        let evaluator = StressEvaluator::for_frame(ensemble.frame());
        Self {
            ensemble,
            evaluator,
        }
    }

    /// Advances one step and returns the stress it produced.
    pub fn step(&mut self, dt: f64, cool_factor: f64) -> Result<StressTensors> {
        self.ensemble.step(dt, cool_factor)?;
        Ok(self.evaluate())
    }

    /// Evaluates the register of the last step.
    pub fn evaluate(&self) -> StressTensors {
        self.evaluator.evaluate(
            self.ensemble.register(),
            self.ensemble.movable_particles(),
            self.ensemble.shear_rate(),
        )
    }

    /// Changes the imposed shear rate, e.g. for an oscillatory schedule.
    pub fn set_shear_rate(&mut self, rate: f64) {
        self.ensemble.set_shear_rate(rate);
    }

    /// Simulated time in seconds.
    pub fn time(&self) -> f64 {
        self.ensemble.time()
    }

    /// Accumulated strain.
    pub fn strain(&self) -> f64 {
        self.ensemble.shear()
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn ensemble_mut(&mut self) -> &mut Ensemble {
        &mut self.ensemble
    }

    pub fn evaluator(&self) -> &StressEvaluator {
        &self.evaluator
    }
}
