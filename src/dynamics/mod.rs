//! Contact force laws, force bookkeeping, and time integration.

pub mod central;
pub mod forces;
pub mod friction;
pub mod integrator;

pub use central::{CentralLaw, NormalForce, TensileLaw};
pub use forces::{
    ForceChannel, ForceRegister, PairForce, PairMoment, ParticleForce, ParticleMoment,
};
pub use friction::{
    FrictionLaw, PermanentLinkLaw, TangentialCouple, split_couple, tangential_speed,
};
pub use integrator::Integrator;
