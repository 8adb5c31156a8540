use glam::DVec2;
use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    collision::{broadphase::BroadPhase, lees_edwards::Frame},
    config::DEFAULT_RNG_SEED,
    core::{
        contact::ContactSet,
        particle::Particle,
        types::{ContactModel, ParticleId},
    },
    dynamics::{
        forces::{ForceRegister, ParticleForce, ParticleMoment},
        friction::tangential_speed,
        integrator::Integrator,
    },
    error::{Result, ShearError},
    utils::{
        logging::{Diagnostics, ScopedTimer},
        profiling::{PhaseTimer, StepProfiler},
    },
};

mod contact_forces;
mod links;

use contact_forces::{VisitContext, is_mobile, pair_mut};

/// Ensemble of frictional disks in a sheared periodic box.
///
/// A step runs four phases in order: [`Ensemble::reset_forces`],
/// [`Ensemble::compute_forces`], [`Ensemble::integrate_acceleration`] and
/// [`Ensemble::integrate_movement`]. [`Ensemble::step`] runs all four.
pub struct Ensemble {
    particles: Vec<Particle>,
    contacts: ContactSet,
    register: ForceRegister,
    frame: Frame,
    pub model: ContactModel,
    pub integrator: Integrator,
    broadphase: BroadPhase,
    wall_driven: bool,
    time: f64,
    rng: StdRng,
    diagnostics: Diagnostics,
    profiler: StepProfiler,
}

impl Ensemble {
    /// Creates an empty ensemble writing its forces into `register`.
    pub fn new(frame: Frame, model: ContactModel, register: ForceRegister) -> Self {
        Self {
            particles: Vec::new(),
            contacts: ContactSet::new(),
            register,
            frame,
            model,
            integrator: Integrator::new(),
            broadphase: BroadPhase::new(),
            wall_driven: false,
            time: 0.0,
            rng: StdRng::seed_from_u64(DEFAULT_RNG_SEED),
            diagnostics: Diagnostics::default(),
            profiler: StepProfiler::default(),
        }
    }

    /// Reseeds the generator used for coincident centres.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_particles<I>(mut self, particles: I) -> Result<Self>
    where
        I: IntoIterator<Item = Particle>,
    {
        for particle in particles {
            self.add_particle(particle)?;
        }
        Ok(self)
    }

    /// Adds a particle and returns the id it is known by from now on.
    pub fn add_particle(&mut self, mut particle: Particle) -> Result<ParticleId> {
        let index = self.particles.len();
        let id = ParticleId::from_index(index).ok_or(ShearError::TooManyParticles(index))?;
        particle.id = id;
        self.particles.push(particle);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index())
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.get_mut(id.index())
    }

    fn checked(&self, id: ParticleId) -> Result<&Particle> {
        self.particle(id).ok_or(ShearError::UnknownParticle(id))
    }

    /// Particles that follow their own dynamics.
    pub fn movable_particles(&self) -> impl Iterator<Item = &Particle> {
        let (wall_driven, frame) = (self.wall_driven, self.frame);
        self.particles
            .iter()
            .filter(move |p| is_mobile(wall_driven, &frame, p))
    }

    pub fn is_movable(&self, id: ParticleId) -> bool {
        self.particle(id)
            .is_some_and(|p| is_mobile(self.wall_driven, &self.frame, p))
    }

    pub fn contacts(&self) -> &ContactSet {
        &self.contacts
    }

    pub fn register(&self) -> &ForceRegister {
        &self.register
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn profiler(&self) -> &StepProfiler {
        &self.profiler
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn shear(&self) -> f64 {
        self.frame.shear
    }

    pub fn shear_rate(&self) -> f64 {
        self.frame.shear_rate
    }

    pub fn wall_driven(&self) -> bool {
        self.wall_driven
    }

    /// Drives the shear through the bottom and top rows of particles instead of the images.
    pub fn set_wall_driven(&mut self, enabled: bool) {
        self.wall_driven = enabled;
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.broadphase.set_parallel(enabled);
    }

    pub fn set_shear(&mut self, shear: f64) {
        self.frame.shear = shear;
    }

    /// Changes the imposed shear rate, carrying every particle along with the new flow.
    pub fn set_shear_rate(&mut self, rate: f64) {
        let delta = rate - self.frame.shear_rate;
        if delta == 0.0 {
            return;
        }
        for particle in &mut self.particles {
            self.integrator
                .apply_shear_rate_change(particle, &self.frame, delta);
        }
        self.frame.shear_rate = rate;
        debug!("shear rate set to {rate} 1/s (change {delta})");
    }

    /// Sets the blend between Hookean and 1/d repulsion on every particle.
    pub fn set_central_repulsion_coefficient(&mut self, coefficient: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&coefficient) {
            return Err(ShearError::InvalidRepulsionCoefficient(coefficient));
        }
        for particle in &mut self.particles {
            particle.set_repulsion_coefficient(coefficient)?;
        }
        Ok(())
    }

    /// Empties the register and the force and torque accumulators.
    pub fn reset_forces(&mut self) {
        self.register.reset();
        for particle in &mut self.particles {
            particle.clear_accumulators();
        }
    }

    /// Updates the neighbor relations and accumulates every contact force.
    pub fn compute_forces(&mut self) {
        let _timer = ScopedTimer::new("ensemble::compute_forces");
        let Self {
            particles,
            contacts,
            register,
            frame,
            model,
            broadphase,
            wall_driven,
            rng,
            diagnostics,
            profiler,
            ..
        } = self;

        {
            let _phase = PhaseTimer::new(&mut profiler.neighbor_time);
            let update = broadphase.update(particles, frame, contacts);
            if update.created + update.removed > 0 {
                log::trace!(
                    "neighbors: {} overlapping, {} created, {} removed",
                    update.overlapping,
                    update.created,
                    update.removed
                );
            }
        }

        let _phase = PhaseTimer::new(&mut profiler.force_time);
        if *wall_driven {
            let wall_speed = 0.5 * frame.shear_rate * frame.height();
            for particle in particles.iter_mut() {
                if !is_mobile(true, frame, particle) {
                    let top = particle.position().y > 0.5 * frame.height();
                    let speed = if top { wall_speed } else { -wall_speed };
                    particle.point.velocity = DVec2::new(speed, 0.0);
                }
            }
        }

        let context = VisitContext {
            model,
            frame,
            wall_driven: *wall_driven,
        };
        let count = particles.len();
        for (key, contact) in contacts.iter_mut() {
            let (a, b) = (key.low().index(), key.high().index());
            if key.is_self_pair() || b >= count {
                diagnostics.dangling_relation(key.low(), key.high());
                continue;
            }
            let (first, second) = pair_mut(particles, a, b);
            let geometry = frame.pair_geometry(&first.point, &second.point, rng);
            if geometry.degenerate {
                diagnostics.degenerate_direction(first.id, second.id);
            }
            let tangential = context.tangential_force(contact, &geometry, first, second);
            context.visit(register, contact, &geometry, tangential, first, second);
            context.visit(register, contact, &geometry.reversed(), tangential, second, first);
        }
    }

    /// Applies the contact forces of `source` on `target` for a single ordered visit.
    ///
    /// Returns false, and changes nothing, when the pair has no recorded contact.
    pub fn apply_pair_force(&mut self, target: ParticleId, source: ParticleId) -> bool {
        let count = self.particles.len();
        let known = target != source && target.index() < count && source.index() < count;
        let Some(contact) = self.contacts.get_mut(target, source).filter(|_| known) else {
            self.diagnostics.missing_relation(target, source);
            return false;
        };
        let (target, source) = pair_mut(&mut self.particles, target.index(), source.index());
        let geometry = self
            .frame
            .pair_geometry(&target.point, &source.point, &mut self.rng);
        if geometry.degenerate {
            self.diagnostics.degenerate_direction(target.id, source.id);
        }
        let context = VisitContext {
            model: &self.model,
            frame: &self.frame,
            wall_driven: self.wall_driven,
        };
        let tangential = context.tangential_force(contact, &geometry, target, source);
        context.visit(&mut self.register, contact, &geometry, tangential, target, source);
        true
    }

    /// Converts forces and torques into velocities, records them, and cools.
    pub fn integrate_acceleration(&mut self, dt: f64, cool_factor: f64) {
        let _timer = ScopedTimer::new("ensemble::integrate_acceleration");
        let Self {
            particles,
            register,
            frame,
            integrator,
            wall_driven,
            profiler,
            ..
        } = self;
        let _phase = PhaseTimer::new(&mut profiler.acceleration_time);

        for particle in particles.iter_mut() {
            let mobile = is_mobile(*wall_driven, frame, particle);
            if mobile {
                let force = integrator.integrate_velocity(particle, dt);
                register.record_total_force(ParticleForce {
                    target: particle.id,
                    force,
                    position: particle.position(),
                });
            } else {
                particle.force = DVec2::ZERO;
            }

            let moment = integrator.integrate_rotation(particle, dt);
            if mobile {
                register.record_unbalanced_moment(ParticleMoment {
                    target: particle.id,
                    moment,
                });
                integrator.cool(particle, frame, cool_factor);
            }
        }
    }

    /// Advances positions, friction springs, boundary images, and the accumulated shear.
    pub fn integrate_movement(&mut self, dt: f64) {
        let _timer = ScopedTimer::new("ensemble::integrate_movement");
        let Self {
            particles,
            contacts,
            frame,
            integrator,
            rng,
            profiler,
            time,
            ..
        } = self;
        let _phase = PhaseTimer::new(&mut profiler.movement_time);

        let count = particles.len();
        for (key, contact) in contacts.iter_mut() {
            let (a, b) = (key.low().index(), key.high().index());
            if !contact.interface.stores_stretch() || key.is_self_pair() || b >= count {
                continue;
            }
            let (first, second) = (&particles[a], &particles[b]);
            // coincident centres have no tangent until the next force pass draws one
            if frame.shortest_image(second.position() - first.position()).delta == DVec2::ZERO {
                continue;
            }
            let geometry = frame.pair_geometry(&first.point, &second.point, rng);
            contact.accumulate_stretch(tangential_speed(&geometry, first, second), dt);
        }

        for particle in particles.iter_mut() {
            integrator.integrate_position(particle, dt);
            let wrapped = frame.wrap_to_box(particle.position(), particle.velocity());
            particle.point.position = wrapped.position;
            particle.point.velocity = wrapped.velocity;
        }

        frame.advance_shear(dt);
        *time += dt;
    }

    /// Runs one full step.
    pub fn step(&mut self, dt: f64, cool_factor: f64) -> Result<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ShearError::InvalidTimeStep(dt));
        }
        if !(0.0..=1.0).contains(&cool_factor) {
            return Err(ShearError::InvalidCoolingFactor(cool_factor));
        }
        self.reset_forces();
        self.compute_forces();
        self.integrate_acceleration(dt, cool_factor);
        self.integrate_movement(dt);

        self.profiler.steps += 1;
        self.profiler.particle_count = self.particles.len();
        self.profiler.contact_count = self.contacts.len();
        Ok(())
    }

    /// Removes any net drift by subtracting the mean velocity.
    pub fn correct_linear_drift(&mut self) {
        if self.particles.is_empty() {
            return;
        }
        let mean = self
            .particles
            .iter()
            .map(Particle::velocity)
            .sum::<DVec2>()
            / self.particles.len() as f64;
        for particle in &mut self.particles {
            particle.point.velocity -= mean;
        }
    }

    /// Uncompressed particle area over box area.
    pub fn packing_fraction(&self) -> f64 {
        self.particles.iter().map(Particle::area).sum::<f64>() / self.frame.area()
    }

    pub fn total_momentum(&self) -> DVec2 {
        self.particles.iter().map(Particle::momentum).sum()
    }

    /// Orbital plus spin angular momentum about the origin.
    pub fn total_angular_momentum(&self) -> f64 {
        self.particles.iter().map(Particle::angular_momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Counts contacts referring to particles outside the ensemble.
    ///
    /// The undirected contact list cannot hold one-sided relations; what remains to check is
    /// that both ends of every edge exist.
    pub fn validate_contacts(&mut self) -> usize {
        let count = self.particles.len();
        let mut broken = 0;
        for key in self.contacts.keys() {
            if key.is_self_pair() || key.high().index() >= count {
                self.diagnostics.dangling_relation(key.low(), key.high());
                broken += 1;
            }
        }
        broken
    }
}
