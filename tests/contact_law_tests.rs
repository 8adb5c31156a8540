use approx::{assert_abs_diff_eq, assert_relative_eq};
use granular_shear::*;

const A: ParticleId = ParticleId(0);
const B: ParticleId = ParticleId(1);

fn pair(offset: DVec2, model: ContactModel) -> Ensemble {
    let frame = Frame::lees_edwards(200.0, 200.0).expect("valid box");
    let origin = DVec2::new(100.0, 100.0);
    let particles = [origin, origin + offset]
        .map(|position| Particle::new(position, 10.0, 1.0).expect("valid particle"));
    Ensemble::new(frame, model, ForceRegister::new())
        .with_particles(particles)
        .expect("room for particles")
}

fn forces(ensemble: &mut Ensemble) -> (Particle, Particle) {
    ensemble.reset_forces();
    ensemble.compute_forces();
    (
        ensemble.particle(A).expect("first particle").clone(),
        ensemble.particle(B).expect("second particle").clone(),
    )
}

#[test]
fn touching_disks_exert_no_force() {
    let mut ensemble = pair(DVec2::new(20.0, 0.0), ContactModel::default());
    let (a, b) = forces(&mut ensemble);
    assert!(ensemble.contacts().is_empty());
    assert_eq!(a.force, DVec2::ZERO);
    assert_eq!(b.force, DVec2::ZERO);

    let mut ensemble = pair(DVec2::new(20.0 - 1e-9, 0.0), ContactModel::frictionless(1.0));
    let (a, _) = forces(&mut ensemble);
    assert_eq!(ensemble.contacts().len(), 1);
    assert!(a.force.length() < 1e-8);
}

#[test]
fn separated_contact_ignores_approach_speed() {
    let mut ensemble = pair(DVec2::new(18.0, 0.0), ContactModel::default());
    forces(&mut ensemble);
    assert_eq!(ensemble.contacts().len(), 1);

    let b = ensemble.particle_mut(B).expect("second particle");
    b.point.position = DVec2::new(125.0, 100.0);
    b.point.velocity = DVec2::new(-50.0, 3.0);
    ensemble.reset_forces();
    assert!(ensemble.apply_pair_force(A, B));

    let a = ensemble.particle(A).expect("first particle");
    assert_eq!(a.force, DVec2::ZERO);
    assert_eq!(a.torque, 0.0);
    assert!(ensemble.register().pair_forces().is_empty());
    assert!(ensemble.register().internal_moments().is_empty());
    let contact = ensemble.contacts().get(A, B).expect("contact");
    assert_eq!(contact.interface, InterfaceType::Stick);
}

#[test]
fn repulsion_stays_finite_at_full_overlap() {
    let mut ensemble = pair(DVec2::new(1e-3, 0.0), ContactModel::frictionless(1.0));
    ensemble
        .set_central_repulsion_coefficient(1.0)
        .expect("valid coefficient");
    let (a, b) = forces(&mut ensemble);
    assert!(a.force.is_finite());
    assert!(a.force.x < -1000.0);
    assert_eq!(a.force, -b.force);
}

#[test]
fn coincident_centres_get_a_random_but_reciprocal_direction() {
    let mut ensemble = pair(DVec2::ZERO, ContactModel::frictionless(1.0)).with_seed(7);
    let (a, b) = forces(&mut ensemble);
    assert_eq!(ensemble.diagnostics().degenerate_directions, 1);
    assert_relative_eq!(a.force.length(), 20.0, max_relative = 1e-12);
    assert_abs_diff_eq!((a.force + b.force).length(), 0.0, epsilon = 1e-12);
}

#[test]
fn large_tangential_speed_slips_and_releases_the_spring() {
    let mut ensemble = pair(DVec2::new(18.0, 0.0), ContactModel::default());
    ensemble
        .particle_mut(B)
        .expect("second particle")
        .point
        .velocity = DVec2::new(0.0, 1000.0);

    let (a, b) = forces(&mut ensemble);
    let contact = *ensemble.contacts().get(A, B).expect("contact");
    assert_eq!(contact.interface, InterfaceType::Slip);
    assert_eq!(contact.friction_position, 0.0);

    // cap = μ·k·overlap = 0.1 · 2
    assert_relative_eq!(a.force.y, 0.2, max_relative = 1e-9);
    assert_relative_eq!(b.force.y, -0.2, max_relative = 1e-9);
    assert_relative_eq!(a.force.x, -2.0, max_relative = 1e-9);
    assert_relative_eq!(a.torque, 1.8, max_relative = 1e-9);
    assert_relative_eq!(b.torque, 1.8, max_relative = 1e-9);
}

#[test]
fn slow_sliding_sticks_and_stretches_the_spring() {
    let mut ensemble = pair(DVec2::new(18.0, 0.0), ContactModel::default());
    ensemble
        .particle_mut(B)
        .expect("second particle")
        .point
        .velocity = DVec2::new(0.0, 0.01);

    forces(&mut ensemble);
    ensemble.integrate_movement(0.1);
    ensemble
        .particle_mut(B)
        .expect("second particle")
        .point
        .position = DVec2::new(118.0, 100.0);
    let contact = *ensemble.contacts().get(A, B).expect("contact");
    assert_eq!(contact.interface, InterfaceType::Stick);
    assert_relative_eq!(contact.friction_position, 1e-3, max_relative = 1e-9);

    let (a, _) = forces(&mut ensemble);
    // ν_t·v_t + k_t·stretch
    assert_relative_eq!(a.force.y, 1e-4 + 1e-3, max_relative = 1e-6);
    assert_eq!(
        ensemble.contacts().get(A, B).expect("contact").interface,
        InterfaceType::Stick
    );
}

#[test]
fn separated_pairs_lose_their_contact() {
    let mut ensemble = pair(DVec2::new(18.0, 0.0), ContactModel::default());
    forces(&mut ensemble);
    assert_eq!(ensemble.contacts().len(), 1);

    ensemble.particle_mut(B).expect("second particle").point.position.x += 5.0;
    forces(&mut ensemble);
    assert!(ensemble.contacts().is_empty());
}

#[test]
fn permanent_link_pulls_stretched_partners_together() {
    let mut ensemble = pair(DVec2::new(24.0, 0.0), ContactModel::frictionless(1.0));
    ensemble
        .establish_permanent_link(A, B)
        .expect("valid link");

    let (a, b) = forces(&mut ensemble);
    assert_relative_eq!(a.force.x, 4.0, max_relative = 1e-12);
    assert_relative_eq!(b.force.x, -4.0, max_relative = 1e-12);
    assert_eq!(ensemble.contacts().permanent_count(), 1);

    ensemble.model.permanent.tensile = TensileLaw::exponential();
    let (a, _) = forces(&mut ensemble);
    let expected = 4.0 * (1.0 - (-1.0f64).exp());
    assert_relative_eq!(a.force.x, expected, max_relative = 1e-12);

    assert!(ensemble.cut_permanent_link(A, B).expect("known particles"));
    let (a, _) = forces(&mut ensemble);
    assert!(ensemble.contacts().is_empty());
    assert_eq!(a.force, DVec2::ZERO);
}

#[test]
fn link_ratios_scale_the_elastic_pull() {
    let mut model = ContactModel::frictionless(1.0);
    model.permanent.central_ratio = 2.5;
    let mut ensemble = pair(DVec2::new(22.0, 0.0), model);
    ensemble
        .establish_permanent_link(A, B)
        .expect("valid link");
    let (a, _) = forces(&mut ensemble);
    assert_relative_eq!(a.force.x, 5.0, max_relative = 1e-12);
}

#[test]
fn wall_particles_are_driven_and_routed_to_the_external_register() {
    let frame = Frame::lees_edwards(100.0, 100.0).expect("valid box");
    let wall = Particle::new(DVec2::new(50.0, 5.0), 10.0, 1.0).expect("valid particle");
    let bulk = Particle::new(DVec2::new(50.0, 20.0), 10.0, 1.0).expect("valid particle");
    let mut ensemble = Ensemble::new(frame, ContactModel::default(), ForceRegister::new())
        .with_particles([wall, bulk])
        .expect("room for particles");
    ensemble.set_wall_driven(true);
    ensemble.set_shear_rate(1.0);
    assert!(!ensemble.is_movable(A));
    assert!(ensemble.is_movable(B));

    ensemble.reset_forces();
    ensemble.compute_forces();
    assert_eq!(
        ensemble.particle(A).expect("wall").velocity(),
        DVec2::new(-50.0, 0.0)
    );

    let register = ensemble.register();
    assert!(register.pair_forces().is_empty());
    assert!(register.internal_moments().is_empty());
    assert_eq!(register.external_forces().len(), 3);
    assert!(register.external_forces().iter().all(|f| f.target == B));
    assert_eq!(register.external_moments().len(), 2);

    ensemble.integrate_acceleration(0.01, 1.0);
    assert_eq!(ensemble.register().total_forces().count(), 1);
    assert!(ensemble.register().total_force(B).is_some());
    assert_eq!(ensemble.particle(A).expect("wall").velocity(), DVec2::new(-50.0, 0.0));
}

#[test]
fn pair_force_query_without_contact_is_counted() {
    let mut ensemble = pair(DVec2::new(50.0, 0.0), ContactModel::default());
    assert!(!ensemble.apply_pair_force(A, B));
    assert_eq!(ensemble.diagnostics().missing_relations, 1);
    assert_eq!(ensemble.validate_contacts(), 0);

    let mut ensemble = pair(DVec2::new(15.0, 0.0), ContactModel::frictionless(1.0));
    ensemble.reset_forces();
    ensemble.compute_forces();
    ensemble.reset_forces();
    assert!(ensemble.apply_pair_force(A, B));
    let a = ensemble.particle(A).expect("first particle");
    let b = ensemble.particle(B).expect("second particle");
    assert_relative_eq!(a.force.x, -5.0);
    assert_eq!(b.force, DVec2::ZERO);
}
