use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use orrery::simulation::engine::Engine;
use orrery::simulation::params::Parameters;
use orrery::{
    CelestialBody, ForceTerm, NVec2, PhysicsBackend, Planet, RigidBodyArena, Scale, Scenario,
    ScenarioConfig, Sun, World,
};

/// World with the sun at the origin, radius 60, at the given scale
pub fn world_with_sun(pixels_per_meter: f64, seed: u64) -> World {
    let params = Parameters { scale: Scale::new(pixels_per_meter), ..Parameters::default() };
    let mut world = World::with_seed(params, Engine::default(), seed);
    world.create_sun(NVec2::zeros(), 60.0);
    world
}

/// Assert that no survivor touches the sun or another survivor
pub fn assert_no_overlaps(world: &World) {
    let sun = world.sun().unwrap();
    let planets = world.planets();
    for (i, p) in planets.iter().enumerate() {
        assert!(
            (p.position() - sun.position()).norm() >= sun.radius() + p.radius(),
            "planet {:?} overlaps the sun",
            p.id()
        );
        for o in &planets[i + 1..] {
            assert!(
                (p.position() - o.position()).norm() >= p.radius() + o.radius(),
                "planets {:?} and {:?} overlap",
                p.id(),
                o.id()
            );
        }
    }
}

/// Linear drag, `rate` per second, so orbits decay into the sun
struct Drag {
    rate: f64,
}

impl ForceTerm<RigidBodyArena> for Drag {
    fn apply(&self, _sun: &Sun, planets: &[Planet], backend: &mut RigidBodyArena) {
        for p in planets {
            if let (Some(v), Some(m)) = (backend.linear_velocity(p.handle()), backend.mass(p.handle())) {
                backend.apply_force_to_center(p.handle(), -self.rate * m * v);
            }
        }
    }
}

// ==================================================================================
// Spawn tests
// ==================================================================================

#[test]
fn scenario_a_spawn_gets_circular_velocity() {
    let mut world = world_with_sun(1.0, 1);
    let id = world.spawn_planet_at(NVec2::new(200.0, 0.0)).expect("spawn rejected");

    let gm = world.params().gm();
    let v = world.planet(id).unwrap().velocity(world.backend()).unwrap();

    assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(v.y.abs(), (gm / 200.0).sqrt(), epsilon = 1e-9);
}

#[test]
fn spawn_speed_uses_simulation_distance() {
    let mut world = world_with_sun(30.0, 2);
    let spawn = NVec2::new(-90.0, 120.0); // 150 px = 5 m
    let id = world.spawn_planet_at(spawn).unwrap();

    let v = world.planet(id).unwrap().velocity(world.backend()).unwrap();
    assert_relative_eq!(v.norm(), (world.params().gm() / 5.0).sqrt(), epsilon = 1e-9);
    assert_relative_eq!(v.dot(&spawn), 0.0, epsilon = 1e-6);
}

#[test]
fn scenario_b_spawn_inside_sun_is_rejected() {
    let mut world = world_with_sun(1.0, 3);
    assert!(world.spawn_planet_at(NVec2::new(10.0, 0.0)).is_none());
    assert!(world.planets().is_empty());
}

#[test]
fn every_spawn_inside_margin_is_rejected() {
    let mut world = world_with_sun(30.0, 4);
    let mut rng = ChaChaRng::seed_from_u64(99);
    for _ in 0..500 {
        let r: f64 = rng.random_range(0.0..64.9);
        let a: f64 = rng.random_range(0.0..std::f64::consts::TAU);
        assert!(world.spawn_planet_at(NVec2::new(r * a.cos(), r * a.sin())).is_none());
    }
    assert_eq!(world.backend().body_count(), 1);
}

#[test]
fn both_orbit_directions_occur() {
    let mut world = world_with_sun(1.0, 5);
    let mut ccw = 0;
    for k in 0..40 {
        let pos = NVec2::new(0.0, 100.0 + 40.0 * k as f64);
        let id = world.spawn_planet_at(pos).unwrap();
        let v = world.planet(id).unwrap().velocity(world.backend()).unwrap();
        // perp of (0, r) is (-r, 0): counter-clockwise launches go toward -x
        if v.x < 0.0 {
            ccw += 1;
        }
    }
    assert!(ccw > 5 && ccw < 35, "orbit directions are not mixed: {ccw}/40 ccw");
}

#[test]
fn same_seed_gives_same_population() {
    let spawn = |seed| {
        let mut world = world_with_sun(30.0, seed);
        for k in 0..10 {
            world.spawn_planet_at(NVec2::new(100.0 + 50.0 * k as f64, 0.0));
        }
        world.planets().iter().map(|p| p.radius()).collect::<Vec<_>>()
    };
    assert_eq!(spawn(11), spawn(11));
    assert_ne!(spawn(11), spawn(12));
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_pulls_planet_toward_sun() {
    let mut world = world_with_sun(30.0, 6);
    let id = world.spawn_planet_at(NVec2::new(150.0, -200.0)).unwrap();
    let h = world.planet(id).unwrap().handle();

    let x0 = world.backend().position(h).unwrap();
    let v0 = world.backend().linear_velocity(h).unwrap();
    world.step(world.engine().fixed_step);
    let dv = world.backend().linear_velocity(h).unwrap() - v0;

    let to_sun = -x0;
    assert!(dv.dot(&to_sun) > 0.0, "velocity change is not toward the sun");
    assert_relative_eq!(dv.normalize(), to_sun.normalize(), epsilon = 1e-9);

    // |dv| = dt * G * M / r^2
    let dt = world.engine().fixed_step;
    let expected = dt * world.params().gm() / x0.norm_squared();
    assert_relative_eq!(dv.norm(), expected, epsilon = 1e-9);
}

#[test]
fn circular_orbit_stays_near_its_radius() {
    let mut world = world_with_sun(30.0, 7);
    let id = world.spawn_planet_at(NVec2::new(400.0, 0.0)).unwrap();
    let dt = world.engine().fixed_step;
    for _ in 0..600 {
        world.step(dt);
    }
    let p = world.planet(id).expect("planet should survive a circular orbit");
    let r = p.position().norm();
    assert!((r - 400.0).abs() < 40.0, "orbit radius drifted to {r}");
}

// ==================================================================================
// Lifecycle tests
// ==================================================================================

#[test]
fn scenario_c_overlapping_planets_annihilate() {
    let mut world = world_with_sun(1.0, 8);
    let a = world.spawn_planet_at(NVec2::new(200.0, 0.0)).unwrap();
    let b = world.spawn_planet_at(NVec2::new(205.0, 0.0)).unwrap();
    let c = world.spawn_planet_at(NVec2::new(-300.0, 0.0)).unwrap();

    let report = world.step(world.engine().fixed_step);

    assert_eq!(report.collided, vec![(a, b)]);
    assert!(world.planet(a).is_none());
    assert!(world.planet(b).is_none());
    assert!(world.planet(c).is_some());
    assert_eq!(world.backend().body_count(), 2);
}

#[test]
fn scenario_d_falling_planet_is_removed_when_it_first_touches_the_sun() {
    let mut world = world_with_sun(30.0, 9);
    world.add_force(Drag { rate: 1.0 });
    let id = world.spawn_planet_at(NVec2::new(0.0, 400.0)).unwrap();
    let radius = world.planet(id).unwrap().radius();
    let threshold = 60.0 + radius;
    let dt = world.engine().fixed_step;

    let mut removed_at = None;
    for step in 0..2000 {
        let report = world.step(dt);
        match world.planet(id) {
            Some(p) => {
                assert!(report.fell_into_sun.is_empty());
                assert!(p.position().norm() >= threshold, "overlapping planet survived step {step}");
            }
            None => {
                assert_eq!(report.fell_into_sun, vec![id]);
                removed_at = Some(step);
                break;
            }
        }
    }
    assert!(removed_at.is_some(), "planet never reached the sun");
    assert_eq!(world.backend().body_count(), 1);
}

#[test]
fn no_overlaps_survive_any_step() {
    let mut world = world_with_sun(30.0, 10);
    let mut rng = ChaChaRng::seed_from_u64(2024);
    for _ in 0..150 {
        let p = NVec2::new(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0));
        world.spawn_planet_at(p);
    }
    let dt = world.engine().fixed_step;
    for _ in 0..300 {
        world.step(dt);
        assert_no_overlaps(&world);
        assert_eq!(world.backend().body_count(), world.planets().len() + 1);
    }
}

// ==================================================================================
// Driver / scenario tests
// ==================================================================================

fn scenario(seed: u64) -> Scenario {
    let yaml = "engine:\n  fixed_step: 0.25\nsun:\n  x: [0.0, 0.0]\n  radius: 60.0\nplanets:\n  - [300.0, 0.0]\n  - [0.0, -500.0]\n  - [-700.0, 0.0]\n";
    let cfg = ScenarioConfig::from_yaml(yaml).unwrap();
    Scenario::build_scenario(cfg, Some(seed))
}

#[test]
fn scripted_planets_are_spawned_at_build() {
    let s = scenario(1);
    assert!(s.world.sun().is_some());
    assert_eq!(s.world.planets().len(), 3);
}

#[test]
fn results_do_not_depend_on_frame_rate() {
    let mut coarse = scenario(5);
    let mut fine = scenario(5);

    let coarse_steps: usize = (0..8).map(|_| coarse.advance(0.5).len()).sum();
    let fine_steps: usize = (0..32).map(|_| fine.advance(0.125).len()).sum();
    assert_eq!(coarse_steps, 16);
    assert_eq!(fine_steps, 16);

    let a: Vec<_> = coarse.world.planets().iter().map(|p| p.position()).collect();
    let b: Vec<_> = fine.world.planets().iter().map(|p| p.position()).collect();
    assert_eq!(a, b);
}
