use std::f64::consts::TAU;
use std::time::Instant;

use crate::simulation::engine::Engine;
use crate::simulation::lifecycle::prune;
use crate::simulation::params::Parameters;
use crate::simulation::units::{NVec2, Scale};
use crate::simulation::world::World;

/// Non-overlapping spawn points on concentric rings around the origin
/// (display units, 40 px apart so the largest planets never touch)
fn ring_points(n: usize) -> Vec<NVec2> {
    let spacing = 40.0;
    let mut points = Vec::with_capacity(n);
    let mut r = 100.0;
    while points.len() < n {
        let per_ring = ((TAU * r) / spacing).floor() as usize;
        for k in 0..per_ring {
            if points.len() == n {
                break;
            }
            let a = TAU * k as f64 / per_ring as f64;
            points.push(NVec2::new(r * a.cos(), r * a.sin()));
        }
        r += spacing;
    }
    points
}

/// World with the sun at the origin and `n` planets
fn make_world(n: usize) -> World {
    let params = Parameters { scale: Scale::new(30.0), ..Parameters::default() };
    let mut world = World::with_seed(params, Engine::default(), 42);
    world.create_sun(NVec2::zeros(), 60.0);
    for p in ring_points(n) {
        world.spawn_planet_at(p);
    }
    world
}

/// Time full steps (gravity + integrate + refresh + prune) for a range of n
pub fn bench_step() {
    let ns = [50, 100, 200, 400, 800, 1600, 3200];
    let steps = 10;

    for n in ns {
        let mut world = make_world(n);
        let dt = world.engine().fixed_step;

        // Warm-up
        world.step(dt);

        let t0 = Instant::now();
        for _ in 0..steps {
            world.step(dt);
        }
        let per_step = t0.elapsed().as_secs_f64() / steps as f64;

        println!("N = {n:5}, alive = {:5}, step = {:8.6} s", world.planets().len(), per_step);
    }
}

/// Time `prune` alone over a settled population, repeated on fresh copies of
/// the backend and planet set. Prints CSV for graphing
pub fn bench_prune() {
    println!("N,prune_ms");

    let reps = 5;
    for n in (100..=3200).step_by(100) {
        let mut world = make_world(n);
        world.step(world.engine().fixed_step);
        let Some(sun) = world.sun().cloned() else {
            continue;
        };

        let mut total = 0.0;
        for _ in 0..reps {
            let mut backend = world.backend().clone();
            let mut planets = world.planets().to_vec();

            let t0 = Instant::now();
            prune(&mut backend, &sun, &mut planets);
            total += t0.elapsed().as_secs_f64();
        }

        println!("{},{:.6}", n, total * 1000.0 / reps as f64);
    }
}
