//! The simulated world: one sun, the live planets, and the step sequence.
//!
//! Every fixed step runs, in this order:
//! 1. force terms queue sun gravity on every live planet,
//! 2. the backend integrates by the fixed step,
//! 3. each planet pulls its display state back from the backend,
//! 4. collided planets are pruned.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::simulation::backend::{PhysicsBackend, RigidBodyArena};
use crate::simulation::body::{CelestialBody, Planet, PlanetId, Sun};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{ForceSet, ForceTerm, SunGravity};
use crate::simulation::lifecycle::{prune, spawn_planet, PruneReport};
use crate::simulation::params::Parameters;
use crate::simulation::units::NVec2;

pub struct World<B: PhysicsBackend = RigidBodyArena> {
    backend: B,
    params: Parameters,
    engine: Engine,
    forces: ForceSet<B>,
    sun: Option<Sun>,
    planets: Vec<Planet>,
    rng: ChaChaRng,
    next_id: u32,
    t: f64,
    steps: u64,
}

impl World<RigidBodyArena> {
    /// World on the built-in zero-gravity arena, seeded deterministically
    pub fn with_seed(params: Parameters, engine: Engine, seed: u64) -> Self {
        World::new(RigidBodyArena::default(), params, engine, ChaChaRng::seed_from_u64(seed))
    }
}

impl<B: PhysicsBackend> World<B> {
    /// Empty world (no sun yet) with sun gravity as its only force term
    pub fn new(backend: B, params: Parameters, engine: Engine, rng: ChaChaRng) -> Self {
        let forces = ForceSet::new().with(SunGravity {
            g: params.g,
            sun_mass: params.sun_mass,
            softening_floor: params.softening_floor,
            scale: params.scale,
        });

        Self {
            backend,
            params,
            engine,
            forces,
            sun: None,
            planets: Vec::new(),
            rng,
            next_id: 0,
            t: 0.0,
            steps: 0,
        }
    }

    /// Register an extra force term, applied after sun gravity every step
    pub fn add_force<T>(&mut self, term: T)
    where
        T: ForceTerm<B> + Send + Sync + 'static,
    {
        let forces = std::mem::take(&mut self.forces);
        self.forces = forces.with(term);
    }

    /// Place the sun (display units). Only the first call has any effect.
    pub fn create_sun(&mut self, position: NVec2, radius: f64) -> bool {
        if self.sun.is_some() {
            log::warn!("sun already exists, ignoring second create_sun");
            return false;
        }
        let sun = Sun::create(&mut self.backend, &self.params.scale, position, radius);
        log::info!(
            "sun created at ({:.1}, {:.1}) with radius {:.1}",
            position.x,
            position.y,
            radius
        );
        self.sun = Some(sun);
        true
    }

    /// Spawn a planet at a display point
    ///
    /// Returns `None` without touching the world when there is no sun or the
    /// point is inside the sun's spawn clearance.
    pub fn spawn_planet_at(&mut self, position: NVec2) -> Option<PlanetId> {
        let Some(sun) = self.sun.as_ref() else {
            log::debug!("rejected spawn: no sun yet");
            return None;
        };

        let id = PlanetId(self.next_id);
        let planet = spawn_planet(&mut self.backend, &mut self.rng, &self.params, sun, id, position)?;
        self.next_id += 1;

        log::info!(
            "planet {} spawned at ({:.1}, {:.1}) radius {:.1}",
            id.0,
            position.x,
            position.y,
            planet.radius()
        );
        self.planets.push(planet);
        Some(id)
    }

    /// Advance exactly one tick of `dt` seconds
    pub fn step(&mut self, dt: f64) -> PruneReport {
        let Some(sun) = self.sun.as_ref() else {
            // Nothing can orbit without a sun
            self.backend.step(dt, self.engine.iterations);
            self.t += dt;
            self.steps += 1;
            return PruneReport::default();
        };

        self.forces.apply(sun, &self.planets, &mut self.backend);

        self.backend.step(dt, self.engine.iterations);
        self.t += dt;
        self.steps += 1;

        for p in self.planets.iter_mut() {
            p.refresh(&self.backend, &self.params.scale);
        }

        let report = prune(&mut self.backend, sun, &mut self.planets);
        log::trace!(
            "step {}: {} planets alive, {} removed",
            self.steps,
            self.planets.len(),
            report.removed()
        );
        report
    }

    /// Destroy every backend body owned by the world
    pub fn shutdown(&mut self) {
        for p in self.planets.drain(..) {
            self.backend.destroy_body(p.handle());
        }
        if let Some(sun) = self.sun.take() {
            self.backend.destroy_body(sun.handle());
        }
        log::info!("world shut down after {} steps ({:.2} s simulated)", self.steps, self.t);
    }

    pub fn sun(&self) -> Option<&Sun> {
        self.sun.as_ref()
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    /// Mutable planet access for presentation (ring dirty flags)
    pub fn planets_mut(&mut self) -> &mut [Planet] {
        &mut self.planets
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id() == id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Simulated time in seconds
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }
}
