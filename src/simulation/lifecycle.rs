//! Planet lifecycle: spawning and collision pruning.
//!
//! Spawning validates the request against the sun, draws the planet's radius
//! and orbit direction from the injected generator and registers a dynamic
//! body. Pruning removes every planet touching the sun and annihilates
//! overlapping planet pairs in a single ordered pass.

use rand::Rng;

use crate::simulation::backend::{BodyDef, PhysicsBackend};
use crate::simulation::body::{
    circular_orbit_velocity, CelestialBody, OrbitDirection, OrbitRing, Planet, PlanetId, Sun,
};
use crate::simulation::params::Parameters;
use crate::simulation::units::{distance, NVec2};

/// Whether `position` (display units) is far enough from the sun to spawn
pub fn spawn_allowed(sun: &Sun, position: NVec2, margin: f64) -> bool {
    distance(position, sun.position()) >= sun.radius() + margin
}

/// Build a planet at `position` (display units) orbiting `sun`
///
/// Returns `None` when the point lies within `sun.radius + margin`.
pub fn spawn_planet<B, R>(
    backend: &mut B,
    rng: &mut R,
    params: &Parameters,
    sun: &Sun,
    id: PlanetId,
    position: NVec2,
) -> Option<Planet>
where
    B: PhysicsBackend,
    R: Rng + ?Sized,
{
    let rules = &params.spawn;
    if !spawn_allowed(sun, position, rules.margin) {
        log::debug!(
            "rejected spawn at ({:.1}, {:.1}): inside sun clearance {:.1}",
            position.x,
            position.y,
            sun.radius() + rules.margin
        );
        return None;
    }

    let scale = &params.scale;
    let radius = rng.random_range(rules.radius_min..=rules.radius_max);
    let direction = OrbitDirection::sample(rng);

    let sun_sim = backend
        .position(sun.handle())
        .unwrap_or_else(|| scale.to_sim(sun.position()));
    let pos_sim = scale.to_sim(position);
    let velocity = circular_orbit_velocity(sun_sim, pos_sim, params.gm(), params.min_orbit_distance, direction);

    let def = BodyDef::dynamic(pos_sim, scale.length_to_sim(radius), rules.density)
        .with_velocity(velocity)
        .with_gravity_scale(0.0);
    let handle = backend.create_body(&def);

    let ring = OrbitRing::new(sun.position(), distance(position, sun.position()), rules.ring_threshold);
    Some(Planet::new(id, handle, position, radius, ring))
}

/// Bodies removed by one pruning pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PruneReport {
    /// Planets that touched the sun
    pub fell_into_sun: Vec<PlanetId>,
    /// Planet pairs that touched each other, in scan order
    pub collided: Vec<(PlanetId, PlanetId)>,
}

impl PruneReport {
    pub fn removed(&self) -> usize {
        self.fell_into_sun.len() + 2 * self.collided.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fell_into_sun.is_empty() && self.collided.is_empty()
    }
}

/// Remove collided planets from `planets` and destroy their backend bodies
///
/// Planets are scanned in order. A planet touching the sun is destroyed
/// alone. Otherwise the first later, still-alive planet it overlaps is
/// destroyed together with it, and neither takes part in the rest of the
/// pass. Survivors keep their relative order.
pub fn prune<B: PhysicsBackend>(backend: &mut B, sun: &Sun, planets: &mut Vec<Planet>) -> PruneReport {
    let mut report = PruneReport::default();
    let n = planets.len();
    let mut alive = vec![true; n];

    for i in 0..n {
        if !alive[i] {
            continue;
        }
        let p = &planets[i];

        if p.overlaps(sun) {
            alive[i] = false;
            backend.destroy_body(p.handle());
            report.fell_into_sun.push(p.id());
            log::debug!("planet {} fell into the sun", p.id().0);
            continue;
        }

        for j in (i + 1)..n {
            if !alive[j] {
                continue;
            }
            let o = &planets[j];
            if p.overlaps(o) {
                alive[i] = false;
                alive[j] = false;
                backend.destroy_body(p.handle());
                backend.destroy_body(o.handle());
                report.collided.push((p.id(), o.id()));
                log::debug!("planets {} and {} collided", p.id().0, o.id().0);
                break;
            }
        }
    }

    let mut tags = alive.into_iter();
    planets.retain(|_| tags.next().unwrap_or(false));
    report
}
