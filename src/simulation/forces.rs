//! Force contributors for the orbital engine
//!
//! Defines the force-term trait and the sun→planet Newtonian attraction.
//! Terms queue forces on the backend; the next backend step integrates them.

use crate::simulation::backend::PhysicsBackend;
use crate::simulation::body::{CelestialBody, Planet, Sun};
use crate::simulation::units::{NVec2, Scale};

/// Ordered force terms run before each backend step
///
/// Terms write straight into the backend's force accumulators, so nothing is
/// summed here; the backend integrates the total on its next step.
pub struct ForceSet<B: PhysicsBackend> {
    terms: Vec<Box<dyn ForceTerm<B> + Send + Sync>>,
}

impl<B: PhysicsBackend> ForceSet<B> {
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Append `term`; it runs after every term already registered
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: ForceTerm<B> + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Run each term in registration order against the live planets
    pub fn apply(&self, sun: &Sun, planets: &[Planet], backend: &mut B) {
        for term in &self.terms {
            term.apply(sun, planets, backend);
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<B: PhysicsBackend> Default for ForceSet<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// A source of force on the live planets
pub trait ForceTerm<B: PhysicsBackend> {
    fn apply(&self, sun: &Sun, planets: &[Planet], backend: &mut B);
}

/// Inverse-square attraction toward the sun only
///
/// Planets do not attract each other.
#[derive(Debug, Clone)]
pub struct SunGravity {
    pub g: f64, // gravitational constant
    pub sun_mass: f64,
    pub softening_floor: f64, // lower bound on the distance clamp (m)
    pub scale: Scale,
}

impl SunGravity {
    /// Force on a body of mass `m` at `planet`, all in simulation units
    ///
    /// The distance is clamped below at `max(sun_radius / 2, softening_floor)`
    /// so the force stays finite as the bodies approach contact.
    pub fn force_on(&self, sun: NVec2, sun_radius: f64, planet: NVec2, m: f64) -> NVec2 {
        let r = sun - planet;
        let min_dist = (0.5 * sun_radius).max(self.softening_floor);
        let dist = r.norm().max(min_dist);

        // Co-located bodies have no direction to pull along
        let dir = r.try_normalize(0.0).unwrap_or_else(NVec2::zeros);

        let magnitude = self.g * self.sun_mass * m / (dist * dist);
        magnitude * dir
    }
}

impl<B: PhysicsBackend> ForceTerm<B> for SunGravity {
    fn apply(&self, sun: &Sun, planets: &[Planet], backend: &mut B) {
        // The sun's backend position is authoritative, its display radius is not
        let Some(sun_pos) = backend.position(sun.handle()) else {
            return;
        };
        let sun_radius = self.scale.length_to_sim(sun.radius());

        for p in planets {
            let h = p.handle();
            let (Some(pos), Some(m)) = (backend.position(h), backend.mass(h)) else {
                continue;
            };
            let f = self.force_on(sun_pos, sun_radius, pos, m);
            backend.apply_force_to_center(h, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::backend::{BodyDef, RigidBodyArena};
    use crate::simulation::body::{OrbitRing, PlanetId};
    use crate::simulation::engine::SolverIterations;
    use approx::assert_relative_eq;

    fn gravity() -> SunGravity {
        SunGravity { g: 3.0, sun_mass: 10_000.0, softening_floor: 1e-4, scale: Scale::default() }
    }

    #[test]
    fn force_points_toward_sun() {
        let sun = NVec2::new(10.0, 10.0);
        let planet = NVec2::new(14.0, 7.0);
        let f = gravity().force_on(sun, 2.0, planet, 1.0);
        assert!(f.dot(&(sun - planet)) > 0.0, "force is not attractive: {f:?}");
        assert_relative_eq!(f.normalize(), (sun - planet).normalize(), epsilon = 1e-12);
    }

    #[test]
    fn force_follows_inverse_square_and_scales_with_mass() {
        let g = gravity();
        let f1 = g.force_on(NVec2::zeros(), 2.0, NVec2::new(5.0, 0.0), 1.0).norm();
        let f2 = g.force_on(NVec2::zeros(), 2.0, NVec2::new(10.0, 0.0), 1.0).norm();
        let f3 = g.force_on(NVec2::zeros(), 2.0, NVec2::new(5.0, 0.0), 3.0).norm();
        assert_relative_eq!(f1 / f2, 4.0, epsilon = 1e-9);
        assert_relative_eq!(f3 / f1, 3.0, epsilon = 1e-9);
        assert_relative_eq!(f1, 3.0 * 10_000.0 / 25.0, epsilon = 1e-9);
    }

    #[test]
    fn distance_is_clamped_at_half_sun_radius() {
        let g = gravity();
        let inside = g.force_on(NVec2::zeros(), 2.0, NVec2::new(0.1, 0.0), 1.0).norm();
        let at_clamp = g.force_on(NVec2::zeros(), 2.0, NVec2::new(1.0, 0.0), 1.0).norm();
        assert_relative_eq!(inside, at_clamp, epsilon = 1e-9);
    }

    /// Velocity change of one planet at (5, 0) m after one step under `set`
    fn dv_under(set: &ForceSet<RigidBodyArena>) -> NVec2 {
        let mut backend = RigidBodyArena::default();
        let scale = Scale::default();
        let sun = Sun::create(&mut backend, &scale, NVec2::zeros(), 60.0);
        let handle = backend.create_body(&BodyDef::dynamic(NVec2::new(5.0, 0.0), 0.2, 0.5));
        let ring = OrbitRing::new(NVec2::zeros(), 150.0, 0.25);
        let planets = vec![Planet::new(PlanetId(0), handle, NVec2::new(150.0, 0.0), 6.0, ring)];

        set.apply(&sun, &planets, &mut backend);
        backend.step(1.0 / 60.0, SolverIterations::default());
        backend.linear_velocity(handle).unwrap()
    }

    #[test]
    fn terms_accumulate_in_the_backend() {
        assert_eq!(dv_under(&ForceSet::new()), NVec2::zeros());

        let once = dv_under(&ForceSet::new().with(gravity()));
        let twice = dv_under(&ForceSet::new().with(gravity()).with(gravity()));
        assert!(once.x < 0.0);
        assert_relative_eq!(twice, 2.0 * once, epsilon = 1e-9);
        assert_relative_eq!(once.x, -(3.0 * 10_000.0 / 25.0) / 60.0, epsilon = 1e-9);
    }

    #[test]
    fn co_located_body_feels_no_force() {
        let f = gravity().force_on(NVec2::zeros(), 0.0, NVec2::zeros(), 1.0);
        assert_eq!(f, NVec2::zeros());
    }
}
