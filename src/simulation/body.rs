//! Sun and planet state.
//!
//! Both wrap a backend [`BodyHandle`]; the backend owns the rigid body and
//! these types own its meaning. Positions and radii stored here are in
//! display units, refreshed from the backend after each step.

use rand::Rng;

use crate::simulation::backend::{BodyDef, BodyHandle, PhysicsBackend};
use crate::simulation::units::{distance, perp, NVec2, Scale};

/// Read-only view shared by the sun and planets
pub trait CelestialBody {
    /// Center in display units
    fn position(&self) -> NVec2;
    /// Collision-disk radius in display units
    fn radius(&self) -> f64;

    /// Strict overlap of the two collision disks
    fn overlaps<B: CelestialBody + ?Sized>(&self, other: &B) -> bool {
        distance(self.position(), other.position()) < self.radius() + other.radius()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanetId(pub u32);

/// Static central mass
#[derive(Debug, Clone)]
pub struct Sun {
    handle: BodyHandle,
    position: NVec2,
    radius: f64,
}

impl Sun {
    /// Register a static circle with the backend at `position` (display units)
    pub fn create<B: PhysicsBackend>(backend: &mut B, scale: &Scale, position: NVec2, radius: f64) -> Self {
        let def = BodyDef::fixed(scale.to_sim(position), scale.length_to_sim(radius));
        let handle = backend.create_body(&def);
        Self { handle, position, radius }
    }

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }
}

impl CelestialBody for Sun {
    fn position(&self) -> NVec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

/// Which way round the sun a new planet is launched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitDirection {
    Clockwise,
    CounterClockwise,
}

impl OrbitDirection {
    /// Unbiased coin flip
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            OrbitDirection::CounterClockwise
        } else {
            OrbitDirection::Clockwise
        }
    }

    fn sign(self) -> f64 {
        match self {
            OrbitDirection::CounterClockwise => 1.0,
            OrbitDirection::Clockwise => -1.0,
        }
    }
}

/// Velocity for a circular orbit of `planet` around `sun` (simulation units)
///
/// Speed is `sqrt(gm / r)` with `r` floored at `min_distance`; direction is
/// the radius vector rotated by 90°. A planet exactly on the sun gets no
/// velocity.
pub fn circular_orbit_velocity(
    sun: NVec2,
    planet: NVec2,
    gm: f64,
    min_distance: f64,
    direction: OrbitDirection,
) -> NVec2 {
    let r = planet - sun;
    let dist = r.norm().max(min_distance);
    match perp(r).try_normalize(0.0) {
        Some(tangent) => direction.sign() * (gm / dist).sqrt() * tangent,
        None => NVec2::zeros(),
    }
}

/// Cosmetic orbit ring centered on the sun
#[derive(Debug, Clone)]
pub struct OrbitRing {
    pub center: NVec2,
    pub radius: f64,
    threshold: f64,
    dirty: bool,
}

impl OrbitRing {
    pub fn new(center: NVec2, radius: f64, threshold: f64) -> Self {
        Self { center, radius, threshold, dirty: true }
    }

    /// Re-derive the radius; only moves when the drift exceeds the threshold
    pub fn track(&mut self, position: NVec2) -> bool {
        let r = distance(position, self.center);
        if (r - self.radius).abs() > self.threshold {
            self.radius = r;
            self.dirty = true;
            return true;
        }
        false
    }

    /// Vertex count for drawing the ring
    pub fn point_count(&self) -> usize {
        (self.radius * 0.5).max(60.0) as usize
    }

    /// True once after each radius change; clears the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Dynamic orbiting body
#[derive(Debug, Clone)]
pub struct Planet {
    id: PlanetId,
    handle: BodyHandle,
    radius: f64,
    position: NVec2,
    angle: f64,
    ring: OrbitRing,
}

impl Planet {
    pub(crate) fn new(id: PlanetId, handle: BodyHandle, position: NVec2, radius: f64, ring: OrbitRing) -> Self {
        Self { id, handle, radius, position, angle: 0.0, ring }
    }

    pub fn id(&self) -> PlanetId {
        self.id
    }

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    /// Rotation in radians
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn ring(&self) -> &OrbitRing {
        &self.ring
    }

    pub fn ring_mut(&mut self) -> &mut OrbitRing {
        &mut self.ring
    }

    /// Velocity in simulation units, read from the backend
    pub fn velocity<B: PhysicsBackend>(&self, backend: &B) -> Option<NVec2> {
        backend.linear_velocity(self.handle)
    }

    /// Pull position and rotation from the backend and re-derive the ring
    pub fn refresh<B: PhysicsBackend>(&mut self, backend: &B, scale: &Scale) {
        if let Some(p) = backend.position(self.handle) {
            self.position = scale.to_display(p);
        }
        if let Some(a) = backend.angle(self.handle) {
            self.angle = a;
        }
        self.ring.track(self.position);
    }
}

impl CelestialBody for Planet {
    fn position(&self) -> NVec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn orbit_velocity_is_tangent_with_circular_speed() {
        let sun = NVec2::new(1.0, 2.0);
        let planet = NVec2::new(4.0, 6.0); // r = 5
        for dir in [OrbitDirection::Clockwise, OrbitDirection::CounterClockwise] {
            let v = circular_orbit_velocity(sun, planet, 30_000.0, 0.01, dir);
            assert_relative_eq!(v.norm(), (30_000.0f64 / 5.0).sqrt(), epsilon = 1e-9);
            assert_relative_eq!(v.dot(&(planet - sun)), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn orbit_directions_are_opposite() {
        let sun = NVec2::zeros();
        let planet = NVec2::new(2.0, 0.0);
        let ccw = circular_orbit_velocity(sun, planet, 1.0, 0.01, OrbitDirection::CounterClockwise);
        let cw = circular_orbit_velocity(sun, planet, 1.0, 0.01, OrbitDirection::Clockwise);
        assert!(ccw.y > 0.0);
        assert_relative_eq!(ccw, -cw);
    }

    #[test]
    fn orbit_velocity_on_top_of_sun_is_zero() {
        let v = circular_orbit_velocity(NVec2::zeros(), NVec2::zeros(), 1.0, 0.01, OrbitDirection::Clockwise);
        assert_eq!(v, NVec2::zeros());
    }

    #[test]
    fn coin_flip_produces_both_directions() {
        let mut rng = ChaChaRng::seed_from_u64(7);
        let ccw = (0..200)
            .filter(|_| OrbitDirection::sample(&mut rng) == OrbitDirection::CounterClockwise)
            .count();
        assert!(ccw > 60 && ccw < 140, "biased coin: {ccw}/200");
    }

    #[test]
    fn ring_only_moves_past_threshold() {
        let mut ring = OrbitRing::new(NVec2::zeros(), 100.0, 0.25);
        assert!(ring.take_dirty());
        assert!(!ring.track(NVec2::new(100.2, 0.0)));
        assert_relative_eq!(ring.radius, 100.0);
        assert!(!ring.take_dirty());

        assert!(ring.track(NVec2::new(0.0, 100.3)));
        assert_relative_eq!(ring.radius, 100.3);
        assert!(ring.take_dirty());
        assert!(!ring.take_dirty());
    }

    #[test]
    fn ring_point_count_has_floor() {
        assert_eq!(OrbitRing::new(NVec2::zeros(), 50.0, 0.25).point_count(), 60);
        assert_eq!(OrbitRing::new(NVec2::zeros(), 400.0, 0.25).point_count(), 200);
    }
}
