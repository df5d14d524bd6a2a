//! Rigid-body physics backend
//!
//! The simulation core never touches rigid-body memory directly. It holds a
//! [`BodyHandle`] per body and goes through [`PhysicsBackend`] for every read,
//! force application and destruction. [`RigidBodyArena`] is the built-in
//! backend: circle bodies in a generational arena, integrated with
//! semi-implicit Euler.

use std::f64::consts::PI;

use crate::simulation::engine::SolverIterations;
use crate::simulation::units::NVec2;

/// Opaque reference to a backend body
///
/// The generation makes a handle to a destroyed body stale, so a reused slot
/// is never mistaken for the body that used to live there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Creation parameters for a circular body (simulation units)
#[derive(Debug, Clone)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: NVec2,
    pub linear_velocity: NVec2,
    pub angle: f64,
    pub radius: f64,
    pub density: f64,
    pub gravity_scale: f64,
}

impl BodyDef {
    pub fn fixed(position: NVec2, radius: f64) -> Self {
        Self {
            kind: BodyKind::Static,
            position,
            linear_velocity: NVec2::zeros(),
            angle: 0.0,
            radius,
            density: 1.0,
            gravity_scale: 1.0,
        }
    }

    pub fn dynamic(position: NVec2, radius: f64, density: f64) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            linear_velocity: NVec2::zeros(),
            angle: 0.0,
            radius,
            density,
            gravity_scale: 1.0,
        }
    }

    pub fn with_velocity(mut self, v: NVec2) -> Self {
        self.linear_velocity = v;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f64) -> Self {
        self.gravity_scale = scale;
        self
    }
}

/// Capabilities the simulation core consumes from a physics engine
///
/// Queries on a stale handle return `None`. Callers must not destroy a body
/// twice; implementations report it by returning `false`.
pub trait PhysicsBackend {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;
    fn position(&self, h: BodyHandle) -> Option<NVec2>;
    fn angle(&self, h: BodyHandle) -> Option<f64>;
    fn linear_velocity(&self, h: BodyHandle) -> Option<NVec2>;
    fn mass(&self, h: BodyHandle) -> Option<f64>;
    /// Queue a force at the center of mass, consumed by the next `step`
    fn apply_force_to_center(&mut self, h: BodyHandle, force: NVec2);
    fn step(&mut self, dt: f64, iterations: SolverIterations);
    fn destroy_body(&mut self, h: BodyHandle) -> bool;
    fn body_count(&self) -> usize;
}

/// Largest distance a body may travel in a single step (m)
pub const MAX_TRANSLATION: f64 = 2.0;

#[derive(Debug, Clone)]
struct RigidBody {
    kind: BodyKind,
    position: NVec2,
    velocity: NVec2,
    angle: f64,
    angular_velocity: f64,
    mass: f64,
    inv_mass: f64,
    gravity_scale: f64,
    force: NVec2,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<RigidBody>,
}

/// Built-in backend storing bodies in a generational arena
#[derive(Debug, Clone)]
pub struct RigidBodyArena {
    gravity: NVec2,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl RigidBodyArena {
    /// Arena with the given world gravity vector
    pub fn new(gravity: NVec2) -> Self {
        Self {
            gravity,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    fn get(&self, h: BodyHandle) -> Option<&RigidBody> {
        self.slots
            .get(h.index as usize)
            .filter(|s| s.generation == h.generation)
            .and_then(|s| s.body.as_ref())
    }

    fn get_mut(&mut self, h: BodyHandle) -> Option<&mut RigidBody> {
        self.slots
            .get_mut(h.index as usize)
            .filter(|s| s.generation == h.generation)
            .and_then(|s| s.body.as_mut())
    }
}

impl Default for RigidBodyArena {
    /// Zero-gravity world: all attraction is applied manually
    fn default() -> Self {
        Self::new(NVec2::zeros())
    }
}

impl PhysicsBackend for RigidBodyArena {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        // Static bodies are immovable and carry no mass
        let (mass, inv_mass) = match def.kind {
            BodyKind::Static => (0.0, 0.0),
            BodyKind::Dynamic => {
                let m = def.density * PI * def.radius * def.radius;
                if m > 0.0 { (m, 1.0 / m) } else { (1.0, 1.0) }
            }
        };
        let body = RigidBody {
            kind: def.kind,
            position: def.position,
            velocity: match def.kind {
                BodyKind::Static => NVec2::zeros(),
                BodyKind::Dynamic => def.linear_velocity,
            },
            angle: def.angle,
            angular_velocity: 0.0,
            mass,
            inv_mass,
            gravity_scale: def.gravity_scale,
            force: NVec2::zeros(),
        };

        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.body = Some(body);
                BodyHandle { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, body: Some(body) });
                BodyHandle { index, generation: 0 }
            }
        }
    }

    fn position(&self, h: BodyHandle) -> Option<NVec2> {
        self.get(h).map(|b| b.position)
    }

    fn angle(&self, h: BodyHandle) -> Option<f64> {
        self.get(h).map(|b| b.angle)
    }

    fn linear_velocity(&self, h: BodyHandle) -> Option<NVec2> {
        self.get(h).map(|b| b.velocity)
    }

    fn mass(&self, h: BodyHandle) -> Option<f64> {
        self.get(h).map(|b| b.mass)
    }

    fn apply_force_to_center(&mut self, h: BodyHandle, force: NVec2) {
        if let Some(b) = self.get_mut(h) {
            if b.kind == BodyKind::Dynamic {
                b.force += force;
            }
        }
    }

    /// Semi-implicit Euler: v += dt * (g * scale + F / m), x += dt * v
    ///
    /// There are no contact constraints in this backend, so the iteration
    /// bounds have nothing to bound.
    fn step(&mut self, dt: f64, _iterations: SolverIterations) {
        let gravity = self.gravity;
        for b in self.slots.iter_mut().filter_map(|s| s.body.as_mut()) {
            if b.kind == BodyKind::Static {
                continue;
            }

            b.velocity += dt * (b.gravity_scale * gravity + b.inv_mass * b.force);

            // Clamp the per-step translation
            let translation = dt * b.velocity;
            let len = translation.norm();
            if len > MAX_TRANSLATION {
                b.velocity *= MAX_TRANSLATION / len;
            }

            b.position += dt * b.velocity;
            b.angle += dt * b.angular_velocity;
            b.force = NVec2::zeros();
        }
    }

    fn destroy_body(&mut self, h: BodyHandle) -> bool {
        let Some(slot) = self.slots.get_mut(h.index as usize) else {
            return false;
        };
        if slot.generation != h.generation || slot.body.is_none() {
            return false;
        }
        slot.body = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(h.index);
        self.live -= 1;
        true
    }

    fn body_count(&self) -> usize {
        self.live
    }
}
