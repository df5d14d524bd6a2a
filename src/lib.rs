pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::units::{NVec2, Scale};
pub use simulation::backend::{BodyDef, BodyHandle, BodyKind, PhysicsBackend, RigidBodyArena};
pub use simulation::body::{CelestialBody, OrbitDirection, OrbitRing, Planet, PlanetId, Sun};
pub use simulation::forces::{ForceSet, ForceTerm, SunGravity};
pub use simulation::integrator::FixedStepDriver;
pub use simulation::lifecycle::PruneReport;
pub use simulation::world::World;
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, ParametersConfig, EngineConfig, SpawnConfig, SunConfig, DisplayConfig};
pub use configuration::error::ConfigError;

pub use visualization::vis2d::run_2d;

pub use benchmark::benchmark::{bench_step, bench_prune};
