pub mod units;
pub mod params;
pub mod engine;
pub mod backend;
pub mod body;
pub mod forces;
pub mod integrator;
pub mod lifecycle;
pub mod world;
pub mod scenario;
