//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario` containing:
//! - the world (sun placed, scripted planets spawned)
//! - the fixed-step driver that feeds it frame time
//! - the display settings the viewer needs
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! stepping and drawing systems, or run headless.

use bevy::prelude::Resource;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::configuration::config::{DisplayConfig, ScenarioConfig};
use crate::simulation::backend::RigidBodyArena;
use crate::simulation::integrator::FixedStepDriver;
use crate::simulation::lifecycle::PruneReport;
use crate::simulation::world::World;

/// Bevy resource representing a fully-initialized scenario
#[derive(Resource)]
pub struct Scenario {
    pub world: World<RigidBodyArena>,
    pub driver: FixedStepDriver,
    pub display: DisplayConfig,
}

impl Scenario {
    /// `seed` overrides the config seed; with neither, the generator is
    /// seeded from OS entropy
    pub fn build_scenario(cfg: ScenarioConfig, seed: Option<u64>) -> Self {
        let rng = match seed.or(cfg.spawn.seed) {
            Some(s) => {
                log::info!("spawn generator seeded with {s}");
                ChaChaRng::seed_from_u64(s)
            }
            None => ChaChaRng::from_os_rng(),
        };

        let engine = cfg.engine();
        let driver = FixedStepDriver::new(engine.fixed_step);
        let mut world = World::new(RigidBodyArena::default(), cfg.parameters(), engine, rng);

        world.create_sun(cfg.sun_position(), cfg.sun.radius);
        for p in cfg.planet_positions() {
            world.spawn_planet_at(p);
        }

        Self {
            world,
            driver,
            display: cfg.display,
        }
    }

    /// Feed `frame_dt` seconds of wall-clock time to the world
    ///
    /// Returns the reports of every step taken this frame.
    pub fn advance(&mut self, frame_dt: f64) -> Vec<PruneReport> {
        let Scenario { world, driver, .. } = self;
        let mut reports = Vec::new();
        driver.advance(frame_dt, |dt| reports.push(world.step(dt)));
        reports
    }
}
