//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – physical constants and the meter/pixel scale
//! - [`EngineConfig`]     – fixed step and backend iteration bounds
//! - [`SpawnConfig`]      – spawn clearance, planet radius range, density, seed
//! - [`SunConfig`]        – where the sun sits and how big it is
//! - [`DisplayConfig`]    – viewer window size
//! - `planets`            – optional scripted spawn points
//!
//! Every section has defaults, so an empty document is a valid scenario.
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   G: 3.0                  # gravitational constant
//!   sun_mass: 10000.0
//!   pixels_per_meter: 30.0
//!   min_orbit_distance: 0.01
//!   softening_floor: 1.0e-4
//!
//! engine:
//!   fixed_step: 0.016666667
//!   velocity_iterations: 8
//!   position_iterations: 3
//!
//! spawn:
//!   margin: 5.0
//!   radius_min: 6.0
//!   radius_max: 18.0
//!   density: 0.5
//!   ring_threshold: 0.25
//!   seed: 42                # omit for an entropy seed
//!
//! sun:
//!   x: [960.0, 540.0]       # display units
//!   radius: 60.0
//!
//! display:
//!   width: 1920
//!   height: 1080
//!
//! planets:
//!   - [1160.0, 540.0]
//!   - [960.0, 240.0]
//! ```

use serde::Deserialize;

use crate::configuration::error::ConfigError;
use crate::simulation::engine::{Engine, SolverIterations};
use crate::simulation::params::{Parameters, SpawnRules};
use crate::simulation::units::{NVec2, Scale};

/// Physical constants and unit scale
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    #[serde(rename = "G")]
    pub g: f64, // gravitational constant
    pub sun_mass: f64,
    pub pixels_per_meter: f64,
    pub min_orbit_distance: f64, // floor on r for orbital speed (m)
    pub softening_floor: f64, // floor on the gravity distance clamp (m)
}

impl Default for ParametersConfig {
    fn default() -> Self {
        let p = Parameters::default();
        Self {
            g: p.g,
            sun_mass: p.sun_mass,
            pixels_per_meter: p.scale.pixels_per_meter,
            min_orbit_distance: p.min_orbit_distance,
            softening_floor: p.softening_floor,
        }
    }
}

/// Fixed step and solver iteration bounds
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub fixed_step: f64,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let e = Engine::default();
        Self {
            fixed_step: e.fixed_step,
            velocity_iterations: e.iterations.velocity,
            position_iterations: e.iterations.position,
        }
    }
}

/// Spawn rules (display units)
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpawnConfig {
    pub margin: f64,
    pub radius_min: f64,
    pub radius_max: f64,
    pub density: f64,
    pub ring_threshold: f64,
    pub seed: Option<u64>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        let s = SpawnRules::default();
        Self {
            margin: s.margin,
            radius_min: s.radius_min,
            radius_max: s.radius_max,
            density: s.density,
            ring_threshold: s.ring_threshold,
            seed: None,
        }
    }
}

/// The sun (display units)
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SunConfig {
    pub x: Vec<f64>,
    pub radius: f64,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            x: vec![960.0, 540.0],
            radius: 60.0,
        }
    }
}

/// Viewer window
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { width: 1920, height: 1080 }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig,
    pub engine: EngineConfig,
    pub spawn: SpawnConfig,
    pub sun: SunConfig,
    pub display: DisplayConfig,
    pub planets: Vec<Vec<f64>>, // scripted spawn points, replayed at startup
}

impl ScenarioConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(s: &str) -> Result<Self, ConfigError> {
        let cfg: ScenarioConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.parameters;
        positive("parameters.pixels_per_meter", p.pixels_per_meter)?;
        positive("parameters.min_orbit_distance", p.min_orbit_distance)?;
        positive("parameters.softening_floor", p.softening_floor)?;
        non_negative("parameters.G", p.g)?;
        non_negative("parameters.sun_mass", p.sun_mass)?;

        positive("engine.fixed_step", self.engine.fixed_step)?;

        let s = &self.spawn;
        non_negative("spawn.margin", s.margin)?;
        positive("spawn.radius_min", s.radius_min)?;
        positive("spawn.radius_max", s.radius_max)?;
        positive("spawn.density", s.density)?;
        non_negative("spawn.ring_threshold", s.ring_threshold)?;
        if !(s.radius_max >= s.radius_min) {
            return Err(ConfigError::InvertedRange { min: s.radius_min, max: s.radius_max });
        }

        positive("sun.radius", self.sun.radius)?;
        point("sun.x", &self.sun.x)?;
        for (i, pt) in self.planets.iter().enumerate() {
            point(&format!("planets[{i}]"), pt)?;
        }
        Ok(())
    }

    pub fn parameters(&self) -> Parameters {
        let p = &self.parameters;
        let s = &self.spawn;
        Parameters {
            g: p.g,
            sun_mass: p.sun_mass,
            scale: Scale::new(p.pixels_per_meter),
            min_orbit_distance: p.min_orbit_distance,
            softening_floor: p.softening_floor,
            spawn: SpawnRules {
                margin: s.margin,
                radius_min: s.radius_min,
                radius_max: s.radius_max,
                density: s.density,
                ring_threshold: s.ring_threshold,
            },
        }
    }

    pub fn engine(&self) -> Engine {
        Engine {
            fixed_step: self.engine.fixed_step,
            iterations: SolverIterations {
                velocity: self.engine.velocity_iterations,
                position: self.engine.position_iterations,
            },
        }
    }

    /// Sun center; only meaningful after `validate`
    pub fn sun_position(&self) -> NVec2 {
        to_vec(&self.sun.x)
    }

    /// Scripted spawn points; only meaningful after `validate`
    pub fn planet_positions(&self) -> Vec<NVec2> {
        self.planets.iter().map(|p| to_vec(p)).collect()
    }
}

fn to_vec(v: &[f64]) -> NVec2 {
    NVec2::new(
        v.first().copied().unwrap_or(0.0),
        v.get(1).copied().unwrap_or(0.0),
    )
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn point(field: &str, v: &[f64]) -> Result<(), ConfigError> {
    if v.len() != 2 {
        return Err(ConfigError::Arity { field: field.to_string(), len: v.len() });
    }
    if v.iter().any(|c| !c.is_finite()) {
        return Err(ConfigError::NonFinite { field: field.to_string() });
    }
    Ok(())
}
