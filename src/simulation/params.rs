//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant and sun mass (`g`, `sun_mass`),
//! - the meter/pixel scale,
//! - distance floors that keep orbit speeds and forces finite,
//! - spawn rules (margin, radius range, density, ring hysteresis)

use crate::simulation::units::Scale;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub g: f64, // gravitational constant
    pub sun_mass: f64, // mass of the sun, used symbolically in G*M
    pub scale: Scale, // meters <-> pixels
    pub min_orbit_distance: f64, // floor on r when assigning orbital speed (m)
    pub softening_floor: f64, // epsilon floor on the gravity distance clamp (m)
    pub spawn: SpawnRules,
}

impl Parameters {
    /// G * M_sun
    pub fn gm(&self) -> f64 {
        self.g * self.sun_mass
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            g: 3.0,
            sun_mass: 10_000.0,
            scale: Scale::default(),
            min_orbit_distance: 0.01,
            softening_floor: 1.0e-4,
            spawn: SpawnRules::default(),
        }
    }
}

/// Rules applied to every spawn request, in display units unless noted
#[derive(Debug, Clone)]
pub struct SpawnRules {
    pub margin: f64, // extra clearance beyond the sun radius
    pub radius_min: f64,
    pub radius_max: f64,
    pub density: f64, // backend density (kg/m^2)
    pub ring_threshold: f64, // orbit ring hysteresis
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            margin: 5.0,
            radius_min: 6.0,
            radius_max: 18.0,
            density: 0.5,
            ring_threshold: 0.25,
        }
    }
}
