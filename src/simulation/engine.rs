//! Fixed-step runtime engine settings
//!
//! Selects the step size and the iteration bounds handed to the
//! physics backend on every step

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverIterations {
    pub velocity: u32,
    pub position: u32,
}

impl Default for SolverIterations {
    fn default() -> Self {
        Self { velocity: 8, position: 3 }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub fixed_step: f64, // seconds of simulated time per step
    pub iterations: SolverIterations, // forwarded to the backend step
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            fixed_step: 1.0 / 60.0,
            iterations: SolverIterations::default(),
        }
    }
}
