//! Fixed-step driver
//!
//! Decouples the variable frame time of the presentation loop from the fixed
//! physics step by carrying unconsumed wall-clock time in an accumulator.
//!
//! Known limitation: there is no cap on steps per frame. If one step takes
//! longer to compute than the fixed step it simulates, every frame leaves more
//! time to catch up than the last and the loop spirals.

/// Accumulator-based fixed-step driver
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    fixed_step: f64,
    accumulator: f64,
}

impl FixedStepDriver {
    /// `fixed_step` must be positive and finite, otherwise `advance` never
    /// drains the accumulator
    pub fn new(fixed_step: f64) -> Self {
        debug_assert!(
            fixed_step > 0.0 && fixed_step.is_finite(),
            "fixed step must be positive, got {fixed_step}"
        );
        Self {
            fixed_step,
            accumulator: 0.0,
        }
    }

    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    /// Time carried over to the next frame (always `< fixed_step`)
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Add `frame_dt` seconds and run `step(fixed_step)` while a full step is
    /// available. Returns the number of steps taken.
    ///
    /// Negative or non-finite frame times are dropped.
    pub fn advance<F>(&mut self, frame_dt: f64, mut step: F) -> usize
    where
        F: FnMut(f64),
    {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            log::warn!("ignoring invalid frame delta {frame_dt}");
            return 0;
        }

        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.fixed_step {
            step(self.fixed_step);
            self.accumulator -= self.fixed_step;
            steps += 1;
        }
        steps
    }
}
