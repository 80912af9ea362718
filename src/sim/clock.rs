//! Fixed-step accumulator
//!
//! Hosts call back at whatever rate they like; the scene always advances in
//! `SECOND_DELAY` slices.

use crate::consts::{MAX_SUBSTEPS, SECOND_DELAY};

/// Largest frame delta accepted before clamping (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SECOND_DELAY, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed one frame's real delta and get back how many steps to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
