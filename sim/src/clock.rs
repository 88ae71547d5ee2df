//! Two-rate clock: variable frame ticks feed a fixed-step physics accumulator.

use crate::constants::{FRAME_JITTER, MAX_FRAME_DT_S};

pub struct FixedStepClock {
    step: f32,
    accumulator: f32,
    max_frame_dt: f32,
}

impl FixedStepClock {
    pub fn new(physics_hz: u32) -> Self {
        Self {
            step: 1.0 / physics_hz.max(1) as f32,
            accumulator: 0.0,
            max_frame_dt: MAX_FRAME_DT_S,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed one frame's elapsed time. Returns the clamped frame dt and how many
    /// physics steps are now due.
    pub fn advance(&mut self, frame_dt: f32) -> (f32, u32) {
        let dt = frame_dt.clamp(0.0, self.max_frame_dt);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        (dt, steps)
    }
}

/// Deterministic frame-duration source around a nominal rate.
pub struct FrameTimer {
    nominal: f32,
    frame: u64,
}

impl FrameTimer {
    pub fn new(frame_hz: u32) -> Self {
        Self {
            nominal: 1.0 / frame_hz.max(1) as f32,
            frame: 0,
        }
    }

    /// Duration of the next frame: nominal, scaled by a repeating jitter pattern.
    pub fn next_dt(&mut self) -> f32 {
        const PATTERN: [f32; 4] = [0.0, 1.0, -0.5, -0.5];
        let jitter = PATTERN[(self.frame % PATTERN.len() as u64) as usize] * FRAME_JITTER;
        self.frame += 1;
        self.nominal * (1.0 + jitter)
    }
}
