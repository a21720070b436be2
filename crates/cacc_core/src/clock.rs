use bevy_ecs::prelude::Resource;

/// Fixed-step simulation clock: current step index over a known horizon.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct SimulationClock {
    step: usize,
    time_step: f64,
    total_steps: usize,
}

impl SimulationClock {
    pub fn new(time_step: f64, total_steps: usize) -> Self {
        Self {
            step: 0,
            time_step,
            total_steps,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Elapsed simulated time at the current step, in seconds.
    pub fn now_secs(&self) -> f64 {
        self.time_at(self.step)
    }

    pub fn time_at(&self, step: usize) -> f64 {
        self.time_step * step as f64
    }

    /// Moves to the next step. Returns `None` once the horizon is exhausted.
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.step + 1;
        if next >= self.total_steps {
            return None;
        }
        self.step = next;
        Some(next)
    }
}
