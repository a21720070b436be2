#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use cacc_core::control::ControlSignal;
use cacc_core::error::ControlError;
use cacc_core::runner::{
    initialization_schedule, run_initial_check, run_next_step, run_until_done, step_schedule,
    RunStatus,
};

/// Helper that owns both reusable schedules so tests can step or drain a run.
pub struct ScheduleRunner {
    initialization: Schedule,
    steps: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            initialization: initialization_schedule(),
            steps: step_schedule(),
        }
    }

    /// Evaluate the control law on the initial samples.
    pub fn check_initial(&mut self, world: &mut World) -> Result<ControlSignal, ControlError> {
        run_initial_check(world, &mut self.initialization)
    }

    /// Run a single step (`None` once the trajectories are full).
    pub fn run_one(
        &mut self,
        world: &mut World,
    ) -> Option<Result<ControlSignal, ControlError>> {
        run_next_step(world, &mut self.steps)
    }

    /// Drive the run to completion or halt.
    pub fn run_full(&mut self, world: &mut World) -> RunStatus {
        run_until_done(world, &mut self.initialization, &mut self.steps)
    }
}
