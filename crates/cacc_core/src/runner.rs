//! Simulation runner: advances the step clock and drives the convoy schedules.
//!
//! Step 0 runs the initialization schedule (control law only) against the
//! initial conditions. Every later step advances [SimulationClock], clears the
//! [StepReport], runs the step schedule and inspects the outcome. The runner
//! is the only place that decides between continuing and halting.

use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};
use tracing::{debug, error, info};

use crate::clock::SimulationClock;
use crate::control::ControlSignal;
use crate::ecs::{Convoy, StepReport, VehicleRole};
use crate::error::{ControlError, ScenarioError};
use crate::initial::InitialStateProvider;
use crate::scenario::{build_scenario, ScenarioParams, SimulationConfig};
use crate::systems::{
    control_law::control_law_system,
    propagation::{follower_propagation_system, leader_propagation_system},
};
use crate::telemetry::ConvoyTelemetry;
use crate::vehicle::Vehicle;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunStatus {
    /// Every trajectory slot was filled.
    Completed,
    /// A fatal control outcome stopped the run; samples up to `step` are kept.
    Halted { step: usize, error: ControlError },
    /// The initial state already required collision avoidance and the
    /// configuration asked to abort in that case.
    RefusedToStart { signal: ControlSignal },
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    pub fn halted_at(&self) -> Option<usize> {
        match self {
            RunStatus::Halted { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Schedule evaluated once against the initial conditions.
pub fn initialization_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(control_law_system);
    schedule
}

/// Schedule evaluated for every step after the first: leader, follower, control law.
pub fn step_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            leader_propagation_system,
            follower_propagation_system,
            control_law_system,
        )
            .chain(),
    );
    schedule
}

fn take_outcome(world: &mut World) -> Result<ControlSignal, ControlError> {
    world
        .resource_mut::<StepReport>()
        .outcome
        .take()
        .unwrap_or(Err(ControlError::MissingVehicle(
            VehicleRole::Follower.label(),
        )))
}

fn log_step(world: &World, step: usize) {
    let Some(convoy) = world.get_resource::<Convoy>() else {
        return;
    };
    let time_secs = world.resource::<SimulationClock>().time_at(step);
    for entity in [convoy.leader, convoy.follower] {
        let Some(vehicle) = world.get::<Vehicle>(entity) else {
            continue;
        };
        if let Ok(sample) = vehicle.trajectory().written_sample(step) {
            debug!(
                time = time_secs,
                vehicle = vehicle.name(),
                d = sample.position,
                v = sample.velocity,
                a = sample.acceleration,
                mode = sample.mode.label(),
                "step"
            );
        }
    }
}

/// Evaluates the control law on the initial samples (step 0).
pub fn run_initial_check(
    world: &mut World,
    schedule: &mut Schedule,
) -> Result<ControlSignal, ControlError> {
    world.resource_mut::<StepReport>().clear();
    schedule.run(world);
    log_step(world, 0);
    take_outcome(world)
}

/// Runs one step. Returns `None` once every trajectory slot has been filled.
pub fn run_next_step(
    world: &mut World,
    schedule: &mut Schedule,
) -> Option<Result<ControlSignal, ControlError>> {
    let step = world.resource_mut::<SimulationClock>().advance()?;
    world.resource_mut::<StepReport>().clear();
    schedule.run(world);
    log_step(world, step);
    Some(take_outcome(world))
}

fn halt(world: &mut World, step: usize, err: ControlError) -> RunStatus {
    error!(step, error = %err, "simulation halted");
    if let Some(mut telemetry) = world.get_resource_mut::<ConvoyTelemetry>() {
        telemetry.record_halt(err);
    }
    RunStatus::Halted { step, error: err }
}

/// Runs the initial check and then every step until completion or a fatal outcome.
pub fn run_until_done(
    world: &mut World,
    initialization: &mut Schedule,
    steps: &mut Schedule,
) -> RunStatus {
    let config = *world.resource::<SimulationConfig>();
    info!(
        time_step = config.time_step,
        trajectory_points = config.trajectory_points,
        max_velocity = config.max_velocity,
        safe_time_gap = config.control.safe_time_gap,
        "starting convoy simulation"
    );

    match run_initial_check(world, initialization) {
        Err(err) => return halt(world, 0, err),
        Ok(signal @ ControlSignal::CollisionAvoidance { .. })
            if config.abort_on_initial_avoidance =>
        {
            error!(
                gap = signal.gap(),
                safe_gap = signal.safe_gap(),
                "initial state requires collision avoidance, refusing to start"
            );
            return RunStatus::RefusedToStart { signal };
        }
        Ok(_) => {}
    }

    while let Some(outcome) = run_next_step(world, steps) {
        if let Err(err) = outcome {
            let step = world.resource::<SimulationClock>().step();
            return halt(world, step, err);
        }
    }

    let (avoidance, min_margin) = world
        .get_resource::<ConvoyTelemetry>()
        .map(|t| (t.avoidance_count(), t.min_margin().unwrap_or(0.0)))
        .unwrap_or((0, 0.0));
    info!(
        steps = config.trajectory_points,
        horizon_secs = config.horizon_secs(),
        avoidance_steps = avoidance,
        min_margin,
        "convoy simulation complete"
    );
    RunStatus::Completed
}

/// Builds both schedules and runs the world to the end.
pub fn run_simulation(world: &mut World) -> RunStatus {
    let mut initialization = initialization_schedule();
    let mut steps = step_schedule();
    run_until_done(world, &mut initialization, &mut steps)
}

/// Finished (or halted) run: both trajectories plus telemetry.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub status: RunStatus,
    pub time_step: f64,
    pub leader: Vehicle,
    pub follower: Vehicle,
    pub telemetry: ConvoyTelemetry,
}

impl SimulationReport {
    /// Collects the convoy from `world`. `None` if the convoy was never built.
    pub fn from_world(world: &World, status: RunStatus) -> Option<Self> {
        let convoy = world.get_resource::<Convoy>()?;
        Some(Self {
            status,
            time_step: world.get_resource::<SimulationClock>()?.time_step(),
            leader: world.get::<Vehicle>(convoy.leader)?.clone(),
            follower: world.get::<Vehicle>(convoy.follower)?.clone(),
            telemetry: world
                .get_resource::<ConvoyTelemetry>()
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// Samples written for the follower, initial condition included.
    pub fn steps_written(&self) -> usize {
        self.follower.trajectory().written()
    }

    pub fn vehicles(&self) -> [&Vehicle; 2] {
        [&self.leader, &self.follower]
    }
}

/// Builds a fresh world from `params`, runs it and returns the report.
pub fn simulate<P: InitialStateProvider + ?Sized>(
    params: &ScenarioParams,
    provider: &mut P,
) -> Result<SimulationReport, ScenarioError> {
    let mut world = World::new();
    build_scenario(&mut world, params, provider)?;
    let status = run_simulation(&mut world);
    SimulationReport::from_world(&world, status).ok_or(ScenarioError::MissingConvoy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::initial::ScenarioInitialState;
    use crate::scenario::VehicleSpec;
    use crate::vehicle::{ControlMode, Sample};

    fn params(leader: VehicleSpec, follower: VehicleSpec, points: usize) -> ScenarioParams {
        ScenarioParams::default()
            .with_leader(leader)
            .with_follower(follower)
            .with_trajectory_points(points)
    }

    #[test]
    fn steady_convoy_completes() {
        let params = params(
            VehicleSpec::new("lead").at(30.0, 15.0, 0.0),
            VehicleSpec::new("follow").at(0.0, 15.0, 0.0),
            200,
        );
        let report = simulate(&params, &mut ScenarioInitialState).expect("report");

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.steps_written(), 200);
        assert!(report.leader.trajectory().is_complete());
        assert!(report.follower.trajectory().is_complete());
        assert_eq!(report.telemetry.records.len(), 200);
        assert!(report.telemetry.halt.is_none());
    }

    #[test]
    fn initial_collision_halts_before_stepping() {
        let params = params(
            VehicleSpec::new("lead").at(3.0, 10.0, 0.0),
            VehicleSpec::new("follow").at(0.0, 10.0, 0.0),
            50,
        );
        let report = simulate(&params, &mut ScenarioInitialState).expect("report");

        assert!(matches!(
            report.status,
            RunStatus::Halted {
                step: 0,
                error: ControlError::Collision { .. }
            }
        ));
        assert_eq!(report.steps_written(), 1);
        assert_eq!(report.leader.trajectory().written(), 1);
        assert!(report.telemetry.halt.is_some());
    }

    #[test]
    fn initial_avoidance_continues_by_default() {
        // gap = 10 - 0 - 5 = 5, safe gap = 2 + 40 - 0 + 1 = 43
        let leader = VehicleSpec::new("lead").at(10.0, 0.0, 0.0);
        let follower = VehicleSpec::new("follow").at(0.0, 20.0, 0.0);
        let lenient = params(leader.clone(), follower.clone(), 5);
        let report = simulate(&lenient, &mut ScenarioInitialState).expect("report");
        assert_eq!(
            report.follower.sample(0).unwrap().mode,
            ControlMode::CollisionAvoidance
        );
        assert!(report.steps_written() > 1);

        let strict = params(leader, follower, 5).with_abort_on_initial_avoidance(true);
        let report = simulate(&strict, &mut ScenarioInitialState).expect("report");
        assert!(matches!(report.status, RunStatus::RefusedToStart { .. }));
        assert_eq!(report.steps_written(), 1);
    }

    #[test]
    fn halted_run_keeps_prefix_and_defaults() {
        // Follower closes in at 20 m/s on a stopped leader and cannot brake in time.
        let params = params(
            VehicleSpec::new("lead").at(12.0, 0.0, 0.0),
            VehicleSpec::new("follow").at(0.0, 20.0, 0.0),
            500,
        );
        let report = simulate(&params, &mut ScenarioInitialState).expect("report");

        let step = report.status.halted_at().expect("halted");
        assert!(step > 0);
        let follower = report.follower.trajectory();
        assert_eq!(follower.written(), step + 1);
        assert!(follower.samples()[step + 1..]
            .iter()
            .all(|s| *s == Sample::default()));
        assert!(report.leader.trajectory().samples()[step + 1..]
            .iter()
            .all(|s| *s == Sample::default()));
    }

    #[test]
    fn non_finite_control_settings_fail_before_stepping() {
        let mut nan_bound = ScenarioParams::default().with_trajectory_points(50);
        nan_bound.simulation.control.max_acceleration = f64::NAN;
        assert!(matches!(
            simulate(&nan_bound, &mut ScenarioInitialState),
            Err(ScenarioError::Config(ConfigError::NonFiniteAccelerationBounds { .. }))
        ));

        let nan_headway = ScenarioParams::default()
            .with_trajectory_points(50)
            .with_safe_time_gap(f64::NAN);
        assert!(matches!(
            simulate(&nan_headway, &mut ScenarioInitialState),
            Err(ScenarioError::Config(ConfigError::InvalidSafeTimeGap(_)))
        ));
    }

    #[test]
    fn single_point_run_only_checks_initial_state() {
        let params = params(
            VehicleSpec::new("lead").at(30.0, 10.0, 0.0),
            VehicleSpec::new("follow").at(0.0, 10.0, 0.0),
            1,
        );
        let report = simulate(&params, &mut ScenarioInitialState).expect("report");
        assert!(report.status.is_completed());
        assert_eq!(report.steps_written(), 1);
        assert_eq!(report.telemetry.records.len(), 1);
    }
}
