use std::fs;
use std::path::Path;

use bevy_ecs::prelude::World;
use tracing::debug;

use crate::clock::SimulationClock;
use crate::ecs::{Convoy, Follower, Leader, StepReport, VehicleRole};
use crate::error::ScenarioError;
use crate::initial::InitialStateProvider;
use crate::scenario::params::{ScenarioParams, SimulationConfig, VehicleSpec};
use crate::telemetry::ConvoyTelemetry;
use crate::vehicle::Vehicle;

fn build_vehicle<P: InitialStateProvider + ?Sized>(
    spec: &VehicleSpec,
    role: VehicleRole,
    config: &SimulationConfig,
    provider: &mut P,
) -> Result<Vehicle, ScenarioError> {
    let mut vehicle = Vehicle::new(
        spec.name.clone(),
        spec.params(config.vehicle_defaults),
        config.trajectory_points,
    )?;

    let state = provider
        .initial_state(role, spec)
        .and_then(|state| state.validate().map(|_| state))
        .map_err(|source| ScenarioError::Provider {
            vehicle: spec.name.clone(),
            source,
        })?;

    vehicle
        .set_initial(state.position, state.velocity, state.acceleration)
        .map_err(|source| ScenarioError::Trajectory {
            vehicle: spec.name.clone(),
            source,
        })?;

    debug!(
        vehicle = spec.name.as_str(),
        role = role.label(),
        position = state.position,
        velocity = state.velocity,
        acceleration = state.acceleration,
        "initial state"
    );
    Ok(vehicle)
}

/// Validates the scenario, obtains both initial states from `provider`, spawns
/// the leader and follower and inserts the resources the runner needs.
///
/// Nothing is inserted into `world` when an error is returned.
pub fn build_scenario<P: InitialStateProvider + ?Sized>(
    world: &mut World,
    params: &ScenarioParams,
    provider: &mut P,
) -> Result<Convoy, ScenarioError> {
    let config = params.simulation;
    config.validate()?;

    let leader = build_vehicle(&params.leader, VehicleRole::Leader, &config, provider)?;
    let follower = build_vehicle(&params.follower, VehicleRole::Follower, &config, provider)?;

    world.insert_resource(SimulationClock::new(
        config.time_step,
        config.trajectory_points,
    ));
    world.insert_resource(config);
    world.insert_resource(StepReport::default());
    world.insert_resource(ConvoyTelemetry::default());

    let convoy = Convoy {
        leader: world.spawn((leader, Leader)).id(),
        follower: world.spawn((follower, Follower)).id(),
    };
    world.insert_resource(convoy);
    Ok(convoy)
}

/// Parses a JSON scenario document.
pub fn parse_scenario(json: &str) -> Result<ScenarioParams, ScenarioError> {
    let params: ScenarioParams = serde_json::from_str(json)?;
    params.simulation.validate()?;
    Ok(params)
}

/// Reads and parses a JSON scenario file.
pub fn load_scenario_file<P: AsRef<Path>>(path: P) -> Result<ScenarioParams, ScenarioError> {
    let json = fs::read_to_string(path)?;
    parse_scenario(&json)
}
