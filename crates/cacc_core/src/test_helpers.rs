//! Test helpers for common test setup and utilities.
//!
//! This module provides shared convoy fixtures to reduce duplication across test files.

use bevy_ecs::prelude::World;

use crate::clock::SimulationClock;
use crate::ecs::{Convoy, Follower, Leader, StepReport};
use crate::initial::InitialState;
use crate::scenario::SimulationConfig;
use crate::telemetry::ConvoyTelemetry;
use crate::vehicle::{Vehicle, VehicleParams};

/// Time step used by the helper worlds, matching the default physics step.
pub const TEST_TIME_STEP: f64 = 0.01;

/// Vehicle with default parameters and sample 0 populated from `state`.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn test_vehicle(name: &str, state: InitialState, capacity: usize) -> Vehicle {
    let mut vehicle =
        Vehicle::new(name, VehicleParams::default(), capacity).expect("test vehicle params");
    vehicle
        .set_initial(state.position, state.velocity, state.acceleration)
        .expect("fresh trajectory accepts sample 0");
    vehicle
}

/// Create a convoy world with every resource the runner needs, bypassing
/// scenario validation and initial-state providers.
///
/// For scenario-driven setups, use the full `build_scenario` function.
pub fn create_test_world(leader: InitialState, follower: InitialState, points: usize) -> World {
    let config = SimulationConfig {
        time_step: TEST_TIME_STEP,
        trajectory_points: points,
        ..Default::default()
    };

    let mut world = World::new();
    world.insert_resource(SimulationClock::new(config.time_step, points));
    world.insert_resource(config);
    world.insert_resource(StepReport::default());
    world.insert_resource(ConvoyTelemetry::default());

    let convoy = Convoy {
        leader: world
            .spawn((test_vehicle("CarA", leader, points), Leader))
            .id(),
        follower: world
            .spawn((test_vehicle("CarB", follower, points), Follower))
            .id(),
    };
    world.insert_resource(convoy);
    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_has_populated_convoy() {
        let world = create_test_world(
            InitialState::new(30.0, 15.0, 0.0),
            InitialState::new(0.0, 15.0, 0.0),
            8,
        );
        let convoy = *world.resource::<Convoy>();
        let follower = world.get::<Vehicle>(convoy.follower).expect("follower");
        assert_eq!(follower.trajectory().written(), 1);
        assert_eq!(follower.trajectory().capacity(), 8);
        assert_eq!(world.resource::<SimulationClock>().total_steps(), 8);
    }
}
