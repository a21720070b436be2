#![allow(dead_code)]

use std::path::PathBuf;

use bevy_ecs::prelude::World;
use cacc_core::ecs::Convoy;
use cacc_core::initial::InitialState;
use cacc_core::scenario::{ScenarioParams, VehicleSpec};
use cacc_core::test_helpers::create_test_world;
use cacc_core::vehicle::Vehicle;

/// The stock two-car convoy: 30 m apart, both at 15 m/s.
pub fn cruising_world(points: usize) -> World {
    create_test_world(
        InitialState::new(30.0, 15.0, 0.0),
        InitialState::new(0.0, 15.0, 0.0),
        points,
    )
}

/// Follower closing at 20 m/s on a stopped leader 12 m ahead; collides mid-run.
pub fn closing_params(points: usize) -> ScenarioParams {
    ScenarioParams::default()
        .with_leader(VehicleSpec::new("CarA").at(12.0, 0.0, 0.0))
        .with_follower(VehicleSpec::new("CarB").at(0.0, 20.0, 0.0))
        .with_trajectory_points(points)
}

pub fn leader(world: &World) -> &Vehicle {
    let convoy = world.resource::<Convoy>();
    world.get::<Vehicle>(convoy.leader).expect("leader entity")
}

pub fn follower(world: &World) -> &Vehicle {
    let convoy = world.resource::<Convoy>();
    world.get::<Vehicle>(convoy.follower).expect("follower entity")
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
