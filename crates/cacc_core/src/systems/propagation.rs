use bevy_ecs::prelude::{Query, Res, ResMut, With, Without};

use crate::clock::SimulationClock;
use crate::ecs::{Follower, Leader, StepReport, VehicleRole};
use crate::error::ControlError;
use crate::kinematics::{propagate_accelerated, propagate_constant_speed};
use crate::scenario::SimulationConfig;
use crate::vehicle::Vehicle;

/// Advances the leader at constant speed to the current step.
pub fn leader_propagation_system(
    clock: Res<SimulationClock>,
    mut report: ResMut<StepReport>,
    mut leaders: Query<&mut Vehicle, (With<Leader>, Without<Follower>)>,
) {
    let Ok(mut leader) = leaders.get_single_mut() else {
        report.record_fault(ControlError::MissingVehicle(VehicleRole::Leader.label()));
        return;
    };
    if let Err(err) = propagate_constant_speed(&mut leader, clock.time_step(), clock.step()) {
        report.record_fault(err.into());
    }
}

/// Advances the follower with its current acceleration command, capped at max velocity.
pub fn follower_propagation_system(
    clock: Res<SimulationClock>,
    config: Res<SimulationConfig>,
    mut report: ResMut<StepReport>,
    mut followers: Query<&mut Vehicle, (With<Follower>, Without<Leader>)>,
) {
    if report.is_faulted() {
        return;
    }
    let Ok(mut follower) = followers.get_single_mut() else {
        report.record_fault(ControlError::MissingVehicle(VehicleRole::Follower.label()));
        return;
    };
    if let Err(err) = propagate_accelerated(
        &mut follower,
        clock.time_step(),
        config.max_velocity,
        clock.step(),
    ) {
        report.record_fault(err.into());
    }
}
