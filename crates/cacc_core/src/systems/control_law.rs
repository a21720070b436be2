use bevy_ecs::prelude::{Query, Res, ResMut, With, Without};
use tracing::warn;

use crate::clock::SimulationClock;
use crate::control::{apply_control_law, ControlSignal};
use crate::ecs::{Follower, Leader, StepReport, VehicleRole};
use crate::error::ControlError;
use crate::scenario::SimulationConfig;
use crate::telemetry::ConvoyTelemetry;
use crate::vehicle::Vehicle;

/// Evaluates the control law at the current step and stores the outcome in
/// [StepReport]. Skipped when an earlier system of the step already faulted.
pub fn control_law_system(
    clock: Res<SimulationClock>,
    config: Res<SimulationConfig>,
    mut report: ResMut<StepReport>,
    mut telemetry: ResMut<ConvoyTelemetry>,
    leaders: Query<&Vehicle, (With<Leader>, Without<Follower>)>,
    mut followers: Query<&mut Vehicle, (With<Follower>, Without<Leader>)>,
) {
    if report.is_faulted() {
        return;
    }
    let Ok(leader) = leaders.get_single() else {
        report.record_fault(ControlError::MissingVehicle(VehicleRole::Leader.label()));
        return;
    };
    let Ok(mut follower) = followers.get_single_mut() else {
        report.record_fault(ControlError::MissingVehicle(VehicleRole::Follower.label()));
        return;
    };

    let step = clock.step();
    match apply_control_law(leader, &mut follower, &config.control, step) {
        Ok(signal) => {
            if let ControlSignal::CollisionAvoidance {
                gap,
                safe_gap,
                deceleration,
            } = signal
            {
                warn!(
                    step,
                    gap, safe_gap, deceleration, "gap below safe gap, entering collision avoidance"
                );
            }
            telemetry.record_signal(step, clock.now_secs(), &signal);
            report.outcome = Some(Ok(signal));
        }
        Err(err) => report.record_fault(err),
    }
}
