//! CACC control law: classifies the following state and sets the follower's
//! acceleration command for the current step.
//!
//! The law runs on sample `i` after the kinematics updater has written it:
//!
//! 1. A negative gap is a collision ([ControlError::Collision]); the follower
//!    sample is left exactly as the updater wrote it.
//! 2. A negative safe gap is an inconsistent configuration
//!    ([ControlError::NegativeSafeGap]).
//! 3. A gap below the safe gap engages maximum braking and reports
//!    [ControlSignal::CollisionAvoidance], which is not fatal.
//! 4. Otherwise gap control: leader acceleration feed-forward, velocity
//!    matching and a proportional gap error against `v * safe_time_gap + 2 m`,
//!    passed through a first-order filter and clamped to the configured bounds.

use crate::error::ControlError;
use crate::gap::{gap, safe_gap};
use crate::scenario::ControlConfig;
use crate::vehicle::{ControlMode, Vehicle};

/// Feed-forward gain on the leader's communicated acceleration.
const LEADER_ACCEL_GAIN: f64 = 0.66;
/// Gain on the leader/follower velocity difference.
const VELOCITY_GAIN: f64 = 0.99;
/// Gain on the gap error.
const GAP_GAIN: f64 = 4.08;
/// Fixed distance added to the time-gap target (m).
const STANDSTILL_DISTANCE_M: f64 = 2.0;
/// Time constant of the acceleration low-pass filter (s).
const FILTER_TIME_CONSTANT_S: f64 = 0.4;

/// Non-fatal outcome of one control law evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlSignal {
    /// Normal following; `acceleration` is the clamped command.
    GapControl {
        gap: f64,
        safe_gap: f64,
        acceleration: f64,
    },
    /// Gap fell below the safe gap; the follower brakes at `-deceleration`.
    CollisionAvoidance {
        gap: f64,
        safe_gap: f64,
        deceleration: f64,
    },
}

impl ControlSignal {
    pub fn mode(&self) -> ControlMode {
        match self {
            ControlSignal::GapControl { .. } => ControlMode::GapControl,
            ControlSignal::CollisionAvoidance { .. } => ControlMode::CollisionAvoidance,
        }
    }

    pub fn gap(&self) -> f64 {
        match self {
            ControlSignal::GapControl { gap, .. } | ControlSignal::CollisionAvoidance { gap, .. } => {
                *gap
            }
        }
    }

    pub fn safe_gap(&self) -> f64 {
        match self {
            ControlSignal::GapControl { safe_gap, .. }
            | ControlSignal::CollisionAvoidance { safe_gap, .. } => *safe_gap,
        }
    }

    pub fn acceleration(&self) -> f64 {
        match self {
            ControlSignal::GapControl { acceleration, .. } => *acceleration,
            ControlSignal::CollisionAvoidance { deceleration, .. } => -*deceleration,
        }
    }
}

/// Acceleration the gap controller asks for before filtering.
pub fn desired_acceleration(
    leader_acceleration: f64,
    leader_velocity: f64,
    follower_velocity: f64,
    gap: f64,
    safe_time_gap: f64,
) -> f64 {
    LEADER_ACCEL_GAIN * leader_acceleration
        + VELOCITY_GAIN * (leader_velocity - follower_velocity)
        + GAP_GAIN * (gap - follower_velocity * safe_time_gap - STANDSTILL_DISTANCE_M)
}

/// First-order filter from the previous command towards `desired`, then clamped.
pub fn filtered_command(desired: f64, previous: f64, config: &ControlConfig) -> f64 {
    let command = (desired - previous) / FILTER_TIME_CONSTANT_S * config.control_step + previous;
    command.clamp(config.min_acceleration, config.max_acceleration)
}

/// Evaluates the control law at `index` and writes the follower's mode and
/// acceleration for that sample.
pub fn apply_control_law(
    leader: &Vehicle,
    follower: &mut Vehicle,
    config: &ControlConfig,
    index: usize,
) -> Result<ControlSignal, ControlError> {
    let lead = *leader.trajectory().written_sample(index)?;
    let follow = *follower.trajectory().written_sample(index)?;

    let gap = gap(leader, follower, index)?;
    if gap < 0.0 {
        return Err(ControlError::Collision { step: index, gap });
    }

    let safe_gap = safe_gap(leader, follower, index)?;
    if safe_gap < 0.0 {
        return Err(ControlError::NegativeSafeGap {
            step: index,
            safe_gap,
        });
    }

    let signal = if gap < safe_gap {
        ControlSignal::CollisionAvoidance {
            gap,
            safe_gap,
            deceleration: follower.max_deceleration(),
        }
    } else {
        let desired = desired_acceleration(
            lead.acceleration,
            lead.velocity,
            follow.velocity,
            gap,
            config.safe_time_gap,
        );
        ControlSignal::GapControl {
            gap,
            safe_gap,
            acceleration: filtered_command(desired, follow.acceleration, config),
        }
    };

    follower
        .trajectory_mut()
        .set_command(index, signal.mode(), signal.acceleration())?;
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::VehicleParams;

    fn vehicle(name: &str, position: f64, velocity: f64, acceleration: f64) -> Vehicle {
        let mut car = Vehicle::new(name, VehicleParams::default(), 4).expect("valid vehicle");
        car.set_initial(position, velocity, acceleration)
            .expect("initial");
        car
    }

    #[test]
    fn collision_leaves_follower_sample_untouched() {
        let leader = vehicle("lead", 10.0, 10.0, 0.0);
        let mut follower = vehicle("follow", 8.0, 12.0, 1.5);
        let before = *follower.sample(0).unwrap();

        let err = apply_control_law(&leader, &mut follower, &ControlConfig::default(), 0)
            .unwrap_err();

        assert!(matches!(err, ControlError::Collision { step: 0, gap } if gap == -3.0));
        assert_eq!(*follower.sample(0).unwrap(), before);
    }

    #[test]
    fn gap_below_safe_gap_brakes_at_follower_limit() {
        // gap = 20 - 0 - 5 = 15, safe gap = 1 + 20 - 0 + 1 = 22
        let leader = vehicle("lead", 20.0, 0.0, 0.0);
        let mut follower = Vehicle::new(
            "follow",
            VehicleParams {
                max_deceleration: 2.5,
                ..Default::default()
            },
            4,
        )
        .expect("valid vehicle");
        follower.set_initial(0.0, 10.0, 0.0).expect("initial");

        let signal = apply_control_law(&leader, &mut follower, &ControlConfig::default(), 0)
            .expect("non-fatal");

        assert!(matches!(signal, ControlSignal::CollisionAvoidance { .. }));
        let sample = follower.sample(0).unwrap();
        assert_eq!(sample.mode, ControlMode::CollisionAvoidance);
        assert_eq!(sample.acceleration, -2.5);
    }

    #[test]
    fn gap_control_filters_toward_desired_acceleration() {
        // gap = 30 - 0 - 5 = 25, safe gap floor 1.0
        // desired = 0.66 * 0 + 0.99 * 0 + 4.08 * (25 - 10 * 0.55 - 2) = 71.4
        // command = (71.4 - 0) / 0.4 * 0.1 = 17.85 -> clamped to 3
        let leader = vehicle("lead", 30.0, 10.0, 0.0);
        let mut follower = vehicle("follow", 0.0, 10.0, 0.0);

        let signal = apply_control_law(&leader, &mut follower, &ControlConfig::default(), 0)
            .expect("gap control");

        assert_eq!(signal.mode(), ControlMode::GapControl);
        assert_eq!(signal.acceleration(), 3.0);
        assert_eq!(follower.sample(0).unwrap().acceleration, 3.0);
        assert_eq!(follower.sample(0).unwrap().mode, ControlMode::GapControl);
    }

    #[test]
    fn gap_control_within_bounds_is_not_clamped() {
        // gap = 17.7 - 0 - 5 = 12.7; target = 10 * 0.55 + 2 = 7.5
        // desired = 0.66 * 0.5 + 0.99 * 0 + 4.08 * (12.7 - 7.5) = 21.546
        // command = (21.546 - 2.5) / 0.4 * 0.01 + 2.5 = 2.97615
        let leader = vehicle("lead", 17.7, 10.0, 0.5);
        let mut follower = vehicle("follow", 0.0, 10.0, 2.5);
        let config = ControlConfig {
            control_step: 0.01,
            ..Default::default()
        };

        let signal = apply_control_law(&leader, &mut follower, &config, 0).expect("gap control");

        assert!((signal.acceleration() - 2.97615).abs() < 1e-9);
    }

    #[test]
    fn filter_clamps_to_configured_bounds() {
        let config = ControlConfig::default();
        assert_eq!(filtered_command(-100.0, 0.0, &config), -3.0);
        assert_eq!(filtered_command(100.0, 0.0, &config), 3.0);
        // (1.0 - 0.6) / 0.4 * 0.1 + 0.6 = 0.7
        assert!((filtered_command(1.0, 0.6, &config) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn unwritten_index_is_rejected() {
        let leader = vehicle("lead", 30.0, 10.0, 0.0);
        let mut follower = vehicle("follow", 0.0, 10.0, 0.0);
        let err = apply_control_law(&leader, &mut follower, &ControlConfig::default(), 1)
            .unwrap_err();
        assert!(matches!(err, ControlError::Trajectory(_)));
    }
}
