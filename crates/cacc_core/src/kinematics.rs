//! Kinematics updater: produces sample `i` of a vehicle from its own sample `i - 1`.

use crate::error::TrajectoryError;
use crate::vehicle::{Sample, Vehicle};

fn previous_sample(vehicle: &Vehicle, index: usize) -> Result<Sample, TrajectoryError> {
    if index == 0 {
        return Err(TrajectoryError::NoPreviousSample);
    }
    vehicle.trajectory().written_sample(index - 1).copied()
}

/// Leader propagation: velocity and acceleration carried forward, position
/// advanced by `v * dt` with no acceleration term.
pub fn propagate_constant_speed(
    vehicle: &mut Vehicle,
    dt: f64,
    index: usize,
) -> Result<(), TrajectoryError> {
    let prev = previous_sample(vehicle, index)?;
    let next = Sample {
        position: prev.position + prev.velocity * dt,
        velocity: prev.velocity,
        acceleration: prev.acceleration,
        mode: prev.mode,
    };
    vehicle.trajectory_mut().record(index, next)
}

/// Follower propagation: `v + a * dt` capped at `max_velocity`, position
/// advanced with the previous step's velocity and acceleration.
pub fn propagate_accelerated(
    vehicle: &mut Vehicle,
    dt: f64,
    max_velocity: f64,
    index: usize,
) -> Result<(), TrajectoryError> {
    let prev = previous_sample(vehicle, index)?;
    let velocity = (prev.velocity + prev.acceleration * dt).min(max_velocity);
    let next = Sample {
        position: prev.position + prev.velocity * dt + 0.5 * prev.acceleration * dt * dt,
        velocity,
        acceleration: prev.acceleration,
        mode: prev.mode,
    };
    vehicle.trajectory_mut().record(index, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{ControlMode, VehicleParams};

    fn vehicle_at(position: f64, velocity: f64, acceleration: f64) -> Vehicle {
        let mut car =
            Vehicle::new("car", VehicleParams::default(), 8).expect("valid vehicle");
        car.set_initial(position, velocity, acceleration)
            .expect("initial sample");
        car
    }

    #[test]
    fn constant_speed_ignores_acceleration() {
        let mut car = vehicle_at(10.0, 15.0, 2.0);
        propagate_constant_speed(&mut car, 0.1, 1).expect("step");
        let s = car.sample(1).unwrap();
        assert!((s.position - 11.5).abs() < 1e-12);
        assert_eq!(s.velocity, 15.0);
        assert_eq!(s.acceleration, 2.0);
    }

    #[test]
    fn accelerated_uses_previous_velocity_and_acceleration() {
        let mut car = vehicle_at(0.0, 10.0, 2.0);
        propagate_accelerated(&mut car, 0.5, 20.0, 1).expect("step");
        let s = car.sample(1).unwrap();
        // 10 * 0.5 + 0.5 * 2 * 0.25
        assert!((s.position - 5.25).abs() < 1e-12);
        assert!((s.velocity - 11.0).abs() < 1e-12);
        assert_eq!(s.acceleration, 2.0);
    }

    #[test]
    fn accelerated_velocity_below_cap_is_not_clamped() {
        let mut car = vehicle_at(0.0, 19.0, 3.0);
        propagate_accelerated(&mut car, 0.1, 20.0, 1).expect("step");
        assert!((car.sample(1).unwrap().velocity - 19.3).abs() < 1e-12);
    }

    #[test]
    fn accelerated_velocity_is_clamped_to_max() {
        let mut car = vehicle_at(0.0, 19.9, 3.0);
        propagate_accelerated(&mut car, 1.0, 20.0, 1).expect("step");
        let s = car.sample(1).unwrap();
        assert_eq!(s.velocity, 20.0);
        // position still uses the unclamped kinematics of the previous step
        assert!((s.position - 21.4).abs() < 1e-12);
    }

    #[test]
    fn mode_is_carried_forward() {
        let mut car = vehicle_at(0.0, 5.0, 0.0);
        car.trajectory_mut()
            .set_command(0, ControlMode::CollisionAvoidance, -5.0)
            .expect("command");
        propagate_accelerated(&mut car, 0.1, 20.0, 1).expect("step");
        assert_eq!(car.sample(1).unwrap().mode, ControlMode::CollisionAvoidance);
    }

    #[test]
    fn index_zero_has_no_previous_sample() {
        let mut car = vehicle_at(0.0, 5.0, 0.0);
        assert_eq!(
            propagate_constant_speed(&mut car, 0.1, 0).unwrap_err(),
            TrajectoryError::NoPreviousSample
        );
        assert_eq!(
            propagate_accelerated(&mut car, 0.1, 20.0, 0).unwrap_err(),
            TrajectoryError::NoPreviousSample
        );
    }

    #[test]
    fn skipping_an_index_is_rejected() {
        let mut car = vehicle_at(0.0, 5.0, 0.0);
        let err = propagate_constant_speed(&mut car, 0.1, 2).unwrap_err();
        assert_eq!(err, TrajectoryError::NotWritten { index: 1, written: 1 });
    }
}
