use crate::vehicle::{Sample, Vehicle};

/// Checks that a trajectory is a clean written prefix: every written sample
/// is finite and every slot after it still holds the default sample.
/// Returns an error message if validation fails, None if valid.
pub fn validate_trajectory_prefix(vehicle: &Vehicle) -> Option<String> {
    let trajectory = vehicle.trajectory();
    for (step, sample) in trajectory.written_samples().iter().enumerate() {
        if !(sample.position.is_finite()
            && sample.velocity.is_finite()
            && sample.acceleration.is_finite())
        {
            return Some(format!(
                "{} step {}: non-finite sample {:?}",
                vehicle.name(),
                step,
                sample
            ));
        }
    }

    let written = trajectory.written();
    trajectory.samples()[written..]
        .iter()
        .position(|sample| *sample != Sample::default())
        .map(|offset| {
            format!(
                "{} step {}: unwritten slot holds a non-default sample",
                vehicle.name(),
                written + offset
            )
        })
}
