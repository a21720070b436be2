use std::error::Error;
use std::path::Path;

use crate::telemetry::ConvoyTelemetry;
use crate::vehicle::Vehicle;

use super::utils::trajectory_rows;

pub fn write_trajectory_csv<P: AsRef<Path>>(
    path: P,
    vehicle: &Vehicle,
    time_step: f64,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in trajectory_rows(vehicle, time_step) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Per-step gap, safe gap and command of the follower's control law.
pub fn write_control_records_csv<P: AsRef<Path>>(
    path: P,
    telemetry: &ConvoyTelemetry,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in &telemetry.records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
