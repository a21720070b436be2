use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::vehicle::{ControlMode, Vehicle};

/// Self-contained JSON form of one trajectory, parallel arrays keyed like the
/// legacy fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryDocument {
    pub vehicle: String,
    pub time_step: f64,
    pub samples: usize,
    pub complete: bool,
    pub time: Vec<f64>,
    pub speed: Vec<f64>,
    pub location: Vec<f64>,
    pub acceleration: Vec<f64>,
    pub mode: Vec<ControlMode>,
}

impl TrajectoryDocument {
    pub fn from_vehicle(vehicle: &Vehicle, time_step: f64) -> Self {
        let samples = vehicle.trajectory().written_samples();
        Self {
            vehicle: vehicle.name().to_string(),
            time_step,
            samples: samples.len(),
            complete: vehicle.trajectory().is_complete(),
            time: (0..samples.len())
                .map(|step| time_step * step as f64)
                .collect(),
            speed: samples.iter().map(|s| s.velocity).collect(),
            location: samples.iter().map(|s| s.position).collect(),
            acceleration: samples.iter().map(|s| s.acceleration).collect(),
            mode: samples.iter().map(|s| s.mode).collect(),
        }
    }
}

pub fn write_trajectory_json<P: AsRef<Path>>(
    path: P,
    vehicle: &Vehicle,
    time_step: f64,
) -> Result<(), Box<dyn Error>> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, &TrajectoryDocument::from_vehicle(vehicle, time_step))?;
    Ok(())
}
