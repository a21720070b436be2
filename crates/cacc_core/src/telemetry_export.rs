//! Trajectory export: one file per vehicle, in the legacy fragment format or
//! as JSON, CSV or Parquet. Only the written prefix of a trajectory is
//! exported, so halted runs produce partial files for post-mortem inspection.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::runner::SimulationReport;
use crate::vehicle::Vehicle;

#[path = "telemetry_export/csv.rs"]
mod csv_export;
#[path = "telemetry_export/json.rs"]
mod json_export;
#[path = "telemetry_export/legacy.rs"]
mod legacy_export;
#[path = "telemetry_export/parquet.rs"]
mod parquet_export;
#[path = "telemetry_export/utils.rs"]
mod utils;
#[path = "telemetry_export/validate.rs"]
mod validate;

pub use csv_export::{write_control_records_csv, write_trajectory_csv};
pub use json_export::{write_trajectory_json, TrajectoryDocument};
pub use legacy_export::{legacy_fragment, write_trajectory_legacy};
pub use parquet_export::{write_control_records_parquet, write_trajectory_parquet};
pub use utils::{trajectory_rows, TrajectoryRow};
pub use validate::validate_trajectory_prefix;

/// Output format for trajectory files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// `"time":"…","speed":"…","location":"…"` fragment, file named after the vehicle.
    #[default]
    Legacy,
    Json,
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ExportFormat::Legacy => None,
            ExportFormat::Json => Some("json"),
            ExportFormat::Csv => Some("csv"),
            ExportFormat::Parquet => Some("parquet"),
        }
    }

    pub fn file_name(self, vehicle_name: &str) -> String {
        match self.extension() {
            Some(ext) => format!("{vehicle_name}.{ext}"),
            None => vehicle_name.to_string(),
        }
    }
}

/// Writes one vehicle's trajectory to `path` in `format`.
pub fn write_trajectory<P: AsRef<Path>>(
    path: P,
    vehicle: &Vehicle,
    time_step: f64,
    format: ExportFormat,
) -> Result<(), Box<dyn Error>> {
    match format {
        ExportFormat::Legacy => write_trajectory_legacy(path, vehicle, time_step),
        ExportFormat::Json => write_trajectory_json(path, vehicle, time_step),
        ExportFormat::Csv => write_trajectory_csv(path, vehicle, time_step),
        ExportFormat::Parquet => write_trajectory_parquet(path, vehicle, time_step),
    }
}

/// Writes both trajectories of `report` into `dir`, creating it if needed.
/// Returns the written paths, leader first.
pub fn export_report<P: AsRef<Path>>(
    dir: P,
    report: &SimulationReport,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(2);
    for vehicle in report.vehicles() {
        let path = dir.join(format.file_name(vehicle.name()));
        write_trajectory(&path, vehicle, report.time_step, format)?;
        info!(
            vehicle = vehicle.name(),
            samples = vehicle.trajectory().written(),
            path = %path.display(),
            "trajectory exported"
        );
        written.push(path);
    }
    Ok(written)
}
