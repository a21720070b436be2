use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use crate::vehicle::{ControlMode, Vehicle};

/// One exported trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryRow {
    pub step: u64,
    pub time_secs: f64,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub mode: ControlMode,
}

/// Rows for the written prefix of `vehicle`'s trajectory.
pub fn trajectory_rows(vehicle: &Vehicle, time_step: f64) -> Vec<TrajectoryRow> {
    vehicle
        .trajectory()
        .written_samples()
        .iter()
        .enumerate()
        .map(|(step, sample)| TrajectoryRow {
            step: step as u64,
            time_secs: time_step * step as f64,
            position: sample.position,
            velocity: sample.velocity,
            acceleration: sample.acceleration,
            mode: sample.mode,
        })
        .collect()
}

pub(super) fn u64_field(name: &'static str) -> Field {
    Field::new(name, DataType::UInt64, false)
}

pub(super) fn u8_field(name: &'static str) -> Field {
    Field::new(name, DataType::UInt8, false)
}

pub(super) fn f64_field(name: &'static str) -> Field {
    Field::new(name, DataType::Float64, false)
}

pub(super) fn write_record_batch<P: AsRef<Path>>(
    path: P,
    schema: Schema,
    arrays: Vec<ArrayRef>,
) -> Result<(), Box<dyn Error>> {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
