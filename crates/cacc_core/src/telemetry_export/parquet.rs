use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt64Array, UInt8Array};
use arrow::datatypes::Schema;

use crate::telemetry::ConvoyTelemetry;
use crate::vehicle::Vehicle;

use super::utils::{f64_field, trajectory_rows, u64_field, u8_field, write_record_batch};

pub fn write_trajectory_parquet<P: AsRef<Path>>(
    path: P,
    vehicle: &Vehicle,
    time_step: f64,
) -> Result<(), Box<dyn Error>> {
    let rows = trajectory_rows(vehicle, time_step);

    let schema = Schema::new(vec![
        u64_field("step"),
        f64_field("time_secs"),
        f64_field("position"),
        f64_field("velocity"),
        f64_field("acceleration"),
        u8_field("mode"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.step))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.time_secs))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.position))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.velocity))),
        Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.acceleration),
        )),
        Arc::new(UInt8Array::from_iter_values(rows.iter().map(|r| r.mode.code()))),
    ];

    write_record_batch(path, schema, arrays)
}

pub fn write_control_records_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &ConvoyTelemetry,
) -> Result<(), Box<dyn Error>> {
    let records = &telemetry.records;

    let schema = Schema::new(vec![
        u64_field("step"),
        f64_field("time_secs"),
        f64_field("gap"),
        f64_field("safe_gap"),
        u8_field("mode"),
        f64_field("acceleration"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.step as u64),
        )),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.time_secs))),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.gap))),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.safe_gap))),
        Arc::new(UInt8Array::from_iter_values(
            records.iter().map(|r| r.mode.code()),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.acceleration),
        )),
    ];

    write_record_batch(path, schema, arrays)
}
