use std::error::Error;
use std::fs;
use std::path::Path;

use crate::vehicle::Vehicle;

fn push_series(out: &mut String, key: &str, values: impl Iterator<Item = String>) {
    out.push('"');
    out.push_str(key);
    out.push_str("\":\"");
    for value in values {
        out.push_str(&value);
        out.push(' ');
    }
    out.push('"');
}

/// Renders the legacy trajectory fragment:
/// `"time":"…","speed":"…","location":"…"` plus a newline, with no enclosing
/// braces. Times use `%3.2f`, speeds and locations `%4.2f`.
pub fn legacy_fragment(vehicle: &Vehicle, time_step: f64) -> String {
    let samples = vehicle.trajectory().written_samples();
    let mut out = String::new();

    push_series(
        &mut out,
        "time",
        (0..samples.len()).map(|step| format!("{:3.2}", time_step * step as f64)),
    );
    out.push(',');
    push_series(
        &mut out,
        "speed",
        samples.iter().map(|s| format!("{:4.2}", s.velocity)),
    );
    out.push(',');
    push_series(
        &mut out,
        "location",
        samples.iter().map(|s| format!("{:4.2}", s.position)),
    );
    out.push('\n');
    out
}

pub fn write_trajectory_legacy<P: AsRef<Path>>(
    path: P,
    vehicle: &Vehicle,
    time_step: f64,
) -> Result<(), Box<dyn Error>> {
    fs::write(path, legacy_fragment(vehicle, time_step))?;
    Ok(())
}
