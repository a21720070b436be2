//! Run the default two-car convoy for ten seconds and print a summary.
//!
//! Run with: cargo run -p cacc_core --example convoy_run

use cacc_core::initial::ScenarioInitialState;
use cacc_core::runner::{simulate, RunStatus};
use cacc_core::scenario::ScenarioParams;

fn main() {
    const POINTS: usize = 1000;

    let params = ScenarioParams::default().with_trajectory_points(POINTS);
    let report = match simulate(&params, &mut ScenarioInitialState) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("scenario failed: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "--- Convoy run ({} -> {}, {} points, dt {} s) ---",
        params.leader.name, params.follower.name, POINTS, report.time_step
    );
    match report.status {
        RunStatus::Completed => println!("Status: completed"),
        RunStatus::Halted { step, error } => println!("Status: halted at step {step}: {error}"),
        RunStatus::RefusedToStart { signal } => println!(
            "Status: refused to start (gap {:.2} m < safe gap {:.2} m)",
            signal.gap(),
            signal.safe_gap()
        ),
    }
    println!("Samples written: {}", report.steps_written());
    println!(
        "Gap control steps: {}, collision avoidance steps: {}",
        report.telemetry.gap_control_steps,
        report.telemetry.avoidance_count()
    );
    if let Some((step, gap)) = report.telemetry.min_gap() {
        println!("Minimum gap: {gap:.2} m at step {step}");
    }
    if let Some(margin) = report.telemetry.min_margin() {
        println!("Minimum gap minus safe gap: {margin:.2} m");
    }
    if !report.status.is_completed() {
        std::process::exit(2);
    }
    if let Ok(last) = report
        .follower
        .trajectory()
        .written_sample(report.steps_written() - 1)
    {
        println!(
            "Final follower state: d = {:.2} m, v = {:.2} m/s, a = {:.2} m/s^2",
            last.position, last.velocity, last.acceleration
        );
    }
}
