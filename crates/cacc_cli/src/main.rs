use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use cacc_core::initial::{PromptInitialState, ScenarioInitialState};
use cacc_core::runner::{simulate, RunStatus, SimulationReport};
use cacc_core::scenario::{load_scenario_file, ScenarioParams};
use cacc_core::telemetry_export::{
    export_report, write_control_records_csv, write_control_records_parquet, ExportFormat,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "cacc",
    about = "Two-car cooperative adaptive cruise control simulator",
    long_about = "Simulates a leader and a CACC-equipped follower on a straight lane\n\
                  and writes both trajectories to disk."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the convoy simulation and export both trajectories
    Run(RunArgs),
    /// Print the effective simulation parameters
    Params(ScenarioArgs),
}

#[derive(Args)]
struct ScenarioArgs {
    /// JSON scenario file; built-in defaults are used when omitted
    #[arg(long, env = "CACC_SCENARIO")]
    scenario: Option<PathBuf>,
    /// Number of trajectory samples per vehicle
    #[arg(long)]
    points: Option<usize>,
    /// Physics time step in seconds
    #[arg(long)]
    time_step: Option<f64>,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,
    /// Prompt for each vehicle's distance, velocity and acceleration on stdin
    #[arg(long)]
    interactive: bool,
    /// Directory receiving one trajectory file per vehicle
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Trajectory file format
    #[arg(value_enum, long, default_value_t = Format::Legacy)]
    format: Format,
    /// Also write the follower's per-step control records
    #[arg(long)]
    control_records: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Legacy `"time":…,"speed":…,"location":…` fragment
    Legacy,
    Json,
    Csv,
    Parquet,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Legacy => ExportFormat::Legacy,
            Format::Json => ExportFormat::Json,
            Format::Csv => ExportFormat::Csv,
            Format::Parquet => ExportFormat::Parquet,
        }
    }
}

// ── Commands ───────────────────────────────────────────────────────

fn load_params(args: &ScenarioArgs) -> Result<ScenarioParams, Box<dyn Error>> {
    let mut params = match &args.scenario {
        Some(path) => {
            info!(path = %path.display(), "loading scenario");
            load_scenario_file(path)?
        }
        None => ScenarioParams::default(),
    };
    if let Some(points) = args.points {
        params = params.with_trajectory_points(points);
    }
    if let Some(time_step) = args.time_step {
        params = params.with_time_step(time_step);
    }
    params.simulation.validate()?;
    Ok(params)
}

fn print_params(params: &ScenarioParams) {
    let sim = &params.simulation;
    println!("Safe time gap is {:4.2}", sim.control.safe_time_gap);
    println!("Car length is {:4.2}", sim.vehicle_defaults.length);
    println!("Max deceleration is {:4.2}", sim.vehicle_defaults.max_deceleration);
    println!("Max velocity is {:4.2}", sim.max_velocity);
    println!("Time unit is {:4.2}", sim.time_step);
    println!("Trajectory points num is {}", sim.trajectory_points);
    println!("Simulated horizon is {:4.2} s", sim.horizon_secs());
    println!("Control step is {:4.2}", sim.control.control_step);
    println!(
        "Acceleration bounds are [{:4.2}, {:4.2}]",
        sim.control.min_acceleration, sim.control.max_acceleration
    );
    for (role, spec) in [("Leader", &params.leader), ("Follower", &params.follower)] {
        println!(
            "{role} {}: d = {:.2}, v = {:.2}, a = {:.2}",
            spec.name, spec.position, spec.velocity, spec.acceleration
        );
    }
}

fn write_outputs(report: &SimulationReport, args: &RunArgs) -> Result<(), Box<dyn Error>> {
    export_report(&args.out_dir, report, args.format.into())?;
    if args.control_records {
        let path = match args.format {
            Format::Parquet => {
                let path = args.out_dir.join("control_records.parquet");
                write_control_records_parquet(&path, &report.telemetry)?;
                path
            }
            _ => {
                let path = args.out_dir.join("control_records.csv");
                write_control_records_csv(&path, &report.telemetry)?;
                path
            }
        };
        info!(path = %path.display(), "control records exported");
    }
    Ok(())
}

fn run(args: RunArgs) -> Result<ExitCode, Box<dyn Error>> {
    let params = load_params(&args.scenario)?;

    let report = if args.interactive {
        let stdin = io::stdin();
        let mut prompt = PromptInitialState::new(stdin.lock(), io::stdout());
        simulate(&params, &mut prompt)?
    } else {
        simulate(&params, &mut ScenarioInitialState)?
    };

    match report.status {
        RunStatus::Completed => {
            write_outputs(&report, &args)?;
            Ok(ExitCode::SUCCESS)
        }
        RunStatus::Halted { step, error } => {
            warn!(step, %error, "exporting partial trajectories");
            write_outputs(&report, &args)?;
            Ok(ExitCode::from(2))
        }
        RunStatus::RefusedToStart { .. } => Ok(ExitCode::from(3)),
    }
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Params(args) => {
            print_params(&load_params(&args)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
