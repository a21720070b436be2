//! Scenario setup: simulation settings, convoy vehicle specs and world construction.
//!
//! A scenario is either built in code through [ScenarioParams] builder methods
//! or loaded from a JSON file with [load_scenario_file].

mod build;
mod params;

pub use build::{build_scenario, load_scenario_file, parse_scenario};
pub use params::{ControlConfig, ScenarioParams, SimulationConfig, VehicleSpec};
