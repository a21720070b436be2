//! Initial-condition providers.
//!
//! The core never reads initial conditions itself. [crate::scenario::build_scenario]
//! asks an [InitialStateProvider] for one `(position, velocity, acceleration)`
//! triple per vehicle before step 0.

use std::io::{BufRead, Write};

use crate::ecs::VehicleRole;
use crate::error::ProviderError;
use crate::scenario::VehicleSpec;

/// Position (m), velocity (m/s) and acceleration (m/s²) at step 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InitialState {
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

impl InitialState {
    pub fn new(position: f64, velocity: f64, acceleration: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        for (field, value) in [
            ("position", self.position),
            ("velocity", self.velocity),
            ("acceleration", self.acceleration),
        ] {
            if !value.is_finite() {
                return Err(ProviderError::NonFinite { field, value });
            }
        }
        Ok(())
    }
}

/// Source of the initial condition for each convoy member.
pub trait InitialStateProvider {
    fn initial_state(
        &mut self,
        role: VehicleRole,
        spec: &VehicleSpec,
    ) -> Result<InitialState, ProviderError>;
}

/// Takes the initial condition straight from the scenario's vehicle specs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioInitialState;

impl InitialStateProvider for ScenarioInitialState {
    fn initial_state(
        &mut self,
        _role: VehicleRole,
        spec: &VehicleSpec,
    ) -> Result<InitialState, ProviderError> {
        Ok(InitialState::new(spec.position, spec.velocity, spec.acceleration))
    }
}

/// Interactive console prompt: asks for distance, velocity and acceleration
/// of each vehicle in turn, one number per line.
pub struct PromptInitialState<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptInitialState<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_value(&mut self, prompt: &str, field: &'static str) -> Result<f64, ProviderError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(ProviderError::EndOfInput(field));
            }
            if !line.trim().is_empty() {
                break;
            }
        }
        let trimmed = line.trim();
        trimmed.parse::<f64>().map_err(|_| ProviderError::Parse {
            field,
            input: trimmed.to_string(),
        })
    }
}

impl<R: BufRead, W: Write> InitialStateProvider for PromptInitialState<R, W> {
    fn initial_state(
        &mut self,
        role: VehicleRole,
        spec: &VehicleSpec,
    ) -> Result<InitialState, ProviderError> {
        writeln!(self.output, "{} info ({})", spec.name, role.label())?;
        let position = self.read_value("Distance: ", "position")?;
        let velocity = self.read_value("Velocity: ", "velocity")?;
        let acceleration = self.read_value("Acceleration: ", "acceleration")?;
        Ok(InitialState::new(position, velocity, acceleration))
    }
}
