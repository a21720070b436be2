use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::vehicle::VehicleParams;

/// Default physics integration step: 10 ms.
const DEFAULT_TIME_STEP_S: f64 = 0.01;
/// Default number of trajectory samples per vehicle.
const DEFAULT_TRAJECTORY_POINTS: usize = 1000;
/// Default follower speed cap, roughly 45 mph.
const DEFAULT_MAX_VELOCITY: f64 = 20.0;

/// Control law tuning: time-gap policy, filter rate and acceleration bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Headway (s) multiplying follower velocity in the target gap.
    pub safe_time_gap: f64,
    /// Step constant of the acceleration low-pass filter. Independent of the
    /// physics time step.
    pub control_step: f64,
    /// Lower bound of the gap-control acceleration command (m/s²).
    pub min_acceleration: f64,
    /// Upper bound of the gap-control acceleration command (m/s²).
    pub max_acceleration: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            safe_time_gap: 0.55,
            control_step: 0.1,
            min_acceleration: -3.0,
            max_acceleration: 3.0,
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.control_step.is_finite() && self.control_step > 0.0) {
            return Err(ConfigError::InvalidControlStep(self.control_step));
        }
        if !(self.safe_time_gap.is_finite() && self.safe_time_gap >= 0.0) {
            return Err(ConfigError::InvalidSafeTimeGap(self.safe_time_gap));
        }
        if !(self.min_acceleration.is_finite() && self.max_acceleration.is_finite()) {
            return Err(ConfigError::NonFiniteAccelerationBounds {
                min: self.min_acceleration,
                max: self.max_acceleration,
            });
        }
        if self.min_acceleration > self.max_acceleration {
            return Err(ConfigError::InvertedAccelerationBounds {
                min: self.min_acceleration,
                max: self.max_acceleration,
            });
        }
        Ok(())
    }
}

/// Run-wide settings: integration step, horizon, speed cap and vehicle defaults.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Physics time step in seconds.
    pub time_step: f64,
    /// Samples per vehicle, initial condition included.
    pub trajectory_points: usize,
    /// Follower velocity cap (m/s).
    pub max_velocity: f64,
    /// Length and braking used by vehicles that do not override them.
    pub vehicle_defaults: VehicleParams,
    /// Refuse to start when the initial state already requires collision avoidance.
    pub abort_on_initial_avoidance: bool,
    pub control: ControlConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP_S,
            trajectory_points: DEFAULT_TRAJECTORY_POINTS,
            max_velocity: DEFAULT_MAX_VELOCITY,
            vehicle_defaults: VehicleParams::default(),
            abort_on_initial_avoidance: false,
            control: ControlConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }
        if self.trajectory_points == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(self.max_velocity.is_finite() && self.max_velocity > 0.0) {
            return Err(ConfigError::InvalidMaxVelocity(self.max_velocity));
        }
        self.vehicle_defaults.validate()?;
        self.control.validate()
    }

    /// Simulated duration covered by a complete trajectory, in seconds.
    pub fn horizon_secs(&self) -> f64 {
        self.time_step * self.trajectory_points.saturating_sub(1) as f64
    }
}

/// One convoy member as described in a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub name: String,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub velocity: f64,
    #[serde(default)]
    pub acceleration: f64,
    /// Overrides [SimulationConfig::vehicle_defaults] length when set.
    #[serde(default)]
    pub length: Option<f64>,
    /// Overrides [SimulationConfig::vehicle_defaults] deceleration when set.
    #[serde(default)]
    pub max_deceleration: Option<f64>,
}

impl VehicleSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 0.0,
            velocity: 0.0,
            acceleration: 0.0,
            length: None,
            max_deceleration: None,
        }
    }

    pub fn at(mut self, position: f64, velocity: f64, acceleration: f64) -> Self {
        self.position = position;
        self.velocity = velocity;
        self.acceleration = acceleration;
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_max_deceleration(mut self, max_deceleration: f64) -> Self {
        self.max_deceleration = Some(max_deceleration);
        self
    }

    /// Physical parameters with simulation defaults filled in.
    pub fn params(&self, defaults: VehicleParams) -> VehicleParams {
        VehicleParams {
            length: self.length.unwrap_or(defaults.length),
            max_deceleration: self.max_deceleration.unwrap_or(defaults.max_deceleration),
        }
    }
}

/// Parameters for building a convoy scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub leader: VehicleSpec,
    pub follower: VehicleSpec,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            leader: VehicleSpec::new("CarA").at(30.0, 15.0, 0.0),
            follower: VehicleSpec::new("CarB").at(0.0, 15.0, 0.0),
        }
    }
}

impl ScenarioParams {
    pub fn with_leader(mut self, leader: VehicleSpec) -> Self {
        self.leader = leader;
        self
    }

    pub fn with_follower(mut self, follower: VehicleSpec) -> Self {
        self.follower = follower;
        self
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.simulation.time_step = time_step;
        self
    }

    pub fn with_trajectory_points(mut self, points: usize) -> Self {
        self.simulation.trajectory_points = points;
        self
    }

    pub fn with_max_velocity(mut self, max_velocity: f64) -> Self {
        self.simulation.max_velocity = max_velocity;
        self
    }

    pub fn with_safe_time_gap(mut self, safe_time_gap: f64) -> Self {
        self.simulation.control.safe_time_gap = safe_time_gap;
        self
    }

    pub fn with_control_step(mut self, control_step: f64) -> Self {
        self.simulation.control.control_step = control_step;
        self
    }

    pub fn with_abort_on_initial_avoidance(mut self, abort: bool) -> Self {
        self.simulation.abort_on_initial_avoidance = abort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_configuration() {
        let config = SimulationConfig::default();
        assert_eq!(config.time_step, 0.01);
        assert_eq!(config.trajectory_points, 1000);
        assert_eq!(config.max_velocity, 20.0);
        assert_eq!(config.vehicle_defaults.length, 5.0);
        assert_eq!(config.vehicle_defaults.max_deceleration, 5.0);
        assert_eq!(config.control.safe_time_gap, 0.55);
        assert_eq!(config.control.control_step, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let config = SimulationConfig {
            time_step: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeStep(0.0)));

        let config = SimulationConfig {
            trajectory_points: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));

        let mut config = SimulationConfig::default();
        config.control.min_acceleration = 4.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedAccelerationBounds { min: 4.0, max: 3.0 })
        );
    }

    #[test]
    fn validation_rejects_nan_acceleration_bound() {
        let mut config = SimulationConfig::default();
        config.control.max_acceleration = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteAccelerationBounds { min, max }) if min == -3.0 && max.is_nan()
        ));

        let mut config = SimulationConfig::default();
        config.control.min_acceleration = f64::NEG_INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteAccelerationBounds { .. })
        ));
    }

    #[test]
    fn validation_rejects_bad_safe_time_gap() {
        for headway in [f64::NAN, f64::INFINITY, -0.1] {
            let mut config = SimulationConfig::default();
            config.control.safe_time_gap = headway;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidSafeTimeGap(_))
            ));
        }

        let mut config = SimulationConfig::default();
        config.control.safe_time_gap = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn vehicle_spec_overrides_defaults() {
        let spec = VehicleSpec::new("truck").with_length(12.0);
        let params = spec.params(VehicleParams::default());
        assert_eq!(params.length, 12.0);
        assert_eq!(params.max_deceleration, 5.0);
    }

    #[test]
    fn horizon_covers_all_steps() {
        let config = SimulationConfig {
            time_step: 0.5,
            trajectory_points: 5,
            ..Default::default()
        };
        assert_eq!(config.horizon_secs(), 2.0);
    }
}
