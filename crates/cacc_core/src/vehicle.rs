//! Trajectory store: per-step kinematic samples plus static vehicle parameters.
//!
//! A [Vehicle] owns a fixed-capacity trajectory. Sample 0 is the initial
//! condition; later samples are written strictly in index order by the
//! kinematics updater, and only the most recent one may have its control
//! command rewritten by the control law.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TrajectoryError};

/// Control regime the follower was in when a sample was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Normal cooperative following on gap and velocity error.
    #[default]
    GapControl,
    /// Maximum braking because the gap fell below the safe gap.
    CollisionAvoidance,
    /// Plain adaptive cruise control. Reserved; the control law never assigns it.
    PlainAcc,
}

impl ControlMode {
    pub fn code(self) -> u8 {
        match self {
            ControlMode::GapControl => 0,
            ControlMode::CollisionAvoidance => 1,
            ControlMode::PlainAcc => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlMode::GapControl => "gap_control",
            ControlMode::CollisionAvoidance => "collision_avoidance",
            ControlMode::PlainAcc => "plain_acc",
        }
    }
}

/// One kinematic sample: position (m), velocity (m/s), acceleration (m/s²).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub mode: ControlMode,
}

impl Sample {
    pub fn new(position: f64, velocity: f64, acceleration: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration,
            mode: ControlMode::default(),
        }
    }
}

/// Static physical parameters of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    /// Bumper-to-bumper length in metres.
    pub length: f64,
    /// Maximum braking capability in m/s² (positive).
    pub max_deceleration: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            length: 5.0,
            max_deceleration: 5.0,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(ConfigError::InvalidLength(self.length));
        }
        if !(self.max_deceleration.is_finite() && self.max_deceleration > 0.0) {
            return Err(ConfigError::InvalidMaxDeceleration(self.max_deceleration));
        }
        Ok(())
    }
}

/// Fixed-capacity, append-only sequence of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    samples: Vec<Sample>,
    written: usize,
}

impl Trajectory {
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            samples: vec![Sample::default(); capacity],
            written: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples written so far (initial condition included).
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn is_complete(&self) -> bool {
        self.written == self.samples.len()
    }

    /// Sample at `index`, written or still at its default value.
    pub fn get(&self, index: usize) -> Result<&Sample, TrajectoryError> {
        self.samples
            .get(index)
            .ok_or(TrajectoryError::IndexOutOfRange {
                index,
                capacity: self.samples.len(),
            })
    }

    /// Sample at `index`, only if it has been written.
    pub fn written_sample(&self, index: usize) -> Result<&Sample, TrajectoryError> {
        let sample = self.get(index)?;
        if index >= self.written {
            return Err(TrajectoryError::NotWritten {
                index,
                written: self.written,
            });
        }
        Ok(sample)
    }

    /// Every slot up to capacity, including unwritten defaults.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The written prefix.
    pub fn written_samples(&self) -> &[Sample] {
        &self.samples[..self.written]
    }

    /// Writes the next sample. `index` must equal the number already written.
    pub fn record(&mut self, index: usize, sample: Sample) -> Result<(), TrajectoryError> {
        if index >= self.samples.len() {
            return Err(TrajectoryError::IndexOutOfRange {
                index,
                capacity: self.samples.len(),
            });
        }
        if index != self.written {
            return Err(TrajectoryError::OutOfOrderWrite {
                index,
                expected: self.written,
            });
        }
        self.samples[index] = sample;
        self.written += 1;
        Ok(())
    }

    /// Overwrites mode and acceleration of the latest written sample.
    pub fn set_command(
        &mut self,
        index: usize,
        mode: ControlMode,
        acceleration: f64,
    ) -> Result<(), TrajectoryError> {
        self.written_sample(index)?;
        let latest = self.written - 1;
        if index != latest {
            return Err(TrajectoryError::FrozenSample { index, latest });
        }
        let sample = &mut self.samples[index];
        sample.mode = mode;
        sample.acceleration = acceleration;
        Ok(())
    }
}

/// A convoy member: name, physical parameters and trajectory.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Vehicle {
    name: String,
    params: VehicleParams,
    trajectory: Trajectory,
}

impl Vehicle {
    /// Validated constructor; every later computation relies on the checked parameters.
    pub fn new(
        name: impl Into<String>,
        params: VehicleParams,
        capacity: usize,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            name: name.into(),
            params,
            trajectory: Trajectory::with_capacity(capacity)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> VehicleParams {
        self.params
    }

    pub fn length(&self) -> f64 {
        self.params.length
    }

    pub fn max_deceleration(&self) -> f64 {
        self.params.max_deceleration
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn trajectory_mut(&mut self) -> &mut Trajectory {
        &mut self.trajectory
    }

    pub fn sample(&self, index: usize) -> Result<&Sample, TrajectoryError> {
        self.trajectory.get(index)
    }

    /// Populates sample 0 from an externally supplied initial condition.
    pub fn set_initial(
        &mut self,
        position: f64,
        velocity: f64,
        acceleration: f64,
    ) -> Result<(), TrajectoryError> {
        self.trajectory
            .record(0, Sample::new(position, velocity, acceleration))
    }
}
