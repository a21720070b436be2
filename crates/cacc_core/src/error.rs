//! Error types shared across the convoy simulation.

/// Rejected vehicle or simulation parameters, raised at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("vehicle length must be positive and finite, got {0}")]
    InvalidLength(f64),

    #[error("max deceleration must be positive and finite, got {0}")]
    InvalidMaxDeceleration(f64),

    #[error("trajectory capacity must be at least 1")]
    ZeroCapacity,

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("max velocity must be positive and finite, got {0}")]
    InvalidMaxVelocity(f64),

    #[error("control step must be positive and finite, got {0}")]
    InvalidControlStep(f64),

    #[error("safe time gap must be non-negative and finite, got {0}")]
    InvalidSafeTimeGap(f64),

    #[error("acceleration bounds must be finite, got min {min} and max {max}")]
    NonFiniteAccelerationBounds { min: f64, max: f64 },

    #[error("acceleration bounds are inverted: min {min} > max {max}")]
    InvertedAccelerationBounds { min: f64, max: f64 },
}

/// Misuse of a trajectory store: out-of-range or out-of-order access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrajectoryError {
    #[error("sample 0 is an initial condition and has no previous sample")]
    NoPreviousSample,

    #[error("index {index} is outside trajectory capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("index {index} written out of order, next writable index is {expected}")]
    OutOfOrderWrite { index: usize, expected: usize },

    #[error("index {index} has not been written yet ({written} samples written)")]
    NotWritten { index: usize, written: usize },

    #[error("index {index} is not the latest sample ({latest}); its command is frozen")]
    FrozenSample { index: usize, latest: usize },
}

/// Fatal outcome of one control law evaluation.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error("follower is ahead of the leader or has collided at step {step} (gap = {gap:.2})")]
    Collision { step: usize, gap: f64 },

    #[error("safe gap {safe_gap:.2} is negative at step {step}")]
    NegativeSafeGap { step: usize, safe_gap: f64 },

    #[error("convoy has no {0} vehicle")]
    MissingVehicle(&'static str),

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}

impl ControlError {
    /// Step index the error was raised at, when it came from the physics.
    pub fn step(&self) -> Option<usize> {
        match self {
            ControlError::Collision { step, .. } | ControlError::NegativeSafeGap { step, .. } => {
                Some(*step)
            }
            ControlError::MissingVehicle(_) | ControlError::Trajectory(_) => None,
        }
    }
}

/// Failure to obtain an initial condition from a provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("I/O error while reading initial state: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse {field} from {input:?}")]
    Parse { field: &'static str, input: String },

    #[error("input ended before {0} was provided")]
    EndOfInput(&'static str),

    #[error("initial {field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Failure while building a convoy world from a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("initial state for {vehicle}: {source}")]
    Provider {
        vehicle: String,
        #[source]
        source: ProviderError,
    },

    #[error("initial sample for {vehicle}: {source}")]
    Trajectory {
        vehicle: String,
        #[source]
        source: TrajectoryError,
    },

    #[error("could not read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse scenario file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("convoy vehicles are missing from the world")]
    MissingConvoy,
}
