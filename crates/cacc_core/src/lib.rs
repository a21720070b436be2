pub mod clock;
pub mod control;
pub mod ecs;
pub mod error;
pub mod gap;
pub mod initial;
pub mod kinematics;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;
pub mod telemetry_export;
pub mod vehicle;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
