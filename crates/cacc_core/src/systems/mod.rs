//! Per-step systems. The step schedule runs them chained in this order:
//! leader propagation, follower propagation, control law.

pub mod control_law;
pub mod propagation;
