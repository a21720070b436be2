//! Gap and safe-gap evaluation between a leader and its follower.
//!
//! Both functions are pure. Vehicle construction guarantees positive length
//! and deceleration, so the only failure is reading past trajectory capacity.

use crate::error::TrajectoryError;
use crate::vehicle::Vehicle;

/// Reaction-time margin applied to follower velocity (s).
pub const REACTION_TIME_S: f64 = 0.1;
/// Fixed standstill margin added to the stopping-distance difference (m).
pub const SAFE_GAP_MARGIN_M: f64 = 1.0;
/// Lower bound of the safe gap regardless of velocities (m).
pub const MIN_SAFE_GAP_M: f64 = 1.0;

/// Distance from the leader's rear to the follower's front.
pub fn gap_between(leader_position: f64, follower_position: f64, leader_length: f64) -> f64 {
    leader_position - follower_position - leader_length
}

/// Follower stopping distance minus leader stopping distance, floored at one metre.
pub fn safe_gap_for(
    follower_velocity: f64,
    follower_max_deceleration: f64,
    leader_velocity: f64,
    leader_max_deceleration: f64,
) -> f64 {
    let raw = REACTION_TIME_S * follower_velocity
        + follower_velocity * follower_velocity / (2.0 * follower_max_deceleration)
        - leader_velocity * leader_velocity / (2.0 * leader_max_deceleration)
        + SAFE_GAP_MARGIN_M;
    raw.max(MIN_SAFE_GAP_M)
}

/// Gap at step `index`. Negative means overlap or overtaking.
pub fn gap(leader: &Vehicle, follower: &Vehicle, index: usize) -> Result<f64, TrajectoryError> {
    let lead = leader.sample(index)?;
    let follow = follower.sample(index)?;
    Ok(gap_between(lead.position, follow.position, leader.length()))
}

/// Minimum safe gap at step `index`.
pub fn safe_gap(
    leader: &Vehicle,
    follower: &Vehicle,
    index: usize,
) -> Result<f64, TrajectoryError> {
    let lead = leader.sample(index)?;
    let follow = follower.sample(index)?;
    Ok(safe_gap_for(
        follow.velocity,
        follower.max_deceleration(),
        lead.velocity,
        leader.max_deceleration(),
    ))
}
