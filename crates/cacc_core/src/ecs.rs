use bevy_ecs::prelude::{Component, Entity, Resource};

use crate::control::ControlSignal;
use crate::error::ControlError;

/// Marker for the reference vehicle. Its motion never depends on the follower.
#[derive(Debug, Clone, Copy, Default, Component)]
pub struct Leader;

/// Marker for the CACC-equipped vehicle.
#[derive(Debug, Clone, Copy, Default, Component)]
pub struct Follower;

/// Which convoy position a vehicle occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleRole {
    Leader,
    Follower,
}

impl VehicleRole {
    pub fn label(self) -> &'static str {
        match self {
            VehicleRole::Leader => "leader",
            VehicleRole::Follower => "follower",
        }
    }
}

/// Entities of the two convoy members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct Convoy {
    pub leader: Entity,
    pub follower: Entity,
}

/// Outcome of the step currently being evaluated. Systems write it, the runner reads it.
#[derive(Debug, Clone, Default, Resource)]
pub struct StepReport {
    pub outcome: Option<Result<ControlSignal, ControlError>>,
}

impl StepReport {
    pub fn clear(&mut self) {
        self.outcome = None;
    }

    /// Records a fault unless an earlier system of this step already did.
    pub fn record_fault(&mut self, error: ControlError) {
        if !self.is_faulted() {
            self.outcome = Some(Err(error));
        }
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self.outcome, Some(Err(_)))
    }

    pub fn fault(&self) -> Option<ControlError> {
        match self.outcome {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    pub fn signal(&self) -> Option<ControlSignal> {
        match self.outcome {
            Some(Ok(signal)) => Some(signal),
            _ => None,
        }
    }
}
