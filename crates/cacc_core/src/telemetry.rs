//! Telemetry: per-step control records and run-level counters.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::control::ControlSignal;
use crate::error::ControlError;
use crate::vehicle::ControlMode;

/// Control law result for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlRecord {
    pub step: usize,
    pub time_secs: f64,
    pub gap: f64,
    pub safe_gap: f64,
    pub mode: ControlMode,
    pub acceleration: f64,
}

/// Collects control outcomes for the run. Insert as a resource to record them.
#[derive(Debug, Clone, Default, Resource)]
pub struct ConvoyTelemetry {
    pub records: Vec<ControlRecord>,
    pub gap_control_steps: usize,
    /// Steps at which collision avoidance engaged.
    pub avoidance_steps: Vec<usize>,
    pub halt: Option<ControlError>,
}

impl ConvoyTelemetry {
    pub fn record_signal(&mut self, step: usize, time_secs: f64, signal: &ControlSignal) {
        match signal {
            ControlSignal::GapControl { .. } => self.gap_control_steps += 1,
            ControlSignal::CollisionAvoidance { .. } => self.avoidance_steps.push(step),
        }
        self.records.push(ControlRecord {
            step,
            time_secs,
            gap: signal.gap(),
            safe_gap: signal.safe_gap(),
            mode: signal.mode(),
            acceleration: signal.acceleration(),
        });
    }

    pub fn record_halt(&mut self, error: ControlError) {
        self.halt = Some(error);
    }

    pub fn avoidance_count(&self) -> usize {
        self.avoidance_steps.len()
    }

    /// Smallest gap seen, with the step it occurred at.
    pub fn min_gap(&self) -> Option<(usize, f64)> {
        self.records
            .iter()
            .map(|r| (r.step, r.gap))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Smallest margin `gap - safe_gap`; negative whenever avoidance engaged.
    pub fn min_margin(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|r| r.gap - r.safe_gap)
            .min_by(|a, b| a.total_cmp(b))
    }
}
