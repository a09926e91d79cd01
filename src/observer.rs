//! Observer sink for relaxation runs.
//!
//! A run reports to an [`Observer`]: zero or more flip notifications,
//! periodic energy snapshots, the final state (instant mode), and exactly
//! one terminal event. [`EventRecorder`] keeps those events as a
//! serializable trace for later inspection or replay.

use crate::{BipolarVector, EnergyTrajectory, Result};
use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Termination {
    /// A full sweep left the energy unchanged
    Converged { iterations: usize },
    /// The run was stopped through its cancel token
    Cancelled,
}

/// Receives notifications from a running relaxation.
///
/// All methods default to no-ops so a sink only implements what it shows.
pub trait Observer {
    /// Neuron `index` changed to `value`.
    fn on_flip(&mut self, _index: usize, _value: i8) {}

    /// Energy trajectory so far.
    fn on_energy(&mut self, _trajectory: &EnergyTrajectory) {}

    /// Complete network state (sent once at the end of an instant run).
    fn on_state(&mut self, _state: &BipolarVector) {}

    /// Terminal event; sent exactly once per run.
    fn on_finished(&mut self, _termination: Termination) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}

/// Single recorded notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    Flip { index: usize, value: i8 },
    EnergySnapshot { samples: usize, energy: f64 },
    State { values: Vec<i8> },
    Finished { termination: Termination },
}

/// Records run events for visualization.
pub struct EventRecorder {
    events: Vec<RunEvent>,
    recording: bool,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            recording: true,
        }
    }

    pub fn start(&mut self) {
        self.recording = true;
    }

    pub fn stop(&mut self) {
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn events(&self) -> &[RunEvent] {
        &self.events
    }

    /// Flip events only, as `(index, value)`.
    pub fn flips(&self) -> Vec<(usize, i8)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RunEvent::Flip { index, value } => Some((*index, *value)),
                _ => None,
            })
            .collect()
    }

    /// Terminal events seen so far.
    pub fn terminations(&self) -> Vec<Termination> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RunEvent::Finished { termination } => Some(*termination),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.events.clear();
    }

    /// Export events to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.events).map_err(|e| {
            crate::HopfieldError::Other(format!("Failed to serialize events to JSON: {}", e))
        })
    }

    /// Export events to a JSON file
    pub fn to_json_file(&self, path: &str) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            crate::HopfieldError::Other(format!("Failed to write events to file: {}", e))
        })?;
        Ok(())
    }

    /// Import events from a JSON string
    pub fn from_json(json: &str) -> Result<Vec<RunEvent>> {
        serde_json::from_str(json).map_err(|e| {
            crate::HopfieldError::Other(format!("Failed to deserialize events from JSON: {}", e))
        })
    }

    fn record(&mut self, event: RunEvent) {
        if self.recording {
            self.events.push(event);
        }
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for EventRecorder {
    fn on_flip(&mut self, index: usize, value: i8) {
        self.record(RunEvent::Flip { index, value });
    }

    fn on_energy(&mut self, trajectory: &EnergyTrajectory) {
        self.record(RunEvent::EnergySnapshot {
            samples: trajectory.len(),
            energy: trajectory.last(),
        });
    }

    fn on_state(&mut self, state: &BipolarVector) {
        self.record(RunEvent::State {
            values: state.to_values(),
        });
    }

    fn on_finished(&mut self, termination: Termination) {
        self.record(RunEvent::Finished { termination });
    }
}
