//! Network configuration and learned-state serialization.
//!
//! This module provides the types for describing a network (pattern
//! geometry and run scheduling) and for persisting what it learned.
//!
//! # Layers
//!
//! 1. **HopfieldConfig** - image geometry, run mode and visual-mode pacing
//! 2. **NetworkState** - config plus the trained weight matrix and metadata
//!
//! Thresholds are never stored: they are a deterministic function of the
//! weights and are re-derived on load.
//!
//! # Example
//!
//! ```rust,ignore
//! use hopfield::{HopfieldNetwork, NetworkState};
//!
//! let mut net = HopfieldNetwork::new(64 * 64);
//! net.train_from_dir("data")?;
//!
//! let state = net.to_state()?.with_metadata("corpus", "data");
//! std::fs::write("model.json", state.to_json()?)?;
//!
//! let restored = HopfieldNetwork::from_state(&NetworkState::from_json(&std::fs::read_to_string("model.json")?)?)?;
//! ```

use crate::relaxation::{RunMode, DEFAULT_SNAPSHOT_INTERVAL};
use crate::{HopfieldError, Result, WeightMatrix};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Geometry and scheduling parameters of a network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HopfieldConfig {
    /// Pattern width in pixels
    pub width: usize,
    /// Pattern height in pixels
    pub height: usize,
    /// Scheduling used by `HopfieldNetwork::run`
    #[serde(default)]
    pub mode: RunMode,
    /// Updates between energy snapshots in visual mode
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: usize,
    /// Pause after each visual-mode update, in milliseconds
    #[serde(default)]
    pub step_delay_ms: u64,
}

fn default_snapshot_interval() -> usize {
    DEFAULT_SNAPSHOT_INTERVAL
}

impl HopfieldConfig {
    /// Config for `width` x `height` images with default scheduling.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            mode: RunMode::default(),
            snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
            step_delay_ms: 0,
        }
    }

    /// Config for a flat pattern of `num_neurons` values (one row).
    pub fn flat(num_neurons: usize) -> Self {
        Self::new(num_neurons, 1)
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_snapshot_interval(mut self, interval: usize) -> Self {
        self.snapshot_interval = interval;
        self
    }

    pub fn with_step_delay_ms(mut self, delay_ms: u64) -> Self {
        self.step_delay_ms = delay_ms;
        self
    }

    /// Number of neurons (one per pixel).
    pub fn num_neurons(&self) -> usize {
        self.width * self.height
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HopfieldError::InvalidParameter(format!(
                "pattern dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.snapshot_interval == 0 {
            return Err(HopfieldError::InvalidParameter(
                "snapshot_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| HopfieldError::Other(e.to_string()))
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| HopfieldError::Other(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to binary (bincode).
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from binary (bincode).
    pub fn from_binary(data: &[u8]) -> Result<Self> {
        let config: Self = bincode::deserialize(data)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for HopfieldConfig {
    fn default() -> Self {
        Self::new(64, 64)
    }
}

/// Persisted learned state of a trained network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkState {
    /// Version of the crate that wrote the state
    pub version: String,

    pub config: HopfieldConfig,

    /// Number of patterns averaged into the weights
    pub num_patterns: usize,

    pub weights: WeightMatrix,

    /// Optional metadata (corpus path, description, etc.)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl NetworkState {
    pub fn new(config: HopfieldConfig, weights: WeightMatrix, num_patterns: usize) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            num_patterns,
            weights,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata to the state.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| HopfieldError::Other(e.to_string()))
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HopfieldError::Other(e.to_string()))
    }

    /// Serialize to binary (bincode).
    ///
    /// A 64x64 network carries a 4096 x 4096 matrix, so this is the
    /// preferred on-disk form.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from binary (bincode).
    pub fn from_binary(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HopfieldConfig::default();
        assert_eq!(config.num_neurons(), 4096);
        assert_eq!(config.mode, RunMode::Visual);
        assert_eq!(config.snapshot_interval, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(HopfieldConfig::new(0, 4).validate().is_err());
        assert!(HopfieldConfig::new(4, 4)
            .with_snapshot_interval(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = HopfieldConfig::new(8, 8)
            .with_mode(RunMode::Instant)
            .with_step_delay_ms(5);

        let json = config.to_json().unwrap();
        assert!(json.contains("\"instant\""));
        assert_eq!(HopfieldConfig::from_json(&json).unwrap(), config);

        let binary = config.to_binary().unwrap();
        assert_eq!(HopfieldConfig::from_binary(&binary).unwrap(), config);
    }

    #[test]
    fn test_config_json_defaults() {
        let config = HopfieldConfig::from_json(r#"{"width": 4, "height": 4}"#).unwrap();
        assert_eq!(config.mode, RunMode::Visual);
        assert_eq!(config.snapshot_interval, DEFAULT_SNAPSHOT_INTERVAL);
        assert_eq!(config.step_delay_ms, 0);
    }

    #[test]
    fn test_state_metadata() {
        let weights = WeightMatrix::from_row_major(2, vec![0.0, 1.0, 1.0, 0.0]).unwrap();
        let state = NetworkState::new(HopfieldConfig::flat(2), weights, 1)
            .with_metadata("corpus", "data");

        assert_eq!(state.metadata.get("corpus").unwrap(), "data");

        let restored = NetworkState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored, state);
    }
}
