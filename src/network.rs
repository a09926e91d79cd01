//! HopfieldNetwork - train on reference patterns, recall from probes.
//!
//! This module provides the `HopfieldNetwork` struct that owns the trained
//! weights of one network and runs relaxations against them.
//!
//! # Lifecycle
//!
//! 1. Create network: `HopfieldNetwork::new(n)` or `with_config(config)`
//! 2. Train: `net.train(&patterns)?` (or `train_from_dir`)
//! 3. Recall: `net.run(&probe, &mut observer, &cancel)?`
//!
//! A failed `train()` leaves the network untrained, and `run()` on an
//! untrained network fails with `NotTrained`.
//!
//! # Example
//!
//! ```
//! use hopfield::{BipolarVector, CancelToken, HopfieldNetwork, NullObserver, Result};
//!
//! # fn main() -> Result<()> {
//! let a = BipolarVector::from_values(&[1, 1, 1, 1, -1, -1, -1, -1])?;
//! let b = BipolarVector::from_values(&[1, -1, 1, -1, 1, -1, 1, -1])?;
//!
//! let mut net = HopfieldNetwork::new(8);
//! net.train(&[a.clone(), b])?;
//!
//! let outcome = net.run(&a, &mut NullObserver, &CancelToken::new())?;
//! assert!(outcome.converged);
//! assert_eq!(outcome.final_state, a);
//! # Ok(())
//! # }
//! ```

use crate::codec::PatternCodec;
use crate::energy;
use crate::observer::Observer;
use crate::relaxation::{CancelToken, NetworkRun, RelaxationEngine, RunMode, RunOutcome};
use crate::weights::{self, ThresholdVector, TrainedModel, WeightMatrix};
use crate::{BipolarVector, HopfieldConfig, HopfieldError, NetworkState, Result};
use std::path::Path;
use std::sync::Arc;

/// Discrete Hopfield network over bipolar patterns of fixed length.
pub struct HopfieldNetwork {
    config: HopfieldConfig,

    /// Set by a successful train() or load
    model: Option<Arc<TrainedModel>>,
}

impl HopfieldNetwork {
    /// Create an untrained network of `num_neurons` neurons.
    pub fn new(num_neurons: usize) -> Self {
        Self {
            config: HopfieldConfig::flat(num_neurons),
            model: None,
        }
    }

    /// Create an untrained network for images described by `config`.
    pub fn with_config(config: HopfieldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            model: None,
        })
    }

    pub fn config(&self) -> &HopfieldConfig {
        &self.config
    }

    /// Replace the configuration, keeping any trained weights.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `config` describes a different number
    /// of neurons.
    pub fn set_config(&mut self, config: HopfieldConfig) -> Result<()> {
        config.validate()?;
        if config.num_neurons() != self.num_neurons() {
            return Err(HopfieldError::DimensionMismatch {
                expected: self.num_neurons(),
                actual: config.num_neurons(),
            });
        }
        self.config = config;
        Ok(())
    }

    pub fn num_neurons(&self) -> usize {
        self.config.num_neurons()
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Learn weights and thresholds from `patterns`.
    ///
    /// Replaces any previous training. On error the network is left
    /// untrained.
    ///
    /// # Errors
    ///
    /// - `EmptyTrainingSet` if `patterns` is empty
    /// - `DimensionMismatch` if a pattern length differs from the network size
    pub fn train(&mut self, patterns: &[BipolarVector]) -> Result<()> {
        self.model = None;
        let first = patterns.first().ok_or(HopfieldError::EmptyTrainingSet)?;
        self.check_len(first)?;
        let model = weights::train(patterns)?;

        tracing::info!(
            patterns = model.num_patterns(),
            neurons = model.num_neurons(),
            "network trained"
        );
        self.model = Some(Arc::new(model));
        Ok(())
    }

    /// Train on every PNG image in `dir`, decoded with this network's
    /// width and height.
    pub fn train_from_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let codec = self.codec()?;
        let patterns = match codec.load_corpus(dir) {
            Ok(patterns) => patterns,
            Err(e) => {
                self.model = None;
                return Err(e);
            }
        };
        self.train(&patterns)
    }

    /// Codec matching this network's image geometry.
    pub fn codec(&self) -> Result<PatternCodec> {
        let width = u32::try_from(self.config.width)
            .map_err(|_| HopfieldError::InvalidParameter("width too large for an image".to_string()))?;
        let height = u32::try_from(self.config.height)
            .map_err(|_| HopfieldError::InvalidParameter("height too large for an image".to_string()))?;
        Ok(PatternCodec::new(width, height))
    }

    fn model(&self) -> Result<&Arc<TrainedModel>> {
        self.model.as_ref().ok_or(HopfieldError::NotTrained)
    }

    pub fn weights(&self) -> Result<&WeightMatrix> {
        Ok(self.model()?.weights())
    }

    pub fn threshold(&self) -> Result<&ThresholdVector> {
        Ok(self.model()?.threshold())
    }

    /// Number of patterns the current weights were built from.
    pub fn num_patterns(&self) -> Result<usize> {
        Ok(self.model()?.num_patterns())
    }

    /// Energy of `state` under the trained weights, computed in full.
    pub fn energy_of(&self, state: &BipolarVector) -> Result<f64> {
        let model = self.model()?;
        self.check_len(state)?;
        Ok(energy::energy(model.weights(), model.threshold(), state))
    }

    fn check_len(&self, v: &BipolarVector) -> Result<()> {
        if v.len() != self.num_neurons() {
            return Err(HopfieldError::DimensionMismatch {
                expected: self.num_neurons(),
                actual: v.len(),
            });
        }
        Ok(())
    }

    /// Begin a run that the caller steps manually.
    ///
    /// For hosts with their own event loop; see [`NetworkRun::step`].
    pub fn start_run(&self, probe: &BipolarVector) -> Result<NetworkRun> {
        let model = Arc::clone(self.model()?);
        self.check_len(probe)?;
        tracing::debug!(neurons = probe.len(), "starting run");
        NetworkRun::new(model, probe)
    }

    /// Relax `probe` to termination using the configured run mode.
    ///
    /// Takes `&mut self` so no second run can start on this network while
    /// one is active.
    pub fn run<O>(&mut self, probe: &BipolarVector, observer: &mut O, cancel: &CancelToken) -> Result<RunOutcome>
    where
        O: Observer + ?Sized,
    {
        let mode = self.config.mode;
        self.run_with_mode(mode, probe, observer, cancel)
    }

    /// Relax `probe` to termination using `mode`.
    pub fn run_with_mode<O>(
        &mut self,
        mode: RunMode,
        probe: &BipolarVector,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> Result<RunOutcome>
    where
        O: Observer + ?Sized,
    {
        let run = self.start_run(probe)?;
        let engine = RelaxationEngine::from_config(&self.config.clone().with_mode(mode));
        Ok(engine.run(run, observer, cancel))
    }

    /// Export the learned state.
    pub fn to_state(&self) -> Result<NetworkState> {
        let model = self.model()?;
        Ok(NetworkState::new(
            self.config.clone(),
            model.weights().clone(),
            model.num_patterns(),
        ))
    }

    /// Rebuild a trained network from a saved state.
    ///
    /// The weights are re-validated and the thresholds re-derived.
    pub fn from_state(state: &NetworkState) -> Result<Self> {
        let mut net = Self::with_config(state.config.clone())?;
        if state.weights.num_neurons() != net.num_neurons() {
            return Err(HopfieldError::DimensionMismatch {
                expected: net.num_neurons(),
                actual: state.weights.num_neurons(),
            });
        }
        let weights = WeightMatrix::from_row_major(
            state.weights.num_neurons(),
            state.weights.as_slice().to_vec(),
        )?;
        net.model = Some(Arc::new(TrainedModel::from_weights(weights, state.num_patterns)));
        Ok(net)
    }

    /// Save the learned state to a file (bincode).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = self.to_state()?.to_binary()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load a network saved with [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_state(&NetworkState::from_binary(&data)?)
    }

    /// Estimate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        let base_size = std::mem::size_of::<Self>();
        let model_size = self
            .model
            .as_ref()
            .map(|m| m.weights().memory_usage() + m.threshold().len() * std::mem::size_of::<f64>())
            .unwrap_or(0);
        base_size + model_size
    }
}

// Tests are in tests/test_network.rs
