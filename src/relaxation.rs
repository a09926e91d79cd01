//! Asynchronous relaxation of network state toward an attractor.
//!
//! # Update rule
//!
//! Neurons are visited in the fixed order `0, 1, ..., N-1`, wrapping to 0.
//! For neuron `i` with local field `h = sum_j(w[i][j] * s[j])`:
//!
//! - `h > θ_i`: the neuron becomes +1
//! - `h < θ_i`: the neuron becomes -1
//! - `h == θ_i`: the neuron keeps its value
//!
//! Every visit appends one sample to the energy trajectory, computed
//! incrementally from the previous sample.
//!
//! # Convergence
//!
//! After each full sweep of N updates the latest energy sample is compared
//! with the sample recorded at the end of the previous sweep (or with the
//! initial energy after the first sweep). Equal means converged.
//!
//! # Scheduling
//!
//! [`NetworkRun::step`] is the only place state changes. [`RelaxationEngine`]
//! wraps it in one of two loops:
//!
//! - [`RunMode::Visual`] checks the cancel token before every update, reports
//!   each flip, pushes an energy snapshot whenever the position within the
//!   current sweep is a multiple of `snapshot_interval` (the count restarts
//!   each sweep) and may pause between updates so a host can repaint.
//! - [`RunMode::Instant`] runs whole sweeps without reporting, checks the
//!   cancel token at the end of each sweep, and reports the final state and
//!   trajectory once.
//!
//! A host with its own event loop (a browser, a GUI toolkit) can skip the
//! engine and call `step()` itself, one update per tick.
//!
//! # Examples
//!
//! ```
//! use hopfield::{weights, BipolarVector, CancelToken, NetworkRun, NullObserver, RelaxationEngine, RunMode};
//! use std::sync::Arc;
//!
//! let stored = BipolarVector::from_values(&[1, -1, 1, -1, 1, -1]).unwrap();
//! let model = Arc::new(weights::train(&[stored.clone()]).unwrap());
//!
//! let mut probe = stored.clone();
//! probe.flip(0);
//!
//! let run = NetworkRun::new(model, &probe).unwrap();
//! let outcome = RelaxationEngine::new(RunMode::Instant).run(run, &mut NullObserver, &CancelToken::new());
//!
//! assert!(outcome.converged);
//! assert_eq!(outcome.final_state, stored);
//! ```

use crate::energy::{self, EnergyTrajectory};
use crate::observer::{Observer, Termination};
use crate::{BipolarVector, HopfieldConfig, HopfieldError, Result, TrainedModel};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default number of updates between energy snapshots in visual mode.
pub const DEFAULT_SNAPSHOT_INTERVAL: usize = 25;

/// Shared stop request for a run.
///
/// Clones share the same flag, so a token handed to an observer (or another
/// thread) can stop the run that is reading it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run stop at its next check.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear a pending request.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Scheduling policy for a run. Both modes produce identical results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Report every flip, yield between updates
    #[default]
    Visual,
    /// Run to termination, report once
    Instant,
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Initialized,
    Running,
    Converged,
    Cancelled,
}

/// Result of one call to [`NetworkRun::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeuronUpdate {
    /// Neuron that was visited
    pub index: usize,
    /// Its value after the update
    pub value: i8,
    /// True if the value changed
    pub flipped: bool,
    /// True if this update completed a sweep
    pub sweep_completed: bool,
}

/// What a finished run hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub final_state: BipolarVector,
    pub trajectory: EnergyTrajectory,
    /// Completed full sweeps
    pub iterations: usize,
    /// False if the run was cancelled
    pub converged: bool,
}

/// Per-invocation relaxation state.
///
/// Owns a private copy of the probe; the caller's buffer is never aliased.
pub struct NetworkRun {
    model: Arc<TrainedModel>,
    state: BipolarVector,
    trajectory: EnergyTrajectory,
    /// Asynchronous scan position
    index: usize,
    /// Completed full sweeps
    iterations: usize,
    /// Energy at the end of the previous sweep
    iteration_energy: f64,
    phase: RunPhase,
}

impl NetworkRun {
    /// Start a run from `probe`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `probe` does not have one value per neuron
    /// - `InvalidParameter` if the model has no neurons
    pub fn new(model: Arc<TrainedModel>, probe: &BipolarVector) -> Result<Self> {
        let n = model.num_neurons();
        if n == 0 {
            return Err(HopfieldError::InvalidParameter(
                "cannot relax a network with no neurons".to_string(),
            ));
        }
        if probe.len() != n {
            return Err(HopfieldError::DimensionMismatch {
                expected: n,
                actual: probe.len(),
            });
        }

        let state = probe.clone();
        let initial = energy::energy(model.weights(), model.threshold(), &state);

        Ok(Self {
            model,
            state,
            trajectory: EnergyTrajectory::new(initial),
            index: 0,
            iterations: 0,
            iteration_energy: initial,
            phase: RunPhase::Initialized,
        })
    }

    /// Update one neuron and advance the scan position.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the run has already finished.
    pub fn step(&mut self) -> NeuronUpdate {
        debug_assert!(!self.is_finished(), "step() called on a finished run");
        self.phase = RunPhase::Running;

        let i = self.index;
        let theta = self.model.threshold().get(i);
        let local = energy::local_field(self.model.weights(), &self.state, i);
        let old = self.state.get(i);
        let new = if local > theta {
            1
        } else if local < theta {
            -1
        } else {
            old
        };

        let previous = self.trajectory.last();
        if new == old {
            self.trajectory.push(previous);
        } else {
            self.state.assign(i, new == 1);
            self.trajectory
                .push(energy::updated_energy(previous, old, new, local, theta));
        }

        self.index += 1;
        let sweep_completed = self.index == self.state.len();
        if sweep_completed {
            self.index = 0;
            self.finish_sweep();
        }

        NeuronUpdate {
            index: i,
            value: new,
            flipped: new != old,
            sweep_completed,
        }
    }

    fn finish_sweep(&mut self) {
        self.iterations += 1;
        let latest = self.trajectory.last();
        if latest == self.iteration_energy {
            self.phase = RunPhase::Converged;
            tracing::debug!(iterations = self.iterations, energy = latest, "sweep left energy unchanged");
        } else {
            tracing::debug!(sweep = self.iterations, energy = latest, "sweep complete");
            self.iteration_energy = latest;
        }
    }

    /// Stop the run where it stands. No effect once finished.
    pub fn cancel(&mut self) {
        if !self.is_finished() {
            self.phase = RunPhase::Cancelled;
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, RunPhase::Converged | RunPhase::Cancelled)
    }

    /// Terminal event for a finished run.
    pub fn termination(&self) -> Option<Termination> {
        match self.phase {
            RunPhase::Converged => Some(Termination::Converged {
                iterations: self.iterations,
            }),
            RunPhase::Cancelled => Some(Termination::Cancelled),
            RunPhase::Initialized | RunPhase::Running => None,
        }
    }

    pub fn state(&self) -> &BipolarVector {
        &self.state
    }

    pub fn trajectory(&self) -> &EnergyTrajectory {
        &self.trajectory
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Single-neuron updates performed so far.
    pub fn updates(&self) -> usize {
        self.trajectory.len() - 1
    }

    /// Next neuron to be visited.
    pub fn scan_position(&self) -> usize {
        self.index
    }

    /// Updates completed in the current sweep after `update`, in `1..=N`.
    fn sweep_position(&self, update: &NeuronUpdate) -> usize {
        if update.sweep_completed {
            self.state.len()
        } else {
            self.index
        }
    }

    pub fn num_neurons(&self) -> usize {
        self.state.len()
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn into_outcome(self) -> RunOutcome {
        RunOutcome {
            converged: self.phase == RunPhase::Converged,
            final_state: self.state,
            trajectory: self.trajectory,
            iterations: self.iterations,
        }
    }
}

/// Drives a [`NetworkRun`] to termination under a [`RunMode`].
#[derive(Debug, Clone)]
pub struct RelaxationEngine {
    mode: RunMode,
    snapshot_interval: usize,
    step_delay: Option<Duration>,
}

impl RelaxationEngine {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
            step_delay: None,
        }
    }

    /// Engine using the mode, snapshot interval and step delay of `config`.
    pub fn from_config(config: &HopfieldConfig) -> Self {
        Self::new(config.mode)
            .with_snapshot_interval(config.snapshot_interval)
            .with_step_delay(Duration::from_millis(config.step_delay_ms))
    }

    /// Updates between energy snapshots in visual mode (minimum 1).
    pub fn with_snapshot_interval(mut self, interval: usize) -> Self {
        self.snapshot_interval = interval.max(1);
        self
    }

    /// Pause after each visual-mode update. Zero disables the pause.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = if delay.is_zero() { None } else { Some(delay) };
        self
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn snapshot_interval(&self) -> usize {
        self.snapshot_interval
    }

    /// Run to convergence or cancellation.
    ///
    /// Any cancellation pending on `cancel` when the run starts is cleared.
    /// The observer receives exactly one `on_finished` call. A run that is
    /// already converged or cancelled is not stepped again.
    pub fn run<O>(&self, mut run: NetworkRun, observer: &mut O, cancel: &CancelToken) -> RunOutcome
    where
        O: Observer + ?Sized,
    {
        cancel.reset();

        if run.is_finished() {
            // Already terminal: report where it stopped without stepping
            observer.on_energy(run.trajectory());
        } else {
            match self.mode {
                RunMode::Visual => self.drive_visual(&mut run, observer, cancel),
                RunMode::Instant => Self::drive_instant(&mut run, observer, cancel),
            }
        }

        if let Some(termination) = run.termination() {
            match termination {
                Termination::Converged { iterations } => tracing::info!(
                    iterations,
                    energy = run.trajectory().last(),
                    "converged after {} iterations",
                    iterations
                ),
                Termination::Cancelled => tracing::info!(
                    updates = run.updates(),
                    energy = run.trajectory().last(),
                    "run cancelled"
                ),
            }
            observer.on_finished(termination);
        }

        run.into_outcome()
    }

    fn drive_visual<O>(&self, run: &mut NetworkRun, observer: &mut O, cancel: &CancelToken)
    where
        O: Observer + ?Sized,
    {
        loop {
            if cancel.is_cancelled() {
                run.cancel();
                break;
            }

            let update = run.step();
            if update.flipped {
                observer.on_flip(update.index, update.value);
            }
            if run.sweep_position(&update) % self.snapshot_interval == 0 {
                observer.on_energy(run.trajectory());
            }
            if run.is_finished() {
                break;
            }

            if let Some(delay) = self.step_delay {
                std::thread::sleep(delay);
            }
        }
        observer.on_energy(run.trajectory());
    }

    fn drive_instant<O>(run: &mut NetworkRun, observer: &mut O, cancel: &CancelToken)
    where
        O: Observer + ?Sized,
    {
        loop {
            let update = run.step();
            if run.is_finished() {
                break;
            }
            if update.sweep_completed && cancel.is_cancelled() {
                run.cancel();
                break;
            }
        }
        observer.on_state(run.state());
        observer.on_energy(run.trajectory());
    }
}

impl Default for RelaxationEngine {
    fn default() -> Self {
        Self::new(RunMode::default())
    }
}
