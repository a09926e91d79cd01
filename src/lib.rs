//! Hopfield - Discrete Hopfield Associative Memory
//!
//! A discrete Hopfield network learns a set of reference bit patterns
//! (black/white images) and, given a noisy or partial probe, relaxes toward
//! the nearest learned attractor while tracking an energy function that
//! never increases.
//!
//! # Key Characteristics
//!
//! - Hebbian outer-product learning with a zero diagonal
//! - Strictly asynchronous, one-neuron-at-a-time updates in fixed order
//! - Incremental O(N) energy bookkeeping per update
//! - Two scheduling modes (visual and instant) with identical results
//! - Cooperative cancellation through a shared token
//!
//! # Architecture
//!
//! - **BipolarVector**: packed +1/-1 patterns, probes and network state
//! - **weights**: Hebbian `WeightMatrixBuilder`, `WeightMatrix`, `ThresholdVector`
//! - **energy**: Lyapunov energy, incremental update, `EnergyTrajectory`
//! - **relaxation**: `NetworkRun` (one update step) and `RelaxationEngine`
//!   (visual/instant scheduling, convergence, cancellation)
//! - **observer**: notification sink for flips, energy snapshots and termination
//! - **network**: `HopfieldNetwork` tying training, runs and persistence together
//! - **codec**: PNG images to and from bipolar vectors
//!
//! # Examples
//!
//! ## Recall a Corrupted Pattern
//!
//! ```
//! use hopfield::{utils, CancelToken, EventRecorder, HopfieldNetwork, RunMode};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let stored = utils::random_pattern(100, &mut rng);
//!
//! let mut net = HopfieldNetwork::new(100);
//! net.train(&[stored.clone()]).unwrap();
//!
//! let probe = utils::corrupt(&stored, 10, &mut rng).unwrap();
//! let mut recorder = EventRecorder::new();
//! let outcome = net
//!     .run_with_mode(RunMode::Visual, &probe, &mut recorder, &CancelToken::new())
//!     .unwrap();
//!
//! assert!(outcome.converged);
//! assert_eq!(outcome.final_state, stored);
//! assert!(outcome.trajectory.is_non_increasing());
//! assert_eq!(recorder.flips().len(), 10);
//! ```
//!
//! # Safety
//!
//! Hot paths use `debug_assert!` for bounds checking:
//!
//! - Zero-cost bounds checking in release builds
//! - Full validation during development and testing

// Module declarations
pub mod bipolar;
pub mod error;
pub mod utils;

pub mod energy;
pub mod weights;

pub mod observer;
pub mod relaxation;

pub mod codec;
pub mod config;
pub mod network;

#[cfg(feature = "wasm")]
pub mod wasm_interface;

// Re-exports for convenient access
pub use bipolar::BipolarVector;
pub use error::{HopfieldError, Result};

pub use energy::EnergyTrajectory;
pub use weights::{ThresholdVector, TrainedModel, WeightMatrix, WeightMatrixBuilder};

pub use observer::{EventRecorder, NullObserver, Observer, RunEvent, Termination};
pub use relaxation::{
    CancelToken, NetworkRun, NeuronUpdate, RelaxationEngine, RunMode, RunOutcome, RunPhase,
};

pub use codec::PatternCodec;
pub use config::{HopfieldConfig, NetworkState};
pub use network::HopfieldNetwork;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "Hopfield";

/// Get version string
pub fn version() -> String {
    format!("{} v{}", NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(ver.contains("Hopfield"));
        assert!(ver.contains(VERSION));
    }

    #[test]
    fn test_re_exports() {
        let _v = BipolarVector::filled(4, 1);
        let _result: Result<()> = Ok(());
        assert_eq!(RunMode::default(), RunMode::Visual);
    }
}
