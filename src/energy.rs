//! Energy model.
//!
//! `E(s) = -0.5 * sᵗ W s + θᵗ s` is the Lyapunov function of the network:
//! under asynchronous updates it never increases. Relaxation tracks it
//! incrementally, one sample per single-neuron update; the full quadratic
//! form is only evaluated once, for the initial state of a run.

use crate::{BipolarVector, ThresholdVector, WeightMatrix};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

/// Full O(N²) energy of `state`.
pub fn energy(weights: &WeightMatrix, threshold: &ThresholdVector, state: &BipolarVector) -> f64 {
    let quadratic: f64 = (0..weights.num_neurons())
        .map(|i| f64::from(state.get(i)) * state.dot(weights.row(i)))
        .sum();
    let bias: f64 = threshold
        .as_slice()
        .iter()
        .zip(state.iter())
        .map(|(&t, s)| t * f64::from(s))
        .sum();
    -0.5 * quadratic + bias
}

/// Local field of neuron `i`, excluding the threshold: `sum_j(w[i][j] * s[j])`.
#[inline]
pub fn local_field(weights: &WeightMatrix, state: &BipolarVector, i: usize) -> f64 {
    state.dot(weights.row(i))
}

/// Energy after neuron `i` moves from `old_value` to `new_value`.
///
/// `local` is the local field computed before the move.
#[inline]
pub fn updated_energy(old_energy: f64, old_value: i8, new_value: i8, local: f64, theta: f64) -> f64 {
    old_energy - f64::from(new_value - old_value) * (local - theta)
}

/// Append-only record of energy samples for one run.
///
/// Starts with the energy of the initial state and gains exactly one
/// sample per single-neuron update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyTrajectory {
    samples: Vec<f64>,
}

impl EnergyTrajectory {
    /// Start a trajectory at `initial`.
    pub fn new(initial: f64) -> Self {
        Self {
            samples: vec![initial],
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, energy: f64) {
        self.samples.push(energy);
    }

    /// Most recent sample.
    #[inline]
    pub fn last(&self) -> f64 {
        self.samples.last().copied().unwrap_or_default()
    }

    /// Energy of the initial state.
    pub fn initial(&self) -> f64 {
        self.samples.first().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// `(min, max)` over all samples, for scaling a plot axis.
    pub fn bounds(&self) -> (f64, f64) {
        match self.samples.iter().copied().minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(e) => (e, e),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        }
    }

    /// True if no sample is larger than the one before it.
    pub fn is_non_increasing(&self) -> bool {
        self.samples.iter().tuple_windows().all(|(a, b)| b <= a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_energy_of_stored_pattern() {
        let p = BipolarVector::from_values(&[1, -1, 1, -1]).unwrap();
        let (w, theta) = weights::build(&[p.clone()]).unwrap();

        // sᵗWs = sum_{i != j} 1 = 12; every θ_i is -0.5 and p sums to 0
        assert_abs_diff_eq!(theta.get(0), -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(energy(&w, &theta, &p), -6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_updated_energy_matches_recompute() {
        let a = BipolarVector::from_values(&[1, 1, -1, -1, 1]).unwrap();
        let b = BipolarVector::from_values(&[-1, 1, 1, -1, -1]).unwrap();
        let (w, theta) = weights::build(&[a, b]).unwrap();

        let mut state = BipolarVector::from_values(&[1, -1, -1, 1, 1]).unwrap();
        for i in 0..state.len() {
            let before = energy(&w, &theta, &state);
            let local = local_field(&w, &state, i);
            let old = state.get(i);
            state.flip(i);
            let expected = energy(&w, &theta, &state);
            let incremental = updated_energy(before, old, state.get(i), local, theta.get(i));
            assert_abs_diff_eq!(incremental, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_trajectory_bounds() {
        let mut t = EnergyTrajectory::new(-1.0);
        assert_eq!(t.bounds(), (-1.0, -1.0));
        t.push(-3.0);
        t.push(-3.0);
        assert_eq!(t.bounds(), (-3.0, -1.0));
        assert_eq!(t.len(), 3);
        assert_eq!(t.initial(), -1.0);
        assert_eq!(t.last(), -3.0);
    }

    #[test]
    fn test_non_increasing() {
        let mut t = EnergyTrajectory::new(0.0);
        t.push(-1.0);
        t.push(-1.0);
        assert!(t.is_non_increasing());
        t.push(0.5);
        assert!(!t.is_non_increasing());
    }
}
