//! Hebbian weight learning.
//!
//! This module turns a batch of bipolar training patterns into the two
//! read-only structures a Hopfield network relaxes against:
//!
//! - **WeightMatrix** - N x N symmetric matrix, the average of the outer
//!   products `p ⊗ p` over all patterns, with the diagonal forced to 0
//! - **ThresholdVector** - one bias per neuron, half of the matching row sum
//!
//! # Examples
//!
//! ```
//! use hopfield::{BipolarVector, weights};
//!
//! let a = BipolarVector::from_values(&[1, 1, -1, -1]).unwrap();
//! let b = BipolarVector::from_values(&[1, -1, 1, -1]).unwrap();
//!
//! let (w, theta) = weights::build(&[a, b]).unwrap();
//! assert_eq!(w.num_neurons(), 4);
//! assert_eq!(w.get(0, 0), 0.0);
//! assert_eq!(w.get(0, 1), w.get(1, 0));
//! assert_eq!(theta.len(), 4);
//! ```

use crate::{BipolarVector, HopfieldError, Result};
use serde::{Deserialize, Serialize};

/// Symmetric N x N weight matrix with a zero diagonal, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightMatrix {
    num_neurons: usize,
    values: Vec<f64>,
}

impl WeightMatrix {
    /// Rebuild a matrix from row-major values, checking shape, symmetry and
    /// the zero diagonal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if any of those properties does not hold.
    pub fn from_row_major(num_neurons: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != num_neurons * num_neurons {
            return Err(HopfieldError::InvalidParameter(format!(
                "weight matrix for {} neurons needs {} values, got {}",
                num_neurons,
                num_neurons * num_neurons,
                values.len()
            )));
        }
        let matrix = Self {
            num_neurons,
            values,
        };
        if !matrix.has_zero_diagonal() {
            return Err(HopfieldError::InvalidParameter(
                "weight matrix diagonal must be zero".to_string(),
            ));
        }
        if !matrix.is_symmetric() {
            return Err(HopfieldError::InvalidParameter(
                "weight matrix must be symmetric".to_string(),
            ));
        }
        Ok(matrix)
    }

    /// Number of neurons (N).
    #[inline]
    pub fn num_neurons(&self) -> usize {
        self.num_neurons
    }

    /// Weight between neurons `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.num_neurons && j < self.num_neurons);
        self.values[i * self.num_neurons + j]
    }

    /// Row `i` of the matrix (incoming weights of neuron `i`).
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.num_neurons;
        &self.values[start..start + self.num_neurons]
    }

    /// All values, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Exact symmetry check: `w[i][j] == w[j][i]` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        let n = self.num_neurons;
        (0..n).all(|i| ((i + 1)..n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// True if every self-connection is 0.
    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.num_neurons).all(|i| self.get(i, i) == 0.0)
    }

    /// Estimate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.values.len() * std::mem::size_of::<f64>()
    }
}

/// Per-neuron bias terms, `theta[i] = sum_j(w[i][j]) / 2`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdVector {
    values: Vec<f64>,
}

impl ThresholdVector {
    /// Derive thresholds from a weight matrix.
    pub fn from_weights(weights: &WeightMatrix) -> Self {
        let values = (0..weights.num_neurons())
            .map(|i| weights.row(i).iter().sum::<f64>() / 2.0)
            .collect();
        Self { values }
    }

    /// Threshold of neuron `i`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        self.values[i]
    }

    /// Number of neurons.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no neurons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All thresholds in neuron order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Weights and thresholds produced by one training pass.
///
/// Read-only once built; runs share it by reference counting.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainedModel {
    weights: WeightMatrix,
    threshold: ThresholdVector,
    num_patterns: usize,
}

impl TrainedModel {
    /// Wrap an already-built matrix, re-deriving the thresholds.
    pub fn from_weights(weights: WeightMatrix, num_patterns: usize) -> Self {
        let threshold = ThresholdVector::from_weights(&weights);
        Self {
            weights,
            threshold,
            num_patterns,
        }
    }

    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    pub fn threshold(&self) -> &ThresholdVector {
        &self.threshold
    }

    pub fn num_neurons(&self) -> usize {
        self.weights.num_neurons()
    }

    /// Number of patterns averaged into the weights.
    pub fn num_patterns(&self) -> usize {
        self.num_patterns
    }

    /// Split into the weight matrix and threshold vector.
    pub fn into_parts(self) -> (WeightMatrix, ThresholdVector) {
        (self.weights, self.threshold)
    }
}

/// Accumulates outer products of training patterns.
///
/// Patterns can be added one at a time, so a corpus never has to be held in
/// memory all at once.
pub struct WeightMatrixBuilder {
    num_neurons: usize,
    accumulator: Vec<f64>,
    num_patterns: usize,

    // Working memory
    scratch: Vec<f64>,
}

impl WeightMatrixBuilder {
    /// Create a builder for patterns of length `num_neurons`.
    pub fn new(num_neurons: usize) -> Self {
        Self {
            num_neurons,
            accumulator: vec![0.0; num_neurons * num_neurons],
            num_patterns: 0,
            scratch: Vec::with_capacity(num_neurons),
        }
    }

    /// Add the outer product `p ⊗ p` to the accumulator.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the pattern has the wrong length; the
    /// accumulator is left untouched in that case.
    pub fn add(&mut self, pattern: &BipolarVector) -> Result<()> {
        if pattern.len() != self.num_neurons {
            return Err(HopfieldError::DimensionMismatch {
                expected: self.num_neurons,
                actual: pattern.len(),
            });
        }

        self.scratch.clear();
        self.scratch.extend(pattern.iter().map(f64::from));

        let n = self.num_neurons.max(1);
        for (i, row) in self.accumulator.chunks_exact_mut(n).enumerate() {
            let pi = self.scratch[i];
            for (w, &pj) in row.iter_mut().zip(self.scratch.iter()) {
                *w += pi * pj;
            }
        }

        self.num_patterns += 1;
        Ok(())
    }

    /// Number of patterns added so far.
    pub fn num_patterns(&self) -> usize {
        self.num_patterns
    }

    /// Average the accumulated products, zero the diagonal and derive the
    /// thresholds.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTrainingSet` if no pattern was added.
    pub fn finish(self) -> Result<TrainedModel> {
        if self.num_patterns == 0 {
            return Err(HopfieldError::EmptyTrainingSet);
        }

        let n = self.num_neurons;
        let count = self.num_patterns as f64;
        let mut values = self.accumulator;
        for w in values.iter_mut() {
            *w /= count;
        }
        for i in 0..n {
            values[i * n + i] = 0.0;
        }

        let weights = WeightMatrix {
            num_neurons: n,
            values,
        };
        Ok(TrainedModel::from_weights(weights, self.num_patterns))
    }
}

/// Build the weight matrix and thresholds from a batch of patterns.
///
/// N is taken from the first pattern; every other pattern must match it.
///
/// # Errors
///
/// - `EmptyTrainingSet` if `patterns` is empty
/// - `DimensionMismatch` if the patterns differ in length
pub fn build(patterns: &[BipolarVector]) -> Result<(WeightMatrix, ThresholdVector)> {
    Ok(train(patterns)?.into_parts())
}

/// Like [`build`], returning the weights bundled as a [`TrainedModel`].
pub fn train(patterns: &[BipolarVector]) -> Result<TrainedModel> {
    let first = patterns.first().ok_or(HopfieldError::EmptyTrainingSet)?;
    let mut builder = WeightMatrixBuilder::new(first.len());
    for pattern in patterns {
        builder.add(pattern)?;
    }
    builder.finish()
}
