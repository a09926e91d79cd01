//! BipolarVector - Fixed-length vector of +1/-1 neuron states.
//!
//! Training patterns, probes and the live network state are all bipolar
//! vectors. Storage is packed into a `BitVec<u32, Lsb0>`, with a set bit
//! meaning +1 and a cleared bit meaning -1, so a value outside {+1, -1}
//! cannot be represented once a vector has been constructed. Validation
//! happens at the boundary (`from_values`, `from_f64`, `set`).
//!
//! # Examples
//!
//! ```
//! use hopfield::BipolarVector;
//!
//! let v = BipolarVector::from_values(&[1, -1, -1, 1]).unwrap();
//! assert_eq!(v.len(), 4);
//! assert_eq!(v.get(1), -1);
//! assert_eq!(v.num_positive(), 2);
//!
//! // Anything but +1/-1 is rejected
//! assert!(BipolarVector::from_values(&[1, 0, -1]).is_err());
//! ```

use crate::{HopfieldError, Result};
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered sequence of bipolar values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BipolarVector {
    /// Set bit = +1, cleared bit = -1
    bits: BitVec<u32, Lsb0>,
}

impl BipolarVector {
    /// Create a vector of length `n` with every element equal to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not +1 or -1.
    pub fn filled(n: usize, value: i8) -> Self {
        assert!(value == 1 || value == -1, "bipolar value must be +1 or -1");
        Self {
            bits: BitVec::repeat(value == 1, n),
        }
    }

    /// Build a vector from +1/-1 values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateValue` for the first element outside {+1, -1}.
    pub fn from_values(values: &[i8]) -> Result<Self> {
        let mut bits = BitVec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            match value {
                1 => bits.push(true),
                -1 => bits.push(false),
                _ => {
                    return Err(HopfieldError::InvalidStateValue {
                        index,
                        value: value as f64,
                    })
                }
            }
        }
        Ok(Self { bits })
    }

    /// Build a vector from floating point +1.0/-1.0 values.
    pub fn from_f64(values: &[f64]) -> Result<Self> {
        let mut bits = BitVec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            if value == 1.0 {
                bits.push(true);
            } else if value == -1.0 {
                bits.push(false);
            } else {
                return Err(HopfieldError::InvalidStateValue { index, value });
            }
        }
        Ok(Self { bits })
    }

    /// Build a vector from booleans (`true` = +1).
    pub fn from_bools<I: IntoIterator<Item = bool>>(bools: I) -> Self {
        Self {
            bits: bools.into_iter().collect(),
        }
    }

    /// Number of elements (neurons).
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Value at position `i` (+1 or -1).
    #[inline]
    pub fn get(&self, i: usize) -> i8 {
        debug_assert!(i < self.bits.len(), "index {} out of bounds (length: {})", i, self.bits.len());
        if self.bits[i] {
            1
        } else {
            -1
        }
    }

    /// True if position `i` holds +1.
    #[inline]
    pub fn is_positive(&self, i: usize) -> bool {
        self.bits[i]
    }

    /// Set position `i` to `value`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` or `InvalidStateValue`.
    pub fn set(&mut self, i: usize, value: i8) -> Result<()> {
        if i >= self.bits.len() {
            return Err(HopfieldError::IndexOutOfBounds {
                index: i,
                length: self.bits.len(),
            });
        }
        match value {
            1 => self.bits.set(i, true),
            -1 => self.bits.set(i, false),
            _ => {
                return Err(HopfieldError::InvalidStateValue {
                    index: i,
                    value: value as f64,
                })
            }
        }
        Ok(())
    }

    /// Assign position `i` from a sign (`true` = +1).
    #[inline]
    pub(crate) fn assign(&mut self, i: usize, positive: bool) {
        self.bits.set(i, positive);
    }

    /// Negate position `i`.
    #[inline]
    pub fn flip(&mut self, i: usize) {
        debug_assert!(i < self.bits.len(), "index {} out of bounds (length: {})", i, self.bits.len());
        let current = self.bits[i];
        self.bits.set(i, !current);
    }

    /// Iterate over the values as +1/-1.
    pub fn iter(&self) -> impl Iterator<Item = i8> + '_ {
        self.bits.iter().by_vals().map(|b| if b { 1 } else { -1 })
    }

    /// Copy the values out as `i8`.
    pub fn to_values(&self) -> Vec<i8> {
        self.iter().collect()
    }

    /// Copy the values out as `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        self.iter().map(f64::from).collect()
    }

    /// Count of +1 elements.
    #[inline]
    pub fn num_positive(&self) -> usize {
        self.bits.count_ones()
    }

    /// Number of positions where `self` and `other` differ.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the lengths differ.
    pub fn hamming_distance(&self, other: &BipolarVector) -> Result<usize> {
        if self.len() != other.len() {
            return Err(HopfieldError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(self
            .bits
            .iter()
            .by_vals()
            .zip(other.bits.iter().by_vals())
            .filter(|(a, b)| a != b)
            .count())
    }

    /// Weighted sum `sum_j(row[j] * self[j])`.
    ///
    /// Summation runs in index order so the result is reproducible
    /// bit-for-bit across calls.
    #[inline]
    pub fn dot(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.bits.len());
        row.iter()
            .zip(self.bits.iter().by_vals())
            .map(|(&w, b)| if b { w } else { -w })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled() {
        let v = BipolarVector::filled(10, -1);
        assert_eq!(v.len(), 10);
        assert_eq!(v.num_positive(), 0);
        assert!(v.iter().all(|x| x == -1));
    }

    #[test]
    fn test_from_values_rejects_zero() {
        let err = BipolarVector::from_values(&[1, -1, 0]).unwrap_err();
        match err {
            HopfieldError::InvalidStateValue { index, .. } => assert_eq!(index, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_from_f64() {
        let v = BipolarVector::from_f64(&[1.0, -1.0, 1.0]).unwrap();
        assert_eq!(v.to_values(), vec![1, -1, 1]);
        assert!(BipolarVector::from_f64(&[1.0, 0.5]).is_err());
    }

    #[test]
    fn test_set_and_flip() {
        let mut v = BipolarVector::filled(4, 1);
        v.set(2, -1).unwrap();
        assert_eq!(v.to_values(), vec![1, 1, -1, 1]);

        v.flip(2);
        v.flip(0);
        assert_eq!(v.to_values(), vec![-1, 1, 1, 1]);

        assert!(v.set(4, 1).is_err());
        assert!(v.set(0, 2).is_err());
    }

    #[test]
    fn test_hamming_distance() {
        let a = BipolarVector::from_values(&[1, 1, -1, -1]).unwrap();
        let b = BipolarVector::from_values(&[1, -1, -1, 1]).unwrap();
        assert_eq!(a.hamming_distance(&b).unwrap(), 2);
        assert_eq!(a.hamming_distance(&a).unwrap(), 0);

        let c = BipolarVector::filled(3, 1);
        assert!(a.hamming_distance(&c).is_err());
    }

    #[test]
    fn test_dot() {
        let v = BipolarVector::from_values(&[1, -1, 1]).unwrap();
        assert_eq!(v.dot(&[0.5, 2.0, 1.0]), 0.5 - 2.0 + 1.0);
    }
}
