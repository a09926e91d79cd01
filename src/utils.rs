//! Utility functions for generating and corrupting patterns.
//!
//! These feed probes and synthetic training sets; the network itself is
//! fully deterministic and never draws random numbers.

use crate::{BipolarVector, HopfieldError, Result};
use rand::Rng;

/// Generate a uniformly random bipolar pattern of length `n`.
///
/// # Examples
///
/// ```
/// use hopfield::utils::random_pattern;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let p = random_pattern(64, &mut rng);
/// assert_eq!(p.len(), 64);
/// ```
pub fn random_pattern<R: Rng>(n: usize, rng: &mut R) -> BipolarVector {
    BipolarVector::from_bools((0..n).map(|_| rng.gen_bool(0.5)))
}

/// Return a copy of `pattern` with `num_flips` distinct neurons negated.
///
/// Positions are chosen with a partial Fisher-Yates shuffle, so the result
/// is exactly `num_flips` away from the input in Hamming distance.
///
/// # Errors
///
/// Returns `InvalidParameter` if `num_flips` exceeds the pattern length.
///
/// # Examples
///
/// ```
/// use hopfield::utils::{corrupt, random_pattern};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let p = random_pattern(100, &mut rng);
/// let noisy = corrupt(&p, 10, &mut rng).unwrap();
/// assert_eq!(p.hamming_distance(&noisy).unwrap(), 10);
/// ```
pub fn corrupt<R: Rng>(pattern: &BipolarVector, num_flips: usize, rng: &mut R) -> Result<BipolarVector> {
    let n = pattern.len();
    if num_flips > n {
        return Err(HopfieldError::InvalidParameter(format!(
            "cannot flip {} of {} neurons",
            num_flips, n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..num_flips {
        let j = rng.gen_range(i..n);
        indices.swap(i, j);
    }

    let mut noisy = pattern.clone();
    for &i in &indices[..num_flips] {
        noisy.flip(i);
    }
    Ok(noisy)
}

/// Flip a fraction `pct` (0.0..=1.0) of the neurons, rounded down.
pub fn corrupt_pct<R: Rng>(pattern: &BipolarVector, pct: f64, rng: &mut R) -> Result<BipolarVector> {
    if !(0.0..=1.0).contains(&pct) {
        return Err(HopfieldError::InvalidParameter(format!(
            "noise fraction must be within [0, 1], got {}",
            pct
        )));
    }
    let num_flips = (pattern.len() as f64 * pct) as usize;
    corrupt(pattern, num_flips, rng)
}
