//! Adapter for Hamiltonians supplied as plain nested tuples.
//!
//! The raw form is what external encoders usually emit:
//!
//! ```text
//! (num_qubits,
//!  [diagonal, off_diagonal_pair, triple_index, quad_index],   // each: [(modes, coefficients)]
//!  [((re, im), occupied_modes)],
//!  energy_offset)
//! ```
//!
//! It deserializes directly from nested JSON arrays.

use num_complex::Complex64;

use crate::energy::{EnergyEstimate, EnergyEstimator};
use crate::error::{ChemError, ChemResult};
use crate::hamiltonian::{EncodedHamiltonian, InputState, StateEntry, TermBuckets};
use crate::term::{Term, TermKind};

/// `(mode indices, coefficients)` of one raw term.
pub type RawTerm = (Vec<i64>, Vec<f64>);

/// `((re, im), occupied modes)` of one raw state entry.
pub type RawStateEntry = ((f64, f64), Vec<i64>);

/// Qubit count, four term buckets, state entries, energy offset.
pub type RawHamiltonian = (i64, [Vec<RawTerm>; 4], Vec<RawStateEntry>, f64);

fn to_index(value: i64, what: &str) -> Result<usize, String> {
    usize::try_from(value).map_err(|_| format!("{what} must be non-negative, got {value}"))
}

impl EncodedHamiltonian {
    /// Reshape a [`RawHamiltonian`] and validate it.
    ///
    /// # Errors
    ///
    /// [`ChemError::InvalidTerm`] for negative mode indices or arity
    /// mismatches, [`ChemError::InvalidHamiltonian`] for everything the
    /// structured constructor rejects (repeated or out-of-range modes,
    /// non-finite values, a bad input state).
    pub fn from_raw(raw: &RawHamiltonian) -> ChemResult<Self> {
        let (num_qubits, buckets, state, offset) = raw;
        let num_qubits = to_index(*num_qubits, "qubit count").map_err(ChemError::InvalidHamiltonian)?;

        let mut terms = TermBuckets::default();
        for (kind, bucket) in TermKind::ALL.into_iter().zip(buckets) {
            for (i, (modes, coefficients)) in bucket.iter().enumerate() {
                let modes = modes
                    .iter()
                    .map(|&m| to_index(m, "mode index"))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| ChemError::InvalidTerm(format!("{kind} term {i}: {e}")))?;
                terms.push(Term::from_parts_unchecked(kind, &modes, coefficients)?);
            }
        }

        let entries = state
            .iter()
            .map(|((re, im), occupied)| {
                let occupied = occupied
                    .iter()
                    .map(|&m| to_index(m, "occupied mode"))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(ChemError::InvalidHamiltonian)?;
                Ok(StateEntry::new(Complex64::new(*re, *im), occupied))
            })
            .collect::<ChemResult<Vec<_>>>()?;

        Self::new(num_qubits, terms, InputState::from_entries(entries), *offset)
    }
}

/// Validate `raw`, then run the full pipeline on it.
///
/// # Errors
///
/// [`ChemError::InvalidShotCount`] when `n_samples` is not a positive
/// 32-bit count; otherwise as [`EncodedHamiltonian::from_raw`] and
/// [`EnergyEstimator::estimate`].
pub async fn estimate_energy_raw(
    estimator: &EnergyEstimator,
    raw: &RawHamiltonian,
    n_samples: i64,
) -> ChemResult<EnergyEstimate> {
    let samples = match u32::try_from(n_samples) {
        Ok(n) if n > 0 => n,
        _ => return Err(ChemError::InvalidShotCount(n_samples)),
    };
    let hamiltonian = EncodedHamiltonian::from_raw(raw)?;
    estimator.estimate(&hamiltonian, samples).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vacuum_raw(buckets: [Vec<RawTerm>; 4]) -> RawHamiltonian {
        (2, buckets, vec![((1.0, 0.0), vec![])], 0.5)
    }

    #[test]
    fn test_from_raw_routes_buckets() {
        let raw = vacuum_raw([
            vec![(vec![0], vec![1.0])],
            vec![(vec![0, 1], vec![0.5])],
            vec![],
            vec![],
        ]);
        let h = EncodedHamiltonian::from_raw(&raw).unwrap();
        assert_eq!(h.num_qubits(), 2);
        assert_eq!(h.energy_offset(), 0.5);
        assert_eq!(h.terms().diagonal, vec![Term::diagonal(0, 1.0)]);
        assert_eq!(h.terms().off_diagonal_pair, vec![Term::off_diagonal_pair(0, 1, 0.5)]);
    }

    #[test]
    fn test_from_raw_quad_arity() {
        let raw = vacuum_raw([vec![], vec![], vec![], vec![(vec![0, 1, 0, 1], vec![1.0])]]);
        assert!(matches!(
            EncodedHamiltonian::from_raw(&raw),
            Err(ChemError::InvalidTerm(_))
        ));
    }

    #[test]
    fn test_from_raw_negative_mode() {
        let raw = vacuum_raw([vec![(vec![-1], vec![1.0])], vec![], vec![], vec![]]);
        assert!(matches!(
            EncodedHamiltonian::from_raw(&raw),
            Err(ChemError::InvalidTerm(_))
        ));
    }

    #[test]
    fn test_from_raw_out_of_range_is_hamiltonian_error() {
        let raw = vacuum_raw([vec![(vec![5], vec![1.0])], vec![], vec![], vec![]]);
        assert!(matches!(
            EncodedHamiltonian::from_raw(&raw),
            Err(ChemError::InvalidHamiltonian(_))
        ));
    }

    #[test]
    fn test_from_raw_negative_qubits() {
        let raw: RawHamiltonian = (-1, Default::default(), vec![((1.0, 0.0), vec![])], 0.0);
        assert!(matches!(
            EncodedHamiltonian::from_raw(&raw),
            Err(ChemError::InvalidHamiltonian(_))
        ));
    }

    #[test]
    fn test_from_raw_duplicate_mode_is_hamiltonian_error() {
        let raw = vacuum_raw([vec![], vec![(vec![1, 1], vec![0.5])], vec![], vec![]]);
        assert!(matches!(
            EncodedHamiltonian::from_raw(&raw),
            Err(ChemError::InvalidHamiltonian(_))
        ));
    }

    #[test]
    fn test_from_raw_nan_amplitude_rejected() {
        let raw: RawHamiltonian = (
            1,
            Default::default(),
            vec![((1.0, 0.0), vec![]), ((f64::NAN, 0.0), vec![0])],
            0.0,
        );
        assert!(matches!(
            EncodedHamiltonian::from_raw(&raw),
            Err(ChemError::InvalidHamiltonian(_))
        ));
    }
}
