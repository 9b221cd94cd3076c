//! Weighted measurement instructions.

use serde::{Deserialize, Serialize};

use crate::basis::MeasurementBasisBuilder;
use crate::coefficients::CoefficientExpander;
use crate::error::ChemResult;
use crate::pauli::PauliString;
use crate::term::Term;

/// A Pauli measurement basis paired with its signed weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementInstruction {
    /// Basis to measure in.
    pub basis: PauliString,
    /// Contribution of this basis' mean parity to the term expectation.
    pub weight: f64,
}

/// Expand `term` into its measurement instructions.
///
/// # Errors
///
/// Propagates [`ChemError::InvalidTerm`](crate::error::ChemError::InvalidTerm)
/// from the basis builder.
pub fn expand_term(num_qubits: usize, term: &Term) -> ChemResult<Vec<MeasurementInstruction>> {
    let bases = MeasurementBasisBuilder::new(num_qubits).build(term)?;
    let weights = CoefficientExpander::expand(term);
    debug_assert_eq!(bases.len(), weights.len());

    Ok(bases
        .into_iter()
        .zip(weights)
        .map(|(basis, weight)| MeasurementInstruction { basis, weight })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_aligns_bases_and_weights() {
        let instructions = expand_term(3, &Term::triple_index([0, 1, 2], [1.0, 2.0])).unwrap();
        let rendered: Vec<(String, f64)> = instructions
            .iter()
            .map(|i| (i.basis.to_string(), i.weight))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("XZX".to_string(), 0.25),
                ("YZY".to_string(), 0.25),
                ("XIX".to_string(), 0.5),
                ("YIY".to_string(), 0.5),
            ]
        );
    }

    #[test]
    fn test_expand_propagates_invalid_term() {
        assert!(expand_term(1, &Term::off_diagonal_pair(0, 1, 1.0)).is_err());
    }
}
