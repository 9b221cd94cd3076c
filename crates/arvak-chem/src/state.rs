//! Trial-state preparation descriptions.
//!
//! A [`StatePreparation`] is the sparse computational-basis form of an
//! [`InputState`]: a list of `(basis index, amplitude)` pairs with bit `m`
//! of the index set iff mode `m` is occupied. Backends load it into a fresh
//! register; the description itself is immutable and shared freely between
//! concurrent trials.

use std::sync::Arc;

use num_complex::Complex64;

use crate::error::{ChemError, ChemResult};
use crate::hamiltonian::InputState;

/// Widest register a preparation can index.
pub const MAX_PREPARATION_QUBITS: usize = 64;

/// Sparse amplitude table to load from `|0…0⟩`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePreparation {
    num_qubits: usize,
    amplitudes: Arc<[(u64, Complex64)]>,
}

impl StatePreparation {
    /// Register width the preparation targets.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// `(basis index, amplitude)` pairs, one per input-state entry.
    pub fn amplitudes(&self) -> &[(u64, Complex64)] {
        &self.amplitudes
    }

    /// True if the preparation is a single basis state.
    pub fn is_basis_state(&self) -> bool {
        self.amplitudes.len() == 1
    }
}

/// Turns an [`InputState`] into a [`StatePreparation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialStatePreparer;

impl TrialStatePreparer {
    /// Build the preparation for `state` on `num_qubits` qubits.
    ///
    /// # Errors
    ///
    /// [`ChemError::InvalidHamiltonian`] if the state is invalid for the
    /// register or the register is wider than [`MAX_PREPARATION_QUBITS`].
    pub fn prepare(state: &InputState, num_qubits: usize) -> ChemResult<StatePreparation> {
        if num_qubits > MAX_PREPARATION_QUBITS {
            return Err(ChemError::InvalidHamiltonian(format!(
                "cannot prepare a {num_qubits}-qubit state (max {MAX_PREPARATION_QUBITS})"
            )));
        }
        state.validate(num_qubits)?;

        let amplitudes = state
            .entries()
            .iter()
            .map(|entry| {
                let index = entry.occupied.iter().fold(0u64, |acc, &m| acc | (1 << m));
                (index, entry.amplitude)
            })
            .collect();

        Ok(StatePreparation {
            num_qubits,
            amplitudes,
        })
    }
}
