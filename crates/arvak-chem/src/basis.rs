//! Measurement bases for Jordan–Wigner terms.
//!
//! Every term kind expands through a fixed branch table. A branch assigns a
//! Pauli letter to each of the term's sorted ladder modes and says whether
//! the spectator mode (TripleIndex only) carries an extra `Z`. The basis
//! builder and the [`CoefficientExpander`](crate::coefficients::CoefficientExpander)
//! read the same table, so strings and weights stay aligned by position.
//!
//! Under Jordan–Wigner a product of two Majorana operators on sorted modes
//! `i < j` carries `Z` on every qubit strictly between them. Ladder modes
//! are paired into blocks `(m₀, m₁)` and `(m₂, m₃)` after sorting, and each
//! block contributes its own `Z` fill. The gap between the two blocks of a
//! QuadIndex term stays identity because the strings of the two blocks
//! cancel there.

use crate::error::{ChemError, ChemResult};
use crate::pauli::{PauliOp, PauliString};
use crate::term::{Term, TermKind};

use PauliOp::{X, Y, Z};

/// One row of a branch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    /// Pauli letter per ladder mode, in ascending mode order.
    pub axes: &'static [PauliOp],
    /// Toggle `I ↔ Z` on the spectator mode.
    pub toggle_spectator: bool,
}

impl Branch {
    const fn plain(axes: &'static [PauliOp]) -> Self {
        Self {
            axes,
            toggle_spectator: false,
        }
    }

    const fn dressed(axes: &'static [PauliOp]) -> Self {
        Self {
            axes,
            toggle_spectator: true,
        }
    }
}

const DIAGONAL_BRANCHES: [Branch; 1] = [Branch::plain(&[Z])];

const PAIR_BRANCHES: [Branch; 2] = [Branch::plain(&[X, X]), Branch::plain(&[Y, Y])];

const TRIPLE_BRANCHES: [Branch; 4] = [
    Branch::plain(&[X, X]),
    Branch::plain(&[Y, Y]),
    Branch::dressed(&[X, X]),
    Branch::dressed(&[Y, Y]),
];

const QUAD_BRANCHES: [Branch; 8] = [
    Branch::plain(&[X, X, X, X]),
    Branch::plain(&[Y, Y, Y, Y]),
    Branch::plain(&[X, X, Y, Y]),
    Branch::plain(&[Y, Y, X, X]),
    Branch::plain(&[X, Y, X, Y]),
    Branch::plain(&[Y, X, Y, X]),
    Branch::plain(&[Y, X, X, Y]),
    Branch::plain(&[X, Y, Y, X]),
];

/// The ordered branch table for `kind`.
///
/// Branch `b` is weighted by coefficient `b / 2`.
pub fn branch_table(kind: TermKind) -> &'static [Branch] {
    match kind {
        TermKind::Diagonal => &DIAGONAL_BRANCHES,
        TermKind::OffDiagonalPair => &PAIR_BRANCHES,
        TermKind::TripleIndex => &TRIPLE_BRANCHES,
        TermKind::QuadIndex => &QUAD_BRANCHES,
    }
}

/// Index of the coefficient that weights branch `branch`.
pub fn coefficient_index(branch: usize) -> usize {
    branch / 2
}

/// Modes that carry ladder operators (sorted ascending) and the spectator.
pub(crate) fn ladder_layout(term: &Term) -> (Vec<usize>, Option<usize>) {
    let (mut ladder, spectator) = match term {
        Term::Diagonal { mode, .. } => (vec![*mode], None),
        Term::OffDiagonalPair { modes, .. } => (modes.to_vec(), None),
        Term::TripleIndex { modes: [p, q, r], .. } => (vec![*p, *r], Some(*q)),
        Term::QuadIndex { modes, .. } => (modes.to_vec(), None),
    };
    ladder.sort_unstable();
    (ladder, spectator)
}

/// Builds the ordered measurement strings of a term.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementBasisBuilder {
    num_qubits: usize,
}

impl MeasurementBasisBuilder {
    /// Create a builder for an `num_qubits`-qubit register.
    pub fn new(num_qubits: usize) -> Self {
        Self { num_qubits }
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Expand `term` into its measurement strings, in branch-table order.
    ///
    /// # Errors
    ///
    /// [`ChemError::InvalidTerm`] if a mode is out of range or repeated.
    pub fn build(&self, term: &Term) -> ChemResult<Vec<PauliString>> {
        term.check_distinct_modes()?;
        term.check_modes_in_range(self.num_qubits)?;

        let (ladder, spectator) = ladder_layout(term);
        let strings = branch_table(term.kind())
            .iter()
            .map(|branch| self.branch_string(&ladder, spectator, branch))
            .collect::<ChemResult<Vec<_>>>()?;
        Ok(strings)
    }

    fn branch_string(
        &self,
        ladder: &[usize],
        spectator: Option<usize>,
        branch: &Branch,
    ) -> ChemResult<PauliString> {
        if branch.axes.len() != ladder.len() {
            return Err(ChemError::InvalidTerm(format!(
                "branch assigns {} letters to {} ladder modes",
                branch.axes.len(),
                ladder.len()
            )));
        }

        let in_block_gap = |q: usize| {
            ladder
                .chunks_exact(2)
                .any(|block| block[0] < q && q < block[1])
        };

        Ok(PauliString::from_fn(self.num_qubits, |q| {
            let op = match ladder.iter().position(|&m| m == q) {
                Some(slot) => branch.axes[slot],
                None if in_block_gap(q) => Z,
                None => PauliOp::I,
            };
            if branch.toggle_spectator && spectator == Some(q) {
                op.toggle_z()
            } else {
                op
            }
        }))
    }
}
