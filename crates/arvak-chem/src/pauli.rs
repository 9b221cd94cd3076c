//! Dense Pauli strings used as measurement bases.
//!
//! A measurement basis assigns one single-qubit Pauli operator to every
//! qubit of the register:
//!
//!   P = σ₀ ⊗ σ₁ ⊗ … ⊗ σₙ₋₁,   σ ∈ {I, X, Y, Z}
//!
//! Measuring P yields the parity of the per-qubit ±1 outcomes restricted to
//! the non-identity positions.
//!
//! # Example
//!
//! ```rust
//! use arvak_chem::pauli::{PauliOp, PauliString};
//!
//! // X₀ Z₁ X₂ on a 4-qubit register
//! let p = PauliString::from_fn(4, |q| match q {
//!     0 | 2 => PauliOp::X,
//!     1 => PauliOp::Z,
//!     _ => PauliOp::I,
//! });
//! assert_eq!(p.to_string(), "XZXI");
//! assert_eq!(p.support().collect::<Vec<_>>(), vec![0, 1, 2]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity; the qubit does not take part in the measurement.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// Get the name of this Pauli operator.
    pub fn name(&self) -> &'static str {
        match self {
            PauliOp::I => "I",
            PauliOp::X => "X",
            PauliOp::Y => "Y",
            PauliOp::Z => "Z",
        }
    }

    /// Swap `I` and `Z`; `X` and `Y` are returned unchanged.
    ///
    /// Multiplying a diagonal position by `Z` is how a spectator mode's
    /// number operator enters a Jordan–Wigner string.
    #[must_use]
    pub fn toggle_z(self) -> Self {
        match self {
            PauliOp::I => PauliOp::Z,
            PauliOp::Z => PauliOp::I,
            other => other,
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Pauli operator on every qubit of an `n`-qubit register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<PauliOp>,
}

impl PauliString {
    /// The all-identity string on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            ops: vec![PauliOp::I; num_qubits],
        }
    }

    /// Build a string by evaluating `op_at` for every qubit index.
    pub fn from_fn(num_qubits: usize, op_at: impl FnMut(usize) -> PauliOp) -> Self {
        Self {
            ops: (0..num_qubits).map(op_at).collect(),
        }
    }

    /// Construct from an explicit operator per qubit.
    pub fn from_ops(ops: Vec<PauliOp>) -> Self {
        Self { ops }
    }

    /// Operators, indexed by qubit.
    pub fn ops(&self) -> &[PauliOp] {
        &self.ops
    }

    /// Operator on `qubit`, or `None` past the end of the register.
    pub fn get(&self, qubit: usize) -> Option<PauliOp> {
        self.ops.get(qubit).copied()
    }

    /// Number of qubits the string spans (identity positions included).
    pub fn num_qubits(&self) -> usize {
        self.ops.len()
    }

    /// Qubits carrying a non-identity operator, ascending.
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, op)| **op != PauliOp::I)
            .map(|(q, _)| q)
    }

    /// True if no qubit carries a non-identity operator.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| *op == PauliOp::I)
    }

    /// ±1 eigenvalue read off a single-shot measurement in this basis.
    ///
    /// `outcomes[q]` is `true` when qubit `q` was measured as `1` after the
    /// basis change. Identity positions are ignored. Returns `None` when the
    /// outcome vector does not cover the register.
    pub fn parity(&self, outcomes: &[bool]) -> Option<i8> {
        if outcomes.len() != self.ops.len() {
            return None;
        }
        let odd = self
            .support()
            .filter(|&q| outcomes[q])
            .count()
            % 2
            == 1;
        Some(if odd { -1 } else { 1 })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_string() {
        let p = PauliString::identity(3);
        assert!(p.is_identity());
        assert_eq!(p.num_qubits(), 3);
        assert_eq!(p.support().count(), 0);
        assert_eq!(p.parity(&[true, true, false]), Some(1));
    }

    #[test]
    fn test_toggle_z() {
        assert_eq!(PauliOp::I.toggle_z(), PauliOp::Z);
        assert_eq!(PauliOp::Z.toggle_z(), PauliOp::I);
        assert_eq!(PauliOp::X.toggle_z(), PauliOp::X);
        assert_eq!(PauliOp::Y.toggle_z(), PauliOp::Y);
    }

    #[test]
    fn test_parity_ignores_identity_positions() {
        let p = PauliString::from_ops(vec![PauliOp::Z, PauliOp::I, PauliOp::X]);
        assert_eq!(p.parity(&[false, true, false]), Some(1));
        assert_eq!(p.parity(&[true, true, false]), Some(-1));
        assert_eq!(p.parity(&[true, false, true]), Some(1));
    }

    #[test]
    fn test_parity_rejects_short_outcomes() {
        let p = PauliString::from_ops(vec![PauliOp::Z, PauliOp::Z]);
        assert_eq!(p.parity(&[false]), None);
    }

    #[test]
    fn test_display() {
        let p = PauliString::from_ops(vec![PauliOp::Y, PauliOp::Z, PauliOp::Y, PauliOp::I]);
        assert_eq!(p.to_string(), "YZYI");
    }
}
