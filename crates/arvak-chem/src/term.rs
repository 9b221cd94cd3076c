//! Jordan–Wigner encoded Hamiltonian terms.
//!
//! The fermionic algebra only produces four term shapes, so a term is a
//! closed enum with fixed-arity payloads:
//!
//! | Kind | modes | coefficients | measurement strings |
//! |------|-------|--------------|---------------------|
//! | [`TermKind::Diagonal`] | 1 | 1 | 1 |
//! | [`TermKind::OffDiagonalPair`] | 2 | 1 | 2 |
//! | [`TermKind::TripleIndex`] | 3 | 2 | 4 |
//! | [`TermKind::QuadIndex`] | 4 | 4 | 8 |
//!
//! Operators denoted by each kind (coefficients `h`, `c`, `v`):
//!
//! - `Diagonal(p; h)` → `h · Z_p`
//! - `OffDiagonalPair(p, q; h)` → `h · ½(a†_p a_q + a†_q a_p)`
//! - `TripleIndex(p, q, r; c₀, c₁)` → `½(a†_p (c₀ + c₁ Z_q) a_r + h.c.)`,
//!   `q` being the spectator mode
//! - `QuadIndex(p, q, r, s; v)` → `v · (a†_p a†_q a_r a_s + h.c.)` when all
//!   four coefficients agree; otherwise each coefficient drives one pair of
//!   X↔Y-conjugate measurement strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChemError, ChemResult};

/// Type tag of a [`Term`].
///
/// The declaration order is the catalog enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TermKind {
    /// Single-mode diagonal term.
    Diagonal,
    /// Hopping between two modes.
    OffDiagonalPair,
    /// Hopping between two modes dressed by a spectator mode.
    TripleIndex,
    /// Two-body excitation over four modes.
    QuadIndex,
}

impl TermKind {
    /// All kinds, in catalog order.
    pub const ALL: [TermKind; 4] = [
        TermKind::Diagonal,
        TermKind::OffDiagonalPair,
        TermKind::TripleIndex,
        TermKind::QuadIndex,
    ];

    /// Number of fermion-mode indices a term of this kind carries.
    pub fn mode_arity(self) -> usize {
        match self {
            TermKind::Diagonal => 1,
            TermKind::OffDiagonalPair => 2,
            TermKind::TripleIndex => 3,
            TermKind::QuadIndex => 4,
        }
    }

    /// Number of raw coefficients a term of this kind carries.
    pub fn coefficient_arity(self) -> usize {
        match self {
            TermKind::Diagonal | TermKind::OffDiagonalPair => 1,
            TermKind::TripleIndex => 2,
            TermKind::QuadIndex => 4,
        }
    }

    /// Number of measurement instructions a term of this kind expands into.
    pub fn branch_count(self) -> usize {
        match self {
            TermKind::Diagonal => 1,
            TermKind::OffDiagonalPair => 2,
            TermKind::TripleIndex => 4,
            TermKind::QuadIndex => 8,
        }
    }

    /// Get the name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            TermKind::Diagonal => "diagonal",
            TermKind::OffDiagonalPair => "off-diagonal pair",
            TermKind::TripleIndex => "triple-index",
            TermKind::QuadIndex => "quad-index",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single encoded Hamiltonian term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    /// `h · Z_p`.
    Diagonal {
        /// The mode `p`.
        mode: usize,
        /// The coefficient `h`.
        coefficient: f64,
    },
    /// `h · ½(a†_p a_q + a†_q a_p)`.
    OffDiagonalPair {
        /// The modes `[p, q]`.
        modes: [usize; 2],
        /// The coefficient `h`.
        coefficient: f64,
    },
    /// `½(a†_p (c₀ + c₁ Z_q) a_r + h.c.)`.
    TripleIndex {
        /// The modes `[p, q, r]`; `q` is the spectator.
        modes: [usize; 3],
        /// The coefficients `[c₀, c₁]`.
        coefficients: [f64; 2],
    },
    /// Two-body excitation `a†_p a†_q a_r a_s + h.c.`.
    QuadIndex {
        /// The modes `[p, q, r, s]` in operator order.
        modes: [usize; 4],
        /// One coefficient per conjugate pair of measurement strings.
        coefficients: [f64; 4],
    },
}

impl Term {
    /// Shorthand: diagonal term `h · Z_p`.
    pub fn diagonal(mode: usize, coefficient: f64) -> Self {
        Term::Diagonal { mode, coefficient }
    }

    /// Shorthand: hopping term between `p` and `q`.
    pub fn off_diagonal_pair(p: usize, q: usize, coefficient: f64) -> Self {
        Term::OffDiagonalPair {
            modes: [p, q],
            coefficient,
        }
    }

    /// Shorthand: spectator-dressed hopping term.
    pub fn triple_index(modes: [usize; 3], coefficients: [f64; 2]) -> Self {
        Term::TripleIndex {
            modes,
            coefficients,
        }
    }

    /// Shorthand: two-body excitation term.
    pub fn quad_index(modes: [usize; 4], coefficients: [f64; 4]) -> Self {
        Term::QuadIndex {
            modes,
            coefficients,
        }
    }

    /// Build a term from untyped slices, checking arity and distinctness.
    ///
    /// # Errors
    ///
    /// [`ChemError::InvalidTerm`] when the number of modes or coefficients
    /// does not match `kind`, or when a mode index repeats.
    pub fn from_parts(kind: TermKind, modes: &[usize], coefficients: &[f64]) -> ChemResult<Self> {
        let term = Self::from_parts_unchecked(kind, modes, coefficients)?;
        term.check_distinct_modes()?;
        Ok(term)
    }

    /// Like [`Term::from_parts`] but only checks arity; mode validity is
    /// left to [`EncodedHamiltonian::new`](crate::hamiltonian::EncodedHamiltonian::new).
    pub(crate) fn from_parts_unchecked(
        kind: TermKind,
        modes: &[usize],
        coefficients: &[f64],
    ) -> ChemResult<Self> {
        if modes.len() != kind.mode_arity() {
            return Err(ChemError::InvalidTerm(format!(
                "{kind} term needs {} mode indices, got {}",
                kind.mode_arity(),
                modes.len()
            )));
        }
        if coefficients.len() != kind.coefficient_arity() {
            return Err(ChemError::InvalidTerm(format!(
                "{kind} term needs {} coefficients, got {}",
                kind.coefficient_arity(),
                coefficients.len()
            )));
        }

        let term = match kind {
            TermKind::Diagonal => Term::diagonal(modes[0], coefficients[0]),
            TermKind::OffDiagonalPair => Term::off_diagonal_pair(modes[0], modes[1], coefficients[0]),
            TermKind::TripleIndex => Term::triple_index(
                [modes[0], modes[1], modes[2]],
                [coefficients[0], coefficients[1]],
            ),
            TermKind::QuadIndex => Term::quad_index(
                [modes[0], modes[1], modes[2], modes[3]],
                [
                    coefficients[0],
                    coefficients[1],
                    coefficients[2],
                    coefficients[3],
                ],
            ),
        };
        Ok(term)
    }

    /// The type tag of this term.
    pub fn kind(&self) -> TermKind {
        match self {
            Term::Diagonal { .. } => TermKind::Diagonal,
            Term::OffDiagonalPair { .. } => TermKind::OffDiagonalPair,
            Term::TripleIndex { .. } => TermKind::TripleIndex,
            Term::QuadIndex { .. } => TermKind::QuadIndex,
        }
    }

    /// Mode indices, in the order they were supplied.
    pub fn modes(&self) -> &[usize] {
        match self {
            Term::Diagonal { mode, .. } => std::slice::from_ref(mode),
            Term::OffDiagonalPair { modes, .. } => &modes[..],
            Term::TripleIndex { modes, .. } => &modes[..],
            Term::QuadIndex { modes, .. } => &modes[..],
        }
    }

    /// Raw coefficients.
    pub fn coefficients(&self) -> &[f64] {
        match self {
            Term::Diagonal { coefficient, .. } | Term::OffDiagonalPair { coefficient, .. } => {
                std::slice::from_ref(coefficient)
            }
            Term::TripleIndex { coefficients, .. } => &coefficients[..],
            Term::QuadIndex { coefficients, .. } => &coefficients[..],
        }
    }

    /// The highest mode index referenced.
    pub fn max_mode(&self) -> usize {
        self.modes().iter().copied().max().unwrap_or(0)
    }

    /// Fail if the same mode index appears twice.
    pub fn check_distinct_modes(&self) -> ChemResult<()> {
        let modes = self.modes();
        for (i, m) in modes.iter().enumerate() {
            if modes[i + 1..].contains(m) {
                return Err(ChemError::InvalidTerm(format!(
                    "{} term repeats mode {m} in {modes:?}",
                    self.kind()
                )));
            }
        }
        Ok(())
    }

    /// Fail if any mode index lies outside `[0, num_qubits)`.
    pub fn check_modes_in_range(&self, num_qubits: usize) -> ChemResult<()> {
        match self.modes().iter().find(|&&m| m >= num_qubits) {
            Some(m) => Err(ChemError::InvalidTerm(format!(
                "{} term references mode {m} but the register only has {num_qubits} qubits",
                self.kind()
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?} {:?}", self.kind(), self.modes(), self.coefficients())
    }
}
