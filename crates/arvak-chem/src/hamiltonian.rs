//! Encoded Hamiltonian data structures.
//!
//! An encoded Hamiltonian bundles everything one energy estimation needs:
//!
//!   E = offset + Σ_k ⟨ψ| H_k |ψ⟩
//!
//! where each `H_k` is a Jordan–Wigner [`Term`] and `|ψ⟩` is the trial state
//! described by an [`InputState`]. The structure is validated once at
//! construction and is read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use arvak_chem::hamiltonian::{EncodedHamiltonian, InputState, TermBuckets};
//! use arvak_chem::term::Term;
//!
//! // One diagonal term on the vacuum of a single mode.
//! let mut buckets = TermBuckets::default();
//! buckets.push(Term::diagonal(0, 1.0));
//!
//! let h = EncodedHamiltonian::new(1, buckets, InputState::basis([]), 0.0).unwrap();
//! assert_eq!(h.num_terms(), 1);
//! ```

use std::collections::BTreeSet;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::catalog::TermCatalog;
use crate::error::{ChemError, ChemResult};
use crate::term::{Term, TermKind};

/// Maximum deviation of Σ|amplitude|² from one.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-6;

/// The four ordered term buckets, one per [`TermKind`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermBuckets {
    /// Diagonal terms.
    #[serde(default)]
    pub diagonal: Vec<Term>,
    /// Off-diagonal pair terms.
    #[serde(default)]
    pub off_diagonal_pair: Vec<Term>,
    /// Triple-index terms.
    #[serde(default)]
    pub triple_index: Vec<Term>,
    /// Quad-index terms.
    #[serde(default)]
    pub quad_index: Vec<Term>,
}

impl TermBuckets {
    /// Append a term to the bucket matching its kind.
    pub fn push(&mut self, term: Term) {
        self.bucket_mut(term.kind()).push(term);
    }

    /// Terms of one kind, in insertion order.
    pub fn bucket(&self, kind: TermKind) -> &[Term] {
        match kind {
            TermKind::Diagonal => &self.diagonal,
            TermKind::OffDiagonalPair => &self.off_diagonal_pair,
            TermKind::TripleIndex => &self.triple_index,
            TermKind::QuadIndex => &self.quad_index,
        }
    }

    fn bucket_mut(&mut self, kind: TermKind) -> &mut Vec<Term> {
        match kind {
            TermKind::Diagonal => &mut self.diagonal,
            TermKind::OffDiagonalPair => &mut self.off_diagonal_pair,
            TermKind::TripleIndex => &mut self.triple_index,
            TermKind::QuadIndex => &mut self.quad_index,
        }
    }

    /// Total number of terms over all buckets.
    pub fn len(&self) -> usize {
        TermKind::ALL.iter().map(|k| self.bucket(*k).len()).sum()
    }

    /// True if every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Term> for TermBuckets {
    fn from_iter<T: IntoIterator<Item = Term>>(iter: T) -> Self {
        let mut buckets = Self::default();
        for term in iter {
            buckets.push(term);
        }
        buckets
    }
}

/// One component of the trial state: `amplitude · a†_{m₁} … a†_{mₖ} |vac⟩`.
///
/// The creation operators are applied in ascending mode order, which under
/// the Jordan–Wigner mapping is exactly `+|bits⟩` with bit `m` set for every
/// occupied mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Complex amplitude of this configuration.
    pub amplitude: Complex64,
    /// Occupied fermion modes.
    pub occupied: BTreeSet<usize>,
}

impl StateEntry {
    /// Create a new entry.
    pub fn new(amplitude: Complex64, occupied: impl IntoIterator<Item = usize>) -> Self {
        Self {
            amplitude,
            occupied: occupied.into_iter().collect(),
        }
    }
}

/// Superposition of occupation-number configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputState {
    entries: Vec<StateEntry>,
}

impl InputState {
    /// Create from explicit entries.
    pub fn from_entries(entries: Vec<StateEntry>) -> Self {
        Self { entries }
    }

    /// A single configuration with unit amplitude.
    pub fn basis(occupied: impl IntoIterator<Item = usize>) -> Self {
        Self::from_entries(vec![StateEntry::new(Complex64::new(1.0, 0.0), occupied)])
    }

    /// All entries, in the order supplied.
    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }

    /// Σ |amplitude|².
    pub fn norm_sqr(&self) -> f64 {
        self.entries.iter().map(|e| e.amplitude.norm_sqr()).sum()
    }

    /// Check normalization, mode range and distinct configurations.
    pub fn validate(&self, num_qubits: usize) -> ChemResult<()> {
        if self.entries.is_empty() {
            return Err(ChemError::InvalidHamiltonian(
                "input state has no entries".into(),
            ));
        }

        if let Some(i) = self
            .entries
            .iter()
            .position(|e| !e.amplitude.re.is_finite() || !e.amplitude.im.is_finite())
        {
            return Err(ChemError::InvalidHamiltonian(format!(
                "input state entry {i} has a non-finite amplitude {}",
                self.entries[i].amplitude
            )));
        }

        let norm = self.norm_sqr();
        if (norm - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(ChemError::InvalidHamiltonian(format!(
                "input state is not normalized: Σ|amplitude|² = {norm}"
            )));
        }

        for (i, entry) in self.entries.iter().enumerate() {
            if let Some(&m) = entry.occupied.iter().find(|&&m| m >= num_qubits) {
                return Err(ChemError::InvalidHamiltonian(format!(
                    "input state entry {i} occupies mode {m} but the register only has {num_qubits} qubits"
                )));
            }
            if self.entries[..i].iter().any(|e| e.occupied == entry.occupied) {
                return Err(ChemError::InvalidHamiltonian(format!(
                    "input state repeats configuration {:?}",
                    entry.occupied
                )));
            }
        }
        Ok(())
    }
}

/// A Jordan–Wigner encoded Hamiltonian together with its trial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HamiltonianFields")]
pub struct EncodedHamiltonian {
    num_qubits: usize,
    terms: TermBuckets,
    input_state: InputState,
    energy_offset: f64,
}

/// Unvalidated serde mirror of [`EncodedHamiltonian`].
#[derive(Deserialize)]
struct HamiltonianFields {
    num_qubits: usize,
    terms: TermBuckets,
    input_state: InputState,
    #[serde(default)]
    energy_offset: f64,
}

impl TryFrom<HamiltonianFields> for EncodedHamiltonian {
    type Error = ChemError;

    fn try_from(f: HamiltonianFields) -> ChemResult<Self> {
        Self::new(f.num_qubits, f.terms, f.input_state, f.energy_offset)
    }
}

impl EncodedHamiltonian {
    /// Validate and assemble an encoded Hamiltonian.
    ///
    /// # Errors
    ///
    /// [`ChemError::InvalidHamiltonian`] when the register is empty, a term
    /// sits in the wrong bucket, references a mode outside the register or
    /// repeats a mode, or when the input state is invalid.
    pub fn new(
        num_qubits: usize,
        terms: TermBuckets,
        input_state: InputState,
        energy_offset: f64,
    ) -> ChemResult<Self> {
        if num_qubits == 0 {
            return Err(ChemError::InvalidHamiltonian(
                "register needs at least one qubit".into(),
            ));
        }

        for kind in TermKind::ALL {
            for (i, term) in terms.bucket(kind).iter().enumerate() {
                if term.kind() != kind {
                    return Err(ChemError::InvalidHamiltonian(format!(
                        "{kind} bucket entry {i} is a {} term",
                        term.kind()
                    )));
                }
                if let Some(c) = term.coefficients().iter().find(|c| !c.is_finite()) {
                    return Err(ChemError::InvalidHamiltonian(format!(
                        "{kind} bucket entry {i} has a non-finite coefficient {c}"
                    )));
                }
                term.check_distinct_modes()
                    .and_then(|()| term.check_modes_in_range(num_qubits))
                    .map_err(|e| match e {
                        ChemError::InvalidTerm(msg) => ChemError::InvalidHamiltonian(msg),
                        other => other,
                    })?;
            }
        }

        if !energy_offset.is_finite() {
            return Err(ChemError::InvalidHamiltonian(format!(
                "energy offset must be finite, got {energy_offset}"
            )));
        }
        input_state.validate(num_qubits)?;

        Ok(Self {
            num_qubits,
            terms,
            input_state,
            energy_offset,
        })
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The four term buckets.
    pub fn terms(&self) -> &TermBuckets {
        &self.terms
    }

    /// Total number of terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The trial state description.
    pub fn input_state(&self) -> &InputState {
        &self.input_state
    }

    /// Constant energy shift.
    pub fn energy_offset(&self) -> f64 {
        self.energy_offset
    }

    /// Ordered view over all terms.
    pub fn catalog(&self) -> TermCatalog<'_> {
        TermCatalog::new(&self.terms)
    }
}
