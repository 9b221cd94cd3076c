//! Built-in model Hamiltonians.
//!
//! Each model is already Jordan–Wigner encoded: diagonal coefficients are the
//! `Z` weights and the identity part sits in the energy offset. They are
//! small enough to check against the simulator's exact energy.

use std::f64::consts::FRAC_1_SQRT_2;

use arvak_chem::error::ChemResult;
use arvak_chem::hamiltonian::{EncodedHamiltonian, InputState, StateEntry, TermBuckets};
use arvak_chem::term::Term;
use clap::ValueEnum;
use num_complex::Complex64;

/// Modes in the [`Model::Chain`] model.
pub const CHAIN_LENGTH: usize = 6;

/// Mixing angle of the [`Model::H2`] trial state.
pub const H2_MIXING_ANGLE: f64 = 0.112;

/// A built-in Hamiltonian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Model {
    /// One electron hopping between two orbitals.
    Dimer,
    /// Two electrons in four spin orbitals, shaped like minimal-basis H₂.
    H2,
    /// One electron spread over a chain with density-dressed hopping.
    Chain,
}

impl Model {
    /// All built-in models.
    pub const ALL: [Model; 3] = [Model::Dimer, Model::H2, Model::Chain];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Model::Dimer => "Hopping dimer",
            Model::H2 => "H₂ (model, 4 spin orbitals)",
            Model::Chain => "Tight-binding chain",
        }
    }

    /// Build the encoded Hamiltonian with its trial state.
    pub fn build(self) -> ChemResult<EncodedHamiltonian> {
        match self {
            Model::Dimer => dimer(),
            Model::H2 => h2(H2_MIXING_ANGLE),
            Model::Chain => chain(CHAIN_LENGTH),
        }
    }
}

fn entry(amplitude: f64, occupied: impl IntoIterator<Item = usize>) -> StateEntry {
    StateEntry::new(Complex64::new(amplitude, 0.0), occupied)
}

/// Two orbitals with on-site energies, coupled by hopping, in the bonding state.
pub fn dimer() -> ChemResult<EncodedHamiltonian> {
    let terms: TermBuckets = [
        Term::diagonal(0, -0.25),
        Term::diagonal(1, 0.25),
        Term::off_diagonal_pair(0, 1, -1.0),
    ]
    .into_iter()
    .collect();
    let state = InputState::from_entries(vec![
        entry(FRAC_1_SQRT_2, [0]),
        entry(FRAC_1_SQRT_2, [1]),
    ]);
    EncodedHamiltonian::new(2, terms, state, -0.5)
}

/// Minimal-basis H₂ without its `ZZ` couplings.
///
/// The trial state is `cos θ |1100⟩ + sin θ |0011⟩`, which the double
/// excitation term connects.
pub fn h2(theta: f64) -> ChemResult<EncodedHamiltonian> {
    let terms: TermBuckets = [
        Term::diagonal(0, 0.1712),
        Term::diagonal(1, 0.1712),
        Term::diagonal(2, -0.2228),
        Term::diagonal(3, -0.2228),
        Term::quad_index([0, 1, 2, 3], [0.3624; 4]),
    ]
    .into_iter()
    .collect();
    let state = InputState::from_entries(vec![
        entry(theta.cos(), [0, 1]),
        entry(theta.sin(), [2, 3]),
    ]);
    EncodedHamiltonian::new(4, terms, state, -0.0988)
}

/// Open chain of `length` modes with nearest-neighbour hopping and
/// next-nearest hopping dressed by the middle site.
pub fn chain(length: usize) -> ChemResult<EncodedHamiltonian> {
    let mut terms = TermBuckets::default();
    for i in 0..length.saturating_sub(1) {
        terms.push(Term::off_diagonal_pair(i, i + 1, -1.0));
    }
    for i in 0..length.saturating_sub(2) {
        terms.push(Term::triple_index([i, i + 1, i + 2], [0.1, -0.05]));
    }

    let amplitude = 1.0 / (length as f64).sqrt();
    let state = InputState::from_entries((0..length).map(|i| entry(amplitude, [i])).collect());
    EncodedHamiltonian::new(length, terms, state, 0.0)
}
