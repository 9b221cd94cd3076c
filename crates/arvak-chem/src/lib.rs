//! `arvak-chem`: sampled energy estimation for Jordan–Wigner Hamiltonians.
//!
//! Takes a fermionic Hamiltonian that has already been encoded into
//! qubit-measurable terms, together with a trial state, and estimates
//!
//!   E = offset + Σ_k ⟨ψ| H_k |ψ⟩
//!
//! by measuring weighted Pauli strings on an [`ExecutionBackend`]:
//!
//! - [`TermCatalog`] enumerates the four term buckets in a stable order
//! - [`MeasurementBasisBuilder`] and [`CoefficientExpander`] turn each term
//!   into aligned `(basis, weight)` instructions
//! - [`TrialStatePreparer`] describes the state every trial loads
//! - [`TermExpectationEstimator`] samples the instructions
//! - [`EnergyAggregator`] sums the term expectations
//!
//! [`EnergyEstimator`] wires these together.
//!
//! # Quick start
//!
//! ```rust
//! use arvak_chem::instruction::expand_term;
//! use arvak_chem::term::Term;
//!
//! // Hopping between modes 0 and 2 of a 3-mode system
//! let instructions = expand_term(3, &Term::off_diagonal_pair(0, 2, 1.0)).unwrap();
//! let bases: Vec<String> = instructions.iter().map(|i| i.basis.to_string()).collect();
//! assert_eq!(bases, ["XZX", "YZY"]);
//! assert!(instructions.iter().all(|i| i.weight == 0.25));
//! ```

pub mod backend;
pub mod basis;
pub mod catalog;
pub mod coefficients;
pub mod config;
pub mod energy;
pub mod error;
pub mod estimator;
pub mod hamiltonian;
pub mod instruction;
pub mod pauli;
pub mod raw;
pub mod state;
pub mod term;

pub use backend::{
    BackendError, BackendResult, ExecutionBackend, QubitRegister, RegisterId, RegisterLease,
};
pub use basis::MeasurementBasisBuilder;
pub use catalog::TermCatalog;
pub use coefficients::CoefficientExpander;
pub use config::{ConfigError, EstimatorConfig};
pub use energy::{EnergyAggregator, EnergyEstimate, EnergyEstimator};
pub use error::{ChemError, ChemResult};
pub use estimator::{EstimationResult, SampleStats, TermExpectationEstimator};
pub use hamiltonian::{EncodedHamiltonian, InputState, StateEntry, TermBuckets};
pub use instruction::{MeasurementInstruction, expand_term};
pub use pauli::{PauliOp, PauliString};
pub use raw::{RawHamiltonian, estimate_energy_raw};
pub use state::{StatePreparation, TrialStatePreparer};
pub use term::{Term, TermKind};
