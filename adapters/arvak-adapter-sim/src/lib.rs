//! Arvak Local Statevector Simulator
//!
//! An [`ExecutionBackend`](arvak_chem::backend::ExecutionBackend) that runs
//! every trial on an in-memory statevector. Each leased register is its own
//! vector of `2^n` amplitudes, so registers are limited to ~20-25 qubits.
//!
//! A trial loads the sparse [`StatePreparation`](arvak_chem::state::StatePreparation),
//! rotates each qubit into the requested Pauli basis (`H` for X, `S†H` for Y)
//! and samples one computational-basis outcome.
//!
//! # Performance
//!
//! | Qubits | Memory | Trial Speed |
//! |--------|--------|-------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 25 | ~512 MB | Slow |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use arvak_adapter_sim::SimulatorBackend;
//! use arvak_chem::{EncodedHamiltonian, EnergyEstimator, EstimatorConfig, InputState, Term};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(SimulatorBackend::new().with_seed(7));
//!
//!     // One electron hopping between two orbitals, in the bonding state.
//!     let amp = std::f64::consts::FRAC_1_SQRT_2;
//!     let h = EncodedHamiltonian::new(
//!         2,
//!         std::iter::once(Term::off_diagonal_pair(0, 1, -1.0)).collect(),
//!         InputState::from_entries(vec![
//!             arvak_chem::StateEntry::new(amp.into(), [0]),
//!             arvak_chem::StateEntry::new(amp.into(), [1]),
//!         ]),
//!         0.0,
//!     )?;
//!
//!     let exact = backend.exact_energy(&h)?;
//!     let estimator = EnergyEstimator::new(backend, EstimatorConfig::default())?;
//!     let estimate = estimator.estimate(&h, 2000).await?;
//!     println!("E = {:.4} ± {:.4} (exact {exact:.4})", estimate.energy, estimate.std_error());
//!
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
pub use statevector::Statevector;
