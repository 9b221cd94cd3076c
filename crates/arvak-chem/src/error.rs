//! Error types for the chemistry crate.

use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;

/// Errors produced while validating or estimating an encoded Hamiltonian.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChemError {
    /// The encoded Hamiltonian violates one of its invariants.
    #[error("Invalid Hamiltonian: {0}")]
    InvalidHamiltonian(String),

    /// The number of samples per measurement must be positive.
    #[error("n_samples must be at least 1, got {0}")]
    InvalidShotCount(i64),

    /// A term cannot be expanded into measurement instructions.
    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    /// The execution backend failed while running a trial.
    #[error("Execution backend error: {0}")]
    Backend(#[from] BackendError),

    /// Estimator configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for chemistry operations.
pub type ChemResult<T> = Result<T, ChemError>;
