//! Execution backend contract.
//!
//! The estimator never touches amplitudes itself. It leases a register from
//! an [`ExecutionBackend`], asks it to load a [`StatePreparation`] and
//! measure one Pauli basis, then hands the register back.
//!
//! # Contract
//!
//! - `slots()` MUST be synchronous and report how many registers the backend
//!   can hold at once. One estimator never leases more than that.
//! - `allocate()` MUST return a register in `|0…0⟩`. A backend shared by
//!   several estimators SHOULD wait for a slot to free up rather than fail
//!   with [`BackendError::NoFreeSlots`].
//! - `prepare_and_measure()` MUST load the preparation from the all-zero
//!   state, rotate into the basis and return one bit per qubit.
//! - `reset()` and `release()` MUST be synchronous: they run from
//!   [`RegisterLease`]'s `Drop`, which also fires when a trial future is
//!   cancelled mid-flight.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::warn;

use crate::pauli::PauliString;
use crate::state::StatePreparation;

/// Transport-level failures reported by an execution backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// Every register slot is in use.
    #[error("No free register slots")]
    NoFreeSlots,

    /// The register is not (or no longer) owned by this backend.
    #[error("Unknown register: {0}")]
    UnknownRegister(RegisterId),

    /// The backend cannot hold a register this wide.
    #[error("Register too large: {requested} qubits requested, max {max}")]
    RegisterTooLarge {
        /// Requested width.
        requested: usize,
        /// Backend limit.
        max: usize,
    },

    /// Running the trial failed.
    #[error("Execution failed: {0}")]
    Execution(String),

    /// The trial was cancelled before it completed.
    #[error("Trial cancelled")]
    Cancelled,
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend-assigned register handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegisterId(pub u64);

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg-{}", self.0)
    }
}

/// An allocated qubit register.
///
/// Deliberately not `Clone`: exactly one owner may reset or release it.
#[derive(Debug, PartialEq, Eq)]
pub struct QubitRegister {
    id: RegisterId,
    num_qubits: usize,
}

impl QubitRegister {
    /// Create a handle. Only backends should call this.
    pub fn new(id: RegisterId, num_qubits: usize) -> Self {
        Self { id, num_qubits }
    }

    /// Backend-assigned id.
    pub fn id(&self) -> RegisterId {
        self.id
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}

/// Executes single-shot trials on leased qubit registers.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Number of registers the backend can hold concurrently.
    fn slots(&self) -> usize;

    /// Allocate a register of `num_qubits` qubits in `|0…0⟩`, waiting for a
    /// free slot if every slot is leased.
    async fn allocate(&self, num_qubits: usize) -> BackendResult<QubitRegister>;

    /// Load `preparation`, rotate into `basis`, and measure every qubit.
    ///
    /// `outcomes[q]` is `true` when qubit `q` reads `1`.
    async fn prepare_and_measure(
        &self,
        register: &mut QubitRegister,
        preparation: &StatePreparation,
        basis: &PauliString,
    ) -> BackendResult<Vec<bool>>;

    /// Return every qubit of `register` to `|0⟩`.
    fn reset(&self, register: &mut QubitRegister) -> BackendResult<()>;

    /// Hand `register` back to the backend.
    fn release(&self, register: QubitRegister) -> BackendResult<()>;
}

/// A register held for one trial.
///
/// Dropping the lease resets and releases the register and frees its slot,
/// whether the trial finished, failed or was cancelled.
pub struct RegisterLease<'a> {
    backend: &'a dyn ExecutionBackend,
    register: Option<QubitRegister>,
    _permit: SemaphorePermit<'a>,
}

impl<'a> RegisterLease<'a> {
    /// Wait for a free slot, then allocate a register.
    pub async fn acquire(
        backend: &'a dyn ExecutionBackend,
        slots: &'a Semaphore,
        num_qubits: usize,
    ) -> BackendResult<Self> {
        let permit = slots.acquire().await.map_err(|_| BackendError::Cancelled)?;
        let register = backend.allocate(num_qubits).await?;
        Ok(Self {
            backend,
            register: Some(register),
            _permit: permit,
        })
    }

    /// The leased register.
    pub fn register_mut(&mut self) -> BackendResult<&mut QubitRegister> {
        self.register.as_mut().ok_or(BackendError::Cancelled)
    }

    /// Run one prepare-and-measure trial on the leased register.
    pub async fn run(
        &mut self,
        preparation: &StatePreparation,
        basis: &PauliString,
    ) -> BackendResult<Vec<bool>> {
        let backend = self.backend;
        let register = self.register_mut()?;
        backend.prepare_and_measure(register, preparation, basis).await
    }

    /// Reset and release now, reporting failures.
    pub fn finish(mut self) -> BackendResult<()> {
        match self.register.take() {
            Some(register) => reset_and_release(self.backend, register),
            None => Ok(()),
        }
    }
}

fn reset_and_release(backend: &dyn ExecutionBackend, mut register: QubitRegister) -> BackendResult<()> {
    let reset = backend.reset(&mut register);
    let released = backend.release(register);
    reset.and(released)
}

impl Drop for RegisterLease<'_> {
    fn drop(&mut self) {
        if let Some(register) = self.register.take() {
            let id = register.id();
            if let Err(e) = reset_and_release(self.backend, register) {
                warn!("failed to return register {id} to {}: {e}", self.backend.name());
            }
        }
    }
}

impl fmt::Debug for RegisterLease<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterLease")
            .field("backend", &self.backend.name())
            .field("register", &self.register)
            .finish()
    }
}
