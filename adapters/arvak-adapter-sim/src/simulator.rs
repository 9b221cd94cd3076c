//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, instrument};

use arvak_chem::backend::{
    BackendError, BackendResult, ExecutionBackend, QubitRegister, RegisterId,
};
use arvak_chem::error::ChemResult;
use arvak_chem::hamiltonian::EncodedHamiltonian;
use arvak_chem::instruction::expand_term;
use arvak_chem::pauli::PauliString;
use arvak_chem::state::{StatePreparation, TrialStatePreparer};

use crate::statevector::Statevector;

/// Default register width limit.
const DEFAULT_MAX_QUBITS: usize = 20;

/// Default number of concurrently held registers.
const DEFAULT_SLOTS: usize = 8;

/// A live register and the slot it occupies.
struct Slot {
    state: Statevector,
    _permit: OwnedSemaphorePermit,
}

/// Local simulator backend.
///
/// Every leased register is an independent statevector. Measurement
/// outcomes are drawn from one shared RNG, seedable for reproducible runs.
/// `allocate` waits while all slots are leased, so one backend can serve
/// several estimators at once.
pub struct SimulatorBackend {
    name: String,
    /// Live registers.
    registers: Mutex<FxHashMap<RegisterId, Slot>>,
    next_id: AtomicU64,
    rng: Mutex<StdRng>,
    /// Maximum number of qubits supported.
    max_qubits: usize,
    slots: usize,
    admission: Arc<Semaphore>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self {
            name: "simulator".to_string(),
            registers: Mutex::new(FxHashMap::default()),
            next_id: AtomicU64::new(0),
            rng: Mutex::new(StdRng::from_entropy()),
            max_qubits: DEFAULT_MAX_QUBITS,
            slots: DEFAULT_SLOTS,
            admission: Arc::new(Semaphore::new(DEFAULT_SLOTS)),
        }
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: usize) -> Self {
        Self {
            max_qubits,
            ..Self::new()
        }
    }

    /// Hold at most `slots` registers at once.
    #[must_use]
    pub fn with_slots(mut self, slots: usize) -> Self {
        self.slots = slots.max(1);
        self.admission = Arc::new(Semaphore::new(self.slots));
        self
    }

    /// Draw measurement outcomes from a seeded RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Maximum register width.
    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Number of registers currently allocated.
    pub fn live_registers(&self) -> usize {
        self.registers().len()
    }

    fn registers(&self) -> MutexGuard<'_, FxHashMap<RegisterId, Slot>> {
        self.registers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_width(&self, num_qubits: usize) -> BackendResult<()> {
        if num_qubits > self.max_qubits {
            return Err(BackendError::RegisterTooLarge {
                requested: num_qubits,
                max: self.max_qubits,
            });
        }
        Ok(())
    }

    /// Noise-free ⟨ψ|P|ψ⟩ for the prepared state.
    pub fn exact_expectation(
        &self,
        preparation: &StatePreparation,
        basis: &PauliString,
    ) -> BackendResult<f64> {
        self.check_width(preparation.num_qubits())?;
        let mut sv = Statevector::new(preparation.num_qubits());
        if !sv.load(preparation) {
            return Err(BackendError::Execution(
                "preparation does not fit its own register".to_string(),
            ));
        }
        sv.expectation(basis).ok_or_else(|| {
            BackendError::Execution(format!(
                "basis spans {} qubits, state has {}",
                basis.num_qubits(),
                preparation.num_qubits()
            ))
        })
    }

    /// Noise-free energy of `hamiltonian`, for comparison with sampled estimates.
    pub fn exact_energy(&self, hamiltonian: &EncodedHamiltonian) -> ChemResult<f64> {
        let n = hamiltonian.num_qubits();
        self.check_width(n)?;

        let preparation = TrialStatePreparer::prepare(hamiltonian.input_state(), n)?;
        let mut energy = hamiltonian.energy_offset();
        for term in hamiltonian.catalog().iter() {
            for instruction in expand_term(n, term)? {
                energy +=
                    instruction.weight * self.exact_expectation(&preparation, &instruction.basis)?;
            }
        }
        Ok(energy)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionBackend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn slots(&self) -> usize {
        self.slots
    }

    #[instrument(level = "trace", skip(self))]
    async fn allocate(&self, num_qubits: usize) -> BackendResult<QubitRegister> {
        self.check_width(num_qubits)?;

        let permit = self
            .admission
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| BackendError::NoFreeSlots)?;
        let id = RegisterId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registers().insert(
            id,
            Slot {
                state: Statevector::new(num_qubits),
                _permit: permit,
            },
        );
        Ok(QubitRegister::new(id, num_qubits))
    }

    #[instrument(level = "trace", skip(self, register, preparation, basis), fields(register = %register.id()))]
    async fn prepare_and_measure(
        &self,
        register: &mut QubitRegister,
        preparation: &StatePreparation,
        basis: &PauliString,
    ) -> BackendResult<Vec<bool>> {
        if basis.num_qubits() != register.num_qubits() {
            return Err(BackendError::Execution(format!(
                "basis spans {} qubits, register has {}",
                basis.num_qubits(),
                register.num_qubits()
            )));
        }

        let mut registers = self.registers();
        let sv = &mut registers
            .get_mut(&register.id())
            .ok_or(BackendError::UnknownRegister(register.id()))?
            .state;
        if !sv.is_zero_state() {
            return Err(BackendError::Execution(format!(
                "register {} was not reset before preparation",
                register.id()
            )));
        }
        if !sv.load(preparation) {
            return Err(BackendError::Execution(format!(
                "{}-qubit preparation does not fit register {} ({} qubits)",
                preparation.num_qubits(),
                register.id(),
                register.num_qubits()
            )));
        }

        sv.rotate_into(basis);
        let outcomes = sv.measure_all(&mut *self.rng());
        debug!(basis = %basis, "trial measured");
        Ok(outcomes)
    }

    fn reset(&self, register: &mut QubitRegister) -> BackendResult<()> {
        let mut registers = self.registers();
        let slot = registers
            .get_mut(&register.id())
            .ok_or(BackendError::UnknownRegister(register.id()))?;
        slot.state.reset_all(&mut *self.rng());
        Ok(())
    }

    fn release(&self, register: QubitRegister) -> BackendResult<()> {
        self.registers()
            .remove(&register.id())
            .map(|_| ())
            .ok_or(BackendError::UnknownRegister(register.id()))
    }
}
