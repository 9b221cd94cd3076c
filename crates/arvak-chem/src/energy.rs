//! Energy aggregation and the end-to-end estimation pipeline.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::backend::ExecutionBackend;
use crate::config::EstimatorConfig;
use crate::error::{ChemError, ChemResult};
use crate::estimator::{EstimationResult, TermExpectationEstimator};
use crate::hamiltonian::EncodedHamiltonian;
use crate::instruction::expand_term;
use crate::state::TrialStatePreparer;

/// Sums term expectations into an energy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyAggregator;

impl EnergyAggregator {
    /// `offset + Σ expectation`, summed in slice order.
    pub fn aggregate(results: &[EstimationResult], offset: f64) -> f64 {
        results.iter().fold(offset, |acc, r| acc + r.expectation)
    }

    /// `Σ variance`; terms are sampled independently.
    pub fn variance(results: &[EstimationResult]) -> f64 {
        results.iter().map(|r| r.variance).sum()
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    /// Estimated energy, offset included.
    pub energy: f64,
    /// Variance of `energy`.
    pub variance: f64,
    /// Per-term results in catalog order.
    pub terms: Vec<EstimationResult>,
    /// Trials executed over all terms.
    pub total_trials: u64,
}

impl EnergyEstimate {
    /// Standard error of `energy`.
    pub fn std_error(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Runs the whole estimation for an [`EncodedHamiltonian`].
///
/// Every call is independent. Terms are estimated concurrently up to
/// `max_concurrent_terms` and the backend's slot count, and results are
/// kept in catalog order.
#[derive(Debug)]
pub struct EnergyEstimator {
    terms: TermExpectationEstimator,
    config: EstimatorConfig,
}

impl EnergyEstimator {
    /// Create an estimator.
    ///
    /// # Errors
    ///
    /// [`ChemError::Config`] if `config` fails validation.
    pub fn new(backend: Arc<dyn ExecutionBackend>, config: EstimatorConfig) -> ChemResult<Self> {
        config.validate()?;
        let terms =
            TermExpectationEstimator::new(backend).with_weight_threshold(config.weight_threshold);
        Ok(Self { terms, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// The backend trials run on.
    pub fn backend(&self) -> &Arc<dyn ExecutionBackend> {
        self.terms.backend()
    }

    /// Estimate the energy with the configured default sample count.
    pub async fn estimate_default(&self, hamiltonian: &EncodedHamiltonian) -> ChemResult<EnergyEstimate> {
        self.estimate(hamiltonian, self.config.samples).await
    }

    /// Estimate the energy of `hamiltonian` with `n_samples` trials per
    /// measurement instruction.
    ///
    /// # Errors
    ///
    /// [`ChemError::InvalidShotCount`] for zero samples, validation errors
    /// before any trial runs, and [`ChemError::Backend`] for trial failures.
    #[instrument(skip_all, fields(
        qubits = hamiltonian.num_qubits(),
        terms = hamiltonian.num_terms(),
        n_samples = n_samples
    ))]
    pub async fn estimate(
        &self,
        hamiltonian: &EncodedHamiltonian,
        n_samples: u32,
    ) -> ChemResult<EnergyEstimate> {
        if n_samples == 0 {
            return Err(ChemError::InvalidShotCount(0));
        }

        let preparation =
            TrialStatePreparer::prepare(hamiltonian.input_state(), hamiltonian.num_qubits())?;
        let expanded = hamiltonian
            .catalog()
            .iter()
            .map(|term| expand_term(hamiltonian.num_qubits(), term))
            .collect::<ChemResult<Vec<_>>>()?;

        let concurrency = self
            .config
            .max_concurrent_terms
            .min(self.backend().slots())
            .max(1);
        debug!(
            instructions = expanded.iter().map(Vec::len).sum::<usize>(),
            concurrency, "expanded terms"
        );

        // Boxed before streaming; the pipeline future must stay `Send`.
        let per_term: Vec<BoxFuture<'_, ChemResult<EstimationResult>>> = expanded
            .iter()
            .enumerate()
            .map(|(index, instructions)| {
                self.terms
                    .estimate(index, &preparation, instructions, n_samples)
                    .boxed()
            })
            .collect();
        let results: Vec<EstimationResult> = stream::iter(per_term)
            .buffered(concurrency)
            .try_collect()
            .await?;

        let estimate = EnergyEstimate {
            energy: EnergyAggregator::aggregate(&results, hamiltonian.energy_offset()),
            variance: EnergyAggregator::variance(&results),
            total_trials: results.iter().map(|r| r.trials).sum(),
            terms: results,
        };

        info!(
            energy = estimate.energy,
            std_error = estimate.std_error(),
            trials = estimate.total_trials,
            "energy estimated"
        );
        Ok(estimate)
    }
}
