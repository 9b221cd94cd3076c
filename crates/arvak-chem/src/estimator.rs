//! Sampled expectation values of individual terms.
//!
//! A term's expectation is a weighted sum of mean parities:
//!
//!   ⟨H_k⟩ ≈ Σ_b w_b · mean(parity_b)
//!
//! Each parity is a ±1 variable, so the plug-in variance of its mean is
//! `(1 − mean²) / n` and the term variance is `Σ_b w_b² (1 − mean_b²) / n`.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use crate::backend::{BackendError, ExecutionBackend, RegisterLease};
use crate::error::{ChemError, ChemResult};
use crate::instruction::MeasurementInstruction;
use crate::state::StatePreparation;

/// Running tally of ±1 outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Number of recorded trials.
    pub trials: u64,
    /// Sum of recorded parities.
    pub sum: i64,
}

impl SampleStats {
    /// Tally of a single parity outcome.
    pub fn from_parity(parity: i8) -> Self {
        Self {
            trials: 1,
            sum: i64::from(parity),
        }
    }

    /// Combine two tallies. Associative and commutative.
    #[must_use]
    pub fn merge(self, other: SampleStats) -> SampleStats {
        SampleStats {
            trials: self.trials + other.trials,
            sum: self.sum + other.sum,
        }
    }

    /// Mean parity, or 0 with no trials.
    pub fn mean(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.sum as f64 / self.trials as f64
        }
    }

    /// Plug-in variance of the mean, `(1 − mean²) / trials`.
    pub fn variance_of_mean(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            (1.0 - self.mean().powi(2)).max(0.0) / self.trials as f64
        }
    }
}

/// Estimated expectation value of one catalog term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Catalog index of the term.
    pub term_index: usize,
    /// Weighted sum of mean parities.
    pub expectation: f64,
    /// Variance of `expectation`.
    pub variance: f64,
    /// Trials actually executed for this term.
    pub trials: u64,
}

impl EstimationResult {
    /// Result for a term whose instructions were all skipped.
    pub fn zero(term_index: usize) -> Self {
        Self {
            term_index,
            expectation: 0.0,
            variance: 0.0,
            trials: 0,
        }
    }
}

/// Default magnitude below which an instruction weight is not sampled.
pub const DEFAULT_WEIGHT_THRESHOLD: f64 = 1e-10;

/// Estimates term expectations by sampling on an [`ExecutionBackend`].
///
/// Trials across every concurrent call share one slot budget, sized to
/// [`ExecutionBackend::slots`].
pub struct TermExpectationEstimator {
    backend: Arc<dyn ExecutionBackend>,
    slots: Semaphore,
    weight_threshold: f64,
}

impl TermExpectationEstimator {
    /// Create an estimator over `backend`.
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        let slots = Semaphore::new(backend.slots().max(1));
        Self {
            backend,
            slots,
            weight_threshold: DEFAULT_WEIGHT_THRESHOLD,
        }
    }

    /// Skip instructions with `|weight| < threshold`.
    #[must_use]
    pub fn with_weight_threshold(mut self, threshold: f64) -> Self {
        self.weight_threshold = threshold;
        self
    }

    /// The backend trials run on.
    pub fn backend(&self) -> &Arc<dyn ExecutionBackend> {
        &self.backend
    }

    /// Estimate the expectation of one term from its instructions.
    ///
    /// # Errors
    ///
    /// [`ChemError::InvalidShotCount`] when `n_samples` is zero and
    /// [`ChemError::Backend`] when any trial fails.
    #[instrument(skip_all, fields(term = term_index, instructions = instructions.len()))]
    pub async fn estimate(
        &self,
        term_index: usize,
        preparation: &StatePreparation,
        instructions: &[MeasurementInstruction],
        n_samples: u32,
    ) -> ChemResult<EstimationResult> {
        if n_samples == 0 {
            return Err(ChemError::InvalidShotCount(0));
        }

        let active: Vec<&MeasurementInstruction> = instructions
            .iter()
            .filter(|i| i.weight.abs() >= self.weight_threshold && i.weight != 0.0)
            .collect();
        if active.is_empty() {
            debug!("all weights below threshold, skipping sampling");
            return Ok(EstimationResult::zero(term_index));
        }

        let stats = try_join_all(active.iter().map(|instruction| {
            self.sample_instruction(preparation, instruction, n_samples)
                .boxed()
        }))
        .await?;

        let mut result = EstimationResult::zero(term_index);
        for (instruction, s) in active.iter().zip(&stats) {
            result.expectation += instruction.weight * s.mean();
            result.variance += instruction.weight.powi(2) * s.variance_of_mean();
            result.trials += s.trials;
        }

        debug!(
            expectation = result.expectation,
            variance = result.variance,
            trials = result.trials,
            "term estimated"
        );
        Ok(result)
    }

    /// Run `n_samples` single-shot trials of one instruction.
    async fn sample_instruction(
        &self,
        preparation: &StatePreparation,
        instruction: &MeasurementInstruction,
        n_samples: u32,
    ) -> ChemResult<SampleStats> {
        let mut stats = SampleStats::default();
        for _ in 0..n_samples {
            let mut lease = RegisterLease::acquire(
                self.backend.as_ref(),
                &self.slots,
                preparation.num_qubits(),
            )
            .await?;
            let outcomes = lease.run(preparation, &instruction.basis).await?;
            lease.finish()?;

            let parity = instruction.basis.parity(&outcomes).ok_or_else(|| {
                BackendError::Execution(format!(
                    "{} returned {} outcomes for a {}-qubit basis",
                    self.backend.name(),
                    outcomes.len(),
                    instruction.basis.num_qubits()
                ))
            })?;
            stats = stats.merge(SampleStats::from_parity(parity));
        }
        Ok(stats)
    }
}

impl std::fmt::Debug for TermExpectationEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermExpectationEstimator")
            .field("backend", &self.backend.name())
            .field("slots", &self.slots.available_permits())
            .field("weight_threshold", &self.weight_threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_and_mean() {
        let s = [1, 1, -1, 1]
            .into_iter()
            .map(SampleStats::from_parity)
            .fold(SampleStats::default(), SampleStats::merge);
        assert_eq!(s.trials, 4);
        assert_eq!(s.sum, 2);
        assert_eq!(s.mean(), 0.5);
        assert_eq!(s.variance_of_mean(), 0.75 / 4.0);
    }

    #[test]
    fn test_merge_is_associative() {
        let a = SampleStats { trials: 3, sum: 1 };
        let b = SampleStats { trials: 5, sum: -5 };
        let c = SampleStats { trials: 2, sum: 2 };
        assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(SampleStats::default()), a);
    }

    #[test]
    fn test_empty_stats() {
        let s = SampleStats::default();
        assert_eq!(s.mean(), 0.0);
        assert_eq!(s.variance_of_mean(), 0.0);
    }

    #[test]
    fn test_deterministic_outcomes_have_zero_variance() {
        let s = SampleStats { trials: 10, sum: -10 };
        assert_eq!(s.mean(), -1.0);
        assert_eq!(s.variance_of_mean(), 0.0);
    }
}
