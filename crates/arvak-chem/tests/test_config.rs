//! Tests for loading estimator configuration from disk.


use std::io::Write;
use std::sync::Arc;

use arvak_chem::config::{ConfigError, EstimatorConfig};
use arvak_chem::energy::EnergyEstimator;
use arvak_chem::error::ChemError;

use stub_backend::{StubBackend, StubMode};

#[test]
fn from_file_reads_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_concurrent_terms: 2").unwrap();
    writeln!(file, "weight_threshold: 1.0e-8").unwrap();
    writeln!(file, "seed: 1234").unwrap();

    let config = EstimatorConfig::from_file(file.path()).unwrap();
    assert_eq!(config.max_concurrent_terms, 2);
    assert_eq!(config.weight_threshold, 1.0e-8);
    assert_eq!(config.seed, Some(1234));
    assert_eq!(config.samples, 1000);
}

#[test]
fn from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EstimatorConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn from_file_malformed_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_concurrent_terms: [not, a, number]").unwrap();

    let err = EstimatorConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn estimator_rejects_invalid_config() {
    let backend = Arc::new(StubBackend::new(StubMode::Echo));
    let config = EstimatorConfig {
        samples: 0,
        ..EstimatorConfig::default()
    };

    let err = EnergyEstimator::new(backend, config).unwrap_err();
    assert!(matches!(err, ChemError::Config(ConfigError::Invalid(_))));
}

#[tokio::test]
async fn estimate_default_uses_configured_samples() {
    use arvak_chem::hamiltonian::{EncodedHamiltonian, InputState};
    use arvak_chem::term::Term;

    let backend = Arc::new(StubBackend::new(StubMode::Echo));
    let config = EstimatorConfig {
        samples: 12,
        ..EstimatorConfig::default()
    };
    let est = EnergyEstimator::new(backend, config).unwrap();
    let h = EncodedHamiltonian::new(
        1,
        std::iter::once(Term::diagonal(0, 1.0)).collect(),
        InputState::basis([]),
        0.0,
    )
    .unwrap();

    let estimate = est.estimate_default(&h).await.unwrap();
    assert_eq!(estimate.total_trials, 12);
}
