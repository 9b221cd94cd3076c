//! Loading Hamiltonians from JSON files.
//!
//! Two layouts are accepted. A JSON object is the structured form
//! (`num_qubits`, `terms`, `input_state`, `energy_offset`); a top-level array
//! is the raw tuple form understood by [`EncodedHamiltonian::from_raw`].

use std::path::Path;

use anyhow::{Context, Result, bail};
use arvak_chem::hamiltonian::EncodedHamiltonian;
use arvak_chem::raw::RawHamiltonian;
use serde_json::Value;

/// Layout of a Hamiltonian file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Structured,
    Raw,
}

/// Parse a Hamiltonian from JSON text.
pub fn parse_hamiltonian(json: &str) -> Result<(InputFormat, EncodedHamiltonian)> {
    let value: Value = serde_json::from_str(json).context("input is not valid JSON")?;
    match value {
        Value::Object(_) => {
            let h = serde_json::from_value(value).context("invalid structured Hamiltonian")?;
            Ok((InputFormat::Structured, h))
        }
        Value::Array(_) => {
            let raw: RawHamiltonian =
                serde_json::from_value(value).context("invalid raw Hamiltonian tuple")?;
            let h = EncodedHamiltonian::from_raw(&raw)?;
            Ok((InputFormat::Raw, h))
        }
        other => bail!("expected a JSON object or array, found {other}"),
    }
}

/// Read and parse a Hamiltonian file.
pub fn load_hamiltonian(path: &Path) -> Result<(InputFormat, EncodedHamiltonian)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_hamiltonian(&json).with_context(|| format!("failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_array() {
        let json = "[2, [[[[0], [0.5]]], [], [], []], [[[1.0, 0.0], [0]]], 0.0]";
        let (format, h) = parse_hamiltonian(json).unwrap();
        assert_eq!(format, InputFormat::Raw);
        assert_eq!(h.num_qubits(), 2);
        assert_eq!(h.num_terms(), 1);
    }

    #[test]
    fn test_scalar_rejected() {
        assert!(parse_hamiltonian("42").is_err());
    }

    #[test]
    fn test_invalid_raw_state_rejected() {
        // Unnormalized state.
        let json = "[1, [[], [], [], []], [[[0.5, 0.0], []]], 0.0]";
        assert!(parse_hamiltonian(json).is_err());
    }
}
