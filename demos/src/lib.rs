//! Arvak Demo Suite
//!
//! Runs the energy estimation pipeline end to end on the local simulator:
//!
//! - **Model Hamiltonians**: small Jordan–Wigner encoded systems in [`models`]
//! - **File input**: structured or raw JSON Hamiltonians via [`input`]
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use arvak_adapter_sim::SimulatorBackend;
//! use arvak_chem::{EnergyEstimator, EstimatorConfig};
//! use arvak_demos::models::Model;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let h = Model::Dimer.build()?;
//! let backend = Arc::new(SimulatorBackend::new().with_seed(1));
//! let estimator = EnergyEstimator::new(backend, EstimatorConfig::default())?;
//! let estimate = estimator.estimate(&h, 1000).await?;
//! println!("{:.4}", estimate.energy);
//! # Ok(())
//! # }
//! ```

pub mod input;
pub mod models;

use console::style;

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// How an estimate compares with the exact energy.
#[derive(Debug, Clone, PartialEq)]
pub enum Agreement {
    /// Within three standard errors.
    Within { deviation: f64 },
    /// Outside, measured in standard errors.
    Sigmas(f64),
    /// Zero spread yet off the exact value.
    Spreadless { deviation: f64 },
}

impl Agreement {
    /// Compare `energy ± std_error` with `exact`.
    pub fn assess(energy: f64, std_error: f64, exact: f64) -> Self {
        let deviation = (energy - exact).abs();
        if deviation <= (3.0 * std_error).max(1e-9) {
            Agreement::Within { deviation }
        } else if std_error > 0.0 {
            Agreement::Sigmas(deviation / std_error)
        } else {
            Agreement::Spreadless { deviation }
        }
    }
}
