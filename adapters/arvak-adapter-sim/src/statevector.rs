//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;

use arvak_chem::pauli::{PauliOp, PauliString};
use arvak_chem::state::StatePreparation;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state (bit `q` ↔ qubit `q`).
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// True if the register is exactly |0...0⟩.
    pub fn is_zero_state(&self) -> bool {
        self.amplitudes[0] == ONE && self.amplitudes[1..].iter().all(|a| *a == ZERO)
    }

    /// Overwrite the state with a sparse preparation.
    ///
    /// Returns `false` (leaving the state untouched) if the preparation does
    /// not fit this register.
    pub fn load(&mut self, preparation: &StatePreparation) -> bool {
        if preparation.num_qubits() != self.num_qubits {
            return false;
        }
        let mut amplitudes = vec![ZERO; self.amplitudes.len()];
        for &(index, amplitude) in preparation.amplitudes() {
            match usize::try_from(index).ok().and_then(|i| amplitudes.get_mut(i)) {
                Some(slot) => *slot = amplitude,
                None => return false,
            }
        }
        self.amplitudes = amplitudes;
        true
    }

    // =========================================================================
    // Gates
    // =========================================================================

    pub(crate) fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    pub(crate) fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    /// S† = diag(1, −i), applied exactly.
    pub(crate) fn apply_sdg(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                let a = self.amplitudes[i];
                self.amplitudes[i] = Complex64::new(a.im, -a.re);
            }
        }
    }

    /// Rotate every qubit so that measuring Z reads out `basis`.
    ///
    /// X is measured after H, Y after S†·H; I and Z need no rotation.
    pub fn rotate_into(&mut self, basis: &PauliString) {
        for (qubit, op) in basis.ops().iter().enumerate() {
            match op {
                PauliOp::X => self.apply_h(qubit),
                PauliOp::Y => {
                    self.apply_sdg(qubit);
                    self.apply_h(qubit);
                }
                PauliOp::I | PauliOp::Z => {}
            }
        }
    }

    // =========================================================================
    // Measurement and reset
    // =========================================================================

    /// Sample a measurement outcome.
    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        let total: f64 = self.amplitudes.iter().map(Complex64::norm_sqr).sum();
        let r: f64 = rng.r#gen::<f64>() * total;

        let mut cumulative = 0.0;
        let mut last_nonzero = 0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            if p > 0.0 {
                last_nonzero = i;
            }
            cumulative += p;
            if r < cumulative {
                return i;
            }
        }

        // Rounding left r just past the final cumulative sum.
        last_nonzero
    }

    /// Measure every qubit, collapsing the state.
    ///
    /// `outcomes[q]` is `true` when qubit `q` reads `1`.
    pub fn measure_all(&mut self, rng: &mut impl Rng) -> Vec<bool> {
        let outcome = self.sample(rng);
        self.amplitudes.fill(ZERO);
        self.amplitudes[outcome] = ONE;
        (0..self.num_qubits).map(|q| outcome >> q & 1 == 1).collect()
    }

    /// Projective reset of one qubit: measure it, then flip it back if it read `1`.
    pub fn reset(&mut self, qubit: usize, rng: &mut impl Rng) {
        let mask = 1 << qubit;
        let p_one: f64 = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();
        let total: f64 = self.amplitudes.iter().map(Complex64::norm_sqr).sum();
        if total <= 0.0 {
            *self = Self::new(self.num_qubits);
            return;
        }

        let read_one = rng.r#gen::<f64>() * total < p_one;
        let norm = (if read_one { p_one } else { total - p_one }).sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == read_one {
                *amp /= norm;
            } else {
                *amp = ZERO;
            }
        }
        if read_one {
            self.apply_x(qubit);
        }
    }

    /// Reset every qubit to |0⟩.
    pub fn reset_all(&mut self, rng: &mut impl Rng) {
        for qubit in 0..self.num_qubits {
            self.reset(qubit, rng);
        }
        // Only a global phase can remain.
        *self = Self::new(self.num_qubits);
    }

    /// Exact ⟨ψ|P|ψ⟩ for a Pauli string on this register.
    ///
    /// Returns `None` if the string does not span the register.
    pub fn expectation(&self, basis: &PauliString) -> Option<f64> {
        if basis.num_qubits() != self.num_qubits {
            return None;
        }

        let mut flip = 0usize;
        for (q, op) in basis.ops().iter().enumerate() {
            if matches!(op, PauliOp::X | PauliOp::Y) {
                flip |= 1 << q;
            }
        }

        let mut total = ZERO;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if *amp == ZERO {
                continue;
            }
            // P|i⟩ = phase · |i ^ flip⟩
            let mut phase = ONE;
            for (q, op) in basis.ops().iter().enumerate() {
                let bit = i >> q & 1 == 1;
                phase *= match (op, bit) {
                    (PauliOp::Y, false) => Complex64::new(0.0, 1.0),
                    (PauliOp::Y, true) => Complex64::new(0.0, -1.0),
                    (PauliOp::Z, true) => -ONE,
                    _ => ONE,
                };
            }
            total += self.amplitudes[i ^ flip].conj() * phase * amp;
        }
        Some(total.re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arvak_chem::hamiltonian::{InputState, StateEntry};
    use arvak_chem::state::TrialStatePreparer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn pauli(s: &str) -> PauliString {
        PauliString::from_ops(
            s.chars()
                .map(|c| match c {
                    'X' => PauliOp::X,
                    'Y' => PauliOp::Y,
                    'Z' => PauliOp::Z,
                    _ => PauliOp::I,
                })
                .collect(),
        )
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], ONE));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
        assert!(approx_eq(sv.amplitudes[2], ZERO));
        assert!(approx_eq(sv.amplitudes[3], ZERO));
        assert!(sv.is_zero_state());
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_sdg_is_exact() {
        let mut sv = Statevector::new(1);
        sv.apply_x(0);
        sv.apply_sdg(0);
        assert_eq!(sv.amplitudes[1], Complex64::new(0.0, -1.0));
    }

    #[test]
    fn test_load_sets_bits_by_mode() {
        let state = InputState::from_entries(vec![
            StateEntry::new(Complex64::new(FRAC_1_SQRT_2, 0.0), [0]),
            StateEntry::new(Complex64::new(FRAC_1_SQRT_2, 0.0), [2]),
        ]);
        let prep = TrialStatePreparer::prepare(&state, 3).unwrap();
        let mut sv = Statevector::new(3);
        assert!(sv.load(&prep));
        assert!(approx_eq(sv.amplitudes[0b001], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[0b100], Complex64::new(FRAC_1_SQRT_2, 0.0)));

        let mut wrong = Statevector::new(2);
        assert!(!wrong.load(&prep));
        assert!(wrong.is_zero_state());
    }

    #[test]
    fn test_y_eigenstate_measures_deterministically() {
        // (|0⟩ + i|1⟩)/√2 is the +1 eigenstate of Y.
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let mut sv = Statevector::new(1);
            sv.amplitudes = vec![
                Complex64::new(FRAC_1_SQRT_2, 0.0),
                Complex64::new(0.0, FRAC_1_SQRT_2),
            ];
            sv.rotate_into(&pauli("Y"));
            assert_eq!(sv.measure_all(&mut rng), vec![false]);
        }
    }

    #[test]
    fn test_expectation_matches_rotation() {
        let mut sv = Statevector::new(2);
        sv.amplitudes = vec![
            ZERO,
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            ZERO,
        ];
        assert!((sv.expectation(&pauli("XX")).unwrap() - 1.0).abs() < 1e-12);
        assert!((sv.expectation(&pauli("YY")).unwrap() - 1.0).abs() < 1e-12);
        assert!((sv.expectation(&pauli("ZZ")).unwrap() + 1.0).abs() < 1e-12);
        assert!(sv.expectation(&pauli("Z")).is_none());
    }

    #[test]
    fn test_measure_collapses() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_h(1);
        let bits = sv.measure_all(&mut rng);
        let index = usize::from(bits[0]) | usize::from(bits[1]) << 1;
        assert_eq!(sv.amplitudes[index], ONE);
    }

    #[test]
    fn test_reset_all_returns_to_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sv = Statevector::new(3);
        sv.apply_h(0);
        sv.apply_x(2);
        sv.reset_all(&mut rng);
        assert!(sv.amplitudes[0].norm() > 1.0 - 1e-12);
        assert!(sv.amplitudes[1..].iter().all(|a| a.norm() < 1e-12));
    }

    #[test]
    fn test_sample_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sv = Statevector::new(1);
        sv.apply_x(0);

        for _ in 0..100 {
            assert_eq!(sv.sample(&mut rng), 1);
        }
    }
}
