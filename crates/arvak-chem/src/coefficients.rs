//! Signed weights for the measurement strings of a term.
//!
//! A ladder operator splits into Majorana operators `c = Zstr·X` and
//! `d = Zstr·Y`:
//!
//!   a = (c + i·d) / 2,   a† = (c − i·d) / 2
//!
//! After sorting the ladder operators into ascending mode order (exchange
//! parity ε), each sorted block `(j, k)` multiplies out to a single Pauli
//! string with a quarter-turn phase:
//!
//! | product | string | phase |
//! |---------|--------|-------|
//! | `c_j c_k` | `Y Z… X` | `−i` |
//! | `c_j d_k` | `Y Z… Y` | `−i` |
//! | `d_j c_k` | `X Z… X` | `+i` |
//! | `d_j d_k` | `X Z… Y` | `+i` |
//!
//! The real part of the accumulated phase is the branch sign; the Hermitian
//! conjugate contributes the matching imaginary parts, which cancel.

use std::ops::Mul;

use crate::basis::{Branch, branch_table, coefficient_index};
use crate::pauli::PauliOp;
use crate::term::{Term, TermKind};

/// Per-kind normalization factor applied to every branch weight.
pub fn normalization(kind: TermKind) -> f64 {
    match kind {
        TermKind::Diagonal => 1.0,
        TermKind::OffDiagonalPair | TermKind::TripleIndex => 0.25,
        TermKind::QuadIndex => 0.125,
    }
}

/// An exact power of `i`, stored as the number of quarter turns mod 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Phase(u8);

impl Phase {
    const ONE: Phase = Phase(0);
    const I: Phase = Phase(1);
    const MINUS_ONE: Phase = Phase(2);
    const MINUS_I: Phase = Phase(3);

    /// Real part: `±1` on the real axis, `0` on the imaginary axis.
    fn real(self) -> i8 {
        match self.0 {
            0 => 1,
            2 => -1,
            _ => 0,
        }
    }
}

impl Mul for Phase {
    type Output = Phase;

    fn mul(self, rhs: Phase) -> Phase {
        Phase((self.0 + rhs.0) % 4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ladder {
    Create,
    Annihilate,
}

/// Ladder operators of `term` in operator order.
fn ladder_sequence(term: &Term) -> Vec<(usize, Ladder)> {
    use Ladder::{Annihilate, Create};
    match term {
        Term::Diagonal { .. } => Vec::new(),
        Term::OffDiagonalPair { modes: [p, q], .. } => vec![(*p, Create), (*q, Annihilate)],
        Term::TripleIndex {
            modes: [p, _, r], ..
        } => vec![(*p, Create), (*r, Annihilate)],
        Term::QuadIndex {
            modes: [p, q, r, s],
            ..
        } => vec![(*p, Create), (*q, Create), (*r, Annihilate), (*s, Annihilate)],
    }
}

/// Parity of the permutation that sorts `modes` ascending.
fn exchange_parity(modes: &[usize]) -> Phase {
    let inversions = modes
        .iter()
        .enumerate()
        .map(|(i, a)| modes[i + 1..].iter().filter(|b| a > *b).count())
        .sum::<usize>();
    if inversions % 2 == 0 {
        Phase::ONE
    } else {
        Phase::MINUS_ONE
    }
}

fn branch_sign(sequence: &[(usize, Ladder)], branch: &Branch) -> i8 {
    if sequence.is_empty() {
        return 1;
    }

    let modes: Vec<usize> = sequence.iter().map(|(m, _)| *m).collect();
    let mut sorted = sequence.to_vec();
    sorted.sort_unstable_by_key(|(m, _)| *m);

    let mut phase = exchange_parity(&modes);
    for (block, axes) in sorted.chunks_exact(2).zip(branch.axes.chunks_exact(2)) {
        for (slot, ((_, ladder), axis)) in block.iter().zip(axes).enumerate() {
            // First slot picks `d` for X, second slot picks `d` for Y.
            let picks_d = if slot == 0 {
                *axis == PauliOp::X
            } else {
                *axis == PauliOp::Y
            };
            if picks_d {
                phase = phase
                    * match ladder {
                        Ladder::Create => Phase::MINUS_I,
                        Ladder::Annihilate => Phase::I,
                    };
            }
            if slot == 0 {
                phase = phase * if picks_d { Phase::I } else { Phase::MINUS_I };
            }
        }
    }
    phase.real()
}

/// Expands a term's coefficients into one signed weight per measurement
/// string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoefficientExpander;

impl CoefficientExpander {
    /// Branch signs (`+1`, `−1` or `0`), aligned with the basis strings.
    pub fn signs(term: &Term) -> Vec<i8> {
        let sequence = ladder_sequence(term);
        branch_table(term.kind())
            .iter()
            .map(|branch| branch_sign(&sequence, branch))
            .collect()
    }

    /// Signed weights, aligned with
    /// [`MeasurementBasisBuilder::build`](crate::basis::MeasurementBasisBuilder::build).
    pub fn expand(term: &Term) -> Vec<f64> {
        let norm = normalization(term.kind());
        let coefficients = term.coefficients();
        Self::signs(term)
            .into_iter()
            .enumerate()
            .map(|(b, sign)| norm * coefficients[coefficient_index(b)] * f64::from(sign))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_arithmetic() {
        assert_eq!(Phase::I * Phase::I, Phase::MINUS_ONE);
        assert_eq!(Phase::I * Phase::MINUS_I, Phase::ONE);
        assert_eq!(Phase::MINUS_ONE * Phase::MINUS_ONE, Phase::ONE);
        assert_eq!(Phase::I.real(), 0);
        assert_eq!(Phase::MINUS_ONE.real(), -1);
    }

    #[test]
    fn test_exchange_parity() {
        assert_eq!(exchange_parity(&[0, 1, 2, 3]), Phase::ONE);
        assert_eq!(exchange_parity(&[1, 0, 2, 3]), Phase::MINUS_ONE);
        assert_eq!(exchange_parity(&[3, 2, 1, 0]), Phase::ONE);
    }

    #[test]
    fn test_diagonal_weight_is_coefficient() {
        assert_eq!(CoefficientExpander::expand(&Term::diagonal(0, -0.7)), vec![-0.7]);
    }

    #[test]
    fn test_pair_signs_independent_of_order() {
        let forward = CoefficientExpander::expand(&Term::off_diagonal_pair(0, 3, 2.0));
        let backward = CoefficientExpander::expand(&Term::off_diagonal_pair(3, 0, 2.0));
        assert_eq!(forward, vec![0.5, 0.5]);
        assert_eq!(backward, forward);
    }

    #[test]
    fn test_triple_groups_coefficients() {
        let w = CoefficientExpander::expand(&Term::triple_index([2, 0, 1], [1.0, -2.0]));
        assert_eq!(w, vec![0.25, 0.25, -0.5, -0.5]);
    }

    #[test]
    fn test_quad_signs_ascending_creation_first() {
        let signs = CoefficientExpander::signs(&Term::quad_index([0, 1, 2, 3], [1.0; 4]));
        assert_eq!(signs, vec![-1, -1, 1, 1, -1, -1, -1, -1]);
    }

    #[test]
    fn test_quad_swap_flips_every_sign() {
        let base = CoefficientExpander::signs(&Term::quad_index([0, 1, 2, 3], [1.0; 4]));
        let swapped = CoefficientExpander::signs(&Term::quad_index([1, 0, 2, 3], [1.0; 4]));
        for (a, b) in base.iter().zip(&swapped) {
            assert_eq!(*a, -*b);
        }
    }

    #[test]
    fn test_quad_weights_scale_by_eighth() {
        let w = CoefficientExpander::expand(&Term::quad_index([0, 1, 2, 3], [8.0, 8.0, 16.0, 16.0]));
        assert_eq!(w, vec![-1.0, -1.0, 1.0, 1.0, -2.0, -2.0, -2.0, -2.0]);
    }
}
