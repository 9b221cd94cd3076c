//! Property-based tests for term expansion and energy aggregation.

use arvak_chem::basis::MeasurementBasisBuilder;
use arvak_chem::coefficients::{CoefficientExpander, normalization};
use arvak_chem::energy::EnergyAggregator;
use arvak_chem::estimator::{EstimationResult, SampleStats};
use arvak_chem::instruction::expand_term;
use arvak_chem::pauli::PauliOp;
use arvak_chem::term::{Term, TermKind};
use proptest::prelude::*;

/// A register width together with a random permutation of its modes.
fn arb_register() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (4_usize..=9).prop_flat_map(|n| (Just(n), Just((0..n).collect::<Vec<_>>()).prop_shuffle()))
}

fn arb_coefficient() -> impl Strategy<Value = f64> {
    prop_oneof![-2.0_f64..-0.01, 0.01_f64..2.0]
}

/// A random valid term on a random register.
fn arb_term() -> impl Strategy<Value = (usize, Term)> {
    (
        arb_register(),
        0_usize..4,
        prop::collection::vec(arb_coefficient(), 4),
    )
        .prop_map(|((n, modes), kind, c)| {
            let kind = TermKind::ALL[kind];
            let term = Term::from_parts(
                kind,
                &modes[..kind.mode_arity()],
                &c[..kind.coefficient_arity()],
            )
            .unwrap();
            (n, term)
        })
}

fn arb_results() -> impl Strategy<Value = Vec<EstimationResult>> {
    prop::collection::vec((-10.0_f64..10.0, 0.0_f64..1.0), 0..20).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(term_index, (expectation, variance))| EstimationResult {
                term_index,
                expectation,
                variance,
                trials: 1,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Bases and weights line up one-to-one with the branch count.
    #[test]
    fn expansion_is_aligned((n, term) in arb_term()) {
        let instructions = expand_term(n, &term).unwrap();
        prop_assert_eq!(instructions.len(), term.kind().branch_count());
        for instruction in &instructions {
            prop_assert_eq!(instruction.basis.num_qubits(), n);
            prop_assert!(!instruction.basis.is_identity());
        }
    }

    /// Weight magnitudes are exactly normalization · |coefficient|.
    #[test]
    fn weight_magnitudes_follow_coefficients((_, term) in arb_term()) {
        let norm = normalization(term.kind());
        for (b, w) in CoefficientExpander::expand(&term).iter().enumerate() {
            let expected = norm * term.coefficients()[b / 2].abs();
            prop_assert_eq!(w.abs(), expected);
        }
    }

    /// Every ladder mode carries X or Y in every non-diagonal branch.
    #[test]
    fn ladder_modes_carry_x_or_y((n, term) in arb_term()) {
        prop_assume!(term.kind() != TermKind::Diagonal);
        let ladder: Vec<usize> = match &term {
            Term::TripleIndex { modes: [p, _, r], .. } => vec![*p, *r],
            other => other.modes().to_vec(),
        };
        for basis in MeasurementBasisBuilder::new(n).build(&term).unwrap() {
            for &m in &ladder {
                prop_assert!(matches!(basis.get(m), Some(PauliOp::X | PauliOp::Y)));
            }
        }
    }

    /// Reversing a hopping term leaves it unchanged (it is Hermitian).
    #[test]
    fn pair_is_symmetric((n, modes) in arb_register(), h in arb_coefficient()) {
        let forward = expand_term(n, &Term::off_diagonal_pair(modes[0], modes[1], h)).unwrap();
        let backward = expand_term(n, &Term::off_diagonal_pair(modes[1], modes[0], h)).unwrap();
        prop_assert_eq!(forward, backward);
    }

    /// Exchanging the two creation operators negates every branch.
    #[test]
    fn quad_creation_swap_is_antisymmetric((_, m) in arb_register()) {
        let a = CoefficientExpander::signs(&Term::quad_index([m[0], m[1], m[2], m[3]], [1.0; 4]));
        let b = CoefficientExpander::signs(&Term::quad_index([m[1], m[0], m[2], m[3]], [1.0; 4]));
        for (x, y) in a.iter().zip(&b) {
            prop_assert_eq!(*x, -*y);
        }
    }

    /// Signs are never zero for the shipped branch tables.
    #[test]
    fn signs_are_real((_, term) in arb_term()) {
        prop_assert!(CoefficientExpander::signs(&term).iter().all(|s| s.abs() == 1));
    }

    /// Adding an offset shifts the energy by exactly that offset (up to rounding).
    #[test]
    fn aggregation_is_additive(results in arb_results(), offset in -100.0_f64..100.0) {
        let with = EnergyAggregator::aggregate(&results, offset);
        let without = EnergyAggregator::aggregate(&results, 0.0);
        prop_assert!((with - (without + offset)).abs() < 1e-9);
    }

    /// Summation order only changes the energy by rounding.
    #[test]
    fn aggregation_is_order_invariant(results in arb_results(), offset in -5.0_f64..5.0) {
        let mut reversed = results.clone();
        reversed.reverse();
        let a = EnergyAggregator::aggregate(&results, offset);
        let b = EnergyAggregator::aggregate(&reversed, offset);
        prop_assert!((a - b).abs() < 1e-9);
        let va = EnergyAggregator::variance(&results);
        let vb = EnergyAggregator::variance(&reversed);
        prop_assert!((va - vb).abs() < 1e-9);
    }

    /// Merging tallies does not depend on grouping.
    #[test]
    fn sample_stats_merge_is_associative(
        parities in prop::collection::vec(prop_oneof![Just(1_i8), Just(-1_i8)], 0..64),
        split in 0_usize..64
    ) {
        let split = split.min(parities.len());
        let tally = |xs: &[i8]| xs.iter().copied().map(SampleStats::from_parity)
            .fold(SampleStats::default(), SampleStats::merge);
        let whole = tally(&parities[..]);
        let parts = tally(&parities[..split]).merge(tally(&parities[split..]));
        prop_assert_eq!(whole, parts);
        prop_assert_eq!(whole.trials, parities.len() as u64);
    }
}
