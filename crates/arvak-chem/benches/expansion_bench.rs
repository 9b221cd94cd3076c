//! Benchmarks for term expansion
//!
//! Run with: cargo bench -p arvak-chem

use arvak_chem::coefficients::CoefficientExpander;
use arvak_chem::hamiltonian::{EncodedHamiltonian, InputState, TermBuckets};
use arvak_chem::instruction::expand_term;
use arvak_chem::term::Term;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Every two-body excitation over `n` modes, plus hopping and diagonal terms.
fn dense_hamiltonian(n: usize) -> EncodedHamiltonian {
    let mut buckets = TermBuckets::default();
    for p in 0..n {
        buckets.push(Term::diagonal(p, -0.5));
        for q in p + 1..n {
            buckets.push(Term::off_diagonal_pair(p, q, 0.1));
            for r in q + 1..n {
                for s in r + 1..n {
                    buckets.push(Term::quad_index([p, q, r, s], [0.05; 4]));
                }
            }
        }
    }
    EncodedHamiltonian::new(n, buckets, InputState::basis(0..n / 2), 0.0).unwrap()
}

/// Benchmark sign derivation for a single quad term
fn bench_quad_signs(c: &mut Criterion) {
    let term = Term::quad_index([5, 1, 7, 2], [1.0, 0.5, -0.5, 0.25]);
    c.bench_function("quad_signs", |b| {
        b.iter(|| CoefficientExpander::expand(black_box(&term)));
    });
}

/// Benchmark expanding a full Hamiltonian into instructions
fn bench_full_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_expansion");

    for num_modes in &[4, 8, 12] {
        let h = dense_hamiltonian(*num_modes);
        group.bench_with_input(BenchmarkId::new("modes", num_modes), &h, |b, h| {
            b.iter(|| {
                h.catalog()
                    .iter()
                    .map(|t| expand_term(h.num_qubits(), t).unwrap().len())
                    .sum::<usize>()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_quad_signs, bench_full_expansion);

criterion_main!(benches);
