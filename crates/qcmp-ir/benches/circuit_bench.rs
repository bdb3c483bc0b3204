//! Benchmarks for circuit construction and metrics
//!
//! Run with: cargo bench -p qcmp-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qcmp_ir::{Circuit, Metrics, QubitId};

/// A ladder of Toffolis followed by its mirror image.
fn toffoli_ladder(n: u32) -> Circuit {
    let mut circuit = Circuit::with_size("ladder", n);
    for i in 0..n.saturating_sub(2) {
        circuit
            .ccx(QubitId(i), QubitId(i + 1), QubitId(i + 2))
            .unwrap();
    }
    for i in (0..n.saturating_sub(2)).rev() {
        circuit
            .ccx(QubitId(i), QubitId(i + 1), QubitId(i + 2))
            .unwrap();
    }
    circuit
}

/// Benchmark adding gates to a circuit
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::with_size("bench", 10);
        b.iter(|| {
            circuit.h(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = Circuit::with_size("bench", 10);
        b.iter(|| {
            circuit
                .cx(black_box(QubitId(0)), black_box(QubitId(1)))
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark metrics extraction
fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for num_qubits in &[5u32, 10, 20, 50] {
        let circuit = toffoli_ladder(*num_qubits);
        group.bench_with_input(
            BenchmarkId::new("toffoli_ladder", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| Metrics::of(black_box(circuit)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_gate_addition, bench_metrics);
criterion_main!(benches);
