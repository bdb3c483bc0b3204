//! Decomposed resource comparison between the two oracle constructions.

use qcmp_compile::{DeviceModel, decompose};
use qcmp_ir::Metrics;
use qcmp_oracle::{build_comparator, build_unitary_oracle};

fn decomposed_metrics(number: u64, nqubits: u32, device: &DeviceModel) -> (Metrics, Metrics) {
    let comparator = decompose(&build_comparator(number, nqubits).unwrap(), device).unwrap();
    let unitary = decompose(&build_unitary_oracle(number, nqubits).unwrap(), device).unwrap();
    (
        Metrics::of(&comparator).unwrap(),
        Metrics::of(&unitary).unwrap(),
    )
}

/// Registers where both constructions reduce to one multi-controlled X with
/// negated controls, so the decomposed totals coincide.
const COINCIDENT: [(u64, u32); 2] = [(1, 1), (1, 2)];

#[test]
fn test_comparator_is_cheaper_after_decomposition() {
    let device = DeviceModel::heavy_hex_16();
    for nqubits in 1..=5u32 {
        for number in 0..(1u64 << nqubits) {
            let (comparator, unitary) = decomposed_metrics(number, nqubits, &device);
            let (c, u) = (comparator.total_ops, unitary.total_ops);
            if number == 0 {
                assert_eq!((c, u), (0, 0), "(0, {nqubits})");
            } else if COINCIDENT.contains(&(number, nqubits)) {
                assert_eq!(c, u, "({number}, {nqubits})");
            } else {
                assert!(
                    c < u,
                    "({number}, {nqubits}): comparator {c} ops, unitary {u} ops"
                );
            }
        }
    }
}

#[test]
fn test_comparison_is_deterministic() {
    let device = DeviceModel::heavy_hex_16();
    let first = decomposed_metrics(17, 5, &device);
    let second = decomposed_metrics(17, 5, &device);
    assert_eq!(first, second);
}

#[test]
fn test_decomposed_oracles_use_native_gates() {
    let device = DeviceModel::iqm_star_5();
    let (comparator, unitary) = decomposed_metrics(5, 3, &device);
    for metrics in [&comparator, &unitary] {
        assert!(metrics.ops.keys().all(|gate| device.supports(gate)));
        assert_eq!(metrics.num_qubits, device.num_qubits() as usize);
    }
}
