//! Property-based tests for decomposition.
//!
//! Random circuits over the standard gate set, and random dense blocks, must
//! decompose to native gates on coupled pairs without changing their operator.

use proptest::prelude::*;
use qcmp_compile::{DecomposeOptions, DeviceModel, decompose_with};
use qcmp_ir::{Circuit, Instruction, QubitId, StandardGate, UnitaryGate};
use qcmp_sim::{circuit_operator, equivalent_up_to_global_phase};

fn arb_single(num_qubits: u32) -> impl Strategy<Value = Instruction> {
    (0..num_qubits, 0usize..8, -3.0f64..3.0).prop_map(|(q, g, theta)| {
        let gate = match g {
            0 => StandardGate::H,
            1 => StandardGate::X,
            2 => StandardGate::T,
            3 => StandardGate::S,
            4 => StandardGate::Rz(theta),
            5 => StandardGate::Ry(theta),
            6 => StandardGate::Rx(theta),
            _ => StandardGate::U(theta, theta / 2.0, -theta),
        };
        Instruction::single_qubit_gate(gate, QubitId(q))
    })
}

fn arb_pair(num_qubits: u32) -> impl Strategy<Value = Instruction> {
    (0..num_qubits, 1..num_qubits, 0usize..3).prop_map(move |(a, offset, g)| {
        let b = (a + offset) % num_qubits;
        let gate = match g {
            0 => StandardGate::CX,
            1 => StandardGate::CZ,
            _ => StandardGate::Swap,
        };
        Instruction::two_qubit_gate(gate, QubitId(a), QubitId(b))
    })
}

fn arb_toffoli(num_qubits: u32) -> impl Strategy<Value = Instruction> {
    Just((0..num_qubits).map(QubitId).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(|qubits| Instruction::gate(StandardGate::CCX, qubits.into_iter().take(3)))
}

fn arb_circuit(num_qubits: u32) -> impl Strategy<Value = Circuit> {
    let inst = prop_oneof![
        4 => arb_single(num_qubits),
        3 => arb_pair(num_qubits),
        1 => arb_toffoli(num_qubits),
    ];
    prop::collection::vec(inst, 1..16)
        .prop_map(move |insts| Circuit::from_instructions("prop", num_qubits, insts).unwrap())
}

/// A dense block of 2 to 4 qubits, the operator of a random gate sequence.
fn arb_block() -> impl Strategy<Value = UnitaryGate> {
    (2u32..=4)
        .prop_flat_map(|k| {
            let inst = prop_oneof![
                2 => arb_single(k),
                1 => arb_pair(k),
            ];
            (Just(k), prop::collection::vec(inst, 2..12))
        })
        .prop_map(|(k, insts)| {
            let source = Circuit::from_instructions("source", k, insts).unwrap();
            let op = circuit_operator(&source).unwrap();
            UnitaryGate::new("block", k, op.iter().copied().collect()).unwrap()
        })
}

/// A dense block placed on distinct qubits of a `num_qubits` register.
fn arb_block_circuit(num_qubits: u32) -> impl Strategy<Value = Circuit> {
    (
        arb_block(),
        Just((0..num_qubits).map(QubitId).collect::<Vec<_>>()).prop_shuffle(),
    )
        .prop_map(move |(block, qubits)| {
            let width = block.num_qubits as usize;
            let mut circuit = Circuit::with_size("dense", num_qubits);
            circuit
                .unitary(block, qubits.into_iter().take(width))
                .unwrap();
            circuit
        })
}

fn check(circuit: &Circuit, device: &DeviceModel, level: u8) -> Result<(), TestCaseError> {
    let options = DecomposeOptions {
        optimization_level: level,
    };
    let out = decompose_with(circuit, device, &options).unwrap();
    for inst in out.instructions() {
        prop_assert!(device.supports(inst.name()), "{} not native", inst.name());
        if let [a, b] = inst.qubits[..] {
            prop_assert!(device.are_coupled(a.0, b.0), "{a} and {b} are not coupled");
        }
        prop_assert!(inst.qubits.len() <= 2);
    }

    let widened =
        Circuit::from_instructions("widened", device.num_qubits(), circuit.instructions())
            .unwrap();
    prop_assert!(equivalent_up_to_global_phase(
        &circuit_operator(&widened).unwrap(),
        &circuit_operator(&out).unwrap()
    ));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_circuits_on_star(circuit in arb_circuit(4), level in 0u8..=3) {
        check(&circuit, &DeviceModel::iqm_star_5(), level)?;
    }

    #[test]
    fn random_circuits_on_heavy_hex(circuit in arb_circuit(5), level in 0u8..=3) {
        check(&circuit, &DeviceModel::heavy_hex_7(), level)?;
    }
}

proptest! {
    // Four-qubit blocks expand to thousands of gates before optimization.
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn random_dense_blocks_on_star(circuit in arb_block_circuit(5), level in 0u8..=3) {
        check(&circuit, &DeviceModel::iqm_star_5(), level)?;
    }

    #[test]
    fn random_dense_blocks_on_heavy_hex(circuit in arb_block_circuit(7)) {
        check(&circuit, &DeviceModel::heavy_hex_7(), 3)?;
    }
}
