//! Unrolling of multi-qubit gates into single-qubit gates and CX.

use qcmp_ir::{CircuitDag, GateKind, Instruction, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::synthesis::{mcx, synthesize_unitary, toffoli};
use tracing::debug;

/// Rewrites every gate on more than one qubit into single-qubit gates and CX.
///
/// | Gate | Expansion |
/// |------|-----------|
/// | `cz` | H·CX·H on the target (kept when `cz` is native) |
/// | `swap` | 3 CX |
/// | `ccx` | Toffoli network |
/// | `mcx` | linear-depth multi-controlled X |
/// | `unitary` | Euler, Walsh or Givens synthesis |
///
/// Single-qubit dense blocks become Euler rotations as well. Single-qubit
/// standard gates and CX pass through unchanged.
pub struct UnrollMultiQubit;

impl Pass for UnrollMultiQubit {
    fn name(&self) -> &'static str {
        "UnrollMultiQubit"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let keep_cz = properties
            .basis_gates
            .as_ref()
            .is_some_and(|basis| basis.contains("cz"));

        let mut expanded = 0usize;
        let mut out = Vec::with_capacity(dag.num_ops());
        for (_idx, inst) in dag.topological_ops() {
            let replacement = expand(inst, keep_cz);
            if replacement.len() != 1 || replacement[0] != *inst {
                expanded += 1;
            }
            out.extend(replacement);
        }

        if expanded > 0 {
            debug!("Unrolled {} instructions into {} gates", expanded, out.len());
            dag.rebuild(out)?;
        }
        Ok(())
    }
}

/// Expand one instruction into single-qubit gates and CX (and CZ when kept).
pub(crate) fn expand(inst: &Instruction, keep_cz: bool) -> Vec<Instruction> {
    let q = &inst.qubits;
    match &inst.gate.kind {
        GateKind::Unitary(block) => synthesize_unitary(block, q),
        GateKind::Standard(gate) => match gate {
            StandardGate::CZ if !keep_cz => {
                let h = Instruction::single_qubit_gate(StandardGate::H, q[1]);
                vec![
                    h.clone(),
                    Instruction::two_qubit_gate(StandardGate::CX, q[0], q[1]),
                    h,
                ]
            }
            StandardGate::Swap => {
                let cx = |c, t| Instruction::two_qubit_gate(StandardGate::CX, c, t);
                vec![cx(q[0], q[1]), cx(q[1], q[0]), cx(q[0], q[1])]
            }
            StandardGate::CCX => toffoli(q[0], q[1], q[2]),
            StandardGate::MCX(_) => match q.split_last() {
                Some((target, controls)) => mcx(controls, *target),
                None => vec![],
            },
            _ => vec![inst.clone()],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::BasisGates;
    use qcmp_ir::{Circuit, QubitId, UnitaryGate};
    use qcmp_sim::{circuit_operator, equivalent_up_to_global_phase};

    fn unrolled(circuit: &Circuit, basis: BasisGates) -> Circuit {
        let mut dag = circuit.dag().clone();
        let mut props = PropertySet::new();
        props.basis_gates = Some(basis);
        UnrollMultiQubit.run(&mut dag, &mut props).unwrap();
        Circuit::from_dag(circuit.name(), dag)
    }

    #[test]
    fn test_unroll_preserves_operator() {
        let mut circuit = Circuit::with_size("mixed", 4);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cz(QubitId(0), QubitId(2))
            .unwrap()
            .swap(QubitId(1), QubitId(3))
            .unwrap()
            .ccx(QubitId(3), QubitId(0), QubitId(1))
            .unwrap()
            .mcx(&[QubitId(0), QubitId(1), QubitId(2)], QubitId(3))
            .unwrap();

        let out = unrolled(&circuit, BasisGates::ibm());
        assert!(
            out.instructions()
                .iter()
                .all(|i| i.is_single_qubit() || i.name() == "cx")
        );
        assert!(equivalent_up_to_global_phase(
            &circuit_operator(&circuit).unwrap(),
            &circuit_operator(&out).unwrap()
        ));
    }

    #[test]
    fn test_cz_kept_when_native() {
        let mut circuit = Circuit::with_size("cz", 2);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        let out = unrolled(&circuit, BasisGates::iqm());
        assert_eq!(out.num_ops(), 1);
        assert_eq!(out.instructions()[0].name(), "cz");

        let out = unrolled(&circuit, BasisGates::ibm());
        assert_eq!(out.num_ops(), 3);
    }

    #[test]
    fn test_unitary_block_unrolled() {
        // Swap |01> and |10> on two qubits, i.e. a SWAP gate as a dense block.
        let mut matrix = vec![num_complex::Complex64::new(0.0, 0.0); 16];
        for (r, c) in [(0, 0), (1, 2), (2, 1), (3, 3)] {
            matrix[r * 4 + c] = num_complex::Complex64::new(1.0, 0.0);
        }
        let block = UnitaryGate::new("swap_block", 2, matrix).unwrap();
        let mut circuit = Circuit::with_size("u", 3);
        circuit.unitary(block, [QubitId(2), QubitId(0)]).unwrap();

        let out = unrolled(&circuit, BasisGates::ibm());
        assert!(out.instructions().iter().all(|i| i.name() != "unitary"));
        assert!(equivalent_up_to_global_phase(
            &circuit_operator(&circuit).unwrap(),
            &circuit_operator(&out).unwrap()
        ));
    }
}
