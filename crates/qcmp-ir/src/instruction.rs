//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, GateKind, StandardGate, UnitaryGate};
use crate::qubit::QubitId;

/// A gate together with the qubits it acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate applied.
    pub gate: Gate,
    /// Qubits this instruction operates on, controls first.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate: gate.into(),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a multi-controlled X with `controls` first and `target` last.
    pub fn mcx(controls: &[QubitId], target: QubitId) -> Self {
        let gate = match controls.len() {
            0 => StandardGate::X,
            1 => StandardGate::CX,
            2 => StandardGate::CCX,
            // Control count is bounded by the u32 qubit index space.
            k => StandardGate::MCX(u32::try_from(k).unwrap_or(u32::MAX)),
        };
        Self::gate(gate, controls.iter().copied().chain([target]))
    }

    /// Get the gate name.
    #[inline]
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// The standard gate, if this instruction applies one.
    #[inline]
    pub fn as_standard(&self) -> Option<&StandardGate> {
        self.gate.as_standard()
    }

    /// Check whether the instruction acts on a single qubit.
    #[inline]
    pub fn is_single_qubit(&self) -> bool {
        self.qubits.len() == 1
    }

    /// Check whether the instruction acts on exactly two qubits.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.qubits.len() == 2
    }

    /// The inverse instruction on the same operands.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let kind = match &self.gate.kind {
            GateKind::Standard(g) => GateKind::Standard(g.inverse()),
            GateKind::Unitary(u) => {
                let dim = u.dim();
                let mut matrix = Vec::with_capacity(dim * dim);
                for r in 0..dim {
                    for c in 0..dim {
                        matrix.push(u.entry(c, r).conj());
                    }
                }
                GateKind::Unitary(UnitaryGate {
                    name: format!("{}_dg", u.name),
                    num_qubits: u.num_qubits,
                    matrix,
                })
            }
        };
        Self {
            gate: Gate {
                kind,
                label: self.gate.label.clone(),
            },
            qubits: self.qubits.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert_eq!(inst.name(), "h");
        assert!(inst.is_single_qubit());
        assert_eq!(inst.qubits, vec![QubitId(0)]);
    }

    #[test]
    fn test_mcx_picks_narrowest_gate() {
        let t = QubitId(9);
        assert_eq!(Instruction::mcx(&[], t).name(), "x");
        assert_eq!(Instruction::mcx(&[QubitId(0)], t).name(), "cx");
        assert_eq!(Instruction::mcx(&[QubitId(0), QubitId(1)], t).name(), "ccx");

        let wide = Instruction::mcx(&[QubitId(0), QubitId(1), QubitId(2)], t);
        assert_eq!(wide.as_standard(), Some(&StandardGate::MCX(3)));
        assert_eq!(wide.qubits.last(), Some(&t));
    }

    #[test]
    fn test_inverse_of_rotation() {
        let inst = Instruction::single_qubit_gate(StandardGate::Rz(0.25), QubitId(1));
        assert_eq!(inst.inverse().as_standard(), Some(&StandardGate::Rz(-0.25)));
        let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
        assert_eq!(cx.inverse(), cx);
    }
}
