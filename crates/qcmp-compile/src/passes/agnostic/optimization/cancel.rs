//! Cancellation optimization passes.

use rustc_hash::FxHashMap;

use qcmp_ir::{CircuitDag, Instruction, QubitId, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::unitary::Unitary2x2;

use super::EPSILON;

/// Two-qubit cancellation pass.
///
/// Cancels adjacent pairs of identical self-inverse two-qubit gates:
/// `cx` with the same orientation, `cz` and `swap` in either orientation.
/// Each qubit keeps a stack of the gates still standing on it, so removing a
/// pair exposes the gates underneath and nested pairs cancel in one sweep.
pub struct CancelTwoQubit;

impl CancelTwoQubit {
    fn cancels(prev: &Instruction, next: &Instruction) -> bool {
        if prev.qubits.len() != 2 || prev.as_standard() != next.as_standard() {
            return false;
        }
        let same = prev.qubits == next.qubits;
        let flipped = prev.qubits[0] == next.qubits[1] && prev.qubits[1] == next.qubits[0];
        match next.as_standard() {
            Some(StandardGate::CX) => same,
            Some(StandardGate::CZ | StandardGate::Swap) => same || flipped,
            _ => false,
        }
    }
}

impl Pass for CancelTwoQubit {
    fn name(&self) -> &'static str {
        "CancelTwoQubit"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let ops = dag.instructions();
        let mut keep = vec![true; ops.len()];
        let mut stacks: FxHashMap<QubitId, Vec<usize>> = FxHashMap::default();

        for (i, inst) in ops.iter().enumerate() {
            if let [a, b] = inst.qubits[..] {
                let top_a = stacks.get(&a).and_then(|s| s.last()).copied();
                let top_b = stacks.get(&b).and_then(|s| s.last()).copied();
                if let (Some(j), Some(k)) = (top_a, top_b) {
                    if j == k && Self::cancels(&ops[j], inst) {
                        keep[j] = false;
                        keep[i] = false;
                        for q in [a, b] {
                            if let Some(stack) = stacks.get_mut(&q) {
                                stack.pop();
                            }
                        }
                        continue;
                    }
                }
            }
            for q in &inst.qubits {
                stacks.entry(*q).or_default().push(i);
            }
        }

        if keep.iter().all(|k| *k) {
            return Ok(());
        }
        let out = ops
            .into_iter()
            .zip(keep)
            .filter_map(|(inst, k)| k.then_some(inst));
        dag.rebuild(out)?;
        Ok(())
    }
}

/// Rotation axis of a mergeable single-qubit gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Commutative cancellation pass.
///
/// Merges same-axis rotations on a wire when everything between them
/// commutes with that axis:
///
/// - `rz` and `p` slide across the control of `cx` and across `cz`;
/// - `rx` slides across the target of `cx`;
/// - `ry` merges only with an adjacent `ry`.
///
/// The merged rotation keeps the gate of the first occurrence; a merged angle
/// that vanishes removes the gate.
pub struct CommutativeCancellation;

impl CommutativeCancellation {
    fn rotation(inst: &Instruction) -> Option<(Axis, f64)> {
        match inst.as_standard()? {
            StandardGate::Rz(t) | StandardGate::P(t) => Some((Axis::Z, *t)),
            StandardGate::Rx(t) => Some((Axis::X, *t)),
            StandardGate::Ry(t) => Some((Axis::Y, *t)),
            _ => None,
        }
    }

    fn with_angle(inst: &Instruction, angle: f64) -> Option<Instruction> {
        let gate = match inst.as_standard()? {
            StandardGate::Rz(_) => StandardGate::Rz(angle),
            StandardGate::P(_) => StandardGate::P(angle),
            StandardGate::Rx(_) => StandardGate::Rx(angle),
            StandardGate::Ry(_) => StandardGate::Ry(angle),
            _ => return None,
        };
        Some(Instruction::single_qubit_gate(gate, inst.qubits[0]))
    }
}

impl Pass for CommutativeCancellation {
    fn name(&self) -> &'static str {
        "CommutativeCancellation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    #[allow(clippy::similar_names)]
    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut ops: Vec<Option<Instruction>> = dag.instructions().into_iter().map(Some).collect();
        let mut slots: FxHashMap<QubitId, (usize, Axis)> = FxHashMap::default();
        let mut merged = 0usize;

        for i in 0..ops.len() {
            let Some(inst) = ops[i].clone() else {
                continue;
            };

            if let (Some((axis, theta)), [q]) = (Self::rotation(&inst), inst.qubits.as_slice()) {
                let slot = slots.get(q).copied().filter(|(_, a)| *a == axis);
                let Some((j, _)) = slot else {
                    slots.insert(*q, (i, axis));
                    continue;
                };
                let Some(prev) = ops[j].as_ref() else {
                    slots.insert(*q, (i, axis));
                    continue;
                };
                let total = Self::rotation(prev).map_or(0.0, |(_, t)| t) + theta;
                let total = Unitary2x2::normalize_angle(total);
                if total.abs() < EPSILON {
                    ops[j] = None;
                    slots.remove(q);
                } else {
                    ops[j] = Self::with_angle(prev, total);
                }
                ops[i] = None;
                merged += 1;
                continue;
            }

            match (inst.as_standard(), inst.qubits.as_slice()) {
                (Some(StandardGate::CX), [control, target]) => {
                    slots.retain(|q, (_, axis)| {
                        (q != control || *axis == Axis::Z) && (q != target || *axis == Axis::X)
                    });
                }
                (Some(StandardGate::CZ), [a, b]) => {
                    slots.retain(|q, (_, axis)| (q != a && q != b) || *axis == Axis::Z);
                }
                _ => {
                    for q in &inst.qubits {
                        slots.remove(q);
                    }
                }
            }
        }

        if merged > 0 {
            dag.rebuild(ops.into_iter().flatten())?;
        }
        Ok(())
    }
}
