//! Resource metrics for circuits.
//!
//! Metrics are derived from a circuit snapshot alone. The depth is the length of
//! the longest chain of instructions connected through shared qubits; the
//! operation counts are an exact tally per gate identifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::IrResult;
use crate::instruction::Instruction;

/// Depth and gate counts of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Longest chain of dependent instructions.
    pub depth: usize,
    /// Occurrences per gate identifier.
    pub ops: BTreeMap<String, usize>,
    /// Total number of instructions.
    pub total_ops: usize,
    /// Instructions acting on two or more qubits.
    pub multi_qubit_ops: usize,
    /// Declared qubits.
    pub num_qubits: usize,
    /// Qubits touched by at least one instruction.
    pub active_qubits: usize,
}

impl Metrics {
    /// Compute metrics for a circuit.
    pub fn of(circuit: &Circuit) -> IrResult<Self> {
        circuit.dag().verify_integrity()?;
        Ok(Self::tally(circuit.num_qubits(), &circuit.instructions()))
    }

    /// Compute metrics for a raw instruction list over `num_qubits` qubits.
    ///
    /// The list is validated first; a dangling qubit index, an arity mismatch or
    /// a repeated operand is an error.
    pub fn from_instructions(num_qubits: u32, instructions: &[Instruction]) -> IrResult<Self> {
        let circuit = Circuit::from_instructions("metrics", num_qubits, instructions.to_vec())?;
        Ok(Self::tally(circuit.num_qubits(), instructions))
    }

    /// Count of a single gate identifier, zero when absent.
    pub fn count(&self, gate: &str) -> usize {
        self.ops.get(gate).copied().unwrap_or(0)
    }

    fn tally(num_qubits: usize, instructions: &[Instruction]) -> Self {
        let mut chain = vec![0usize; num_qubits];
        let mut touched = vec![false; num_qubits];
        let mut ops = BTreeMap::new();
        let mut multi_qubit_ops = 0;

        for inst in instructions {
            let level = inst
                .qubits
                .iter()
                .map(|q| chain[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                chain[q.index()] = level;
                touched[q.index()] = true;
            }
            *ops.entry(inst.name().to_string()).or_insert(0) += 1;
            if inst.qubits.len() > 1 {
                multi_qubit_ops += 1;
            }
        }

        Self {
            depth: chain.into_iter().max().unwrap_or(0),
            ops,
            total_ops: instructions.len(),
            multi_qubit_ops,
            num_qubits,
            active_qubits: touched.into_iter().filter(|t| *t).count(),
        }
    }
}

/// Length of the longest chain of instructions connected through shared qubits.
pub fn depth(circuit: &Circuit) -> IrResult<usize> {
    Ok(Metrics::of(circuit)?.depth)
}

/// Exact tally of instructions per gate identifier.
pub fn count_ops(circuit: &Circuit) -> IrResult<BTreeMap<String, usize>> {
    Ok(Metrics::of(circuit)?.ops)
}
