//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::{Gate, StandardGate, UnitaryGate};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A quantum circuit over qubits `0..num_qubits`.
///
/// This provides a high-level API for building quantum circuits,
/// with convenient methods for common gates. Every instruction is validated
/// against the declared qubits when it is added.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// The underlying DAG representation.
    dag: CircuitDag,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dag: CircuitDag::new(),
        }
    }

    /// Create a circuit with a given number of qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            dag: CircuitDag::with_qubits(num_qubits),
        }
    }

    /// Build a circuit from an instruction list, validating each instruction.
    pub fn from_instructions(
        name: impl Into<String>,
        num_qubits: u32,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Self> {
        let mut circuit = Self::with_size(name, num_qubits);
        for inst in instructions {
            circuit.dag.apply(inst)?;
        }
        Ok(circuit)
    }

    /// Add a single qubit to the circuit.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.dag.num_qubits() as u32);
        self.dag.add_qubit(id);
        id
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Tdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SX, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::P(theta), qubit)
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::U(theta, phi, lambda), qubit)
    }

    /// Apply phased RX gate.
    pub fn prx(&mut self, theta: f64, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::PRX(theta, phi), qubit)
    }

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::single_qubit_gate(gate, qubit))?;
        Ok(self)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))?;
        Ok(self)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))?;
        Ok(self)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))?;
        Ok(self)
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))?;
        Ok(self)
    }

    /// Apply an X on `target` controlled by all of `controls`.
    ///
    /// Zero, one and two controls map to `x`, `cx` and `ccx`.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::mcx(controls, target))?;
        Ok(self)
    }

    /// Apply a dense unitary block to `qubits` (qubit `i` of the block first).
    pub fn unitary(
        &mut self,
        gate: UnitaryGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    /// Append an already constructed instruction.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.dag.num_qubits()
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Instructions in topological order.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.dag.instructions()
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Consume the circuit and return the DAG.
    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }

    /// Create a circuit from a DAG.
    pub fn from_dag(name: impl Into<String>, dag: CircuitDag) -> Self {
        Self {
            name: name.into(),
            dag,
        }
    }

    // =========================================================================
    // Serialized form
    // =========================================================================

    /// Snapshot the circuit as a serializable document.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_document(&self) -> CircuitDocument {
        CircuitDocument {
            name: self.name.clone(),
            num_qubits: self.num_qubits() as u32,
            instructions: self.instructions(),
        }
    }

    /// Rebuild a circuit from a document, validating every instruction.
    pub fn from_document(doc: CircuitDocument) -> IrResult<Self> {
        Self::from_instructions(doc.name, doc.num_qubits, doc.instructions)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Parse and validate a JSON circuit document.
    pub fn from_json(json: &str) -> IrResult<Self> {
        let doc: CircuitDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }
}

/// Serializable snapshot of a [`Circuit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDocument {
    /// Circuit name.
    pub name: String,
    /// Number of declared qubits.
    pub num_qubits: u32,
    /// Instructions in order.
    pub instructions: Vec<Instruction>,
}
