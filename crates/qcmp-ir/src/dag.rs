//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a qubit wire.
    In(QubitId),
    /// Output node for a qubit wire.
    Out(QubitId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// An edge in the circuit DAG, carrying the qubit wire it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The qubit wire this edge represents.
    pub qubit: QubitId,
}

/// The abstraction level of a circuit in the compilation pipeline.
///
/// Circuits start at the `Logical` level (abstract qubits) and are
/// lowered to the `Physical` level by the layout pass
/// (qubits mapped to physical device positions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircuitLevel {
    /// Logical level: qubits are abstract, no physical mapping applied.
    #[default]
    Logical,
    /// Physical level: qubit indices are device qubits.
    Physical,
}

/// DAG-based circuit representation.
///
/// The circuit is represented as a directed acyclic graph where:
/// - Nodes are either input nodes, output nodes, or operation nodes
/// - Edges represent qubit wires
/// - Each wire has exactly one input and one output node
///
/// Operation nodes are only ever appended, so node index order restricted to
/// operations is a topological order that also preserves insertion order for
/// independent instructions. Passes that restructure a circuit rebuild the
/// operation list with [`CircuitDag::rebuild`].
///
/// ## Performance
///
/// The DAG maintains a `wire_front` index that maps each wire to the
/// last node before the output node, giving O(1) predecessor lookups
/// in `apply()`.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Map from qubit to its input node.
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from qubit to its output node.
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    /// Wire front: maps each wire to the node just before the output node.
    wire_front: FxHashMap<QubitId, NodeIndex>,
    /// Abstraction level of the circuit.
    level: CircuitLevel,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            qubit_inputs: FxHashMap::default(),
            qubit_outputs: FxHashMap::default(),
            wire_front: FxHashMap::default(),
            level: CircuitLevel::Logical,
        }
    }

    /// Create a DAG with qubits `0..num_qubits` and no operations.
    pub fn with_qubits(num_qubits: u32) -> Self {
        let mut dag = Self::new();
        for q in 0..num_qubits {
            dag.add_qubit(QubitId(q));
        }
        dag
    }

    /// Add a qubit to the circuit.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let in_node = self.graph.add_node(DagNode::In(qubit));
        let out_node = self.graph.add_node(DagNode::Out(qubit));
        self.graph.add_edge(in_node, out_node, DagEdge { qubit });
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
        // Initially the input node is the predecessor of the output.
        self.wire_front.insert(qubit, in_node);
    }

    /// Check an instruction against the declared qubits without applying it.
    #[allow(clippy::cast_possible_truncation)]
    pub fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = Some(instruction.name().to_string());

        let expected = instruction.gate.num_qubits() as usize;
        let got = instruction.qubits.len();
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name: instruction.name().to_string(),
                expected: expected as u32,
                got: got as u32,
            });
        }

        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        if let crate::gate::GateKind::Unitary(u) = &instruction.gate.kind {
            u.validate()?;
        }
        Ok(())
    }

    /// Apply an instruction to the circuit.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        self.validate(&instruction)?;

        let qubits = instruction.qubits.clone();
        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for qubit in qubits {
            let out_node = self.qubit_outputs[&qubit];
            let prev_node = self.wire_front[&qubit];

            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().qubit == qubit && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for qubit wire {qubit}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph.add_edge(prev_node, op_node, DagEdge { qubit });
            self.graph.add_edge(op_node, out_node, DagEdge { qubit });
            self.wire_front.insert(qubit, op_node);
        }

        Ok(op_node)
    }

    /// Replace every operation with `instructions`, keeping qubits and level.
    ///
    /// Nothing is changed if any instruction is invalid.
    pub fn rebuild(&mut self, instructions: impl IntoIterator<Item = Instruction>) -> IrResult<()> {
        let mut fresh = Self::new();
        for q in self.qubits() {
            fresh.add_qubit(q);
        }
        fresh.level = self.level;
        for inst in instructions {
            fresh.apply(inst)?;
        }
        *self = fresh;
        Ok(())
    }

    /// Iterate over operations in topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Clone the operations out in topological order.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.topological_ops().map(|(_, inst)| inst.clone()).collect()
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubit_inputs.len()
    }

    /// Get the number of operations.
    ///
    /// Computed as total nodes minus input and output nodes (2 per qubit).
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_count()
            .saturating_sub(2 * self.qubit_inputs.len())
    }

    /// Calculate the circuit depth.
    ///
    /// Each operation sits one layer above the deepest operation preceding it on
    /// any of its wires; the depth is the deepest layer.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        for (node, _) in self.topological_ops() {
            let node_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0)
                + 1;
            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Qubits in ascending order.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<_> = self.qubit_inputs.keys().copied().collect();
        qubits.sort_unstable();
        qubits
    }

    /// Check whether a qubit is declared.
    #[inline]
    pub fn contains_qubit(&self, qubit: QubitId) -> bool {
        self.qubit_inputs.contains_key(&qubit)
    }

    /// Get the abstraction level of this circuit.
    pub fn level(&self) -> CircuitLevel {
        self.level
    }

    /// Set the abstraction level of this circuit.
    pub fn set_level(&mut self, level: CircuitLevel) {
        self.level = level;
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that the graph is acyclic, that every wire runs from its input
    /// node to its output node, and that every operation is well formed.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        for (&qubit, &in_node) in &self.qubit_inputs {
            let out_node = self.qubit_outputs.get(&qubit).copied().ok_or_else(|| {
                IrError::InvalidDag(format!("Qubit {qubit} has an In node but no Out node"))
            })?;

            let mut current = in_node;
            let mut steps = 0;
            while current != out_node {
                current = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().qubit == qubit)
                    .map(|e| e.target())
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!(
                            "Wire for qubit {qubit} is broken at node {current:?}"
                        ))
                    })?;
                steps += 1;
                if steps > self.graph.node_count() {
                    return Err(IrError::InvalidDag(format!(
                        "Wire for qubit {qubit} does not terminate"
                    )));
                }
            }
        }

        for (_, inst) in self.topological_ops() {
            self.validate(inst)?;
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_apply_gate() {
        let mut dag = CircuitDag::with_qubits(1);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        assert_eq!(dag.num_ops(), 1);
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut dag = CircuitDag::with_qubits(2);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(1)))
            .unwrap();
        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 1);

        dag.apply(Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)))
            .unwrap();
        assert_eq!(dag.depth(), 2);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = CircuitDag::with_qubits(2);
        let result = dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0)]));
        match result {
            Err(IrError::QubitCountMismatch {
                gate_name,
                expected,
                got,
            }) => {
                assert_eq!(gate_name, "cx");
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("Expected QubitCountMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut dag = CircuitDag::with_qubits(1);
        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(99));
        match dag.apply(inst) {
            Err(IrError::QubitNotFound { qubit, gate_name }) => {
                assert_eq!(qubit, QubitId(99));
                assert_eq!(gate_name, Some("cx".to_string()));
            }
            other => panic!("Expected QubitNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut dag = CircuitDag::with_qubits(2);
        let inst = Instruction::two_qubit_gate(StandardGate::CZ, QubitId(1), QubitId(1));
        assert!(matches!(
            dag.apply(inst),
            Err(IrError::DuplicateQubit { .. })
        ));
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_topological_order_preserves_insertion() {
        let mut dag = CircuitDag::with_qubits(3);
        let insts = vec![
            Instruction::single_qubit_gate(StandardGate::X, QubitId(2)),
            Instruction::single_qubit_gate(StandardGate::H, QubitId(0)),
            Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)),
            Instruction::single_qubit_gate(StandardGate::T, QubitId(2)),
        ];
        for inst in insts.clone() {
            dag.apply(inst).unwrap();
        }
        assert_eq!(dag.instructions(), insts);
    }

    #[test]
    fn test_rebuild_keeps_level_and_qubits() {
        let mut dag = CircuitDag::with_qubits(2);
        dag.set_level(CircuitLevel::Physical);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();

        dag.rebuild(vec![
            Instruction::single_qubit_gate(StandardGate::X, QubitId(1)),
            Instruction::single_qubit_gate(StandardGate::X, QubitId(1)),
        ])
        .unwrap();
        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 2);
        assert_eq!(dag.level(), CircuitLevel::Physical);
        assert_eq!(dag.qubits(), vec![QubitId(0), QubitId(1)]);

        let bad = dag.rebuild(vec![Instruction::single_qubit_gate(
            StandardGate::X,
            QubitId(5),
        )]);
        assert!(bad.is_err());
        assert_eq!(dag.num_ops(), 2);
    }

    #[test]
    fn test_verify_integrity_simple_circuit() {
        let mut dag = CircuitDag::with_qubits(3);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::gate(
            StandardGate::CCX,
            [QubitId(0), QubitId(1), QubitId(2)],
        ))
        .unwrap();
        dag.verify_integrity().unwrap();
    }
}
