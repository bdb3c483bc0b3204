//! qcmp Circuit Intermediate Representation
//!
//! This crate provides the circuit data structures shared by the oracle
//! builders, the decomposer and the metrics extractor.
//!
//! # Overview
//!
//! The circuit IR uses a DAG (Directed Acyclic Graph) representation internally,
//! whose wires are qubits. The high-level [`Circuit`] API provides a builder
//! that validates every instruction as it is added: arity, declared qubits and
//! duplicate operands are all checked, and dense unitary blocks are checked
//! for unitarity.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] for addressing qubits
//! - **Gates**: [`StandardGate`] for built-in gates and [`UnitaryGate`] for dense
//!   matrix blocks, joined in the closed [`GateKind`] variant
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API and JSON documents
//! - **Metrics**: [`Metrics`], [`depth`] and [`count_ops`]
//!
//! # Example
//!
//! ```rust
//! use qcmp_ir::{Circuit, QubitId, count_ops, depth};
//!
//! let mut circuit = Circuit::with_size("toffoli", 3);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
//!
//! assert_eq!(depth(&circuit).unwrap(), 2);
//! assert_eq!(count_ops(&circuit).unwrap()["ccx"], 1);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `id`, `x`, `y`, `z` | 1 | Identity and Pauli gates |
//! | `h`, `s`, `sdg`, `t`, `tdg`, `sx`, `sxdg` | 1 | Clifford+T gates |
//! | `rx`, `ry`, `rz`, `p` | 1 | Rotation and phase gates |
//! | `u`, `prx` | 1 | Universal U(θ,φ,λ) and phased RX |
//! | `cx`, `cz`, `swap` | 2 | Two-qubit gates |
//! | `ccx` | 3 | Toffoli gate |
//! | `mcx` | k+1 | X with k controls |
//! | `unitary` | k | Dense 2^k × 2^k block |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod metrics;
pub mod qubit;

pub use circuit::{Circuit, CircuitDocument};
pub use dag::{CircuitDag, CircuitLevel, DagEdge, DagNode, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, StandardGate, UNITARY_TOLERANCE, UnitaryGate};
pub use instruction::Instruction;
pub use metrics::{Metrics, count_ops, depth};
pub use qubit::QubitId;
