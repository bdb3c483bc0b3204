//! Error types for simulation.

use qcmp_ir::IrError;
use thiserror::Error;

/// Errors raised while simulating a circuit.
#[derive(Debug, Error)]
pub enum SimError {
    /// The circuit is too wide for dense simulation.
    #[error("Cannot simulate {num_qubits} qubits; the limit is {max}")]
    TooManyQubits {
        /// Qubits in the circuit.
        num_qubits: usize,
        /// Largest supported width.
        max: usize,
    },

    /// A basis state index does not fit the register.
    #[error("Basis state {index} is out of range for {num_qubits} qubits")]
    BasisStateOutOfRange {
        /// Requested index.
        index: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// An instruction addresses a qubit outside the register.
    #[error("Qubit {qubit} is outside the {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// Offending qubit index.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// Error from the IR layer.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for simulation.
pub type SimResult<T> = Result<T, SimError>;
