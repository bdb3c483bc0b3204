//! Error types for the compilation crate.

use qcmp_ir::IrError;
use thiserror::Error;

/// Errors raised while decomposing a circuit for a device.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The native vocabulary cannot express a required operation.
    #[error("Basis {basis:?} cannot express {missing}")]
    UnsupportedBasis {
        /// The device's native gates.
        basis: Vec<String>,
        /// The capability that is missing.
        missing: String,
    },

    /// The circuit needs more qubits than the device has.
    #[error("Circuit requires {required} qubits but the device has {available}")]
    CapacityExceeded {
        /// Qubits required by the circuit.
        required: usize,
        /// Qubits available on the device.
        available: usize,
    },

    /// No path connects two physical qubits.
    #[error("Cannot route between physical qubits {qubit1} and {qubit2}")]
    RoutingFailed {
        /// First physical qubit.
        qubit1: u32,
        /// Second physical qubit.
        qubit2: u32,
    },

    /// Routing met a gate wider than two qubits.
    #[error("Gate {name} acts on {num_qubits} qubits; routing handles at most two")]
    GateTooWide {
        /// Gate identifier.
        name: String,
        /// Number of operands.
        num_qubits: usize,
    },

    /// A target-specific pass ran without a coupling map.
    #[error("Coupling map is required but was not set")]
    MissingCouplingMap,

    /// A pass that needs a layout ran before layout selection.
    #[error("Layout is required but was not set")]
    MissingLayout,

    /// A pass that needs the native gate set ran without one.
    #[error("Basis gates are required but were not set")]
    MissingBasisGates,

    /// The decomposed circuit violates the device constraints.
    #[error("Decomposed circuit does not conform to the device: {0}")]
    NonConforming(String),

    /// A device description is malformed.
    #[error("Invalid device '{name}': {reason}")]
    InvalidDevice {
        /// Device name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Error from the IR layer.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
