//! qcmp Simulation
//!
//! Dense statevector and operator simulation used to check that oracles and
//! decompositions implement what they claim. Qubit `j` is bit `j` of every
//! basis-state index.
//!
//! ```rust
//! use qcmp_ir::{Circuit, QubitId};
//! use qcmp_sim::{circuit_operator, equivalent_up_to_global_phase, simulate};
//!
//! let mut circuit = Circuit::with_size("flip", 2);
//! circuit.x(QubitId(1)).unwrap();
//! assert_eq!(simulate(&circuit, 0).unwrap().dominant_basis_state().0, 0b10);
//!
//! let op = circuit_operator(&circuit).unwrap();
//! assert!(equivalent_up_to_global_phase(&op, &op));
//! ```

pub mod error;
pub mod operator;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use operator::{
    MAX_OPERATOR_QUBITS, circuit_operator, equivalent_up_to_global_phase, is_unitary, simulate,
};
pub use statevector::{MAX_QUBITS, Statevector};
