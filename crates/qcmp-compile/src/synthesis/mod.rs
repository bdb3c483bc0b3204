//! Gate synthesis into single-qubit rotations and CX.
//!
//! | Input | Construction |
//! |-------|--------------|
//! | 1-qubit matrix | ZYZ Euler rotations |
//! | controlled 1-qubit gate | two CX around A, B, C rotations |
//! | `ccx` | 6-CX Toffoli network |
//! | `mcx`, multi-controlled U | linear-depth root ladder |
//! | diagonal block | Walsh coefficients over a Gray-code CX walk |
//! | dense block | Givens elimination with two-level rotations |
//!
//! Every construction is exact up to a global phase. Rotations with an angle
//! below 1e-10 are dropped.

mod controlled;
mod dense;
mod diagonal;
mod one_qubit;

pub use controlled::{mcx, multi_controlled, toffoli};
pub use dense::synthesize_unitary;
pub use diagonal::diagonal_rotations;
pub use one_qubit::{controlled, euler_rotations};

pub(crate) use one_qubit::push_rotation;
