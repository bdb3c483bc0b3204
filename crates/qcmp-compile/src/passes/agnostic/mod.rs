//! Target-agnostic compilation passes.
//!
//! These passes rewrite the DAG without consulting the coupling map. Some of
//! them read the native gate set to decide which gates to keep, but none of
//! them moves a gate between qubits.

pub mod optimization;
pub mod unroll;
pub mod verification;

pub use optimization::{
    CancelTwoQubit, CommutativeCancellation, MAX_ITERATIONS, OptimizationLoop, Optimize1qGates,
};
pub use unroll::UnrollMultiQubit;
pub use verification::{ConformanceReport, TargetConformance};
