//! Built-in compilation passes.
//!
//! Passes are organized into two categories:
//! - [`agnostic`]: passes that operate on the DAG structure alone
//! - [`target`]: passes that require hardware properties

pub mod agnostic;
pub mod target;

pub use agnostic::{
    CancelTwoQubit, CommutativeCancellation, ConformanceReport, OptimizationLoop,
    Optimize1qGates, TargetConformance, UnrollMultiQubit,
};
pub use target::{
    BasisTranslation, Entangler, OneQubitBasis, RoutingStats, ShortestPathRouting, TargetFamily,
    TrivialLayout,
};
