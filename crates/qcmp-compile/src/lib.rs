//! qcmp Basis and Connectivity Decomposer
//!
//! This crate rewrites circuits so that they run on a target device: every
//! gate ends up in the device's native vocabulary and every two-qubit gate on
//! a coupled pair of physical qubits. It is built as a pass pipeline over the
//! circuit DAG, sharing a [`PropertySet`] between passes.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (coupling map, basis gates, layout, family)
//! └─────────────┘
//!       │
//!       ├── TrivialLayout
//!       ├── UnrollMultiQubit
//!       ├── CancelTwoQubit (level ≥ 2)
//!       ├── ShortestPathRouting + UnrollMultiQubit
//!       ├── BasisTranslation
//!       ├── OptimizationLoop (level ≥ 1)
//!       └── TargetConformance
//!       │
//!       ▼
//! Output Circuit (native gates, coupled pairs)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qcmp_compile::{DeviceModel, decompose};
//! use qcmp_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("toffoli", 3);
//! circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
//!
//! let device = DeviceModel::heavy_hex_16();
//! let compiled = decompose(&circuit, &device).unwrap();
//! assert!(compiled.instructions().iter().all(|i| device.supports(i.name())));
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | Layout, unrolling, routing and translation only |
//! | 1 | + single-qubit run merging |
//! | 2 | + two-qubit cancellation, before routing and in the loop |
//! | 3 | + commutative rotation merging (default) |
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use qcmp_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use qcmp_ir::CircuitDag;
//!
//! struct CountOps;
//!
//! impl Pass for CountOps {
//!     fn name(&self) -> &str { "count_ops" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, dag: &mut CircuitDag, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(dag.num_ops());
//!         Ok(())
//!     }
//! }
//! ```

pub mod decompose;
pub mod device;
pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod synthesis;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use decompose::{DecomposeOptions, decompose, decompose_with};
pub use device::{DeviceModel, DeviceProfile, PRESET_NAMES};
pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::{OneQubitBasis, RoutingStats, TargetFamily};
pub use property::{BasisGates, CouplingMap, Layout, PropertySet};
pub use unitary::Unitary2x2;
