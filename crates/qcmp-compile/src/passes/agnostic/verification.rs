//! Verification passes for ensuring compilation correctness.
//!
//! [`TargetConformance`] is the post-condition of the decomposer: every
//! operation uses a native gate and every two-qubit operation acts on a
//! coupled pair. A violation means a pass upstream is wrong, so it is
//! reported as an error rather than repaired.

use tracing::debug;

use qcmp_ir::CircuitDag;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of conformance verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConformanceReport {
    /// Operations checked.
    pub ops_checked: usize,
    /// Two-qubit operations whose coupling was checked.
    pub couplings_checked: usize,
}

/// Analysis pass checking native gates and coupled operands.
pub struct TargetConformance;

impl Pass for TargetConformance {
    fn name(&self) -> &'static str {
        "TargetConformance"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;
        let coupling = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;

        let mut report = ConformanceReport::default();
        for (_idx, inst) in dag.topological_ops() {
            report.ops_checked += 1;
            if !basis.contains(inst.name()) {
                return Err(CompileError::NonConforming(format!(
                    "gate '{}' on {:?} is not native",
                    inst.name(),
                    inst.qubits
                )));
            }
            match inst.qubits.as_slice() {
                [_] => {}
                [a, b] => {
                    if !coupling.is_connected(a.0, b.0) {
                        return Err(CompileError::NonConforming(format!(
                            "gate '{}' acts on uncoupled qubits {a} and {b}",
                            inst.name()
                        )));
                    }
                    report.couplings_checked += 1;
                }
                qubits => {
                    return Err(CompileError::NonConforming(format!(
                        "gate '{}' acts on {} qubits",
                        inst.name(),
                        qubits.len()
                    )));
                }
            }
        }

        debug!(
            "Conformance verified: {} ops, {} couplings",
            report.ops_checked, report.couplings_checked
        );
        properties.insert(report);
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some() && properties.coupling_map.is_some()
    }
}
