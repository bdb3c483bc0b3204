//! Layout passes for mapping logical qubits to physical qubits.

use qcmp_ir::{CircuitDag, CircuitLevel, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{Layout, PropertySet};

/// Trivial layout pass.
///
/// Maps logical qubit i to physical qubit i and widens the circuit to the
/// device's qubit count, so unused device qubits carry the identity.
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;

        let num_physical = coupling_map.num_qubits();
        // Qubit ids are positions, so a sparse circuit still needs max+1 qubits.
        let required = dag.qubits().last().map_or(0, |q| q.index() + 1);
        let available = num_physical as usize;
        if required > available {
            return Err(CompileError::CapacityExceeded {
                required,
                available,
            });
        }

        for p in 0..num_physical {
            dag.add_qubit(QubitId(p));
        }
        properties.layout = Some(Layout::trivial(num_physical));
        dag.set_level(CircuitLevel::Physical);

        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.layout.is_none() && properties.coupling_map.is_some()
    }
}
