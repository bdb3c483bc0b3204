//! Decomposition of a circuit for a device.

use serde::{Deserialize, Serialize};
use tracing::info;

use qcmp_ir::Circuit;

use crate::device::DeviceModel;
use crate::error::{CompileError, CompileResult};
use crate::manager::PassManagerBuilder;
use crate::passes::TargetFamily;

/// Options for [`decompose_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecomposeOptions {
    /// Optimization level, 0 to 3. Larger values are clamped to 3.
    #[serde(default = "default_optimization_level")]
    pub optimization_level: u8,
}

fn default_optimization_level() -> u8 {
    3
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        Self {
            optimization_level: default_optimization_level(),
        }
    }
}

/// Decompose `circuit` for `device` at the default optimization level.
///
/// The result uses only the device's native gates, every two-qubit gate acts
/// on a coupled pair, and its operator on the whole device equals the input's
/// up to a global phase. The initial placement is restored at the end.
///
/// # Errors
///
/// - [`CompileError::UnsupportedBasis`] if no universal gate family can be
///   built from the device's native gates.
/// - [`CompileError::CapacityExceeded`] if the circuit addresses more qubits
///   than the device has.
///
/// Both are checked before any work is done.
pub fn decompose(circuit: &Circuit, device: &DeviceModel) -> CompileResult<Circuit> {
    decompose_with(circuit, device, &DecomposeOptions::default())
}

/// Decompose `circuit` for `device` with explicit options.
pub fn decompose_with(
    circuit: &Circuit,
    device: &DeviceModel,
    options: &DecomposeOptions,
) -> CompileResult<Circuit> {
    let family = TargetFamily::from_basis(device.basis())?;

    let required = circuit.dag().qubits().last().map_or(0, |q| q.index() + 1);
    let available = device.num_qubits() as usize;
    if required > available {
        return Err(CompileError::CapacityExceeded {
            required,
            available,
        });
    }

    info!(
        "Decomposing '{}' for device '{}' at level {}",
        circuit.name(),
        device.name(),
        options.optimization_level
    );

    let (pm, mut properties) = PassManagerBuilder::new()
        .with_optimization_level(options.optimization_level)
        .with_device(device)
        .build();
    properties.insert(family);

    let mut dag = circuit.dag().clone();
    pm.run(&mut dag, &mut properties)?;
    Ok(Circuit::from_dag(circuit.name(), dag))
}
