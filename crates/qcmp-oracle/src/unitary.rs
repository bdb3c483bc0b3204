//! Dense-matrix forms of the less-than oracle.

use num_complex::Complex64;
use tracing::debug;

use qcmp_ir::{Circuit, QubitId, UnitaryGate};

use crate::check_arguments;
use crate::error::OracleResult;

/// Largest input register the dense builders accept.
pub const MAX_UNITARY_QUBITS: u32 = 10;

/// Build the bit-flip oracle as a single permutation block.
///
/// The block spans the inputs `0..nqubits` and the output `nqubits`, with
/// basis index `x + (y << nqubits)`. It swaps `|x,0⟩` and `|x,1⟩` for every
/// `x < number` and fixes all other states. The register layout and the
/// operator match [`build_comparator`](crate::build_comparator) on the qubits
/// the two share.
pub fn build_unitary_oracle(number: u64, nqubits: u32) -> OracleResult<Circuit> {
    check_arguments(number, nqubits, MAX_UNITARY_QUBITS, false)?;

    let width = nqubits + 1;
    let dim = 1usize << width;
    let output_bit = 1usize << nqubits;
    let mut matrix = vec![Complex64::new(0.0, 0.0); dim * dim];
    for col in 0..dim {
        let x = (col & (output_bit - 1)) as u64;
        let row = if x < number { col ^ output_bit } else { col };
        matrix[row * dim + col] = Complex64::new(1.0, 0.0);
    }

    let block = UnitaryGate::new("less_than", width, matrix)?;
    let mut circuit = Circuit::with_size(format!("less_than_unitary_{number}"), width);
    circuit.unitary(block, (0..width).map(QubitId))?;
    debug!(
        "Built {}x{} permutation oracle for {} on {} qubits",
        dim, dim, number, nqubits
    );
    Ok(circuit)
}

/// Build the phase oracle `|x⟩ → (-1)^[x < number] |x⟩` as a diagonal block.
///
/// The block spans the inputs only.
pub fn build_diagonal_oracle(number: u64, nqubits: u32) -> OracleResult<Circuit> {
    check_arguments(number, nqubits, MAX_UNITARY_QUBITS, false)?;

    let dim = 1usize << nqubits;
    let mut matrix = vec![Complex64::new(0.0, 0.0); dim * dim];
    for k in 0..dim {
        let sign = if (k as u64) < number { -1.0 } else { 1.0 };
        matrix[k * dim + k] = Complex64::new(sign, 0.0);
    }

    let block = UnitaryGate::new("diagonal_less_than", nqubits, matrix)?;
    let mut circuit = Circuit::with_size(format!("less_than_diagonal_{number}"), nqubits);
    circuit.unitary(block, (0..nqubits).map(QubitId))?;
    Ok(circuit)
}
