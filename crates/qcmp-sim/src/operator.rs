//! Full-operator construction and comparison.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use qcmp_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Largest register for which [`circuit_operator`] builds a dense matrix.
pub const MAX_OPERATOR_QUBITS: usize = 10;

/// Tolerance used by [`equivalent_up_to_global_phase`] and [`is_unitary`].
pub const TOLERANCE: f64 = 1e-8;

/// Register width of a circuit: one past its highest qubit index.
fn register_width(circuit: &Circuit) -> usize {
    circuit.dag().qubits().last().map_or(0, |q| q.index() + 1)
}

/// Run `circuit` on the basis state `|input⟩`.
pub fn simulate(circuit: &Circuit, input: usize) -> SimResult<Statevector> {
    let mut state = Statevector::from_basis(register_width(circuit), input)?;
    for (_idx, inst) in circuit.dag().topological_ops() {
        state.apply(inst)?;
    }
    Ok(state)
}

/// The `2^n × 2^n` operator implemented by `circuit`.
///
/// Column `j` is the image of the basis state `|j⟩`.
pub fn circuit_operator(circuit: &Circuit) -> SimResult<Array2<Complex64>> {
    let n = register_width(circuit);
    if n > MAX_OPERATOR_QUBITS {
        return Err(SimError::TooManyQubits {
            num_qubits: n,
            max: MAX_OPERATOR_QUBITS,
        });
    }
    let dim = 1 << n;
    debug!("Building {}x{} operator for '{}'", dim, dim, circuit.name());

    let mut operator = Array2::zeros((dim, dim));
    for j in 0..dim {
        let state = simulate(circuit, j)?;
        for (i, amp) in state.amplitudes().iter().enumerate() {
            operator[[i, j]] = *amp;
        }
    }
    Ok(operator)
}

/// Whether `a` and `b` are equal up to a global phase.
pub fn equivalent_up_to_global_phase(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    // Reference the phase on the largest entry of `a`.
    let Some((pivot, reference)) = a
        .indexed_iter()
        .max_by(|(_, x), (_, y)| x.norm_sqr().total_cmp(&y.norm_sqr()))
    else {
        return true;
    };
    if reference.norm() < TOLERANCE {
        return b.iter().all(|z| z.norm() < TOLERANCE);
    }
    let phase = b[pivot] / reference;
    if (phase.norm() - 1.0).abs() > TOLERANCE {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x * phase - y).norm() < TOLERANCE)
}

/// Whether `m` is unitary, `m† m = I`.
pub fn is_unitary(m: &Array2<Complex64>) -> bool {
    let (rows, cols) = m.dim();
    if rows != cols {
        return false;
    }
    let product = m.t().mapv(|z| z.conj()).dot(m);
    product.indexed_iter().all(|((r, c), z)| {
        let expected = if r == c { 1.0 } else { 0.0 };
        (z - Complex64::new(expected, 0.0)).norm() < TOLERANCE
    })
}
