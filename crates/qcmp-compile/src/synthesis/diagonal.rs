//! Diagonal unitary synthesis with Walsh coefficients and Gray-code CX walks.
//!
//! A diagonal `diag(e^{iφ(x)})` equals `exp(i Σ_S c_S · Z_S)` where `Z_S` is
//! the product of Pauli-Z over the qubits in `S` and `c_S` is the Walsh
//! transform of `φ`. For every target qubit `t` the terms whose highest qubit
//! is `t` are emitted by walking the lower qubits in Gray-code order: each
//! step adds one CX into `t`, and the accumulated parity receives one `rz`.

use qcmp_ir::{Instruction, QubitId, StandardGate};

use crate::unitary::EPSILON;

/// Rotations and CX gates realizing `diag(e^{i·phases[x]})` on `qubits`.
///
/// `phases` has one entry per basis state, with qubit `i` as bit `i` of the
/// index. The result is exact up to global phase.
pub fn diagonal_rotations(phases: &[f64], qubits: &[QubitId]) -> Vec<Instruction> {
    let n = qubits.len();
    debug_assert_eq!(phases.len(), 1 << n);
    let coefficients = walsh_coefficients(phases);
    let mut out = Vec::new();

    for t in 0..n {
        let block = 1usize << t;
        if (0..block).all(|g| coefficients[block | g].abs() < EPSILON) {
            continue;
        }

        let mut previous = 0usize;
        for i in 0..block {
            let gray = i ^ (i >> 1);
            if i > 0 {
                let changed = (gray ^ previous).trailing_zeros() as usize;
                out.push(Instruction::two_qubit_gate(
                    StandardGate::CX,
                    qubits[changed],
                    qubits[t],
                ));
            }
            let angle = -2.0 * coefficients[block | gray];
            if angle.abs() > EPSILON {
                out.push(Instruction::single_qubit_gate(StandardGate::Rz(angle), qubits[t]));
            }
            previous = gray;
        }
        if t > 0 {
            // The Gray walk ends on the single bit t-1.
            out.push(Instruction::two_qubit_gate(
                StandardGate::CX,
                qubits[t - 1],
                qubits[t],
            ));
        }
    }

    out
}

/// Normalized Walsh-Hadamard transform: `c_S = (1/N) Σ_x φ(x)·(-1)^{|S∧x|}`.
fn walsh_coefficients(phases: &[f64]) -> Vec<f64> {
    let mut c = phases.to_vec();
    let len = c.len();
    let mut half = 1;
    while half < len {
        for start in (0..len).step_by(2 * half) {
            for k in start..start + half {
                let (a, b) = (c[k], c[k + half]);
                c[k] = a + b;
                c[k + half] = a - b;
            }
        }
        half *= 2;
    }
    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / len as f64;
    c.iter_mut().for_each(|v| *v *= scale);
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use qcmp_ir::{Circuit, Instruction, UnitaryGate};
    use qcmp_sim::{circuit_operator, equivalent_up_to_global_phase};

    fn check(phases: &[f64]) -> Vec<Instruction> {
        let n = phases.len().trailing_zeros();
        let qubits: Vec<QubitId> = (0..n).map(QubitId).collect();
        let gates = diagonal_rotations(phases, &qubits);

        let got = circuit_operator(&Circuit::from_instructions("d", n, gates.clone()).unwrap()).unwrap();
        let dim = phases.len();
        let mut matrix = vec![Complex64::new(0.0, 0.0); dim * dim];
        for (x, phi) in phases.iter().enumerate() {
            matrix[x * dim + x] = Complex64::from_polar(1.0, *phi);
        }
        let block = UnitaryGate::new("diag", n, matrix).unwrap();
        let want = circuit_operator(
            &Circuit::from_instructions("d", n, [Instruction::gate(block, qubits)]).unwrap(),
        )
        .unwrap();
        assert!(equivalent_up_to_global_phase(&got, &want), "{phases:?}");
        gates
    }

    #[test]
    fn test_walsh_of_constant_is_global_phase() {
        let c = walsh_coefficients(&[0.3; 8]);
        assert!((c[0] - 0.3).abs() < 1e-12);
        assert!(c[1..].iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_global_phase_emits_nothing() {
        assert!(check(&[1.1; 4]).is_empty());
    }

    #[test]
    fn test_single_qubit_diagonal() {
        let gates = check(&[0.0, 0.9]);
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].name(), "rz");
    }

    #[test]
    fn test_controlled_z_phase() {
        check(&[0.0, 0.0, 0.0, std::f64::consts::PI]);
    }

    #[test]
    fn test_arbitrary_diagonals() {
        check(&[0.4, -1.3, 2.2, 0.0, 1.7, -0.2, 0.9, 3.0]);
        check(&[
            0.1, 0.5, -0.7, 1.3, 2.9, -2.4, 0.0, 0.6, 1.0, -1.0, 0.25, 0.75, -0.5, 1.5, 2.5, -3.0,
        ]);
    }

    #[test]
    fn test_oracle_sign_pattern() {
        // -1 on the first five of eight states.
        let pi = std::f64::consts::PI;
        check(&[pi, pi, pi, pi, pi, 0.0, 0.0, 0.0]);
    }
}
