//! Single-qubit and singly-controlled gate synthesis.

use qcmp_ir::{Instruction, QubitId, StandardGate};

use crate::unitary::{EPSILON, Unitary2x2};

/// Push a rotation unless its normalized angle vanishes.
pub(crate) fn push_rotation(
    out: &mut Vec<Instruction>,
    gate: fn(f64) -> StandardGate,
    angle: f64,
    qubit: QubitId,
) {
    let angle = Unitary2x2::normalize_angle(angle);
    if angle.abs() > EPSILON {
        out.push(Instruction::single_qubit_gate(gate(angle), qubit));
    }
}

/// `rz(γ) ry(β) rz(α)` in time order, equal to `u` up to global phase.
pub fn euler_rotations(u: &Unitary2x2, qubit: QubitId) -> Vec<Instruction> {
    let angles = u.zyz_decomposition();
    let mut out = Vec::with_capacity(3);
    push_rotation(&mut out, StandardGate::Rz, angles.gamma, qubit);
    push_rotation(&mut out, StandardGate::Ry, angles.beta, qubit);
    push_rotation(&mut out, StandardGate::Rz, angles.alpha, qubit);
    out
}

/// Controlled-`u` from two CX gates and target rotations.
///
/// With `u = e^{iφ}·A·X·B·X·C` and `A·B·C = I`, the target receives
/// `C, CX, B, CX, A` and the phase `e^{iφ}` lands on the control as `rz(φ)`.
/// The result equals controlled-`u` up to a global phase of the whole register.
pub fn controlled(u: &Unitary2x2, control: QubitId, target: QubitId) -> Vec<Instruction> {
    let angles = u.zyz_decomposition();
    let (alpha, beta, gamma) = (angles.alpha, angles.beta, angles.gamma);
    let mut out = Vec::with_capacity(8);

    push_rotation(&mut out, StandardGate::Rz, (gamma - alpha) / 2.0, target);
    out.push(Instruction::two_qubit_gate(StandardGate::CX, control, target));
    push_rotation(&mut out, StandardGate::Rz, -(gamma + alpha) / 2.0, target);
    push_rotation(&mut out, StandardGate::Ry, -beta / 2.0, target);
    out.push(Instruction::two_qubit_gate(StandardGate::CX, control, target));
    push_rotation(&mut out, StandardGate::Ry, beta / 2.0, target);
    push_rotation(&mut out, StandardGate::Rz, alpha, target);
    push_rotation(&mut out, StandardGate::Rz, angles.phase, control);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use num_complex::Complex64;
    use qcmp_ir::{Circuit, Gate, UnitaryGate};
    use qcmp_sim::{circuit_operator, equivalent_up_to_global_phase};

    fn operator_of(num_qubits: u32, instructions: Vec<Instruction>) -> Array2<Complex64> {
        let circuit = Circuit::from_instructions("t", num_qubits, instructions).unwrap();
        circuit_operator(&circuit).unwrap()
    }

    fn samples() -> Vec<Unitary2x2> {
        vec![
            Unitary2x2::x(),
            Unitary2x2::h(),
            Unitary2x2::sx(),
            Unitary2x2::rz(0.3),
            Unitary2x2::rx(-1.2).phased(0.8),
            Unitary2x2::from_standard(&StandardGate::U(2.1, 0.4, -1.7)).unwrap(),
            Unitary2x2::from_standard(&StandardGate::T).unwrap(),
        ]
    }

    #[test]
    fn test_euler_rotations_match() {
        for u in samples() {
            let got = operator_of(1, euler_rotations(&u, QubitId(0)));
            let want = operator_of(
                1,
                vec![Instruction::gate(
                    UnitaryGate::new("u", 1, u.data.to_vec()).unwrap(),
                    [QubitId(0)],
                )],
            );
            assert!(equivalent_up_to_global_phase(&got, &want));
            assert!(euler_rotations(&u, QubitId(0)).len() <= 3);
        }
    }

    #[test]
    fn test_identity_emits_nothing() {
        assert!(euler_rotations(&Unitary2x2::identity(), QubitId(0)).is_empty());
        assert!(euler_rotations(&Unitary2x2::identity().phased(1.0), QubitId(0)).is_empty());
    }

    #[test]
    fn test_controlled_matches() {
        for u in samples() {
            for (control, target) in [(QubitId(0), QubitId(1)), (QubitId(1), QubitId(0))] {
                let got = operator_of(2, controlled(&u, control, target));

                // Controlled-u as a dense block: identity unless the control bit is set.
                let mut matrix = vec![Complex64::new(0.0, 0.0); 16];
                for col in 0..4usize {
                    let c_bit = (col >> control.index()) & 1;
                    if c_bit == 0 {
                        matrix[col * 4 + col] = Complex64::new(1.0, 0.0);
                        continue;
                    }
                    let t_bit = (col >> target.index()) & 1;
                    for out_bit in 0..2usize {
                        let row = (col & !(1 << target.index())) | (out_bit << target.index());
                        matrix[row * 4 + col] = u.data[out_bit * 2 + t_bit];
                    }
                }
                let want = operator_of(
                    2,
                    vec![Instruction::gate(
                        Gate::unitary(UnitaryGate::new("cu", 2, matrix).unwrap()),
                        [QubitId(0), QubitId(1)],
                    )],
                );
                assert!(equivalent_up_to_global_phase(&got, &want), "{u:?}");
            }
        }
    }
}
