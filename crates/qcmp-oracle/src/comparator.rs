//! Gate-level less-than comparator.
//!
//! `x < number` holds iff some bit `i` has `number_i = 1`, `x_i = 0` and
//! `x_j = number_j` above it. Scanning from the most significant bit, the
//! "equal so far" condition is folded into ancillas with a Toffoli chain over
//! inputs that are X-conjugated where `number_j = 0`. Each set bit of `number`
//! contributes one controlled toggle of the output; at most one of them fires
//! for any `x`.

use tracing::debug;

use qcmp_ir::{Circuit, Instruction, QubitId, StandardGate};

use crate::error::OracleResult;
use crate::scope::Scope;
use crate::{bit, check_arguments};

/// Largest input register [`build_comparator`] accepts.
pub const MAX_COMPARATOR_QUBITS: u32 = 30;

fn x(qubit: QubitId) -> Instruction {
    Instruction::single_qubit_gate(StandardGate::X, qubit)
}

/// Build the bit-flip oracle `|x, y, 0⟩ → |x, y ⊕ [x < number], 0⟩`.
///
/// Inputs are qubits `0..nqubits`, the output is qubit `nqubits` and the
/// `max(0, nqubits - 2 - L)` ancillas follow, where `L` is the lowest set bit
/// of `number`. `number = 0` yields a circuit without gates.
///
/// # Errors
///
/// [`OracleError::InvalidArgument`](crate::OracleError::InvalidArgument) unless
/// `0 < nqubits <= 30` and `number < 2^nqubits`.
pub fn build_comparator(number: u64, nqubits: u32) -> OracleResult<Circuit> {
    check_arguments(number, nqubits, MAX_COMPARATOR_QUBITS, false)?;

    let mut circuit = Circuit::with_size(format!("less_than_{number}"), nqubits + 1);
    if number == 0 {
        return Ok(circuit);
    }

    let output = QubitId(nqubits);
    let lowest = number.trailing_zeros();

    let mut scope = Scope::open(&mut circuit);
    for j in (lowest + 1)..nqubits {
        if !bit(number, j) {
            scope.compute(x(QubitId(j)))?;
        }
    }

    // Qubit (or ancilla) that is 1 iff x matches number on every bit above i.
    let mut prefix: Option<QubitId> = None;
    for i in (lowest..nqubits).rev() {
        let xi = QubitId(i);
        if bit(number, i) {
            let controls: Vec<QubitId> = prefix.into_iter().chain([xi]).collect();
            scope.apply(x(xi))?;
            scope.apply(Instruction::mcx(&controls, output))?;
            scope.apply(x(xi))?;
        }
        if i == lowest {
            break;
        }
        prefix = Some(match prefix {
            None => xi,
            Some(p) => {
                let ancilla = scope.allocate();
                scope.compute(Instruction::mcx(&[p, xi], ancilla))?;
                ancilla
            }
        });
    }
    let ancillas = scope.close()?;

    debug!(
        "Built comparator for {} on {} qubits: {} ops, {} ancillas",
        number,
        nqubits,
        circuit.num_ops(),
        ancillas
    );
    Ok(circuit)
}

/// [`build_comparator`] that also accepts `number = 2^nqubits`.
///
/// At the boundary every input is below `number`, so the circuit is a single
/// `x` on the output.
pub fn build_comparator_inclusive_bound(number: u64, nqubits: u32) -> OracleResult<Circuit> {
    check_arguments(number, nqubits, MAX_COMPARATOR_QUBITS, true)?;
    if number < 1u64 << nqubits {
        return build_comparator(number, nqubits);
    }
    let mut circuit = Circuit::with_size(format!("less_than_{number}"), nqubits + 1);
    circuit.x(QubitId(nqubits))?;
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OracleError;
    use qcmp_sim::simulate;

    /// Run the oracle on every input and check output and cleanliness.
    fn assert_truth_table(circuit: &Circuit, number: u64, nqubits: u32) {
        for input in 0..(1usize << nqubits) {
            let state = simulate(circuit, input).unwrap();
            let (index, probability) = state.dominant_basis_state();
            let flag = usize::from((input as u64) < number);
            assert!((probability - 1.0).abs() < 1e-9);
            assert_eq!(
                index,
                input | (flag << nqubits),
                "number {number}, input {input}"
            );
        }
    }

    #[test]
    fn test_zero_has_no_gates() {
        let circuit = build_comparator(0, 4).unwrap();
        assert_eq!(circuit.num_ops(), 0);
        assert_eq!(circuit.num_qubits(), 5);
        assert_truth_table(&circuit, 0, 4);
    }

    #[test]
    fn test_exhaustive_small_registers() {
        for nqubits in 1..=4 {
            for number in 0..(1u64 << nqubits) {
                let circuit = build_comparator(number, nqubits).unwrap();
                assert_truth_table(&circuit, number, nqubits);
            }
        }
    }

    #[test]
    fn test_ancilla_count() {
        // Lowest set bit 0: n - 2 ancillas.
        assert_eq!(build_comparator(17, 5).unwrap().num_qubits(), 6 + 3);
        // Lowest set bit 4: the only term is ¬x_4.
        let circuit = build_comparator(16, 5).unwrap();
        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.num_ops(), 3);
        // Lowest set bit 2 of 12 on 4 qubits: no ancillas.
        assert_eq!(build_comparator(12, 4).unwrap().num_qubits(), 5);
        assert_eq!(build_comparator(1, 6).unwrap().num_qubits(), 7 + 4);
    }

    #[test]
    fn test_power_of_two_is_single_term() {
        let circuit = build_comparator(4, 3).unwrap();
        let names: Vec<_> = circuit
            .instructions()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, ["x", "cx", "x"]);
    }

    #[test]
    fn test_inclusive_bound() {
        let circuit = build_comparator_inclusive_bound(8, 3).unwrap();
        assert_eq!(circuit.num_ops(), 1);
        assert_truth_table(&circuit, 8, 3);

        let below = build_comparator_inclusive_bound(5, 3).unwrap();
        assert_truth_table(&below, 5, 3);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            build_comparator(8, 3),
            Err(OracleError::InvalidArgument {
                number: 8,
                nqubits: 3,
                ..
            })
        ));
        assert!(build_comparator(0, 0).is_err());
        assert!(build_comparator(1, 31).is_err());
        assert!(build_comparator_inclusive_bound(9, 3).is_err());
    }

    #[test]
    fn test_wide_register_builds() {
        let number = (1u64 << 29) + 12345;
        let circuit = build_comparator(number, 30).unwrap();
        assert_eq!(circuit.num_qubits(), 31 + 28);
    }
}
