//! Ancilla-free phase oracles for comparison predicates.
//!
//! Each marked basis state `|x⟩` picks up an exact `-1`. A predicate is a
//! disjoint union of terms "`x` agrees with a pattern above bit `i` and `x_i`
//! has a given value"; each term is one multi-controlled `Z` over qubits
//! `i..nqubits`, X-conjugated where the required value is `0`.

use qcmp_ir::{Circuit, Instruction, QubitId};

use crate::comparator::MAX_COMPARATOR_QUBITS;
use crate::error::{OracleError, OracleResult};
use crate::{bit, check_arguments};

/// Accumulates phase-marking terms, toggling X conjugations lazily.
struct PhaseMarker {
    circuit: Circuit,
    nqubits: u32,
    flipped: Vec<bool>,
}

impl PhaseMarker {
    fn new(name: String, nqubits: u32) -> Self {
        Self {
            circuit: Circuit::with_size(name, nqubits),
            nqubits,
            flipped: vec![false; nqubits as usize],
        }
    }

    fn set_flipped(&mut self, qubit: u32, flipped: bool) -> OracleResult<()> {
        let slot = &mut self.flipped[qubit as usize];
        if *slot != flipped {
            *slot = flipped;
            self.circuit.x(QubitId(qubit))?;
        }
        Ok(())
    }

    /// Negate every `x` with `x_j = pattern_j` for `j > pivot` and `x_pivot = value`.
    fn mark(&mut self, pattern: u64, pivot: u32, value: bool) -> OracleResult<()> {
        for j in (pivot + 1)..self.nqubits {
            self.set_flipped(j, !bit(pattern, j))?;
        }
        self.set_flipped(pivot, !value)?;

        let target = QubitId(pivot);
        let controls: Vec<QubitId> = ((pivot + 1)..self.nqubits).map(QubitId).collect();
        if controls.is_empty() {
            self.circuit.z(target)?;
        } else {
            self.circuit.h(target)?;
            self.circuit.push(Instruction::mcx(&controls, target))?;
            self.circuit.h(target)?;
        }
        Ok(())
    }

    /// Mark `x < number`: one term per set bit.
    fn mark_below(&mut self, number: u64) -> OracleResult<()> {
        for i in (0..self.nqubits).rev() {
            if bit(number, i) {
                self.mark(number, i, false)?;
            }
        }
        Ok(())
    }

    /// Mark `x > number`: one term per clear bit.
    fn mark_above(&mut self, number: u64) -> OracleResult<()> {
        for i in (0..self.nqubits).rev() {
            if !bit(number, i) {
                self.mark(number, i, true)?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> OracleResult<Circuit> {
        for qubit in 0..self.nqubits {
            self.set_flipped(qubit, false)?;
        }
        Ok(self.circuit)
    }
}

/// Phase oracle `|x⟩ → (-1)^[x < number] |x⟩` on `nqubits` inputs.
pub fn phase_less_than(number: u64, nqubits: u32) -> OracleResult<Circuit> {
    check_arguments(number, nqubits, MAX_COMPARATOR_QUBITS, false)?;
    let mut marker = PhaseMarker::new(format!("phase_less_than_{number}"), nqubits);
    marker.mark_below(number)?;
    marker.finish()
}

/// Phase oracle `|x⟩ → (-1)^[x > number] |x⟩` on `nqubits` inputs.
pub fn phase_greater_than(number: u64, nqubits: u32) -> OracleResult<Circuit> {
    check_arguments(number, nqubits, MAX_COMPARATOR_QUBITS, false)?;
    let mut marker = PhaseMarker::new(format!("phase_greater_than_{number}"), nqubits);
    marker.mark_above(number)?;
    marker.finish()
}

/// Phase oracle marking the open interval `lower < x < upper`.
///
/// # Errors
///
/// [`OracleError::InvalidInterval`] unless `lower < upper <= 2^nqubits` and
/// `0 < nqubits <= 30`.
pub fn phase_interval(lower: u64, upper: u64, nqubits: u32) -> OracleResult<Circuit> {
    if nqubits == 0
        || nqubits > MAX_COMPARATOR_QUBITS
        || lower >= upper
        || upper > 1u64 << nqubits
    {
        return Err(OracleError::InvalidInterval {
            lower,
            upper,
            nqubits,
        });
    }

    let mut marker = PhaseMarker::new(format!("phase_interval_{lower}_{upper}"), nqubits);
    if upper == 1u64 << nqubits {
        marker.mark_above(lower)?;
    } else if lower + 1 < upper {
        // [x < upper] xor [x <= lower]
        marker.mark_below(upper)?;
        marker.mark_below(lower + 1)?;
    }
    marker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use qcmp_sim::simulate;

    /// Check that every input keeps its basis state and picks up the expected sign.
    fn assert_marks(circuit: &Circuit, nqubits: u32, marked: impl Fn(u64) -> bool) {
        for input in 0..(1usize << nqubits) {
            let state = simulate(circuit, input).unwrap();
            let sign = if marked(input as u64) { -1.0 } else { 1.0 };
            assert!(
                (state.amplitudes()[input] - Complex64::new(sign, 0.0)).norm() < 1e-9,
                "{} on input {input}",
                circuit.name()
            );
        }
    }

    #[test]
    fn test_less_than() {
        for nqubits in 1..=4 {
            for number in 0..(1u64 << nqubits) {
                let circuit = phase_less_than(number, nqubits).unwrap();
                assert_eq!(circuit.num_qubits(), nqubits as usize);
                assert_marks(&circuit, nqubits, |x| x < number);
            }
        }
        assert_eq!(phase_less_than(0, 3).unwrap().num_ops(), 0);
    }

    #[test]
    fn test_greater_than() {
        for nqubits in 1..=4 {
            for number in 0..(1u64 << nqubits) {
                let circuit = phase_greater_than(number, nqubits).unwrap();
                assert_marks(&circuit, nqubits, |x| x > number);
            }
        }
        assert_eq!(phase_greater_than(7, 3).unwrap().num_ops(), 0);
    }

    #[test]
    fn test_interval() {
        let nqubits = 4;
        for upper in 1..=16u64 {
            for lower in 0..upper {
                let circuit = phase_interval(lower, upper, nqubits).unwrap();
                assert_marks(&circuit, nqubits, |x| lower < x && x < upper);
            }
        }
    }

    #[test]
    fn test_single_term_uses_one_flip_pair() {
        // 0b100 on 3 qubits: the only term is x_2 = 0.
        let circuit = phase_less_than(4, 3).unwrap();
        let names: Vec<_> = circuit
            .instructions()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, ["x", "z", "x"]);
    }

    #[test]
    fn test_invalid_interval() {
        for (lower, upper) in [(3, 3), (5, 2), (0, 17)] {
            assert!(matches!(
                phase_interval(lower, upper, 4),
                Err(OracleError::InvalidInterval { .. })
            ));
        }
        assert!(phase_interval(0, 1, 0).is_err());
    }
}
