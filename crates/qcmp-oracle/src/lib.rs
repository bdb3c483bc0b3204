//! qcmp Less-Than Oracles
//!
//! Builders for oracles marking the basis states `|x⟩` with `x < number`:
//!
//! - [`build_comparator`]: a gate-level borrow comparator made of `x`, `ccx`
//!   and multi-controlled-not gates, with clean ancillas.
//! - [`build_unitary_oracle`]: the same bit-flip oracle as one dense
//!   permutation block.
//! - [`build_diagonal_oracle`] and the [`phase`] module: phase-marking forms.
//!
//! Both bit-flip oracles share one register layout. Inputs `0..nqubits` hold
//! `x` little-endian, qubit `nqubits` is the output, and the comparator's
//! ancillas follow it.
//!
//! # Example
//!
//! ```rust
//! use qcmp_oracle::{build_comparator, build_unitary_oracle};
//!
//! let comparator = build_comparator(5, 3).unwrap();
//! let unitary = build_unitary_oracle(5, 3).unwrap();
//!
//! assert_eq!(unitary.num_ops(), 1);
//! assert!(comparator.num_qubits() >= unitary.num_qubits());
//! ```

pub mod comparator;
pub mod error;
pub mod phase;
pub mod scope;
pub mod unitary;

pub use comparator::{MAX_COMPARATOR_QUBITS, build_comparator, build_comparator_inclusive_bound};
pub use error::{OracleError, OracleResult};
pub use phase::{phase_greater_than, phase_interval, phase_less_than};
pub use scope::Scope;
pub use unitary::{MAX_UNITARY_QUBITS, build_diagonal_oracle, build_unitary_oracle};

/// Check `0 < nqubits <= max_qubits` and `number < 2^nqubits`.
///
/// With `inclusive`, `number == 2^nqubits` is accepted as well.
pub(crate) fn check_arguments(
    number: u64,
    nqubits: u32,
    max_qubits: u32,
    inclusive: bool,
) -> OracleResult<()> {
    let invalid = |reason: String| {
        Err(OracleError::InvalidArgument {
            number,
            nqubits,
            reason,
        })
    };
    if nqubits == 0 {
        return invalid("nqubits must be positive".into());
    }
    if nqubits > max_qubits {
        return invalid(format!("at most {max_qubits} qubits are supported"));
    }
    let size = 1u64 << nqubits;
    if number > size || (number == size && !inclusive) {
        return invalid(format!("number must be below 2^{nqubits}"));
    }
    Ok(())
}

/// Bit `i` of `value`.
pub(crate) fn bit(value: u64, i: u32) -> bool {
    (value >> i) & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_arguments() {
        assert!(check_arguments(7, 3, 30, false).is_ok());
        assert!(check_arguments(0, 1, 30, false).is_ok());
        assert!(check_arguments(8, 3, 30, true).is_ok());

        for (number, nqubits) in [(8, 3), (0, 0), (1, 31)] {
            let err = check_arguments(number, nqubits, 30, false).unwrap_err();
            assert!(matches!(
                err,
                OracleError::InvalidArgument { number: n, nqubits: q, .. } if n == number && q == nqubits
            ));
        }
        assert!(check_arguments(9, 3, 30, true).is_err());
    }
}
