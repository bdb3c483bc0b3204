//! Error types for the oracle builders.

use qcmp_ir::IrError;
use thiserror::Error;

/// Errors raised by the oracle builders.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// `number` or `nqubits` is out of range.
    #[error("Invalid argument (number = {number}, nqubits = {nqubits}): {reason}")]
    InvalidArgument {
        /// The requested bound.
        number: u64,
        /// The requested register width.
        nqubits: u32,
        /// What is wrong with them.
        reason: String,
    },

    /// An interval whose bounds are out of order or out of range.
    #[error("Invalid interval ({lower}, {upper}) on {nqubits} qubits")]
    InvalidInterval {
        /// Exclusive lower bound.
        lower: u64,
        /// Exclusive upper bound.
        upper: u64,
        /// The requested register width.
        nqubits: u32,
    },

    /// Error from the IR layer.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for oracle construction.
pub type OracleResult<T> = Result<T, OracleError>;
