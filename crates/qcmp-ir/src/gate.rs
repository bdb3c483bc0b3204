//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use crate::error::{IrError, IrResult};

/// Absolute tolerance used when checking that a dense matrix is unitary.
pub const UNITARY_TOLERANCE: f64 = 1e-9;

/// Standard gates with known semantics.
///
/// Multi-qubit gates list their controls first and their target last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),
    /// Phased RX gate: PRX(θ, φ) = RZ(φ) · RX(θ) · RZ(-φ).
    PRX(f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,

    /// Multi-controlled X with the given number of controls.
    MCX(u32),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::PRX(_, _) => "prx",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
            StandardGate::MCX(_) => "mcx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _)
            | StandardGate::PRX(_, _) => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,

            StandardGate::CCX => 3,

            StandardGate::MCX(k) => k + 1,
        }
    }

    /// Get the continuous parameters of this gate.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(p) | StandardGate::Ry(p) | StandardGate::Rz(p) | StandardGate::P(p) => {
                vec![*p]
            }
            StandardGate::U(a, b, c) => vec![*a, *b, *c],
            StandardGate::PRX(theta, phi) => vec![*theta, *phi],
            _ => vec![],
        }
    }

    /// The inverse gate.
    #[must_use]
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,
            StandardGate::Rx(t) => StandardGate::Rx(-t),
            StandardGate::Ry(t) => StandardGate::Ry(-t),
            StandardGate::Rz(t) => StandardGate::Rz(-t),
            StandardGate::P(t) => StandardGate::P(-t),
            StandardGate::U(theta, phi, lambda) => StandardGate::U(-theta, -lambda, -phi),
            StandardGate::PRX(theta, phi) => StandardGate::PRX(-theta, *phi),
            other => other.clone(),
        }
    }

    /// Whether applying the gate twice yields the identity.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::CX
                | StandardGate::CZ
                | StandardGate::Swap
                | StandardGate::CCX
                | StandardGate::MCX(_)
        )
    }

    /// Row-major 2x2 matrix of a single-qubit gate, `None` for wider gates.
    pub fn single_qubit_matrix(&self) -> Option<[Complex64; 4]> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let m = match self {
            StandardGate::I => [one, zero, zero, one],
            StandardGate::X => [zero, one, one, zero],
            StandardGate::Y => [zero, -i, i, zero],
            StandardGate::Z => [one, zero, zero, -one],
            StandardGate::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                [h, h, h, -h]
            }
            StandardGate::S => [one, zero, zero, i],
            StandardGate::Sdg => [one, zero, zero, -i],
            StandardGate::T => [one, zero, zero, Complex64::from_polar(1.0, FRAC_PI_4)],
            StandardGate::Tdg => [one, zero, zero, Complex64::from_polar(1.0, -FRAC_PI_4)],
            StandardGate::SX => {
                let a = Complex64::new(0.5, 0.5);
                let b = Complex64::new(0.5, -0.5);
                [a, b, b, a]
            }
            StandardGate::SXdg => {
                let a = Complex64::new(0.5, -0.5);
                let b = Complex64::new(0.5, 0.5);
                [a, b, b, a]
            }
            StandardGate::Rx(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                [c.into(), -i * s, -i * s, c.into()]
            }
            StandardGate::Ry(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                [c.into(), (-s).into(), s.into(), c.into()]
            }
            StandardGate::Rz(theta) => [
                Complex64::from_polar(1.0, -theta / 2.0),
                zero,
                zero,
                Complex64::from_polar(1.0, theta / 2.0),
            ],
            StandardGate::P(theta) => [one, zero, zero, Complex64::from_polar(1.0, *theta)],
            StandardGate::U(theta, phi, lambda) => {
                let (s, c) = (theta / 2.0).sin_cos();
                [
                    c.into(),
                    -Complex64::from_polar(s, *lambda),
                    Complex64::from_polar(s, *phi),
                    Complex64::from_polar(c, phi + lambda),
                ]
            }
            StandardGate::PRX(theta, phi) => {
                let (s, c) = (theta / 2.0).sin_cos();
                [
                    c.into(),
                    -i * Complex64::from_polar(s, -phi),
                    -i * Complex64::from_polar(s, *phi),
                    c.into(),
                ]
            }
            StandardGate::CX
            | StandardGate::CZ
            | StandardGate::Swap
            | StandardGate::CCX
            | StandardGate::MCX(_) => return None,
        };
        Some(m)
    }
}

/// A dense unitary block over `num_qubits` qubits.
///
/// The matrix is stored row-major with dimension `2^num_qubits`. Qubit `i` of the
/// block is bit `i` (little-endian) of the row and column index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryGate {
    /// The name of the block.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Row-major matrix entries.
    pub matrix: Vec<Complex64>,
}

impl UnitaryGate {
    /// Create a unitary block, validating its dimension and unitarity.
    pub fn new(name: impl Into<String>, num_qubits: u32, matrix: Vec<Complex64>) -> IrResult<Self> {
        let gate = Self {
            name: name.into(),
            num_qubits,
            matrix,
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Matrix dimension (`2^num_qubits`).
    #[inline]
    pub fn dim(&self) -> usize {
        1usize << self.num_qubits
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dim() + col]
    }

    /// Whether every off-diagonal entry vanishes.
    pub fn is_diagonal(&self) -> bool {
        let dim = self.dim();
        (0..dim).all(|r| (0..dim).all(|c| r == c || self.entry(r, c).norm() < UNITARY_TOLERANCE))
    }

    /// Check the matrix shape and `U†U = I`.
    pub fn validate(&self) -> IrResult<()> {
        let invalid = |reason: String| IrError::InvalidUnitary {
            name: self.name.clone(),
            reason,
        };
        if self.num_qubits == 0 || self.num_qubits > 16 {
            return Err(invalid(format!(
                "unsupported width of {} qubits",
                self.num_qubits
            )));
        }
        let dim = self.dim();
        if self.matrix.len() != dim * dim {
            return Err(invalid(format!(
                "expected {} entries for a {}-qubit block, got {}",
                dim * dim,
                self.num_qubits,
                self.matrix.len()
            )));
        }
        if self.is_phased_permutation() {
            return Ok(());
        }
        for a in 0..dim {
            for b in a..dim {
                let dot: Complex64 = (0..dim)
                    .map(|r| self.entry(r, a).conj() * self.entry(r, b))
                    .sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                if (dot - expected).norm() > UNITARY_TOLERANCE {
                    return Err(invalid(format!(
                        "columns {a} and {b} are not orthonormal"
                    )));
                }
            }
        }
        Ok(())
    }

    /// A matrix with exactly one unit-modulus entry per row and column is unitary.
    fn is_phased_permutation(&self) -> bool {
        let dim = self.dim();
        let mut row_used = vec![false; dim];
        for c in 0..dim {
            let mut found = None;
            for r in 0..dim {
                let v = self.entry(r, c).norm();
                if v > UNITARY_TOLERANCE {
                    if found.is_some() || (v - 1.0).abs() > UNITARY_TOLERANCE {
                        return false;
                    }
                    found = Some(r);
                }
            }
            match found {
                Some(r) if !row_used[r] => row_used[r] = true,
                _ => return false,
            }
        }
        true
    }
}

/// A quantum gate, either standard or a dense unitary block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A dense unitary block.
    Unitary(UnitaryGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Unitary(_) => "unitary",
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Unitary(g) => g.num_qubits,
        }
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a unitary block.
    pub fn unitary(gate: UnitaryGate) -> Self {
        Self {
            kind: GateKind::Unitary(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// The standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            GateKind::Unitary(_) => None,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<UnitaryGate> for Gate {
    fn from(gate: UnitaryGate) -> Self {
        Gate::unitary(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn mul(a: &[Complex64; 4], b: &[Complex64; 4]) -> [Complex64; 4] {
        [
            a[0] * b[0] + a[1] * b[2],
            a[0] * b[1] + a[1] * b[3],
            a[2] * b[0] + a[3] * b[2],
            a[2] * b[1] + a[3] * b[3],
        ]
    }

    fn close(a: &[Complex64; 4], b: &[Complex64; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).norm() < 1e-12)
    }

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::MCX(4).num_qubits(), 5);
        assert_eq!(StandardGate::MCX(4).name(), "mcx");
        assert_eq!(StandardGate::U(1.0, 2.0, 3.0).parameters(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_inverse_matrices() {
        let gates = [
            StandardGate::S,
            StandardGate::T,
            StandardGate::SX,
            StandardGate::Rx(0.3),
            StandardGate::Ry(-1.1),
            StandardGate::Rz(2.5),
            StandardGate::P(0.7),
            StandardGate::U(0.4, 1.3, -0.8),
            StandardGate::PRX(1.2, 0.5),
        ];
        let identity = StandardGate::I.single_qubit_matrix().unwrap();
        for gate in gates {
            let m = gate.single_qubit_matrix().unwrap();
            let inv = gate.inverse().single_qubit_matrix().unwrap();
            assert!(close(&mul(&m, &inv), &identity), "{gate:?}");
        }
    }

    #[test]
    fn test_sx_squares_to_x() {
        let sx = StandardGate::SX.single_qubit_matrix().unwrap();
        assert!(close(&mul(&sx, &sx), &StandardGate::X.single_qubit_matrix().unwrap()));
    }

    #[test]
    fn test_prx_matches_rotation_product() {
        let (theta, phi) = (0.9, PI / 3.0);
        let prx = StandardGate::PRX(theta, phi).single_qubit_matrix().unwrap();
        let expected = mul(
            &mul(
                &StandardGate::Rz(phi).single_qubit_matrix().unwrap(),
                &StandardGate::Rx(theta).single_qubit_matrix().unwrap(),
            ),
            &StandardGate::Rz(-phi).single_qubit_matrix().unwrap(),
        );
        assert!(close(&prx, &expected));
    }

    #[test]
    fn test_gate_creation() {
        let h = Gate::standard(StandardGate::H);
        assert_eq!(h.name(), "h");
        assert_eq!(h.num_qubits(), 1);
        assert!(h.label.is_none());

        let labeled = Gate::standard(StandardGate::H).with_label("my_hadamard");
        assert_eq!(labeled.label, Some("my_hadamard".to_string()));
    }

    #[test]
    fn test_unitary_gate_validation() {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let x = UnitaryGate::new("flip", 1, vec![zero, one, one, zero]).unwrap();
        assert_eq!(Gate::from(x).name(), "unitary");

        assert!(matches!(
            UnitaryGate::new("short", 1, vec![one, zero, zero]),
            Err(IrError::InvalidUnitary { .. })
        ));
        assert!(matches!(
            UnitaryGate::new("scaled", 1, vec![one * 2.0, zero, zero, one]),
            Err(IrError::InvalidUnitary { .. })
        ));

        let h = StandardGate::H.single_qubit_matrix().unwrap().to_vec();
        let gate = UnitaryGate::new("hadamard", 1, h).unwrap();
        assert!(!gate.is_diagonal());
    }
}
