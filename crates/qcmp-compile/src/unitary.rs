//! Unitary matrix utilities for single-qubit synthesis.
//!
//! Provides 2x2 unitary matrix operations: multiplication, exact ZYZ Euler
//! decomposition (including the global phase), and fractional powers used by
//! multi-controlled gate synthesis.

use num_complex::Complex64;
use std::f64::consts::PI;

use qcmp_ir::{GateKind, Instruction, StandardGate};

/// Tolerance for floating point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Entries at or below this magnitude carry no usable phase.
const ROUNDING_NOISE: f64 = 1e-14;

/// Euler angles of `U = e^{iφ} · Rz(α) · Ry(β) · Rz(γ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZyzAngles {
    /// Outer Z rotation α (applied last).
    pub alpha: f64,
    /// Y rotation β.
    pub beta: f64,
    /// Inner Z rotation γ (applied first).
    pub gamma: f64,
    /// Global phase φ.
    pub phase: f64,
}

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Matrix of a single-qubit standard gate, `None` for wider gates.
    pub fn from_standard(gate: &StandardGate) -> Option<Self> {
        gate.single_qubit_matrix().map(|data| Self { data })
    }

    /// Matrix of a single-qubit instruction, standard or dense.
    pub fn from_instruction(inst: &Instruction) -> Option<Self> {
        match &inst.gate.kind {
            GateKind::Standard(g) => Self::from_standard(g),
            GateKind::Unitary(u) if u.num_qubits == 1 => Some(Self::new(
                u.entry(0, 0),
                u.entry(0, 1),
                u.entry(1, 0),
                u.entry(1, 1),
            )),
            GateKind::Unitary(_) => None,
        }
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::fixed(&StandardGate::I)
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        Self::fixed(&StandardGate::X)
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        Self::fixed(&StandardGate::H)
    }

    /// Create an SX matrix.
    pub fn sx() -> Self {
        Self::fixed(&StandardGate::SX)
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        Self::fixed(&StandardGate::Rx(theta))
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        Self::fixed(&StandardGate::Ry(theta))
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        Self::fixed(&StandardGate::Rz(theta))
    }

    fn fixed(gate: &StandardGate) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        let data = gate.single_qubit_matrix().unwrap_or([zero; 4]);
        Self { data }
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Multiply every entry by `e^{iθ}`.
    #[must_use]
    pub fn phased(&self, theta: f64) -> Self {
        let f = Complex64::from_polar(1.0, theta);
        Self {
            data: self.data.map(|v| v * f),
        }
    }

    /// Determinant.
    pub fn det(&self) -> Complex64 {
        self.data[0] * self.data[3] - self.data[1] * self.data[2]
    }

    /// Check if this is approximately identity (up to global phase).
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        b.norm() < EPSILON && c.norm() < EPSILON && (a - d).norm() < EPSILON
    }

    /// Check if the off-diagonal entries vanish.
    pub fn is_diagonal(&self) -> bool {
        self.data[1].norm() < EPSILON && self.data[2].norm() < EPSILON
    }

    /// Check if `self = e^{iφ} · other` for some φ.
    pub fn approx_eq_up_to_phase(&self, other: &Self) -> bool {
        let k = Self::largest_index(&other.data);
        if self.data[k].norm() < EPSILON {
            return false;
        }
        let ratio = self.data[k] / other.data[k];
        if (ratio.norm() - 1.0).abs() > 1e-8 {
            return false;
        }
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - ratio * b).norm() < 1e-8)
    }

    /// Check entry-wise equality.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).norm() < 1e-8)
    }

    fn largest_index(data: &[Complex64; 4]) -> usize {
        let mut best = 0;
        for (i, v) in data.iter().enumerate() {
            if v.norm() > data[best].norm() {
                best = i;
            }
        }
        best
    }

    /// Decompose into `e^{iφ} · Rz(α) · Ry(β) · Rz(γ)`.
    ///
    /// The returned phase is exact: reconstructing from the angles reproduces
    /// the matrix entry-wise, which controlled synthesis relies on.
    pub fn zyz_decomposition(&self) -> ZyzAngles {
        let [a, _, c, _] = self.data;

        let su_phase = self.det().arg() / 2.0;
        let unphase = Complex64::from_polar(1.0, -su_phase);
        let (a, c) = (a * unphase, c * unphase);

        let beta = 2.0 * c.norm().atan2(a.norm());

        // a = cos(β/2)·e^{-i(α+γ)/2}, c = sin(β/2)·e^{i(α-γ)/2}. The argument of
        // a small entry only affects entries of the same magnitude; rounding
        // noise leaves its angle undetermined and it is taken as 0.
        let sum = if a.norm() > ROUNDING_NOISE { -2.0 * a.arg() } else { 0.0 };
        let diff = if c.norm() > ROUNDING_NOISE { 2.0 * c.arg() } else { 0.0 };
        let (alpha, gamma) = (f64::midpoint(sum, diff), (sum - diff) / 2.0);

        let rebuilt = Self::rz(alpha).mul(&Self::ry(beta)).mul(&Self::rz(gamma));
        let k = Self::largest_index(&self.data);
        let phase = (self.data[k] / rebuilt.data[k]).arg();

        ZyzAngles {
            alpha,
            beta,
            gamma,
            phase,
        }
    }

    /// Principal `p`-th power of the matrix.
    ///
    /// With `U = e^{iα}(cos t·I − i sin t·Ĥ)` for a unit Hermitian axis `Ĥ`,
    /// `U^p = e^{iαp}(cos(pt)·I − i sin(pt)·Ĥ)`. Square roots satisfy
    /// `R·R = U` exactly, and negative powers invert.
    #[must_use]
    pub fn power(&self, p: f64) -> Self {
        let alpha = self.det().arg() / 2.0;
        let v = self.phased(-alpha);
        let cos_t = ((v.data[0] + v.data[3]) / 2.0).re.clamp(-1.0, 1.0);
        // sin t from the traceless part; acos alone is imprecise near t = 0.
        let sin_t = (((v.data[0] - v.data[3]) / 2.0).norm_sqr()
            + (v.data[1].norm_sqr() + v.data[2].norm_sqr()) / 2.0)
            .sqrt();
        let t = sin_t.atan2(cos_t);

        let i = Complex64::new(0.0, 1.0);
        let axis = if sin_t.abs() < 1e-12 {
            // V = ±I: any axis works, Z keeps the result diagonal.
            [
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(-1.0, 0.0),
            ]
        } else {
            [
                i * (v.data[0] - cos_t) / sin_t,
                i * v.data[1] / sin_t,
                i * v.data[2] / sin_t,
                i * (v.data[3] - cos_t) / sin_t,
            ]
        };

        let (s, c) = (p * t).sin_cos();
        let scale = Complex64::from_polar(1.0, alpha * p);
        Self::new(
            scale * (c - i * s * axis[0]),
            scale * (-i * s * axis[1]),
            scale * (-i * s * axis[2]),
            scale * (c - i * s * axis[3]),
        )
    }

    /// Normalize angles to (-π, π].
    pub fn normalize_angle(angle: f64) -> f64 {
        if angle.is_nan() || angle.is_infinite() {
            return 0.0;
        }
        let mut a = angle.rem_euclid(2.0 * PI);
        if a > PI {
            a -= 2.0 * PI;
        }
        a
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}
