//! Dense unitary block synthesis.
//!
//! General blocks are reduced to a diagonal by two-level (Givens) rotations,
//! column by column. Each recorded rotation acts on a pair of basis states; it
//! is realized by moving one state next to the other along a Gray-code path
//! with pattern-controlled X gates, applying one fully controlled 2x2 gate,
//! and walking the path back. The residual diagonal goes through
//! [`diagonal_rotations`].

use ndarray::Array2;
use num_complex::Complex64;
use qcmp_ir::{Instruction, QubitId, StandardGate, UnitaryGate};

use super::controlled::{mcx, multi_controlled};
use super::diagonal::diagonal_rotations;
use super::one_qubit::euler_rotations;
use crate::unitary::Unitary2x2;

/// Entries below this magnitude are treated as already eliminated.
const ELIMINATION_TOLERANCE: f64 = 1e-12;

/// A two-level rotation `G` recorded during elimination, acting on rows `(low, high)`.
struct Givens {
    gate: Unitary2x2,
    low: usize,
    high: usize,
}

/// Elementary gates (single-qubit rotations and CX) realizing `block` on `qubits`.
///
/// Qubit `i` of the block is `qubits[i]`. Single-qubit blocks become Euler
/// rotations, diagonal blocks a Walsh network, anything else a Givens network.
pub fn synthesize_unitary(block: &UnitaryGate, qubits: &[QubitId]) -> Vec<Instruction> {
    if qubits.len() == 1 {
        let u = Unitary2x2::new(
            block.entry(0, 0),
            block.entry(0, 1),
            block.entry(1, 0),
            block.entry(1, 1),
        );
        return euler_rotations(&u, qubits[0]);
    }

    let dim = block.dim();
    if block.is_diagonal() {
        let phases: Vec<f64> = (0..dim).map(|k| block.entry(k, k).arg()).collect();
        return diagonal_rotations(&phases, qubits);
    }

    let matrix = Array2::from_shape_fn((dim, dim), |(r, c)| block.entry(r, c));
    let (rotations, residual) = eliminate(matrix);

    let phases: Vec<f64> = residual.iter().map(|d| d.arg()).collect();
    let mut out = diagonal_rotations(&phases, qubits);
    for g in rotations.iter().rev() {
        two_level(&g.gate.dagger(), g.low, g.high, qubits, &mut out);
    }
    out
}

/// Reduce `m` to a diagonal with two-level rotations `G_k`.
///
/// Returns the rotations in application order and the residual diagonal `D`,
/// so that `G_m ⋯ G_1 · m = D`.
fn eliminate(mut m: Array2<Complex64>) -> (Vec<Givens>, Vec<Complex64>) {
    let dim = m.nrows();
    let mut rotations = Vec::new();

    for c in 0..dim.saturating_sub(1) {
        for r in (c + 1..dim).rev() {
            let b = m[[r, c]];
            if b.norm() < ELIMINATION_TOLERANCE {
                continue;
            }
            let a = m[[c, c]];
            let norm = (a.norm_sqr() + b.norm_sqr()).sqrt();
            let gate = Unitary2x2::new(a.conj() / norm, b.conj() / norm, b / norm, -a / norm);

            for k in 0..dim {
                let (top, bottom) = (m[[c, k]], m[[r, k]]);
                m[[c, k]] = gate.data[0] * top + gate.data[1] * bottom;
                m[[r, k]] = gate.data[2] * top + gate.data[3] * bottom;
            }
            rotations.push(Givens {
                gate,
                low: c,
                high: r,
            });
        }
    }

    let residual = m.diag().to_vec();
    (rotations, residual)
}

/// Apply `m` to the two-dimensional subspace spanned by basis states `i` and `j`.
fn two_level(m: &Unitary2x2, i: usize, j: usize, qubits: &[QubitId], out: &mut Vec<Instruction>) {
    let n = qubits.len();
    let mut path = vec![i];
    let mut current = i;
    for bit in (0..n).filter(|&b| ((i ^ j) >> b) & 1 == 1) {
        current ^= 1 << bit;
        path.push(current);
    }

    let mut swaps = Vec::new();
    for step in path.windows(2).take(path.len().saturating_sub(2)) {
        let bit = (step[0] ^ step[1]).trailing_zeros() as usize;
        pattern_controlled(step[0], bit, qubits, &mut swaps, mcx);
    }
    out.extend(swaps.iter().cloned());

    let g = path[path.len() - 2];
    let bit = (g ^ j).trailing_zeros() as usize;
    let gate = if (g >> bit) & 1 == 1 {
        // The moved state sits on |1⟩ of the active qubit: conjugate by X.
        Unitary2x2::x().mul(m).mul(&Unitary2x2::x())
    } else {
        *m
    };
    pattern_controlled(g, bit, qubits, out, |controls, target| {
        if gate.approx_eq(&Unitary2x2::x()) {
            mcx(controls, target)
        } else {
            multi_controlled(&gate, controls, target)
        }
    });

    // The path gates are not all self-inverse once the MCX needs Euler rotations.
    out.extend(swaps.iter().rev().map(Instruction::inverse));
}

/// Emit `body` on qubit `bit`, controlled on every other qubit matching `pattern`.
///
/// Controls whose pattern bit is 0 are conjugated by X.
fn pattern_controlled(
    pattern: usize,
    bit: usize,
    qubits: &[QubitId],
    out: &mut Vec<Instruction>,
    body: impl FnOnce(&[QubitId], QubitId) -> Vec<Instruction>,
) {
    let controls: Vec<QubitId> = (0..qubits.len())
        .filter(|&q| q != bit)
        .map(|q| qubits[q])
        .collect();
    let flips: Vec<Instruction> = (0..qubits.len())
        .filter(|&q| q != bit && (pattern >> q) & 1 == 0)
        .map(|q| Instruction::single_qubit_gate(StandardGate::X, qubits[q]))
        .collect();

    out.extend(flips.iter().cloned());
    out.extend(body(&controls, qubits[bit]));
    out.extend(flips);
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcmp_ir::Circuit;
    use qcmp_sim::{circuit_operator, equivalent_up_to_global_phase};

    fn check(block: &UnitaryGate) -> Vec<Instruction> {
        let n = block.num_qubits;
        let qubits: Vec<QubitId> = (0..n).map(QubitId).collect();
        let gates = synthesize_unitary(block, &qubits);
        assert!(
            gates.iter().all(|g| g.is_single_qubit() || g.name() == "cx"),
            "non-elementary gate emitted"
        );

        let got = circuit_operator(&Circuit::from_instructions("s", n, gates.clone()).unwrap()).unwrap();
        let want = circuit_operator(
            &Circuit::from_instructions("s", n, [Instruction::gate(block.clone(), qubits)]).unwrap(),
        )
        .unwrap();
        assert!(equivalent_up_to_global_phase(&got, &want));
        gates
    }

    /// Deterministic dense unitary: a product of a Fourier matrix and phases.
    fn fourier_like(n: u32) -> UnitaryGate {
        let dim = 1usize << n;
        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / (dim as f64).sqrt();
        let mut matrix = Vec::with_capacity(dim * dim);
        for r in 0..dim {
            for c in 0..dim {
                #[allow(clippy::cast_precision_loss)]
                let angle = 2.0 * std::f64::consts::PI * (r * c) as f64 / dim as f64 + 0.3 * c as f64;
                matrix.push(Complex64::from_polar(scale, angle));
            }
        }
        UnitaryGate::new("qft", n, matrix).unwrap()
    }

    fn permutation(n: u32, map: impl Fn(usize) -> usize) -> UnitaryGate {
        let dim = 1usize << n;
        let mut matrix = vec![Complex64::new(0.0, 0.0); dim * dim];
        for c in 0..dim {
            matrix[map(c) * dim + c] = Complex64::new(1.0, 0.0);
        }
        UnitaryGate::new("perm", n, matrix).unwrap()
    }

    #[test]
    fn test_single_qubit_block() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let block = UnitaryGate::new(
            "h",
            1,
            vec![h.into(), h.into(), h.into(), Complex64::new(-h, 0.0)],
        )
        .unwrap();
        assert!(check(&block).len() <= 3);
    }

    #[test]
    fn test_dense_blocks() {
        check(&fourier_like(2));
        check(&fourier_like(3));
    }

    #[test]
    fn test_permutation_blocks() {
        // Swap of two qubits.
        check(&permutation(2, |x| ((x & 1) << 1) | (x >> 1)));
        // Flip the top qubit for the first three values of the low register.
        check(&permutation(3, |x| if x & 3 < 3 { x ^ 4 } else { x }));
        // Cyclic increment.
        check(&permutation(3, |x| (x + 1) % 8));
    }

    /// Identity except `g` on the basis states `i` and `j`.
    fn two_level_block(n: u32, i: usize, j: usize, g: &Unitary2x2) -> UnitaryGate {
        let dim = 1usize << n;
        let mut matrix = vec![Complex64::new(0.0, 0.0); dim * dim];
        for k in 0..dim {
            matrix[k * dim + k] = Complex64::new(1.0, 0.0);
        }
        matrix[i * dim + i] = g.data[0];
        matrix[i * dim + j] = g.data[1];
        matrix[j * dim + i] = g.data[2];
        matrix[j * dim + j] = g.data[3];
        UnitaryGate::new("two_level", n, matrix).unwrap()
    }

    #[test]
    fn test_two_level_pairs_across_several_bits() {
        // The Gray-code walk needs Euler-rotated MCX gates from four qubits up.
        let g = Unitary2x2::ry(0.9).mul(&Unitary2x2::rz(0.4)).phased(0.2);
        for i in 0..16usize {
            for j in (i + 1)..16 {
                if (i ^ j).count_ones() >= 2 {
                    check(&two_level_block(4, i, j, &g));
                }
            }
        }
    }

    #[test]
    fn test_four_qubit_blocks() {
        check(&fourier_like(4));
        // Pairs differing in two bits.
        check(&permutation(4, |x| x ^ 0b1010));
    }

    #[test]
    fn test_identity_block_is_empty() {
        assert!(check(&permutation(3, |x| x)).is_empty());
    }

    #[test]
    fn test_elimination_reaches_diagonal() {
        let block = fourier_like(2);
        let m = Array2::from_shape_fn((4, 4), |(r, c)| block.entry(r, c));
        let (rotations, residual) = eliminate(m);
        assert!(!rotations.is_empty());
        assert!(residual.iter().all(|d| (d.norm() - 1.0).abs() < 1e-9));
    }
}
