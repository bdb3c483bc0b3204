//! Multi-controlled gate synthesis.
//!
//! Multi-controlled single-qubit gates use a linear-depth, ancilla-free
//! construction: a ladder of controlled `2^-j` roots of the target gate,
//! combined with two rotation ladders among the controls that compute and
//! uncompute the required parity terms. Everything is expressed with
//! single-qubit rotations and CX.

use std::f64::consts::PI;

use qcmp_ir::{Instruction, QubitId, StandardGate};

use super::one_qubit::{controlled, euler_rotations};
use crate::unitary::Unitary2x2;

/// The standard Toffoli network: 6 CX, 7 T/T†, 2 H.
pub fn toffoli(a: QubitId, b: QubitId, target: QubitId) -> Vec<Instruction> {
    let one = |gate, q| Instruction::single_qubit_gate(gate, q);
    let cx = |c, t| Instruction::two_qubit_gate(StandardGate::CX, c, t);
    vec![
        one(StandardGate::H, target),
        cx(b, target),
        one(StandardGate::Tdg, target),
        cx(a, target),
        one(StandardGate::T, target),
        cx(b, target),
        one(StandardGate::Tdg, target),
        cx(a, target),
        one(StandardGate::T, b),
        one(StandardGate::T, target),
        one(StandardGate::H, target),
        cx(a, b),
        one(StandardGate::T, a),
        one(StandardGate::Tdg, b),
        cx(a, b),
    ]
}

/// X controlled on every qubit of `controls`.
pub fn mcx(controls: &[QubitId], target: QubitId) -> Vec<Instruction> {
    match controls {
        [] => vec![Instruction::single_qubit_gate(StandardGate::X, target)],
        [c] => vec![Instruction::two_qubit_gate(StandardGate::CX, *c, target)],
        [a, b] => toffoli(*a, *b, target),
        _ => multi_controlled(&Unitary2x2::x(), controls, target),
    }
}

/// `u` applied to `target` when every qubit of `controls` is set.
///
/// Equal to the ideal multi-controlled gate up to a global phase.
pub fn multi_controlled(u: &Unitary2x2, controls: &[QubitId], target: QubitId) -> Vec<Instruction> {
    let n = controls.len();
    match n {
        0 => return euler_rotations(u, target),
        1 => return controlled(u, controls[0], target),
        _ => {}
    }

    let root = |exp: usize, sign: f64| u.power(sign / pow2(exp));
    let mut out = Vec::new();

    for k in (1..n).rev() {
        out.extend(controlled(&root(n - k, 1.0), controls[k], target));
    }
    out.extend(controlled(&root(n - 1, 1.0), controls[0], target));

    rotation_ladder(&mut out, controls, false);

    for k in 1..n {
        out.extend(controlled(&root(n - k, -1.0), controls[k], target));
    }

    rotation_ladder(&mut out, controls, true);

    out
}

/// The control-side ladders of controlled RX rotations.
///
/// The forward ladder starts its first block at control 0 and the inverse
/// ladder at control 1; the second block is the mirror image with negated
/// angles.
fn rotation_ladder(out: &mut Vec<Instruction>, controls: &[QubitId], inverse: bool) {
    let n = controls.len();
    let pairs = |start: usize| -> Vec<(usize, usize)> {
        (0..n)
            .flat_map(|t| (start..t).map(move |c| (c, t)))
            .collect()
    };
    let exponent = |c: usize, t: usize| if c == 0 { t - c - 1 } else { t - c };

    let mut first = pairs(usize::from(inverse));
    first.sort_by(|x, y| (y.0 + y.1).cmp(&(x.0 + x.1)));
    for (c, t) in first {
        let rx = Unitary2x2::rx(PI / pow2(exponent(c, t)));
        out.extend(controlled(&rx, controls[c], controls[t]));
    }

    let mut second = pairs(usize::from(!inverse));
    second.sort_by_key(|&(c, t)| c + t);
    for (c, t) in second {
        let rx = Unitary2x2::rx(-PI / pow2(exponent(c, t)));
        out.extend(controlled(&rx, controls[c], controls[t]));
    }
}

fn pow2(exp: usize) -> f64 {
    // Exponents stay below the qubit count.
    2f64.powi(i32::try_from(exp).unwrap_or(i32::MAX))
}
