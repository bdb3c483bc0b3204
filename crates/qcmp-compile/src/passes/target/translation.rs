//! Basis translation into a device's native vocabulary.

use std::f64::consts::{FRAC_PI_2, PI};

use qcmp_ir::{CircuitDag, Instruction, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::passes::agnostic::unroll::expand;
use crate::property::{BasisGates, PropertySet};
use crate::synthesis::push_rotation;
use crate::unitary::{EPSILON, Unitary2x2};

/// Single-qubit gate family used to express arbitrary rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneQubitBasis {
    /// `rz` + `sx` (IBM native).
    ZSX,
    /// Phased RX (IQM native).
    PRX,
    /// `rz` + `ry`.
    ZYZ,
    /// `rz` + `rx`.
    ZXZ,
    /// The general `u(θ, φ, λ)` gate.
    U3,
}

/// Native two-qubit entangling gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entangler {
    /// Controlled-NOT.
    CX,
    /// Controlled-Z.
    CZ,
}

/// A universal gate family derived from a native vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFamily {
    one_qubit: OneQubitBasis,
    entangler: Entangler,
    native_x: bool,
    native_rz: bool,
}

impl TargetFamily {
    /// Derive the family from a native gate set.
    ///
    /// The entangler is `cx` when present, otherwise `cz`. The single-qubit
    /// family is the first available of ZSX, PRX, ZYZ, ZXZ and U3.
    pub fn from_basis(basis: &BasisGates) -> CompileResult<Self> {
        let unsupported = |missing: &str| CompileError::UnsupportedBasis {
            basis: basis.gates().to_vec(),
            missing: missing.to_string(),
        };

        let entangler = if basis.contains("cx") {
            Entangler::CX
        } else if basis.contains("cz") {
            Entangler::CZ
        } else {
            return Err(unsupported("a two-qubit entangler (cx or cz)"));
        };

        let native_rz = basis.contains("rz");
        let one_qubit = if native_rz && basis.contains("sx") {
            OneQubitBasis::ZSX
        } else if basis.contains("prx") {
            OneQubitBasis::PRX
        } else if native_rz && basis.contains("ry") {
            OneQubitBasis::ZYZ
        } else if native_rz && basis.contains("rx") {
            OneQubitBasis::ZXZ
        } else if basis.contains("u") {
            OneQubitBasis::U3
        } else {
            return Err(unsupported(
                "a universal single-qubit family (rz+sx, prx, rz+ry, rz+rx or u)",
            ));
        };

        Ok(Self {
            one_qubit,
            entangler,
            native_x: basis.contains("x"),
            native_rz,
        })
    }

    /// Resolve the family from the property set.
    pub fn resolve(properties: &PropertySet) -> CompileResult<Self> {
        if let Some(family) = properties.get::<TargetFamily>() {
            return Ok(*family);
        }
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;
        Self::from_basis(basis)
    }

    /// The single-qubit family.
    pub fn one_qubit(&self) -> OneQubitBasis {
        self.one_qubit
    }

    /// The entangling gate.
    pub fn entangler(&self) -> Entangler {
        self.entangler
    }

    /// Express `u` on `qubit` with native gates, up to global phase.
    ///
    /// A matrix equal to the identity up to phase yields no gates.
    pub fn synthesize(&self, u: &Unitary2x2, qubit: QubitId) -> Vec<Instruction> {
        if u.is_identity() {
            return vec![];
        }
        let mut out = Vec::with_capacity(5);
        let diagonal = u.is_diagonal().then(|| u.data[3].arg() - u.data[0].arg());

        match self.one_qubit {
            OneQubitBasis::ZSX => self.zsx(u, diagonal, qubit, &mut out),
            OneQubitBasis::PRX => self.prx(u, diagonal, qubit, &mut out),
            OneQubitBasis::ZYZ => {
                if let Some(theta) = diagonal {
                    push_rotation(&mut out, StandardGate::Rz, theta, qubit);
                } else {
                    let a = u.zyz_decomposition();
                    push_rotation(&mut out, StandardGate::Rz, a.gamma, qubit);
                    push_rotation(&mut out, StandardGate::Ry, a.beta, qubit);
                    push_rotation(&mut out, StandardGate::Rz, a.alpha, qubit);
                }
            }
            OneQubitBasis::ZXZ => {
                if let Some(theta) = diagonal {
                    push_rotation(&mut out, StandardGate::Rz, theta, qubit);
                } else {
                    let a = u.zyz_decomposition();
                    push_rotation(&mut out, StandardGate::Rz, a.gamma - FRAC_PI_2, qubit);
                    push_rotation(&mut out, StandardGate::Rx, a.beta, qubit);
                    push_rotation(&mut out, StandardGate::Rz, a.alpha + FRAC_PI_2, qubit);
                }
            }
            OneQubitBasis::U3 => {
                let a = u.zyz_decomposition();
                out.push(Instruction::single_qubit_gate(
                    StandardGate::U(
                        Unitary2x2::normalize_angle(a.beta),
                        Unitary2x2::normalize_angle(a.alpha),
                        Unitary2x2::normalize_angle(a.gamma),
                    ),
                    qubit,
                ));
            }
        }
        out
    }

    /// `rz(γ) sx rz(β+π) sx rz(α+π)`, with shortcuts for diagonal, `x` and `sx`.
    fn zsx(&self, u: &Unitary2x2, diagonal: Option<f64>, q: QubitId, out: &mut Vec<Instruction>) {
        if let Some(theta) = diagonal {
            push_rotation(out, StandardGate::Rz, theta, q);
            return;
        }
        if self.native_x && u.approx_eq_up_to_phase(&Unitary2x2::x()) {
            out.push(Instruction::single_qubit_gate(StandardGate::X, q));
            return;
        }
        if u.approx_eq_up_to_phase(&Unitary2x2::sx()) {
            out.push(Instruction::single_qubit_gate(StandardGate::SX, q));
            return;
        }

        let a = u.zyz_decomposition();
        if self.native_x && (a.beta - PI).abs() < EPSILON {
            // Ry(π) = X·Z
            push_rotation(out, StandardGate::Rz, a.gamma + PI, q);
            out.push(Instruction::single_qubit_gate(StandardGate::X, q));
            push_rotation(out, StandardGate::Rz, a.alpha, q);
            return;
        }

        push_rotation(out, StandardGate::Rz, a.gamma, q);
        out.push(Instruction::single_qubit_gate(StandardGate::SX, q));
        push_rotation(out, StandardGate::Rz, a.beta + PI, q);
        out.push(Instruction::single_qubit_gate(StandardGate::SX, q));
        push_rotation(out, StandardGate::Rz, a.alpha + PI, q);
    }

    /// `prx(β, π/2−γ)` followed by a Z rotation of `α+γ`.
    fn prx(&self, u: &Unitary2x2, diagonal: Option<f64>, q: QubitId, out: &mut Vec<Instruction>) {
        let z_angle = if let Some(theta) = diagonal {
            theta
        } else {
            let a = u.zyz_decomposition();
            out.push(Instruction::single_qubit_gate(
                StandardGate::PRX(
                    Unitary2x2::normalize_angle(a.beta),
                    Unitary2x2::normalize_angle(FRAC_PI_2 - a.gamma),
                ),
                q,
            ));
            a.alpha + a.gamma
        };
        self.z_rotation(z_angle, q, out);
    }

    /// `rz(θ)` when native, otherwise two π pulses: `prx(π, 0)` then `prx(π, θ/2)`.
    fn z_rotation(&self, theta: f64, q: QubitId, out: &mut Vec<Instruction>) {
        let theta = Unitary2x2::normalize_angle(theta);
        if theta.abs() <= EPSILON {
            return;
        }
        if self.native_rz {
            out.push(Instruction::single_qubit_gate(StandardGate::Rz(theta), q));
        } else {
            out.push(Instruction::single_qubit_gate(StandardGate::PRX(PI, 0.0), q));
            out.push(Instruction::single_qubit_gate(
                StandardGate::PRX(PI, theta / 2.0),
                q,
            ));
        }
    }

    /// The entangler rewrite of a CX or CZ that is not native.
    fn entangle(&self, gate: &StandardGate, qubits: &[QubitId]) -> Option<Vec<Instruction>> {
        let (a, b) = (qubits[0], qubits[1]);
        let native = match self.entangler {
            Entangler::CX => StandardGate::CX,
            Entangler::CZ => StandardGate::CZ,
        };
        if *gate == native || !matches!(gate, StandardGate::CX | StandardGate::CZ) {
            return None;
        }
        // CX and CZ differ by Hadamards on the target.
        let h = |q| Instruction::single_qubit_gate(StandardGate::H, q);
        Some(vec![h(b), Instruction::two_qubit_gate(native, a, b), h(b)])
    }
}

/// Basis translation pass.
///
/// Keeps every native gate, rewrites the entangler, and expresses each
/// remaining single-qubit gate through its exact matrix in the target family.
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;
        let family = TargetFamily::resolve(properties)?;

        let mut out = Vec::with_capacity(dag.num_ops());
        for (_idx, inst) in dag.topological_ops() {
            translate(inst, basis, &family, &mut out);
        }

        dag.rebuild(out)?;
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some()
    }
}

fn translate(inst: &Instruction, basis: &BasisGates, family: &TargetFamily, out: &mut Vec<Instruction>) {
    if basis.contains(inst.name()) {
        out.push(inst.clone());
        return;
    }
    if let Some(u) = Unitary2x2::from_instruction(inst) {
        out.extend(family.synthesize(&u, inst.qubits[0]));
        return;
    }
    if let Some(rewrite) = inst
        .as_standard()
        .and_then(|g| family.entangle(g, &inst.qubits))
    {
        for r in rewrite {
            translate(&r, basis, family, out);
        }
        return;
    }
    // Wider gates are expanded to single-qubit gates and CX first.
    let keep_cz = family.entangler == Entangler::CZ;
    let expanded = expand(inst, keep_cz);
    if expanded.len() == 1 && expanded[0] == *inst {
        out.push(inst.clone());
        return;
    }
    for r in expanded {
        translate(&r, basis, family, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcmp_ir::Circuit;
    use qcmp_sim::{circuit_operator, equivalent_up_to_global_phase};

    fn samples() -> Vec<StandardGate> {
        vec![
            StandardGate::H,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::S,
            StandardGate::T,
            StandardGate::SX,
            StandardGate::SXdg,
            StandardGate::Rx(0.7),
            StandardGate::Ry(-1.1),
            StandardGate::Rz(2.5),
            StandardGate::P(0.4),
            StandardGate::U(1.2, 0.3, -2.0),
            StandardGate::PRX(0.9, 1.4),
        ]
    }

    fn check_family(basis: BasisGates, expected: OneQubitBasis) {
        let family = TargetFamily::from_basis(&basis).unwrap();
        assert_eq!(family.one_qubit(), expected);
        for gate in samples() {
            let u = Unitary2x2::from_standard(&gate).unwrap();
            let gates = family.synthesize(&u, QubitId(0));
            assert!(gates.len() <= 5);
            assert!(gates.iter().all(|g| basis.contains(g.name())), "{gate:?} -> {gates:?}");

            let got = circuit_operator(&Circuit::from_instructions("f", 1, gates).unwrap()).unwrap();
            let want = circuit_operator(
                &Circuit::from_instructions("f", 1, [Instruction::single_qubit_gate(gate.clone(), QubitId(0))])
                    .unwrap(),
            )
            .unwrap();
            assert!(equivalent_up_to_global_phase(&got, &want), "{gate:?}");
        }
    }

    #[test]
    fn test_zsx_family() {
        check_family(BasisGates::ibm(), OneQubitBasis::ZSX);
        check_family(BasisGates::new(["cx", "rz", "sx"]), OneQubitBasis::ZSX);
    }

    #[test]
    fn test_prx_family() {
        check_family(BasisGates::iqm(), OneQubitBasis::PRX);
    }

    #[test]
    fn test_rotation_families() {
        check_family(BasisGates::new(["cz", "rz", "ry"]), OneQubitBasis::ZYZ);
        check_family(BasisGates::new(["cx", "rz", "rx"]), OneQubitBasis::ZXZ);
        check_family(BasisGates::new(["cx", "u"]), OneQubitBasis::U3);
    }

    #[test]
    fn test_shortcuts() {
        let family = TargetFamily::from_basis(&BasisGates::ibm()).unwrap();
        let x = family.synthesize(&Unitary2x2::x(), QubitId(0));
        assert_eq!(x.len(), 1);
        assert_eq!(x[0].name(), "x");
        assert_eq!(family.synthesize(&Unitary2x2::rz(0.4), QubitId(0)).len(), 1);
        assert!(family.synthesize(&Unitary2x2::identity().phased(0.2), QubitId(0)).is_empty());
    }

    #[test]
    fn test_unsupported_basis() {
        let err = TargetFamily::from_basis(&BasisGates::new(["rz", "sx"])).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedBasis { ref missing, .. } if missing.contains("entangler")));

        let err = TargetFamily::from_basis(&BasisGates::new(["cx", "rz", "h"])).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedBasis { .. }));
    }

    #[test]
    fn test_translation_pass_to_cz() {
        let mut circuit = Circuit::with_size("t", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .t(QubitId(1))
            .unwrap();
        let before = circuit_operator(&circuit).unwrap();

        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new().with_target(crate::CouplingMap::linear(2), BasisGates::iqm());
        BasisTranslation.run(&mut dag, &mut props).unwrap();

        assert!(dag.instructions().iter().all(|i| matches!(i.name(), "prx" | "cz")));
        let after = circuit_operator(&Circuit::from_dag("t", dag)).unwrap();
        assert!(equivalent_up_to_global_phase(&before, &after));
    }
}
