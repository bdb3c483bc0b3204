//! Single-qubit gate optimization pass.

use rustc_hash::FxHashMap;

use qcmp_ir::{CircuitDag, Instruction, QubitId};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::passes::target::TargetFamily;
use crate::property::PropertySet;
use crate::synthesis::euler_rotations;
use crate::unitary::Unitary2x2;

/// Single-qubit gate optimization pass.
///
/// Merges each maximal run of single-qubit gates on a wire into one matrix and
/// re-emits it in the target family when that strictly reduces the gate
/// count. A run equal to the identity up to phase is removed. Without a target
/// family the run is re-emitted as ZYZ rotations.
#[derive(Default)]
pub struct Optimize1qGates {
    family: Option<TargetFamily>,
}

impl Optimize1qGates {
    /// Create an optimizer that resolves its family from the property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an optimizer for a fixed target family.
    pub fn with_family(family: TargetFamily) -> Self {
        Self {
            family: Some(family),
        }
    }

    fn emit(family: Option<&TargetFamily>, u: &Unitary2x2, qubit: QubitId) -> Vec<Instruction> {
        match family {
            Some(f) => f.synthesize(u, qubit),
            None => euler_rotations(u, qubit),
        }
    }

    /// Replace `run` by its re-synthesis when that is strictly shorter.
    fn flush(
        family: Option<&TargetFamily>,
        qubit: QubitId,
        run: &[usize],
        ops: &[Instruction],
        replaced: &mut [Option<Vec<Instruction>>],
    ) {
        let Some((&first, rest)) = run.split_first() else {
            return;
        };

        let mut combined = Unitary2x2::identity();
        for &i in run {
            let Some(u) = Unitary2x2::from_instruction(&ops[i]) else {
                return;
            };
            combined = u.mul(&combined);
        }

        let candidate = Self::emit(family, &combined, qubit);
        if candidate.len() < run.len() {
            replaced[first] = Some(candidate);
            for &i in rest {
                replaced[i] = Some(vec![]);
            }
        }
    }
}

impl Pass for Optimize1qGates {
    fn name(&self) -> &'static str {
        "Optimize1qGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let family = self
            .family
            .or_else(|| TargetFamily::resolve(properties).ok());
        let family = family.as_ref();

        let ops = dag.instructions();
        let mut replaced: Vec<Option<Vec<Instruction>>> = vec![None; ops.len()];
        let mut runs: FxHashMap<QubitId, Vec<usize>> = FxHashMap::default();

        for (i, inst) in ops.iter().enumerate() {
            if inst.is_single_qubit() && Unitary2x2::from_instruction(inst).is_some() {
                runs.entry(inst.qubits[0]).or_default().push(i);
                continue;
            }
            for q in &inst.qubits {
                if let Some(run) = runs.remove(q) {
                    Self::flush(family, *q, &run, &ops, &mut replaced);
                }
            }
        }

        let mut remaining: Vec<_> = runs.into_iter().collect();
        remaining.sort_by_key(|(q, _)| *q);
        for (q, run) in remaining {
            Self::flush(family, q, &run, &ops, &mut replaced);
        }

        if replaced.iter().all(Option::is_none) {
            return Ok(());
        }

        let mut out = Vec::with_capacity(ops.len());
        for (inst, replacement) in ops.into_iter().zip(replaced) {
            match replacement {
                Some(gates) => out.extend(gates),
                None => out.push(inst),
            }
        }
        dag.rebuild(out)?;
        Ok(())
    }
}
