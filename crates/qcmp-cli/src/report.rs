//! Resource comparison between gate-level and dense-block oracles.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use qcmp_compile::{DecomposeOptions, DeviceModel, decompose_with};
use qcmp_ir::{Circuit, Instruction, Metrics, QubitId};
use qcmp_oracle::{
    build_comparator, build_diagonal_oracle, build_unitary_oracle, phase_less_than,
};
use qcmp_sim::{MAX_OPERATOR_QUBITS, circuit_operator, equivalent_up_to_global_phase};

use crate::cli::OracleForm;

/// Resources of one oracle construction before and after decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructionReport {
    /// Construction name.
    pub construction: String,
    /// Qubits of the circuit as built.
    pub logical_qubits: usize,
    /// Instructions of the circuit as built.
    pub logical_ops: usize,
    /// Metrics of the decomposed circuit.
    pub decomposed: Metrics,
    /// Operator check, when requested and small enough to run.
    pub verified: Option<bool>,
}

/// Side-by-side resources of both constructions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Upper bound of the less-than predicate.
    pub number: u64,
    /// Number of input qubits.
    pub nqubits: u32,
    /// Oracle form both constructions implement.
    pub form: OracleForm,
    /// Name of the target device.
    pub device: String,
    /// Optimization level used for both decompositions.
    pub optimization_level: u8,
    /// Gate-level construction: the comparator or the phase circuit.
    pub gate_level: ConstructionReport,
    /// Dense-block construction: the permutation or the diagonal block.
    pub dense: ConstructionReport,
    /// Decomposed dense ops per decomposed gate-level op.
    pub ratio: f64,
}

impl Comparison {
    /// Whether the gate-level construction decomposed to fewer instructions.
    pub fn gate_level_is_cheaper(&self) -> bool {
        self.gate_level.decomposed.total_ops < self.dense.decomposed.total_ops
    }
}

/// Build both constructions of `form` for `(number, nqubits)` and decompose them for `device`.
pub fn compare(
    number: u64,
    nqubits: u32,
    form: OracleForm,
    device: &DeviceModel,
    optimization_level: u8,
    verify: bool,
) -> Result<Comparison> {
    info!(
        "Comparing {:?} oracles for x < {} on {} qubits, device {}",
        form,
        number,
        nqubits,
        device.name()
    );
    let options = DecomposeOptions { optimization_level };

    let (gate_level, dense) = match form {
        OracleForm::BitFlip => (
            ("comparator", build_comparator(number, nqubits).context("Failed to build comparator")?),
            (
                "unitary",
                build_unitary_oracle(number, nqubits).context("Failed to build unitary oracle")?,
            ),
        ),
        OracleForm::Phase => (
            ("phase", phase_less_than(number, nqubits).context("Failed to build phase oracle")?),
            (
                "diagonal",
                build_diagonal_oracle(number, nqubits)
                    .context("Failed to build diagonal oracle")?,
            ),
        ),
    };
    let gate_level = measure(gate_level.0, &gate_level.1, device, &options, verify)?;
    let dense = measure(dense.0, &dense.1, device, &options, verify)?;

    #[allow(clippy::cast_precision_loss)]
    let ratio = dense.decomposed.total_ops as f64 / gate_level.decomposed.total_ops.max(1) as f64;

    Ok(Comparison {
        number,
        nqubits,
        form,
        device: device.name().to_string(),
        optimization_level,
        gate_level,
        dense,
        ratio,
    })
}

fn measure(
    construction: &str,
    circuit: &Circuit,
    device: &DeviceModel,
    options: &DecomposeOptions,
    verify: bool,
) -> Result<ConstructionReport> {
    let decomposed = decompose_with(circuit, device, options)
        .with_context(|| format!("Failed to decompose the {construction} oracle"))?;
    let metrics = Metrics::of(&decomposed)?;
    debug!(
        "{}: {} ops before, {} ops / depth {} after decomposition",
        construction,
        circuit.num_ops(),
        metrics.total_ops,
        metrics.depth
    );

    let verified = if verify {
        check_equivalence(circuit, &decomposed)?
    } else {
        None
    };

    Ok(ConstructionReport {
        construction: construction.to_string(),
        logical_qubits: circuit.num_qubits(),
        logical_ops: circuit.num_ops(),
        decomposed: metrics,
        verified,
    })
}

/// Compare the operators of `original` and `decomposed` on the qubits either touches.
///
/// The decomposer keeps the trivial layout, so logical qubit `i` is physical
/// qubit `i` and untouched device qubits can be dropped from both sides.
/// Returns `None` when more than [`MAX_OPERATOR_QUBITS`] qubits are involved.
pub fn check_equivalence(original: &Circuit, decomposed: &Circuit) -> Result<Option<bool>> {
    let mut touched: BTreeSet<QubitId> = original.dag().qubits().into_iter().collect();
    for inst in decomposed.instructions() {
        touched.extend(inst.qubits.iter().copied());
    }
    if touched.len() > MAX_OPERATOR_QUBITS {
        debug!(
            "Skipping verification of '{}': {} qubits involved",
            original.name(),
            touched.len()
        );
        return Ok(None);
    }

    let positions: Vec<QubitId> = touched.into_iter().collect();
    let expected = circuit_operator(&compact(original, &positions)?)?;
    let actual = circuit_operator(&compact(decomposed, &positions)?)?;
    Ok(Some(equivalent_up_to_global_phase(&expected, &actual)))
}

/// Relabel `circuit` onto `0..positions.len()`, in the order of `positions`.
#[allow(clippy::cast_possible_truncation)]
fn compact(circuit: &Circuit, positions: &[QubitId]) -> Result<Circuit> {
    let relabel = |q: &QubitId| {
        positions
            .binary_search(q)
            .map(|i| QubitId(i as u32))
            .map_err(|_| anyhow::anyhow!("Qubit {q} is outside the compared register"))
    };
    let instructions = circuit
        .instructions()
        .into_iter()
        .map(|inst| {
            let qubits = inst.qubits.iter().map(relabel).collect::<Result<Vec<_>>>()?;
            Ok(Instruction::gate(inst.gate, qubits))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Circuit::from_instructions(
        circuit.name(),
        positions.len() as u32,
        instructions,
    )?)
}
