//! Build command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qcmp_ir::Circuit;
use qcmp_oracle::{build_comparator, build_diagonal_oracle, build_unitary_oracle, phase_less_than};

use crate::cli::OracleKind;

/// Build the oracle of the given kind.
pub fn build_oracle(kind: OracleKind, number: u64, nqubits: u32) -> Result<Circuit> {
    let circuit = match kind {
        OracleKind::Comparator => build_comparator(number, nqubits)?,
        OracleKind::Unitary => build_unitary_oracle(number, nqubits)?,
        OracleKind::Diagonal => build_diagonal_oracle(number, nqubits)?,
        OracleKind::Phase => phase_less_than(number, nqubits)?,
    };
    Ok(circuit)
}

/// Execute the build command.
pub fn execute(kind: OracleKind, number: u64, nqubits: u32, output: Option<&Path>) -> Result<()> {
    let circuit = build_oracle(kind, number, nqubits)?;
    info!(
        "Built {:?} oracle '{}': {} qubits, {} ops",
        kind,
        circuit.name(),
        circuit.num_qubits(),
        circuit.num_ops()
    );
    let json = circuit.to_json()?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            eprintln!(
                "{} Wrote {} ({} qubits, {} ops) to {}",
                style("✓").green().bold(),
                circuit.name(),
                circuit.num_qubits(),
                circuit.num_ops(),
                style(path.display()).green()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
