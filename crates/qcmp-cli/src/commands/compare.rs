//! Compare command implementation.

use anyhow::Result;
use console::style;

use crate::commands::common::{print_metrics, resolve_device};
use crate::cli::OracleForm;
use crate::config::Config;
use crate::report::{ConstructionReport, compare};

/// Execute the compare command.
pub fn execute(
    number: u64,
    nqubits: u32,
    form: OracleForm,
    config: &Config,
    json: bool,
) -> Result<()> {
    let device = resolve_device(config)?;
    let report = compare(
        number,
        nqubits,
        form,
        &device,
        config.optimization_level,
        config.verify,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Oracle for x < {} on {} qubits, device {} (level {})",
        style("→").cyan().bold(),
        style(number).green(),
        nqubits,
        style(device.name()).yellow(),
        config.optimization_level
    );
    print_construction(&report.gate_level);
    print_construction(&report.dense);

    let verdict = if report.gate_level_is_cheaper() {
        style(format!("{} is cheaper", report.gate_level.construction)).green()
    } else {
        style(format!("{} is cheaper or equal", report.dense.construction)).yellow()
    };
    println!(
        "{} Ratio (dense / gate-level ops): {:.2}, {}",
        style("✓").green().bold(),
        report.ratio,
        verdict
    );

    if [&report.gate_level, &report.dense]
        .iter()
        .any(|c| c.verified == Some(false))
    {
        anyhow::bail!("Decomposition changed the oracle operator");
    }
    Ok(())
}

fn print_construction(construction: &ConstructionReport) {
    let verified = match construction.verified {
        Some(true) => style(" [verified]").green().to_string(),
        Some(false) => style(" [MISMATCH]").red().bold().to_string(),
        None => String::new(),
    };
    println!(
        "  {} ({} qubits, {} ops as built){}",
        style(&construction.construction).bold(),
        construction.logical_qubits,
        construction.logical_ops,
        verified
    );
    print_metrics(&construction.decomposed);
}
