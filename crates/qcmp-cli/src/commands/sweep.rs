//! Sweep command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qcmp_oracle::MAX_UNITARY_QUBITS;

use crate::commands::common::resolve_device;
use crate::cli::OracleForm;
use crate::config::Config;
use crate::report::{Comparison, compare};

/// Execute the sweep command.
pub fn execute(nqubits: u32, form: OracleForm, config: &Config, json: bool) -> Result<()> {
    if nqubits == 0 || nqubits > MAX_UNITARY_QUBITS {
        anyhow::bail!("nqubits must be 1-{MAX_UNITARY_QUBITS} for a sweep, got {nqubits}");
    }
    let device = resolve_device(config)?;
    let numbers = 1..(1u64 << nqubits);

    let progress = ProgressBar::new(numbers.end - numbers.start);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut rows: Vec<Comparison> = Vec::new();
    for number in numbers {
        progress.set_message(format!("x < {number}"));
        rows.push(compare(
            number,
            nqubits,
            form,
            &device,
            config.optimization_level,
            config.verify,
        )?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{} Sweep of {:?} oracles over {} qubits on {} (level {})\n",
        style("→").cyan().bold(),
        form,
        nqubits,
        style(device.name()).yellow(),
        config.optimization_level
    );
    println!(
        "  {:>6}  {:>10} {:>8}  {:>11} {:>9}  {:>7}",
        "number", "gate depth", "gate ops", "dense depth", "dense ops", "ratio"
    );
    for row in &rows {
        println!(
            "  {:>6}  {:>10} {:>8}  {:>11} {:>9}  {:>7.2}",
            row.number,
            row.gate_level.decomposed.depth,
            row.gate_level.decomposed.total_ops,
            row.dense.decomposed.depth,
            row.dense.decomposed.total_ops,
            row.ratio
        );
    }

    let cheaper = rows.iter().filter(|r| r.gate_level_is_cheaper()).count();
    println!(
        "\n{} Gate-level construction cheaper for {}/{} numbers",
        style("✓").green().bold(),
        cheaper,
        rows.len()
    );
    Ok(())
}
