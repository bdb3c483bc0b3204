//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - less-than oracle construction and resource comparison",
        style("qcmp").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qcmp-ir       Circuit representation and metrics");
    println!("  qcmp-compile  Basis and connectivity decomposer");
    println!("  qcmp-oracle   Comparator, unitary and phase oracles");
    println!("  qcmp-sim      Operator reconstruction for verification");
    println!("  qcmp-cli      Command-line interface");
}
