//! Devices command implementation.

use anyhow::Result;
use console::style;

use qcmp_compile::{DeviceModel, PRESET_NAMES};

/// Execute the devices command.
pub fn execute(name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        let device = DeviceModel::preset(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown device: '{}'. Available: {}",
                name,
                PRESET_NAMES.join(", ")
            )
        })?;
        print!("{}", serde_yaml_ng::to_string(&device.to_profile())?);
        return Ok(());
    }

    println!("{} Device presets:\n", style("qcmp").cyan().bold());
    for name in PRESET_NAMES {
        let Some(device) = DeviceModel::preset(name) else {
            continue;
        };
        println!("  {} {}", style("●").green(), style(name).bold());
        println!("    Qubits: {}", device.num_qubits());
        println!("    Couplings: {}", device.coupling().edges().len());
        println!("    Gates: {}", device.basis().gates().join(", "));
        println!();
    }
    println!(
        "Custom devices: pass {} with a YAML or JSON profile",
        style("--device-file").yellow()
    );
    Ok(())
}
