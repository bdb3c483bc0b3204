//! Helpers shared by several commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qcmp_compile::{DeviceModel, DeviceProfile, PRESET_NAMES};
use qcmp_ir::Metrics;

use crate::config::Config;

/// The device selected by `config`: its device file if set, else its preset.
pub fn resolve_device(config: &Config) -> Result<DeviceModel> {
    if let Some(path) = &config.device_file {
        return load_device_file(path);
    }
    DeviceModel::preset(&config.device).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown device: '{}'. Available: {}",
            config.device,
            PRESET_NAMES.join(", ")
        )
    })
}

/// Load a device profile from a YAML or JSON file.
pub fn load_device_file(path: &Path) -> Result<DeviceModel> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let profile: DeviceProfile = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Invalid JSON device file: {}", path.display()))?,
        _ => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid YAML device file: {}", path.display()))?,
    };

    DeviceModel::try_from(profile)
        .with_context(|| format!("Invalid device description: {}", path.display()))
}

/// Print depth and per-gate counts, indented.
pub fn print_metrics(metrics: &Metrics) {
    println!(
        "    depth {}, {} ops ({} multi-qubit), {} of {} qubits active",
        style(metrics.depth).bold(),
        style(metrics.total_ops).bold(),
        metrics.multi_qubit_ops,
        metrics.active_qubits,
        metrics.num_qubits
    );
    let counts: Vec<String> = metrics
        .ops
        .iter()
        .map(|(gate, count)| format!("{gate}: {count}"))
        .collect();
    println!("    {}", style(counts.join(", ")).dim());
}
