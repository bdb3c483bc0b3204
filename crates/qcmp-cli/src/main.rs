//! qcmp Command-Line Interface
//!
//! Builds less-than oracles as a gate-level comparator and as a dense
//! unitary, decomposes both for a device and compares depth and gate counts.
//!
//! ```text
//! qcmp compare 17 5 --device heavy_hex_16
//! qcmp build comparator 17 5 -o lt17.json
//! qcmp sweep 4 --device iqm_star_5
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use qcmp_cli::cli::{Cli, Commands};
use qcmp_cli::commands::{build, compare, devices, sweep, version};
use qcmp_cli::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = Config::load(cli.config.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|config| match cli.command {
            Commands::Compare {
                number,
                nqubits,
                form,
                device,
                device_file,
                opt_level,
                json,
                verify,
            } => {
                let config = config.with_flags(device, device_file, opt_level, verify);
                config.validate()?;
                compare::execute(number, nqubits, form, &config, json)
            }

            Commands::Build {
                kind,
                number,
                nqubits,
                output,
            } => build::execute(kind, number, nqubits, output.as_deref()),

            Commands::Sweep {
                nqubits,
                form,
                device,
                device_file,
                opt_level,
                json,
            } => {
                let config = config.with_flags(device, device_file, opt_level, false);
                config.validate()?;
                sweep::execute(nqubits, form, &config, json)
            }

            Commands::Devices { name } => devices::execute(name.as_deref()),

            Commands::Version => {
                version::execute();
                Ok(())
            }
        });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
