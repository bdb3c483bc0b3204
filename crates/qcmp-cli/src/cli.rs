//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

/// qcmp - compare gate-level and dense-unitary less-than oracles on a device
#[derive(Parser)]
#[command(name = "qcmp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "QCMP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build both constructions, decompose them for a device and compare resources
    Compare {
        /// Upper bound of the less-than predicate
        number: u64,

        /// Number of input qubits
        nqubits: u32,

        /// Oracle form: bit flip onto an output qubit, or a phase on the inputs
        #[arg(long, value_enum, default_value_t = OracleForm::BitFlip)]
        form: OracleForm,

        /// Device preset (see `qcmp devices`)
        #[arg(short, long)]
        device: Option<String>,

        /// Device description file (YAML or JSON)
        #[arg(long, conflicts_with = "device")]
        device_file: Option<PathBuf>,

        /// Optimization level (0-3)
        #[arg(long)]
        opt_level: Option<u8>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Check operator equivalence of each decomposition
        #[arg(long)]
        verify: bool,
    },

    /// Build one oracle and write its circuit document
    Build {
        /// Oracle construction
        #[arg(value_enum)]
        kind: OracleKind,

        /// Upper bound of the less-than predicate
        number: u64,

        /// Number of input qubits
        nqubits: u32,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare both constructions for every number from 1 below 2^nqubits
    Sweep {
        /// Number of input qubits
        nqubits: u32,

        /// Oracle form: bit flip onto an output qubit, or a phase on the inputs
        #[arg(long, value_enum, default_value_t = OracleForm::BitFlip)]
        form: OracleForm,

        /// Device preset (see `qcmp devices`)
        #[arg(short, long)]
        device: Option<String>,

        /// Device description file (YAML or JSON)
        #[arg(long, conflicts_with = "device")]
        device_file: Option<PathBuf>,

        /// Optimization level (0-3)
        #[arg(long)]
        opt_level: Option<u8>,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// List device presets, or print one as a device profile
    Devices {
        /// Preset to print as YAML
        name: Option<String>,
    },

    /// Show version information
    Version,
}

/// Oracle constructions available to `qcmp build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OracleKind {
    /// Gate-level bit-flip comparator with clean ancillas
    Comparator,
    /// Bit-flip oracle as one dense permutation block
    Unitary,
    /// Phase oracle as one dense diagonal block
    Diagonal,
    /// Ancilla-free gate-level phase oracle
    Phase,
}

/// Which pair of constructions `compare` and `sweep` measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OracleForm {
    /// Comparator circuit against the dense permutation block
    BitFlip,
    /// Ancilla-free phase circuit against the dense diagonal block
    Phase,
}
