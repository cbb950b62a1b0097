//! Clap derive structures for the `motionbridge` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// motionbridge -- inspect the MOTION blind bridge configuration
#[derive(Debug, Parser)]
#[command(
    name = "motionbridge",
    version,
    about = "Inspect MOTION blind bridge configuration and identities",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (TOML or JSON); defaults to the platform config dir
    #[arg(long, env = "MOTIONBRIDGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MOTIONBRIDGE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the resolved per-blind configuration
    #[command(alias = "b")]
    Blinds,

    /// Print the accessory UUID the bridge assigns to each MAC
    Uuid(UuidArgs),

    /// Decode raw battery readings into voltage and charge
    Battery(BatteryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct UuidArgs {
    /// Blind MAC addresses (any case, ':' or '-' separated)
    #[arg(required = true)]
    pub macs: Vec<String>,
}

#[derive(Debug, Args)]
pub struct BatteryArgs {
    /// Raw `batteryLevel` values as reported by the gateway (centivolts)
    #[arg(required = true)]
    pub levels: Vec<u32>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
