//! Clap derive structures for the `prosmart` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// prosmart -- monitor and control ProSmart Wi-Fi thermostats
#[derive(Debug, Parser)]
#[command(
    name = "prosmart",
    version,
    about = "Monitor and control ProSmart / Computherm Wi-Fi thermostats",
    long_about = "A CLI for the ProSmart thermostat cloud.\n\n\
        Polls each registered thermostat for a normalized state snapshot\n\
        and sends relay commands (mode, set points, boost, hysteresis).",
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
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, env = "PROSMART_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long, env = "PROSMART_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PROSMART_TIMEOUT", default_value = "10", global = true)]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the account's registered thermostats
    #[command(alias = "dev", alias = "ls")]
    Devices,

    /// Show the current snapshot for one or all devices
    Status {
        /// Device id or name (all devices when omitted)
        device: Option<String>,
    },

    /// Follow snapshot updates as they are published
    Watch {
        /// Device id or name (all devices when omitted)
        device: Option<String>,
    },

    /// Send a control command to a device
    #[command(subcommand)]
    Set(SetCommand),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

// ── Set subcommands ──────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum SetCommand {
    /// Switch the heating mode (MANUAL, SCHEDULE or OFF)
    Mode {
        /// Device id or name
        #[arg(long, short = 'd')]
        device: String,
        /// Target mode
        mode: String,
    },

    /// Set the manual-mode target temperature (°C)
    Manual {
        #[arg(long, short = 'd')]
        device: String,
        degrees: f64,
    },

    /// Set the boost target temperature (°C)
    BoostTemp {
        #[arg(long, short = 'd')]
        device: String,
        degrees: f64,
    },

    /// Start a boost for the given duration (minutes)
    BoostTime {
        #[arg(long, short = 'd')]
        device: String,
        minutes: u32,
    },

    /// Set the upper hysteresis band (°C)
    HysteresisHigh {
        #[arg(long, short = 'd')]
        device: String,
        degrees: f64,
    },

    /// Set the lower hysteresis band (°C)
    HysteresisLow {
        #[arg(long, short = 'd')]
        device: String,
        degrees: f64,
    },
}

// ── Config subcommands ───────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file template
    Init,
    /// Print the config file path
    Path,
    /// Print the resolved configuration (password redacted)
    Show,
}
