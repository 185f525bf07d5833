//! Clap derive structures for the `netinv` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap and clap_complete may be used here: `build.rs` includes this
//! file to render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netinv -- network device inventory from the command line
#[derive(Debug, Parser)]
#[command(
    name = "netinv",
    version,
    about = "Keep an inventory of network devices from the command line",
    long_about = "Register, search, edit and report on network devices.\n\n\
        Devices live in a JSON file per profile. Every destructive write\n\
        is preceded by a timestamped snapshot that can be restored.",
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

#[derive(Debug, Clone, Args)]
pub struct GlobalOpts {
    /// Inventory profile to use
    #[arg(long, short = 'p', env = "NETINV_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Data file (overrides profile; snapshots default to a sibling snapshots/ dir)
    #[arg(long, env = "NETINV_DATA_FILE", global = true, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Snapshot directory (overrides profile)
    #[arg(long, env = "NETINV_SNAPSHOT_DIR", global = true, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETINV_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new device
    #[command(alias = "new")]
    Add(AddArgs),

    /// Find devices by Name, IP, Type or Location
    #[command(alias = "search")]
    Find {
        /// Case-insensitive substring
        term: String,
    },

    /// List every device
    #[command(alias = "ls")]
    List,

    /// Edit the single device whose Name or IP matches
    Edit(EditArgs),

    /// Delete every device whose Name or IP matches
    #[command(alias = "rm")]
    Delete {
        /// Case-insensitive substring of Name or IP
        term: String,
    },

    /// Remove all devices
    Clear,

    /// Summarize the inventory by type, layer and service
    Report,

    /// List and restore pre-write snapshots
    #[command(alias = "snap")]
    Snapshots(SnapshotsArgs),

    /// Interactive menu
    Menu,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-field values shared by `add` and `edit`.
#[derive(Debug, Clone, Default, Args)]
pub struct DeviceFields {
    /// Device name
    #[arg(long)]
    pub name: Option<String>,

    /// Device type (switch, router, access-point, end-device, server, cloud)
    #[arg(long = "type", value_name = "TYPE")]
    pub device_type: Option<String>,

    /// IPv4 or IPv6 address
    #[arg(long)]
    pub ip: Option<String>,

    /// Physical location
    #[arg(long)]
    pub location: Option<String>,

    /// VLANs, free text (e.g. "10,20")
    #[arg(long)]
    pub vlans: Option<String>,

    /// Comma-separated network services (e.g. "ssh,ospf")
    #[arg(long, value_name = "LIST")]
    pub services: Option<String>,

    /// Network layer (access, distribution, core)
    #[arg(long)]
    pub layer: Option<String>,
}

impl DeviceFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.device_type.is_none()
            && self.ip.is_none()
            && self.location.is_none()
            && self.vlans.is_none()
            && self.services.is_none()
            && self.layer.is_none()
    }
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub fields: DeviceFields,

    /// Fail instead of prompting for missing fields
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Case-insensitive substring of Name or IP
    pub term: String,

    #[command(flatten)]
    pub fields: DeviceFields,

    /// Remove every network service
    #[arg(long, conflicts_with = "services")]
    pub clear_services: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SNAPSHOTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SnapshotsArgs {
    #[command(subcommand)]
    pub command: SnapshotsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotsCommand {
    /// List snapshots of the active data file, newest first
    #[command(alias = "ls")]
    List,

    /// Replace the data file with a snapshot
    Restore {
        /// Snapshot file name (as listed) or path
        file: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key: data_file, snapshot_dir, device_types, layers, services
        key: String,

        /// Value to set (comma-separated for lists)
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
