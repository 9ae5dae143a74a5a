//! Clap derive structures for the `scanctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// scanctl -- console for vulnerability-scan managers
#[derive(Debug, Parser)]
#[command(
    name = "scanctl",
    version,
    about = "Manage vulnerability scans from the command line",
    long_about = "A console for vulnerability-scan managers.\n\n\
        Talks to the management-protocol gateway, caches fetched entities\n\
        per session, and renders tasks, reports, scanners, schedules, and\n\
        credentials as tables, JSON, or YAML.",
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
    /// Gateway profile to use
    #[arg(long, short = 'p', env = "SCANCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Gateway URL (overrides profile)
    #[arg(long, short = 'g', env = "SCANCTL_GATEWAY", global = true)]
    pub gateway: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', env = "SCANCTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SCANCTL_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SCANCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SCANCTL_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Inspect scan tasks
    #[command(alias = "task", alias = "t")]
    Tasks(TasksArgs),

    /// Inspect compliance audits
    #[command(alias = "audit")]
    Audits(AuditsArgs),

    /// Inspect scan reports
    #[command(alias = "report", alias = "r")]
    Reports(ReportsArgs),

    /// Inspect scanners
    #[command(alias = "scanner")]
    Scanners(ScannersArgs),

    /// Inspect schedules
    #[command(alias = "schedule")]
    Schedules(SchedulesArgs),

    /// Inspect credentials
    #[command(alias = "credential", alias = "cred")]
    Credentials(CredentialsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared filtering arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Powerfilter string (e.g. "name~web rows=10 sort=name")
    #[arg(long, short = 'f')]
    pub filter: Option<String>,
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List tasks
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one task
    Get {
        /// Task id
        id: String,

        /// Powerfilter string applied to the fetch
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Request the expanded representation
        #[arg(long)]
        details: bool,
    },
}

// ── Audits ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuditsArgs {
    #[command(subcommand)]
    pub command: AuditsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuditsCommand {
    /// List audits
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one audit
    Get {
        /// Audit id
        id: String,
    },
}

// ── Reports ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// List reports
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one report (or compare two)
    Get {
        /// Report id
        id: String,

        /// Compare against this report id
        #[arg(long)]
        delta: Option<String>,

        /// Powerfilter string applied to the fetch
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Always fetch the detailed representation
        #[arg(long, conflicts_with = "summary")]
        details: bool,

        /// Only fetch the summary, skipping the threshold upgrade
        #[arg(long)]
        summary: bool,
    },
}

// ── Scanners ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScannersArgs {
    #[command(subcommand)]
    pub command: ScannersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScannersCommand {
    /// List scanners
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one scanner
    Get {
        /// Scanner id
        id: String,
    },
}

// ── Schedules ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SchedulesArgs {
    #[command(subcommand)]
    pub command: SchedulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchedulesCommand {
    /// List schedules
    #[command(alias = "ls")]
    List(ListArgs),
}

// ── Credentials ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CredentialsArgs {
    #[command(subcommand)]
    pub command: CredentialsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CredentialsCommand {
    /// List credentials
    #[command(alias = "ls")]
    List(ListArgs),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create a profile
    Init,

    /// Show the effective configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
