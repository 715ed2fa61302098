//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "sous",
    bin_name = "sous",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f373} Composable recipes for repo scaffolding",
    long_about = "Sous applies declarative configuration recipes (test setup, \
                  linting, docs, CI) to a repository, resolving dependencies \
                  between them and keeping the result reproducible.",
    after_help = "EXAMPLES:\n\
        \x20 sous init my-workspace\n\
        \x20 sous add rust-ci github:acme/recipes/rust-lint\n\
        \x20 sous apply\n\
        \x20 sous list\n\
        \x20 sous completions bash > /usr/share/bash-completion/completions/sous",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialise a workspace.
    #[command(
        about = "Initialise a workspace",
        after_help = "EXAMPLES:\n\
            \x20 sous init               # workspace named after the directory\n\
            \x20 sous init my-workspace"
    )]
    Init(InitArgs),

    /// Queue recipes or stacks for the next apply.
    #[command(
        visible_alias = "a",
        about = "Queue recipes for the next apply",
        after_help = "EXAMPLES:\n\
            \x20 sous add rust-ci\n\
            \x20 sous add ./recipes/docs\n\
            \x20 sous add github:acme/recipes/rust-lint\n\
            \x20 sous add web-stack        # stacks expand to their recipes"
    )]
    Add(AddArgs),

    /// Apply every pending recipe.
    #[command(
        about = "Apply pending recipes",
        after_help = "EXAMPLES:\n\
            \x20 sous apply\n\
            \x20 sous apply --target ./worktrees/main --project my-app"
    )]
    Apply(ApplyArgs),

    /// List installed and pending recipes.
    #[command(
        visible_alias = "ls",
        about = "List installed and pending recipes",
        after_help = "EXAMPLES:\n\
            \x20 sous list\n\
            \x20 sous list --format json"
    )]
    List(ListArgs),

    /// Run a recipe's validation checks.
    #[command(
        about = "Run validation checks",
        after_help = "EXAMPLES:\n\
            \x20 sous validate              # all installed recipes\n\
            \x20 sous validate rust-ci"
    )]
    Validate(ValidateArgs),

    /// Run a command defined by a recipe.
    #[command(
        about = "Run a recipe-defined command",
        after_help = "EXAMPLES:\n\
            \x20 sous run test-setup check"
    )]
    Run(RunArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sous completions bash > ~/.local/share/bash-completion/completions/sous\n\
            \x20 sous completions zsh  > ~/.zfunc/_sous\n\
            \x20 sous completions fish > ~/.config/fish/completions/sous.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Sous configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 sous config get cache.dir\n\
            \x20 sous config set output.no_color true\n\
            \x20 sous config list"
    )]
    Config(ConfigCommands),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `sous init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Workspace name.  Defaults to the workspace directory's name.
    #[arg(value_name = "NAME", help = "Workspace name")]
    pub name: Option<String>,
}

// ── add ───────────────────────────────────────────────────────────────────────

/// Arguments for `sous add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Recipe references: bare names, local paths, github: shorthands, or
    /// git URLs.
    #[arg(value_name = "RECIPE", required = true, help = "Recipe references")]
    pub recipes: Vec<String>,
}

// ── apply ─────────────────────────────────────────────────────────────────────

/// Arguments for `sous apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Directory worktree-scoped recipes generate into.
    #[arg(
        short = 't',
        long = "target",
        value_name = "DIR",
        help = "Target directory for worktree-scoped recipes (default: workspace root)"
    )]
    pub target: Option<PathBuf>,

    /// Project name exposed to templates as {{ project_name }}.
    #[arg(
        short = 'p',
        long = "project",
        value_name = "NAME",
        help = "Project name (default: workspace name)"
    )]
    pub project: Option<String>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `sous list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON object.
    Json,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `sous validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Recipe to validate.  Omit to validate every installed recipe.
    #[arg(value_name = "RECIPE", help = "Recipe name (default: all installed)")]
    pub recipe: Option<String>,

    /// Directory the checks run against.
    #[arg(
        short = 't',
        long = "target",
        value_name = "DIR",
        help = "Target directory (default: workspace root)"
    )]
    pub target: Option<PathBuf>,
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Arguments for `sous run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Recipe that defines the command.
    #[arg(value_name = "RECIPE", help = "Recipe name")]
    pub recipe: String,

    /// Command name from the recipe's [commands] table.
    #[arg(value_name = "COMMAND", help = "Command name")]
    pub command: String,

    /// Working directory for the command.
    #[arg(
        short = 't',
        long = "target",
        value_name = "DIR",
        help = "Working directory (default: workspace root)"
    )]
    pub target: Option<PathBuf>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `sous completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `sous config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `cache.dir`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
