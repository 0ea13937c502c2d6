use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Augment(AugmentArgs),
    Toggle(ToggleArgs),
    State {
        #[command(subcommand)]
        command: StateCommand,
    },
}

#[derive(Debug, Args)]
pub struct AugmentArgs {
    /// Input path to the server-rendered page HTML.
    #[arg(long)]
    pub page: String,

    /// Output path for the augmented page HTML.
    #[arg(long)]
    pub out: String,

    /// Path to the tree state store (JSON; a missing file is an empty store).
    #[arg(long)]
    pub state: String,

    /// Optional profile YAML overriding page markers and thresholds.
    #[arg(long)]
    pub profile: Option<String>,

    /// Overwrite the output file if it already exists.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// Input path to the server-rendered page HTML.
    #[arg(long)]
    pub page: String,

    /// Path to the tree state store (JSON; created on first toggle).
    #[arg(long)]
    pub state: String,

    /// Zero-based index of the tree node, in document order.
    #[arg(long)]
    pub index: usize,

    /// Explicit target state; omitted means invert the node's effective state.
    #[arg(long)]
    pub open: Option<bool>,

    /// Optional profile YAML overriding page markers and thresholds.
    #[arg(long)]
    pub profile: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum StateCommand {
    Show(StateShowArgs),
}

#[derive(Debug, Args)]
pub struct StateShowArgs {
    /// Path to the tree state store (JSON).
    #[arg(long)]
    pub state: String,
}
