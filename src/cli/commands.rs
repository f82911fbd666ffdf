use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskdeck", about = concat!("taskdeck v", env!("CARGO_PKG_VERSION"), " - replay touch traces and inspect interaction settings"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Interaction config file (defaults apply when it does not exist)
    #[arg(long, global = true, default_value = "taskdeck.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded touch trace through the gesture classifier
    Classify(ClassifyArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// JSON file holding an array of touch events
    pub trace: PathBuf,
}
