use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dfreport", version, about = "Designated Forest parcel report generator")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Path to a JSON config file (defaults to the built-in county paths)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one report: prompts for a PID and a DF number.
    Run,
    /// Generate several reports in one sitting: prompts for PID/DF-number
    /// pairs until an empty PID is entered.
    Batch,
}
