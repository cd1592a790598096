pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "harana", version, about = "Audio panel for the CodeHarana site")]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to $HARANA_CONFIG, then harana.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the panel interactively against a simulated track
    Play {
        /// Track length in seconds
        #[arg(short, long)]
        duration: Option<f64>,

        /// Start playback without waiting for a key press
        #[arg(long)]
        autoplay: bool,

        /// Refuse playback until the first key press
        #[arg(long)]
        blocked: bool,

        /// Print the final panel state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init {
        #[arg(long)]
        force: bool,
    },

    /// Format a time readout, optionally with progress against a duration
    Time {
        seconds: f64,

        #[arg(long = "of")]
        duration: Option<f64>,
    },
}
