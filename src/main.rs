mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::commands::{self, play::PlayOptions};
use cli::{Cli, Command};
use harana::state;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout belongs to the status line
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = state::resolve_path(cli.config.as_deref());

    match cli.command {
        Command::Play {
            duration,
            autoplay,
            blocked,
            json,
        } => {
            let opts = PlayOptions {
                duration,
                autoplay,
                blocked,
                json,
            };
            commands::play::run(opts, &config_path).await
        }
        Command::Init { force } => commands::init::run(&config_path, force),
        Command::Time { seconds, duration } => commands::misc::time(seconds, duration),
    }
}
