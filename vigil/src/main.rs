// vigil/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs on stderr (RUST_LOG, default info); stdout is for the user.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            project_dir,
            format,
            offline,
        } => commands::run::execute(project_dir, format.into(), offline).await,
        Commands::Explore { project_dir } => commands::explore::execute(project_dir),
        Commands::Check { project_dir } => commands::check::execute(project_dir),
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}
