mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // Report to stderr; RUST_LOG overrides the default level.
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();

    let cli = cli::Cli::parse();
    let result = match cli.command {
        cli::Command::Init(args) => commands::init::execute(args),
        cli::Command::Doctor(args) => commands::doctor::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
