use clap::Parser;
use std::process::ExitCode;

use catalog::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr, and only when `CATALOG_LOG` is set, so they never mix
/// with command output or the full-screen browser.
fn init_logging() {
    let Ok(filter) = EnvFilter::try_from_env("CATALOG_LOG") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match cli.command.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
