//! sectional - demo binary
//!
//! Builds a manager with two demo sections and loads, prints, edits or
//! saves them from the command line.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sectional::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug, cli.log_json);

    info!("Starting sectional");

    // Execute the command
    if let Err(e) = cli.execute().await {
        error!("Error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

fn init_logging(debug: bool, json: bool) {
    let default_filter = if debug { "sectional=debug" } else { "sectional=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
