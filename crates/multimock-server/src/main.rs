mod cli;

use cli::Cli;
use multimock_server::{MockRegistry, RegistryConfig};
use std::error::Error;
use std::process;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse_args();
    setup_logging(cli.verbose);

    let mut config = RegistryConfig::from_file(&cli.config).await?;
    if let Some(host) = cli.host {
        config.host = host;
    }

    eprintln!("Loading mock APIs from: {}", cli.config.display());
    let mut registry = MockRegistry::launch(config).await?;

    for (name, url) in registry.get_urls() {
        eprintln!("  {name}: {url}");
    }
    eprintln!("Mock servers ready, press Ctrl+C to stop");

    // Wait for shutdown signal
    let waited = signal::ctrl_c().await;
    eprintln!("\nShutdown signal received, stopping mock servers...");
    registry.stop_all().await;
    eprintln!("Mock servers stopped.");

    waited.map_err(Into::into)
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
