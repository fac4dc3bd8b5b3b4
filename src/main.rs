use std::path::PathBuf;

use clap::Parser;

use balancer::lifecycle::{signals, startup, Shutdown, StartupOptions};
use balancer::observability::logging;

#[derive(Parser)]
#[command(name = "balancer", version)]
#[command(about = "Round-robin HTTP load balancer with active health checks", long_about = None)]
struct Cli {
    /// Configuration file (JSON, or TOML by extension).
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = logging::DEFAULT_DIRECTIVE)]
    log_level: String,

    /// Run an in-process echo backend on this port (repeatable).
    #[arg(long = "simulate-backend", value_name = "PORT")]
    simulate_backends: Vec<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    tracing::info!("balancer v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let options = StartupOptions {
        config_path: cli.config,
        simulated_backends: cli.simulate_backends,
    };

    if let Err(e) = startup::run(options, receiver).await {
        tracing::error!(error = %e, "Balancer failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
