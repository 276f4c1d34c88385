// Entry point for the bulk optimizer. Takes no arguments: everything comes
// from the environment (see `core::Config`).

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use bulk_image_optimizer_lib::{CloudinaryClient, Config};

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("Loading configuration failed")?;
    let client = CloudinaryClient::new(&config.credentials, &config.settings)
        .context("Building HTTP client failed")?;

    let summary = bulk_image_optimizer_lib::run(&config.settings, &client).await?;
    info!("\n{}", summary);
    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)          // Keep colored output
        .with_writer(std::io::stdout)
        .compact();               // Use compact formatter instead of pretty

    subscriber.init();

    info!("=== Bulk optimization starting ===");

    if let Err(e) = run().await {
        error!("Run failed: {:#}", e);
        std::process::exit(1);
    }

    info!("=== Bulk optimization finished ===");
}
