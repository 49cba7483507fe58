mod calendar;
mod config;
mod error;
mod importer;
mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting STOSC calendar import");

    // Load configuration
    let config = startup::load_config()?;

    // Run the import
    startup::run(config).await
}
