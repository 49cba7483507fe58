use crate::calendar::{CalendarClient, TokenManager};
use crate::config::Config;
use crate::error::Error;
use crate::importer;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Upper bound on the diagnostic listing
const DIAGNOSTIC_MAX_RESULTS: u32 = 10;

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Run one import pass over the configured input file
pub async fn run(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (token_file, diagnostic_listing) = {
        let config_read = config.read().await;
        (config_read.token_file.clone(), config_read.diagnostic_listing)
    };

    // One token manager for the whole run, shared by every submission
    let token_manager = TokenManager::new(Arc::clone(&config), &token_file);
    let client = CalendarClient::new(Arc::clone(&config), token_manager);

    if diagnostic_listing {
        list_upcoming(&client).await;
    }

    let inserted = importer::run_import(Arc::clone(&config), &client).await?;
    info!("Imported {} events", inserted);

    Ok(())
}

/// Log the next few upcoming events, without aborting on failure
async fn list_upcoming(client: &CalendarClient) {
    info!("Getting the upcoming {} events", DIAGNOSTIC_MAX_RESULTS);

    match client.list_upcoming_events(DIAGNOSTIC_MAX_RESULTS).await {
        Ok(events) if events.is_empty() => info!("No upcoming events found"),
        Ok(events) => {
            for event in events {
                let start = event
                    .start_date_time
                    .or(event.start_date)
                    .unwrap_or_default();
                info!("{} {}", start, event.summary.unwrap_or_default());
            }
        }
        Err(e) => warn!("An error occurred: {}", e),
    }
}
