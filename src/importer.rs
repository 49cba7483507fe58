use crate::calendar::{CalendarClient, CalendarEvent, InputRecord};
use crate::config::Config;
use crate::error::AppResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Import every row of the input file into the calendar
///
/// Strictly sequential: each record is read, mapped, and submitted before the
/// next one is pulled from the file. The first failure aborts the run; rows
/// already submitted are not rolled back.
pub async fn run_import(
    config: Arc<RwLock<Config>>,
    client: &CalendarClient,
) -> AppResult<usize> {
    let (input_file, location) = {
        let config_read = config.read().await;
        (config_read.input_file.clone(), config_read.event_location.clone())
    };

    let mut reader = csv::Reader::from_path(&input_file)?;
    info!("Importing events from {}", input_file);

    let mut inserted = 0;
    for result in reader.deserialize() {
        let record: InputRecord = result?;
        let event = CalendarEvent::from_record(&record, &location)?;
        client.insert_event(&event).await?;
        inserted += 1;
    }

    Ok(inserted)
}
