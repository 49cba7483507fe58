use super::models::{CalendarEvent, EventSummary, InsertedEvent};
use super::token::TokenManager;
use crate::config::Config;
use crate::error::{service_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

/// Base URL for the Google Calendar v3 API
const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Pull the persisted event id out of a successful insert response
fn inserted_event_id(created: &serde_json::Value) -> AppResult<String> {
    created
        .get("id")
        .and_then(|id| id.as_str())
        .map(|id| id.to_string())
        .ok_or_else(|| service_error("Insert response missing 'id' field"))
}

/// Authenticated client for the Google Calendar API
pub struct CalendarClient {
    config: Arc<RwLock<Config>>,
    token_manager: TokenManager,
    client: Client,
}

impl CalendarClient {
    pub fn new(config: Arc<RwLock<Config>>, token_manager: TokenManager) -> Self {
        Self {
            config,
            token_manager,
            client: Client::new(),
        }
    }

    async fn calendar_id(&self) -> String {
        let config_read = self.config.read().await;
        config_read.google_calendar_id.clone()
    }

    async fn access_token(&self) -> AppResult<String> {
        let token = self.token_manager.get_token().await?;
        token
            .get("access_token")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or_else(|| service_error("No access token available"))
    }

    /// Insert one event into the configured calendar
    ///
    /// Not idempotent: submitting the same logical event twice creates a
    /// duplicate, since no deduplication key is sent.
    pub async fn insert_event(&self, event: &CalendarEvent) -> AppResult<InsertedEvent> {
        let calendar_id = self.calendar_id().await;
        let access_token = self.access_token().await?;

        let url = format!("{}/calendars/{}/events", API_BASE, calendar_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(event)
            .send()
            .await
            .map_err(|e| service_error(&format!("Failed to insert event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(service_error(&format!(
                "Failed to insert event: HTTP {} - {}",
                status, error_body
            )));
        }

        let created: serde_json::Value = response
            .json()
            .await
            .map_err(|e| service_error(&format!("Failed to parse insert response: {}", e)))?;

        let id = inserted_event_id(&created)?;

        info!(
            "Event created: {} - [{}]",
            event.summary, event.start.date_time
        );

        Ok(InsertedEvent {
            id,
            summary: event.summary.clone(),
        })
    }

    /// List upcoming events from the calendar, soonest first
    ///
    /// Read-only diagnostic path; callers log failures instead of aborting.
    pub async fn list_upcoming_events(&self, max_results: u32) -> AppResult<Vec<EventSummary>> {
        let calendar_id = self.calendar_id().await;
        let access_token = self.access_token().await?;

        let url_str = format!("{}/calendars/{}/events", API_BASE, calendar_id);
        let mut url = Url::parse(&url_str)
            .map_err(|e| service_error(&format!("Failed to parse URL: {}", e)))?;

        let mut query_params = HashMap::new();
        query_params.insert("timeMin", Utc::now().to_rfc3339());
        query_params.insert("maxResults", max_results.to_string());
        query_params.insert("singleEvents", "true".to_string());
        query_params.insert("orderBy", "startTime".to_string());

        for (key, value) in query_params {
            url.query_pairs_mut().append_pair(key, &value);
        }

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| service_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(service_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| service_error(&format!("Failed to parse events response: {}", e)))?;

        let events = response_data
            .get("items")
            .and_then(|i| i.as_array())
            .ok_or_else(|| service_error("No items in response"))?;

        let summaries = events
            .iter()
            .map(|event| {
                let id = event
                    .get("id")
                    .and_then(|id| id.as_str())
                    .unwrap_or("")
                    .to_string();
                let summary = event
                    .get("summary")
                    .and_then(|s| s.as_str())
                    .map(|s| s.to_string());

                let start_date_time = event
                    .get("start")
                    .and_then(|start| start.as_object())
                    .and_then(|start| start.get("dateTime"))
                    .and_then(|dt| dt.as_str())
                    .map(|s| s.to_string());

                let start_date = event
                    .get("start")
                    .and_then(|start| start.as_object())
                    .and_then(|start| start.get("date"))
                    .and_then(|d| d.as_str())
                    .map(|s| s.to_string());

                EventSummary {
                    id,
                    summary,
                    start_date_time,
                    start_date,
                }
            })
            .collect();

        Ok(summaries)
    }
}
