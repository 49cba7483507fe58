use crate::error::{env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Default path for the cached OAuth token
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

/// Default path for the CSV input file
pub const DEFAULT_INPUT_FILE: &str = "insert_google_cal_event.csv";

/// Default venue placed on every imported event
pub const DEFAULT_EVENT_LOCATION: &str = "650 Yio Chu Kang Rd, Singapore 787075";

/// Default local port for the OAuth redirect listener
pub const DEFAULT_OAUTH_REDIRECT_PORT: u16 = 8080;

/// Main configuration structure for the importer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Google Calendar ID to insert events into
    pub google_calendar_id: String,
    /// Path of the cached OAuth token file
    pub token_file: String,
    /// Path of the CSV file to import
    pub input_file: String,
    /// Venue string placed on every event
    pub event_location: String,
    /// Local port used for the interactive OAuth callback
    pub oauth_redirect_port: u16,
    /// Whether to list upcoming events before importing
    pub diagnostic_listing: bool,
}

/// Optional overrides loaded from config/import.toml
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    google_calendar_id: Option<String>,
    token_file: Option<String>,
    input_file: Option<String>,
    event_location: Option<String>,
    oauth_redirect_port: Option<u16>,
    diagnostic_listing: Option<bool>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").map_err(|_| env_error("GOOGLE_CALENDAR_ID"))?;

        // Optional values with defaults
        let token_file =
            env::var("TOKEN_FILE").unwrap_or_else(|_| String::from(DEFAULT_TOKEN_FILE));
        let input_file =
            env::var("INPUT_FILE").unwrap_or_else(|_| String::from(DEFAULT_INPUT_FILE));
        let event_location =
            env::var("EVENT_LOCATION").unwrap_or_else(|_| String::from(DEFAULT_EVENT_LOCATION));
        let oauth_redirect_port = env::var("OAUTH_REDIRECT_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_OAUTH_REDIRECT_PORT);
        let diagnostic_listing = env::var("DIAGNOSTIC_LISTING")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let mut config = Config {
            google_client_id,
            google_client_secret,
            google_calendar_id,
            token_file,
            input_file,
            event_location,
            oauth_redirect_port,
            diagnostic_listing,
        };

        // Merge overrides from file if it exists
        if let Ok(content) = fs::read_to_string("config/import.toml") {
            if let Ok(overrides) = toml::from_str::<FileOverrides>(&content) {
                config.apply_overrides(overrides);
            }
        }

        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: FileOverrides) {
        if let Some(v) = overrides.google_calendar_id {
            self.google_calendar_id = v;
        }
        if let Some(v) = overrides.token_file {
            self.token_file = v;
        }
        if let Some(v) = overrides.input_file {
            self.input_file = v;
        }
        if let Some(v) = overrides.event_location {
            self.event_location = v;
        }
        if let Some(v) = overrides.oauth_redirect_port {
            self.oauth_redirect_port = v;
        }
        if let Some(v) = overrides.diagnostic_listing {
            self.diagnostic_listing = v;
        }
    }
}
