use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Authentication error: {0}")]
    #[diagnostic(code(stosc_calendar_import::auth))]
    Auth(String),

    #[error("Date/time format error: {0}")]
    #[diagnostic(code(stosc_calendar_import::format))]
    Format(String),

    #[error("Calendar service error: {0}")]
    #[diagnostic(code(stosc_calendar_import::service))]
    Service(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(stosc_calendar_import::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(stosc_calendar_import::config))]
    Config(String),

    #[error("CSV input error: {0}")]
    #[diagnostic(code(stosc_calendar_import::csv))]
    Csv(String),

    #[error(transparent)]
    #[diagnostic(code(stosc_calendar_import::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(stosc_calendar_import::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(stosc_calendar_import::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for CSV reader errors
impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create authentication errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create date/time format errors
pub fn format_error(message: &str) -> Error {
    Error::Format(message.to_string())
}

/// Helper to create calendar service errors
pub fn service_error(message: &str) -> Error {
    Error::Service(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
