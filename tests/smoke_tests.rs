use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use stosc_calendar_import::calendar::models::{CalendarEvent, InputRecord};
use stosc_calendar_import::calendar::TokenManager;
use stosc_calendar_import::config::Config;
use tokio::sync::RwLock;

fn test_config() -> Config {
    Config {
        google_client_id: "test_client_id".to_string(),
        google_client_secret: "test_client_secret".to_string(),
        google_calendar_id: "test_calendar_id@group.calendar.google.com".to_string(),
        token_file: "token.json".to_string(),
        input_file: "insert_google_cal_event.csv".to_string(),
        event_location: "650 Yio Chu Kang Rd, Singapore 787075".to_string(),
        oauth_redirect_port: 8080,
        diagnostic_listing: false,
    }
}

/// Smoke test to verify that a config can be constructed
#[tokio::test]
async fn test_config_fields() {
    let config = test_config();

    assert_eq!(config.token_file, "token.json");
    assert_eq!(
        config.google_calendar_id,
        "test_calendar_id@group.calendar.google.com"
    );
    assert!(!config.diagnostic_listing);
}

/// The worked end-to-end mapping scenario
#[tokio::test]
async fn test_row_maps_to_expected_event() {
    let config = test_config();

    let record = InputRecord {
        title: "Sunday Service".to_string(),
        service_date_start: "2024-03-10".to_string(),
        start_time: "9:00".to_string(),
        bible: "John 3:16".to_string(),
        desc: "Grace".to_string(),
    };

    let event = CalendarEvent::from_record(&record, &config.event_location).unwrap();

    assert_eq!(event.summary, "STOSC: Sunday Service");
    assert_eq!(event.description, "<b>John 3:16</b>\n\nGrace");
    assert_eq!(event.location, "650 Yio Chu Kang Rd, Singapore 787075");
    assert_eq!(event.start.date_time, "2024-03-10T09:00:00+08:00");
    assert_eq!(event.end.date_time, "2024-03-10T12:00:00+08:00");
}

/// CSV rows map in file order, and a malformed date fails before submission
#[tokio::test]
async fn test_csv_to_events() {
    let config = test_config();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "title,service_date_start,start_time,bible,desc").unwrap();
    writeln!(file, "Sunday Service,2024-03-10,9:00,John 3:16,Grace").unwrap();
    writeln!(file, "Christmas Eve,2024-12-24,22:00,Luke 2:11,Joy").unwrap();

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    let records: Vec<InputRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);

    let events: Vec<CalendarEvent> = records
        .iter()
        .map(|r| CalendarEvent::from_record(r, &config.event_location).unwrap())
        .collect();

    assert_eq!(events[0].summary, "STOSC: Sunday Service");
    assert_eq!(events[1].summary, "STOSC: Christmas Eve");
    assert_eq!(events[1].end.date_time, "2024-12-25T01:00:00+08:00");

    // A malformed date aborts mapping for that row
    let bad = InputRecord {
        title: "Bad Row".to_string(),
        service_date_start: "2024-13-40".to_string(),
        start_time: "9:00".to_string(),
        bible: "".to_string(),
        desc: "".to_string(),
    };
    assert!(CalendarEvent::from_record(&bad, &config.event_location).is_err());
}

/// An unexpired cached token is returned from the file without any network call
#[tokio::test]
async fn test_cached_token_roundtrip() {
    let config = Arc::new(RwLock::new(test_config()));

    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token.json");

    let cached = json!({
        "access_token": "cached_access_token",
        "refresh_token": "cached_refresh_token",
        "expires_at": chrono::Utc::now().timestamp() + 3600,
    });
    std::fs::write(&token_path, cached.to_string()).unwrap();

    let token_manager = TokenManager::new(config, &token_path);
    let token = token_manager.get_token().await.unwrap();

    assert_eq!(
        token.get("access_token").and_then(|v| v.as_str()),
        Some("cached_access_token")
    );
    assert_eq!(
        token.get("refresh_token").and_then(|v| v.as_str()),
        Some("cached_refresh_token")
    );
}
