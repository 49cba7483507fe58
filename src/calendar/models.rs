use super::time::event_window;
use crate::error::AppResult;
use serde::{Deserialize, Serialize};

/// Prefix placed in front of every imported event title
pub const SUMMARY_PREFIX: &str = "STOSC: ";

/// Popup reminder lead time, one day before the service
pub const REMINDER_MINUTES: i64 = 1440;

/// One row of the CSV input file
#[derive(Debug, Clone, Deserialize)]
pub struct InputRecord {
    pub title: String,
    pub service_date_start: String,
    pub start_time: String,
    pub bible: String,
    pub desc: String,
}

/// Start or end of an event on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
}

/// A single reminder override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: i64,
}

/// Reminder policy attached to an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

/// Event body submitted to the `events.insert` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: Reminders,
}

impl CalendarEvent {
    /// Map one input record into the event body to submit
    ///
    /// Fails only when the record's date or time cannot be parsed.
    pub fn from_record(record: &InputRecord, location: &str) -> AppResult<Self> {
        let (start, end) = event_window(&record.service_date_start, &record.start_time)?;

        Ok(Self {
            summary: format!("{}{}", SUMMARY_PREFIX, record.title),
            location: location.to_string(),
            description: format!("<b>{}</b>\n\n{}", record.bible, record.desc),
            start: EventDateTime { date_time: start },
            end: EventDateTime { date_time: end },
            reminders: Reminders {
                use_default: false,
                overrides: vec![ReminderOverride {
                    method: "popup".to_string(),
                    minutes: REMINDER_MINUTES,
                }],
            },
        })
    }
}

/// Identifier echoed back by a successful insert
#[derive(Debug, Clone)]
pub struct InsertedEvent {
    pub id: String,
    pub summary: String,
}

/// Simplified upcoming event from the diagnostic listing
#[derive(Debug, Clone, Default)]
pub struct EventSummary {
    pub id: String,
    pub summary: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
}
