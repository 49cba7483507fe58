use std::sync::Mutex;
use stosc_calendar_import::calendar::models::{CalendarEvent, InputRecord, InsertedEvent};
use stosc_calendar_import::error::AppResult;

/// Mock event submitter for testing the import loop without a real calendar
#[derive(Debug, Default)]
pub struct MockCalendarClient {
    inserted: Mutex<Vec<CalendarEvent>>,
}

impl MockCalendarClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the event and hand back a fabricated id
    pub async fn insert_event(&self, event: &CalendarEvent) -> AppResult<InsertedEvent> {
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(event.clone());

        Ok(InsertedEvent {
            id: format!("mock-event-{}", inserted.len()),
            summary: event.summary.clone(),
        })
    }

    pub fn inserted_events(&self) -> Vec<CalendarEvent> {
        self.inserted.lock().unwrap().clone()
    }
}

fn sample_records() -> Vec<InputRecord> {
    vec![
        InputRecord {
            title: "Sunday Service".to_string(),
            service_date_start: "2024-03-10".to_string(),
            start_time: "9:00".to_string(),
            bible: "John 3:16".to_string(),
            desc: "Grace".to_string(),
        },
        InputRecord {
            title: "Good Friday".to_string(),
            service_date_start: "2024-03-29".to_string(),
            start_time: "19:00".to_string(),
            bible: "Isaiah 53:5".to_string(),
            desc: "Remembrance".to_string(),
        },
    ]
}

/// Each record is mapped and submitted once, in file order
#[tokio::test]
async fn test_sequential_submission() {
    let client = MockCalendarClient::new();
    let location = "650 Yio Chu Kang Rd, Singapore 787075";

    for record in &sample_records() {
        let event = CalendarEvent::from_record(record, location).unwrap();
        client.insert_event(&event).await.unwrap();
    }

    let inserted = client.inserted_events();
    assert_eq!(inserted.len(), 2);
    assert_eq!(inserted[0].summary, "STOSC: Sunday Service");
    assert_eq!(inserted[1].summary, "STOSC: Good Friday");
    assert_eq!(inserted[1].start.date_time, "2024-03-29T19:00:00+08:00");
    assert_eq!(inserted[1].end.date_time, "2024-03-29T22:00:00+08:00");
}

/// Resubmitting the same logical event creates a duplicate
#[tokio::test]
async fn test_resubmission_duplicates() {
    let client = MockCalendarClient::new();
    let location = "Main Hall";

    let record = &sample_records()[0];
    let event = CalendarEvent::from_record(record, location).unwrap();

    let first = client.insert_event(&event).await.unwrap();
    let second = client.insert_event(&event).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(client.inserted_events().len(), 2);
}

/// Rows before a structurally malformed one are still submitted
///
/// The import loop pulls one record at a time, so a short row mid-file only
/// stops the run after the earlier rows have already gone out.
#[tokio::test]
async fn test_rows_before_malformed_row_are_submitted() {
    let client = MockCalendarClient::new();
    let location = "Main Hall";

    let data = "title,service_date_start,start_time,bible,desc\n\
                Sunday Service,2024-03-10,9:00,John 3:16,Grace\n\
                Broken Row,2024-03-17\n";

    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut failure = None;
    for result in reader.deserialize() {
        let record: InputRecord = match result {
            Ok(record) => record,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };
        let event = CalendarEvent::from_record(&record, location).unwrap();
        client.insert_event(&event).await.unwrap();
    }

    assert!(failure.is_some());
    let inserted = client.inserted_events();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].summary, "STOSC: Sunday Service");
}

/// A malformed row fails before anything is submitted for it
#[tokio::test]
async fn test_malformed_row_submits_nothing() {
    let client = MockCalendarClient::new();

    let bad = InputRecord {
        title: "Bad Row".to_string(),
        service_date_start: "not-a-date".to_string(),
        start_time: "9:00".to_string(),
        bible: "".to_string(),
        desc: "".to_string(),
    };

    let result = CalendarEvent::from_record(&bad, "Main Hall");
    assert!(result.is_err());
    assert!(client.inserted_events().is_empty());
}
