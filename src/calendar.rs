use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::storage::{keys, KvStore, StorageBackend, StoreError};
use crate::MediaType;

pub const DEFAULT_EVENT_TIME: &str = "12:00";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Scheduled,
    Posted,
}

impl EventStatus {
    pub fn label(self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Scheduled => "scheduled",
            EventStatus::Posted => "posted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementSnapshot {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub date: String,
    pub time: String,
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub media_url: Option<String>,
    pub media_type: MediaType,
    pub status: EventStatus,
    pub engagement: Option<EngagementSnapshot>,
}

impl CalendarEvent {
    fn scheduled_at(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()?;
        let time = NaiveTime::parse_from_str(&self.time, TIME_FORMAT).ok()?;
        Some(date.and_time(time))
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub date: String,
    pub time: Option<String>,
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub media_type: MediaType,
    pub media_url: Option<String>,
}

impl NewEvent {
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: None,
            title: title.into(),
            caption: String::new(),
            hashtags: Vec::new(),
            media_type: MediaType::Image,
            media_url: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<CalendarEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    pub async fn load<B: StorageBackend>(store: &KvStore<B>) -> Self {
        Self::from_events(store.get(keys::CALENDAR_EVENTS, Vec::new()).await)
    }

    pub async fn save<B: StorageBackend>(&self, store: &KvStore<B>) -> Result<(), StoreError> {
        store.set(keys::CALENDAR_EVENTS, &self.events).await
    }

    pub fn add(&mut self, draft: NewEvent, now_ms: i64) -> Result<CalendarEvent, String> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err("event title is required".to_string());
        }
        let date = draft.date.trim();
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| format!("invalid event date (YYYY-MM-DD): {}", draft.date))?;
        let time = draft
            .time
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_EVENT_TIME);
        NaiveTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| format!("invalid event time (HH:MM): {}", time))?;

        let event = CalendarEvent {
            id: format!("evt-{}-{}", now_ms, self.events.len()),
            date: date.to_string(),
            time: time.to_string(),
            title: title.to_string(),
            caption: draft.caption,
            hashtags: draft.hashtags,
            media_url: draft.media_url,
            media_type: draft.media_type,
            status: EventStatus::Draft,
            engagement: None,
        };
        self.events.push(event.clone());
        Ok(event)
    }

    pub fn list_by_date(&self, date: &str) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|event| event.date == date).collect()
    }

    pub fn list_sorted_by_recency(&self) -> Vec<&CalendarEvent> {
        let mut sorted: Vec<&CalendarEvent> = self.events.iter().collect();
        sorted.sort_by(|a, b| b.scheduled_at().cmp(&a.scheduled_at()));
        sorted
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub fn normalize_hashtags(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .map(|tag| {
            if tag.starts_with('#') {
                tag.to_string()
            } else {
                format!("#{}", tag)
            }
        })
        .filter(|tag| tag.chars().count() > 1)
        .collect()
}

pub fn cell_date(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format(DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(date: &str, time: &str, title: &str) -> NewEvent {
        NewEvent {
            time: Some(time.to_string()),
            ..NewEvent::new(date, title)
        }
    }

    #[test]
    fn new_events_are_always_drafts() {
        let mut store = EventStore::new();
        let event = store.add(NewEvent::new("2024-03-18", "Launch"), 1).unwrap();
        assert_eq!(event.status, EventStatus::Draft);
        assert_eq!(event.time, DEFAULT_EVENT_TIME);
        assert!(event.engagement.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut store = EventStore::new();
        assert!(store.add(NewEvent::new("2024-03-18", "   "), 1).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn bad_date_or_time_is_rejected() {
        let mut store = EventStore::new();
        assert!(store.add(NewEvent::new("18/03/2024", "x"), 1).is_err());
        assert!(store.add(draft("2024-03-18", "25:00", "x"), 1).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_unique_within_a_millisecond() {
        let mut store = EventStore::new();
        let a = store.add(NewEvent::new("2024-03-18", "a"), 5).unwrap();
        let b = store.add(NewEvent::new("2024-03-18", "b"), 5).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn lists_by_date_in_insertion_order() {
        let mut store = EventStore::new();
        store.add(draft("2024-03-18", "18:00", "evening"), 1).unwrap();
        store.add(draft("2024-03-19", "09:00", "other day"), 2).unwrap();
        store.add(draft("2024-03-18", "08:00", "morning"), 3).unwrap();

        let titles: Vec<&str> = store
            .list_by_date("2024-03-18")
            .iter()
            .map(|event| event.title.as_str())
            .collect();
        assert_eq!(titles, vec!["evening", "morning"]);
        assert!(store.list_by_date("2024-04-01").is_empty());
    }

    #[test]
    fn recency_sort_is_descending_and_stable() {
        let mut store = EventStore::new();
        store.add(draft("2024-03-18", "12:00", "first tie"), 1).unwrap();
        store.add(draft("2024-03-20", "09:00", "latest"), 2).unwrap();
        store.add(draft("2024-03-18", "12:00", "second tie"), 3).unwrap();
        store.add(draft("2024-03-18", "07:30", "earliest"), 4).unwrap();
        store.add(draft("2024-03-18", "12:00", "third tie"), 5).unwrap();

        let titles: Vec<&str> = store
            .list_sorted_by_recency()
            .iter()
            .map(|event| event.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["latest", "first tie", "second tie", "third tie", "earliest"]
        );
    }

    #[test]
    fn hashtag_input_is_normalized() {
        assert_eq!(
            normalize_hashtags("travel #sun  beach # x"),
            vec!["#travel", "#sun", "#beach", "#x"]
        );
        assert!(normalize_hashtags("   ").is_empty());
        assert!(normalize_hashtags("#").is_empty());
    }

    #[test]
    fn cell_dates_are_zero_padded() {
        assert_eq!(cell_date(2024, 3, 5).as_deref(), Some("2024-03-05"));
        assert_eq!(cell_date(2024, 2, 30), None);
    }
}
