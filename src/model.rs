use chrono::{
    DateTime, Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime, Timelike,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Timestamp layout used on the wire by the notes service.
pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const INPUT_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub description: String,
    #[serde(with = "wire_timestamp")]
    pub timestamp: NaiveDateTime,
}

/// A note that has not been persisted yet, or the pending edit of one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    #[serde(with = "wire_timestamp")]
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Description,
}

/// Validation messages keyed by field. Empty means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

/// Calendar projection of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid timestamp (use YYYY-MM-DD HH:MM[:SS]): {0}")]
    Timestamp(String),
    #[error("invalid calendar date: {0}")]
    CalendarDate(String),
}

impl Note {
    pub fn to_draft(&self) -> Draft {
        Draft {
            title: self.title.clone(),
            description: self.description.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl Draft {
    pub fn empty_at(timestamp: NaiveDateTime) -> Self {
        Draft {
            title: String::new(),
            description: String::new(),
            timestamp,
        }
    }

    pub fn shift_days(&mut self, days: i64) {
        if let Some(shifted) = self
            .timestamp
            .checked_add_signed(ChronoDuration::days(days))
        {
            self.timestamp = shifted;
        }
    }
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
        }
    }
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.0.values().cloned().collect::<Vec<_>>();
        write!(f, "{}", messages.join("; "))
    }
}

pub fn validate(draft: &Draft) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if draft.title.trim().is_empty() {
        errors.insert(Field::Title, "Title is required");
    }
    if draft.description.trim().is_empty() {
        errors.insert(Field::Description, "Description is required");
    }
    errors
}

pub fn project_events(notes: &[Note]) -> Vec<DisplayEvent> {
    notes
        .iter()
        .map(|note| DisplayEvent {
            title: note.title.clone(),
            start: note.timestamp,
            end: note.timestamp,
            all_day: true,
        })
        .collect()
}

pub fn events_per_day(events: &[DisplayEvent]) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for event in events {
        *counts.entry(event.start.date()).or_insert(0) += 1;
    }
    counts
}

/// Current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let local = Local::now().naive_local();
    local.with_nanosecond(0).unwrap_or(local)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(WIRE_FORMAT).to_string()
}

/// Parses timestamps typed by the user or returned by the server.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, DateError> {
    let trimmed = input.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|ts| ts.with_nanosecond(0).unwrap_or(ts))
        .ok_or_else(|| DateError::Timestamp(trimmed.to_string()))
}

/// Converts the ISO string emitted by a calendar date pick into a draft timestamp.
/// A bare date maps to midnight; an offset, if present, is dropped.
pub fn parse_calendar_date(iso: &str) -> Result<NaiveDateTime, DateError> {
    let trimmed = iso.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DateError::CalendarDate(trimmed.to_string()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        let naive = dt.naive_local();
        return Ok(naive.with_nanosecond(0).unwrap_or(naive));
    }
    parse_timestamp(trimmed).map_err(|_| DateError::CalendarDate(trimmed.to_string()))
}

mod wire_timestamp {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(de::Error::custom)
    }
}
