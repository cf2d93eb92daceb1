use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Work,
    Personal,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Work => "work",
            EventKind::Personal => "personal",
        }
    }
}

// Events are wall-clock local; no timezone is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub kind: EventKind,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            start,
            kind,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}
