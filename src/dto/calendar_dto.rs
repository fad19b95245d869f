use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::calendar_event::{EventKind, NewCalendarEvent};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct MonthQuery {
    #[validate(range(min = 1970, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub kind: Option<EventKind>,
}

impl CreateEventPayload {
    pub fn into_event(self, user_id: Uuid) -> NewCalendarEvent {
        NewCalendarEvent {
            user_id,
            title: self.title.trim().to_string(),
            description: self.description,
            event_date: self.event_date,
            start_time: self.start_time,
            location: self.location,
            kind: self.kind.unwrap_or(EventKind::Reminder),
        }
    }
}
