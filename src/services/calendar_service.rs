use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::calendar_event::{CalendarEvent, NewCalendarEvent};
use crate::store::CalendarStore;

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::BadRequest(format!("Invalid month: {}-{}", year, month)))
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok((next - first).num_days() as u32)
}

/// First and last date shown in the month grid.
pub fn grid_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = first_of_month(year, month)?;
    let last = first + Duration::days(days_in_month(year, month)? as i64 - 1);
    let start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);
    let end = last + Duration::days(6 - last.weekday().num_days_from_sunday() as i64);
    Ok((start, end))
}

/// Sunday-first weeks covering the whole month, padded with the adjacent
/// months' days. Each day carries the events falling on it.
pub fn month_grid(
    year: i32,
    month: u32,
    events: &[CalendarEvent],
    today: NaiveDate,
) -> Result<Vec<CalendarDay>> {
    let (start, end) = grid_bounds(year, month)?;
    let days = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == month && date.year() == year,
            is_today: date == today,
            events: events
                .iter()
                .filter(|e| e.event_date == date)
                .cloned()
                .collect(),
        })
        .collect();
    Ok(days)
}

#[derive(Clone)]
pub struct CalendarService {
    store: Arc<dyn CalendarStore>,
}

impl CalendarService {
    pub fn new(store: Arc<dyn CalendarStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, event: NewCalendarEvent) -> Result<CalendarEvent> {
        if event.title.trim().is_empty() {
            return Err(Error::BadRequest("Event title is required".into()));
        }
        let created = self.store.insert(event).await?;
        tracing::info!(event_id = %created.id, user_id = %created.user_id, date = %created.event_date, "calendar event created");
        Ok(created)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if self.store.delete(user_id, id).await? {
            Ok(())
        } else {
            Err(Error::NotFound("Event not found".into()))
        }
    }

    pub async fn month(&self, user_id: Uuid, year: i32, month: u32) -> Result<MonthView> {
        let (start, end) = grid_bounds(year, month)?;
        let events = self.store.list_between(user_id, start, end).await?;
        let days = month_grid(year, month, &events, crate::utils::time::today_in_kenya())?;
        Ok(MonthView { year, month, days })
    }

    pub async fn upcoming(&self, user_id: Uuid, days: i64) -> Result<Vec<CalendarEvent>> {
        let today = crate::utils::time::today_in_kenya();
        self.store
            .list_between(user_id, today, today + Duration::days(days.max(0)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar_event::EventKind;
    use crate::store::{ready, MockCalendarStore};
    use chrono::{Utc, Weekday};

    fn event_on(date: NaiveDate, title: &str) -> CalendarEvent {
        CalendarEvent {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            event_date: date,
            start_time: None,
            location: Some("Westlands".into()),
            kind: EventKind::Interview,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2025, 2).unwrap(), 28);
        assert_eq!(days_in_month(2025, 12).unwrap(), 31);
        assert_eq!(days_in_month(2025, 4).unwrap(), 30);
        assert!(days_in_month(2025, 13).is_err());
    }

    #[test]
    fn grid_is_whole_weeks_and_covers_the_month() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for year in [2023, 2024, 2025, 2026] {
            for month in 1..=12 {
                let grid = month_grid(year, month, &[], today).unwrap();
                assert_eq!(grid.len() % 7, 0, "{}-{}", year, month);
                assert_eq!(grid[0].date.weekday(), Weekday::Sun);
                let in_month = grid.iter().filter(|d| d.in_month).count() as u32;
                assert_eq!(in_month, days_in_month(year, month).unwrap());
            }
        }
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_padding() {
        // June 2025 starts on a Sunday and ends on a Monday
        let grid = month_grid(2025, 6, &[], NaiveDate::MIN).unwrap();
        assert!(grid[0].in_month);
        assert_eq!(grid.len(), 35);
        assert_eq!(grid.iter().filter(|d| !d.in_month).count(), 5);
    }

    #[test]
    fn events_land_on_their_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let events = vec![event_on(date, "Interview: Safari Tech")];
        let grid = month_grid(2025, 3, &events, date).unwrap();
        let day = grid.iter().find(|d| d.date == date).unwrap();
        assert_eq!(day.events.len(), 1);
        assert!(day.is_today);
        assert_eq!(grid.iter().map(|d| d.events.len()).sum::<usize>(), 1);
    }

    #[tokio::test]
    async fn month_queries_the_visible_range() {
        let (start, end) = grid_bounds(2025, 3).unwrap();
        let mut store = MockCalendarStore::new();
        store
            .expect_list_between()
            .withf(move |_, from, to| *from == start && *to == end)
            .times(1)
            .returning(|_, _, _| ready(Ok(vec![])));
        let service = CalendarService::new(Arc::new(store));
        let view = service.month(Uuid::new_v4(), 2025, 3).await.unwrap();
        assert_eq!(view.days.len() % 7, 0);
    }

    #[tokio::test]
    async fn deleting_unknown_event_is_not_found() {
        let mut store = MockCalendarStore::new();
        store.expect_delete().returning(|_, _| ready(Ok(false)));
        let service = CalendarService::new(Arc::new(store));
        assert!(matches!(
            service.delete(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(Error::NotFound(_))
        ));
    }
}
