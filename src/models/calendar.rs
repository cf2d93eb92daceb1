use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::event::CalendarEvent;

const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

// Sunday-first month grid. Cells outside the month are None padding.
#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub weeks: Vec<Vec<Option<DayCell>>>,
}

impl MonthView {
    pub fn build(year: i32, month: u32, events: &[CalendarEvent]) -> Option<MonthView> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let label = format!("{} {}", MONTH_LABELS[(month - 1) as usize], year);
        let offset = first.weekday().num_days_from_sunday() as usize;

        let mut cells: Vec<Option<DayCell>> = vec![None; offset];
        for day in 1..=days_in_month(year, month) {
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            cells.push(Some(DayCell {
                day,
                date,
                events: events_on(events, date),
            }));
        }
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        Some(MonthView {
            year,
            month,
            label,
            weeks: cells.chunks(7).map(|week| week.to_vec()).collect(),
        })
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next) = next_month(year, month);
    match NaiveDate::from_ymd_opt(next_year, next, 1).and_then(|first| first.pred_opt()) {
        Some(last) => last.day(),
        None => 0,
    }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

// Insertion order is preserved so repeated extractions render stably.
pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|event| event.date() == date)
        .cloned()
        .collect()
}
