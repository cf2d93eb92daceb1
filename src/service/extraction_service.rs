use chrono::{Datelike, NaiveDate, NaiveTime};
use regex::Regex;
use serde::Serialize;

use crate::models::event::{CalendarEvent, EventKind};
use crate::models::todo::TodoItem;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const MONTH_ALTERNATION: &str = "january|february|march|april|may|june|july|august|september|october|november|december";

// Context window sizes around a date match, in bytes (clamped to char
// boundaries). Titles, times, and the work/personal split all come from
// keywords inside the window.
const DATE_CONTEXT: usize = 30;
const ISO_CONTEXT: usize = 50;

#[derive(Debug, Serialize)]
pub struct Extraction {
    pub events: Vec<CalendarEvent>,
    pub todos: Vec<TodoItem>,
}

struct MatchedTime {
    time: NaiveTime,
    label: String,
}

// Best-effort scraper over assistant replies. A pattern either matches or it
// does not; first match wins per pattern and there is no cross-turn state.
pub struct EventExtractor {
    range: Regex,
    single: Regex,
    time: Regex,
    iso: Regex,
    todo: Regex,
}

impl EventExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let month = MONTH_ALTERNATION;
        Ok(Self {
            range: Regex::new(&format!(
                r"(?i)\b({month})\s+(\d{{1,2}})(?:st|nd|rd|th)?\s*-\s*(\d{{1,2}})(?:st|nd|rd|th)?\b"
            ))?,
            single: Regex::new(&format!(r"(?i)\b({month})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b"))?,
            time: Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b")?,
            iso: Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b")?,
            todo: Regex::new(r"(?im)^\s*(?:[-*]\s*)?todo:\s*(.+)$")?,
        })
    }

    // Month-name sweeps run first; the ISO sweep is a fallback for replies
    // that carried no month-name date at all. The todo sweep always runs.
    pub fn extract(&self, text: &str, today: NaiveDate) -> Extraction {
        let year = today.year();
        let mut range_spans: Vec<(usize, usize)> = Vec::new();
        let mut events = self.scan_ranges(text, year, &mut range_spans);
        events.extend(self.scan_singles(text, year, &range_spans));
        if events.is_empty() {
            events = self.scan_iso(text);
        }
        let todos = self.scan_todos(text, year);
        Extraction { events, todos }
    }

    // "March 3-5" marks every day in the range busy. The matched spans are
    // recorded so the single-date sweep does not re-emit the range start.
    fn scan_ranges(
        &self,
        text: &str,
        year: i32,
        spans: &mut Vec<(usize, usize)>,
    ) -> Vec<CalendarEvent> {
        let mut events = Vec::new();
        for caps in self.range.captures_iter(text) {
            let Some(matched) = caps.get(0) else { continue };
            let Some(month) = month_number(&caps[1]) else { continue };
            let start_day: u32 = caps[2].parse().unwrap_or(0);
            let end_day: u32 = caps[3].parse().unwrap_or(0);
            if !(1..=31).contains(&start_day)
                || !(1..=31).contains(&end_day)
                || start_day > end_day
            {
                continue;
            }
            spans.push((matched.start(), matched.end()));
            for day in start_day..=end_day {
                // Days that do not exist in the month are skipped.
                let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                    continue;
                };
                events.push(CalendarEvent::new(
                    "Busy",
                    date.and_time(NaiveTime::MIN),
                    EventKind::Personal,
                ));
            }
        }
        events
    }

    fn scan_singles(&self, text: &str, year: i32, skip: &[(usize, usize)]) -> Vec<CalendarEvent> {
        let mut events = Vec::new();
        for caps in self.single.captures_iter(text) {
            let Some(matched) = caps.get(0) else { continue };
            if skip
                .iter()
                .any(|&(start, end)| matched.start() >= start && matched.start() < end)
            {
                continue;
            }
            let Some(month) = month_number(&caps[1]) else { continue };
            let day: u32 = caps[2].parse().unwrap_or(0);
            if !(1..=31).contains(&day) {
                continue;
            }
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };

            let context = window(text, matched.start(), matched.end(), DATE_CONTEXT);
            let lower = context.to_lowercase();
            let mut title = title_keyword(&lower).to_string();
            let mut start = date.and_time(NaiveTime::MIN);
            if let Some(t) = self.time_in(context) {
                start = date.and_time(t.time);
                title.push_str(&format!(" at {}", t.label));
            }
            let kind = kind_keyword(&lower);
            events.push(CalendarEvent::new(title, start, kind));
        }
        events
    }

    // Formatted YYYY-MM-DD strings, with the title taken from the last few
    // words before the date.
    fn scan_iso(&self, text: &str) -> Vec<CalendarEvent> {
        let mut events = Vec::new();
        for caps in self.iso.captures_iter(text) {
            let Some(matched) = caps.get(0) else { continue };
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };

            let context = window(text, matched.start(), matched.end(), ISO_CONTEXT);
            let lower = context.to_lowercase();
            let before = window_before(text, matched.start(), ISO_CONTEXT);
            let words: Vec<&str> = before
                .split_whitespace()
                .filter(|word| word.len() > 2)
                .collect();
            let mut title = if words.is_empty() {
                "Event".to_string()
            } else {
                words[words.len().saturating_sub(3)..].join(" ")
            };
            if lower.contains("busy") {
                title = "Busy".to_string();
            }
            if lower.contains("meeting") {
                title = "Meeting".to_string();
            }
            if lower.contains("appointment") {
                title = "Appointment".to_string();
            }

            events.push(CalendarEvent::new(
                title,
                date.and_time(NaiveTime::MIN),
                kind_keyword(&lower),
            ));
        }
        events
    }

    // "Todo: ..." lines, optionally bulleted. The prompt asks the model to
    // inline the date, so each line is re-scanned for a month-name date.
    fn scan_todos(&self, text: &str, year: i32) -> Vec<TodoItem> {
        let mut todos = Vec::new();
        for caps in self.todo.captures_iter(text) {
            let line = caps[1].trim();
            if line.is_empty() {
                continue;
            }
            let date = self.single.captures(line).and_then(|c| {
                let month = month_number(&c[1])?;
                let day: u32 = c[2].parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            });
            todos.push(TodoItem::new(line, date));
        }
        todos
    }

    fn time_in(&self, context: &str) -> Option<MatchedTime> {
        let caps = self.time.captures(context)?;
        let hour12: u32 = caps[1].parse().ok()?;
        if !(1..=12).contains(&hour12) {
            return None;
        }
        let minutes: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if minutes > 59 {
            return None;
        }
        let period = caps[3].to_lowercase();

        let mut hour = hour12;
        if period == "pm" && hour < 12 {
            hour += 12;
        }
        if period == "am" && hour == 12 {
            hour = 0;
        }
        let time = NaiveTime::from_hms_opt(hour, minutes, 0)?;
        let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };
        Some(MatchedTime {
            time,
            label: format!("{}:{:02} {}", display_hour, minutes, period),
        })
    }
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| *month == lower)
        .map(|idx| idx as u32 + 1)
}

fn title_keyword(lower: &str) -> &'static str {
    if lower.contains("busy") {
        "Busy"
    } else if lower.contains("meeting") {
        "Meeting"
    } else if lower.contains("appointment") {
        "Appointment"
    } else {
        "Busy"
    }
}

fn kind_keyword(lower: &str) -> EventKind {
    if lower.contains("work") {
        EventKind::Work
    } else {
        EventKind::Personal
    }
}

fn window(text: &str, start: usize, end: usize, pad: usize) -> &str {
    let mut lo = start.saturating_sub(pad);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = end.saturating_add(pad).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    &text[lo..hi]
}

fn window_before(text: &str, start: usize, pad: usize) -> &str {
    let mut lo = start.saturating_sub(pad);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    &text[lo..start]
}
