use calendarAssistant::models::calendar::{MonthView, next_month, prev_month};
use calendarAssistant::models::event::{CalendarEvent, EventKind};
use calendarAssistant::models::todo::{TodoItem, todo_progress};
use chrono::{NaiveDate, NaiveTime};

fn event_on(year: i32, month: u32, day: u32) -> CalendarEvent {
    let start = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_time(NaiveTime::MIN);
    CalendarEvent::new("Busy", start, EventKind::Personal)
}

#[test]
fn march_2026_grid_starts_on_sunday() {
    let view = MonthView::build(2026, 3, &[]).unwrap();
    assert_eq!(view.label, "March 2026");
    assert_eq!(view.weeks.len(), 5);

    // March 1st 2026 is a Sunday, so the first cell is day 1.
    let first = view.weeks[0][0].as_ref().unwrap();
    assert_eq!(first.day, 1);

    let last_week = &view.weeks[4];
    assert_eq!(last_week[2].as_ref().unwrap().day, 31);
    assert!(last_week[3].is_none());
}

#[test]
fn leading_offset_pads_with_empty_cells() {
    // April 1st 2026 is a Wednesday.
    let view = MonthView::build(2026, 4, &[]).unwrap();
    assert!(view.weeks[0][0].is_none());
    assert!(view.weeks[0][1].is_none());
    assert!(view.weeks[0][2].is_none());
    assert_eq!(view.weeks[0][3].as_ref().unwrap().day, 1);
}

#[test]
fn events_land_on_their_day_cell() {
    let events = vec![event_on(2026, 3, 10), event_on(2026, 3, 10), event_on(2026, 4, 10)];
    let view = MonthView::build(2026, 3, &events).unwrap();

    let cell = view
        .weeks
        .iter()
        .flatten()
        .flatten()
        .find(|cell| cell.day == 10)
        .unwrap();
    assert_eq!(cell.events.len(), 2);

    let empty = view
        .weeks
        .iter()
        .flatten()
        .flatten()
        .find(|cell| cell.day == 11)
        .unwrap();
    assert!(empty.events.is_empty());
}

#[test]
fn invalid_month_returns_none() {
    assert!(MonthView::build(2026, 13, &[]).is_none());
    assert!(MonthView::build(2026, 0, &[]).is_none());
}

#[test]
fn month_navigation_wraps_years() {
    assert_eq!(next_month(2026, 12), (2027, 1));
    assert_eq!(next_month(2026, 6), (2026, 7));
    assert_eq!(prev_month(2026, 1), (2025, 12));
    assert_eq!(prev_month(2026, 6), (2026, 5));
}

#[test]
fn todo_progress_rounds_percentages() {
    assert_eq!(todo_progress(&[]), (0, 0, 0));

    let mut todos = vec![
        TodoItem::new("one", None),
        TodoItem::new("two", None),
        TodoItem::new("three", None),
    ];
    todos[0].completed = true;
    assert_eq!(todo_progress(&todos), (1, 3, 33));

    todos[1].completed = true;
    todos[2].completed = true;
    assert_eq!(todo_progress(&todos), (3, 3, 100));
}
