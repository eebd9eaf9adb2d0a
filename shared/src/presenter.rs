//! The event presentation pipeline: payload → records → upcoming events in
//! the target space → month groups.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, TimeZone};
use serde_json::Value;

use crate::format::{date_parts, month_label, parse_start, short_description};
use crate::models::{
    DisplayEvent, EventCollection, Location, MonthGroup, NavEntry, PresenterSettings,
    RawEventRecord,
};

/// Result of one presentation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum EventsView {
    /// No event survived filtering.
    Empty,
    Months(Vec<MonthGroup>),
}

/// Resolve every display fallback of a record.
///
/// Returns `None` when `starts_at` is missing or unparseable; such events
/// cannot be dated, filtered, or sorted.
pub fn to_display_event<Tz: TimeZone>(
    record: &RawEventRecord,
    settings: &PresenterSettings,
    tz: &Tz,
) -> Option<DisplayEvent> {
    let starts_at = record.starts_at().and_then(|raw| parse_start(raw, tz))?;

    Some(DisplayEvent {
        title: record.name().unwrap_or("Untitled Event").to_string(),
        date: date_parts(&starts_at),
        starts_at,
        host: record
            .host()
            .or_else(|| record.member_name())
            .unwrap_or(settings.default_host.as_str())
            .to_string(),
        description: record.body().and_then(short_description),
        location: Location::from_record(record),
        cover_image_url: record.cover_image_url().map(str::to_string),
        url: record.url().map(str::to_string),
    })
}

/// Events from the target space starting today or later.
///
/// The date check is at day granularity in the viewer's zone, so an event
/// that started earlier today is still kept.
pub fn upcoming_events<Tz: TimeZone>(
    records: &[RawEventRecord],
    settings: &PresenterSettings,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DisplayEvent> {
    let mut undated = 0usize;

    let events: Vec<DisplayEvent> = records
        .iter()
        .filter(|record| record.space_slug() == Some(settings.target_space.as_str()))
        .filter_map(|record| {
            let event = to_display_event(record, settings, tz);
            if event.is_none() {
                undated += 1;
            }
            event
        })
        .filter(|event| event.starts_at.date_naive() >= today)
        .collect();

    if undated > 0 {
        tracing::debug!(undated, "skipped events without a usable start time");
    }

    events
}

/// Group events by calendar month, months and events both ascending.
pub fn group_by_month(events: Vec<DisplayEvent>) -> Vec<MonthGroup> {
    let mut months: BTreeMap<(i32, u32), Vec<DisplayEvent>> = BTreeMap::new();
    for event in events {
        let key = (event.starts_at.year(), event.starts_at.month());
        months.entry(key).or_default().push(event);
    }

    months
        .into_iter()
        .map(|((year, month), mut events)| {
            events.sort_by_key(|event| event.starts_at);
            MonthGroup {
                year,
                month,
                label: month_label(&events[0].starts_at),
                events,
            }
        })
        .collect()
}

/// Month navigation entries; empty unless there are at least two months.
pub fn nav_entries(groups: &[MonthGroup]) -> Vec<NavEntry> {
    if groups.len() < 2 {
        return Vec::new();
    }

    groups
        .iter()
        .map(|group| NavEntry {
            label: group.label.clone(),
            anchor_id: group.anchor_id(),
        })
        .collect()
}

/// Run the whole pipeline on a relay payload.
pub fn present<Tz: TimeZone>(
    payload: Value,
    settings: &PresenterSettings,
    today: NaiveDate,
    tz: &Tz,
) -> EventsView {
    let records = EventCollection::extract(payload);
    let events = upcoming_events(&records, settings, today, tz);
    tracing::debug!(
        total = records.len(),
        shown = events.len(),
        "presented events payload"
    );

    if events.is_empty() {
        EventsView::Empty
    } else {
        EventsView::Months(group_by_month(events))
    }
}
