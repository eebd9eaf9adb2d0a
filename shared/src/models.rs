use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One event as returned by the upstream API.
///
/// The upstream schema is versioned and loosely documented, so the record is
/// kept as an untyped JSON object. Accessors only return values of the
/// expected type; anything else reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEventRecord(Map<String, Value>);

impl RawEventRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Non-empty string field, trimmed.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn starts_at(&self) -> Option<&str> {
        self.text("starts_at")
    }

    pub fn body(&self) -> Option<&str> {
        self.text("body")
    }

    pub fn host(&self) -> Option<&str> {
        self.text("host")
    }

    pub fn member_name(&self) -> Option<&str> {
        self.text("member_name")
    }

    pub fn location_type(&self) -> Option<&str> {
        self.text("location_type")
    }

    pub fn url(&self) -> Option<&str> {
        self.text("url")
    }

    pub fn cover_image_url(&self) -> Option<&str> {
        self.text("cover_image_url")
    }

    /// `space.slug`, the sub-space the event was posted in.
    pub fn space_slug(&self) -> Option<&str> {
        self.0
            .get("space")
            .and_then(|space| space.get("slug"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Payload of `GET /api/events`: a bare list, or a `{ "records": [...] }` page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EventCollection {
    Bare(Vec<Value>),
    Wrapped { records: Vec<Value> },
}

impl EventCollection {
    /// Pull the event list out of whatever shape the relay forwarded.
    ///
    /// Unknown shapes yield an empty list and entries that are not JSON
    /// objects are skipped.
    pub fn extract(payload: Value) -> Vec<RawEventRecord> {
        let items = match serde_json::from_value::<EventCollection>(payload) {
            Ok(EventCollection::Bare(items)) | Ok(EventCollection::Wrapped { records: items }) => {
                items
            }
            Err(_) => {
                tracing::debug!("events payload has neither a list nor a records key");
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(RawEventRecord::new(fields)),
                _ => None,
            })
            .collect()
    }
}

/// Where the event takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Virtual,
    InPerson,
}

impl Location {
    pub fn from_record(record: &RawEventRecord) -> Self {
        match record.location_type() {
            Some("virtual") => Location::Virtual,
            _ => Location::InPerson,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Location::Virtual => "Virtual",
            Location::InPerson => "In-Person",
        }
    }
}

/// Start time split up for the calendar-card layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    /// "15"
    pub day: String,
    /// "Jan"
    pub month_short: String,
    /// "Wednesday"
    pub weekday: String,
    /// "2025"
    pub year: String,
    /// "6:00 PM"
    pub time: String,
    /// "Wednesday, January 15, 2025 at 6:00 PM"
    pub long: String,
}

/// A record with every display fallback resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEvent {
    pub title: String,
    pub starts_at: DateTime<FixedOffset>,
    pub date: DateParts,
    pub host: String,
    pub description: Option<String>,
    pub location: Location,
    pub cover_image_url: Option<String>,
    pub url: Option<String>,
}

/// What activating a card does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
    pub target: &'static str,
}

impl DisplayEvent {
    /// `None` means the card is not interactive.
    pub fn activation(&self) -> Option<Navigation> {
        self.url.as_ref().map(|url| Navigation {
            url: url.clone(),
            target: "_blank",
        })
    }
}

/// Events sharing a calendar month, in ascending start order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    /// "January 2025"
    pub label: String,
    pub events: Vec<DisplayEvent>,
}

impl MonthGroup {
    /// DOM id the month navigation scrolls to.
    pub fn anchor_id(&self) -> String {
        format!("month-{:04}-{:02}", self.year, self.month)
    }
}

/// One entry of the month navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    pub anchor_id: String,
}

/// Knobs of the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterSettings {
    /// Relay route the widget polls.
    pub events_path: String,
    /// Only events posted in this space are shown.
    pub target_space: String,
    pub default_host: String,
    pub refresh_interval_secs: u32,
}

impl Default for PresenterSettings {
    fn default() -> Self {
        Self {
            events_path: crate::api::EVENTS_PATH.to_string(),
            target_space: "general-events".to_string(),
            default_host: "Foster Greatness".to_string(),
            refresh_interval_secs: 5 * 60,
        }
    }
}
