//! Display formatting for single events: start time parsing, calendar-card
//! date parts, and the short description shown under the title.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::DateParts;

/// Longest description shown on a card, in characters.
pub const DESCRIPTION_LIMIT: usize = 150;

const ELLIPSIS: &str = "...";

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parse an upstream `starts_at` value into the viewer's zone.
///
/// RFC 3339 timestamps keep their instant. Timestamps without an offset, and
/// bare dates, are read as wall-clock time in `tz`. Anything else is `None`.
pub fn parse_start<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz).fixed_offset());
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

pub fn date_parts(start: &DateTime<FixedOffset>) -> DateParts {
    DateParts {
        day: start.format("%-d").to_string(),
        month_short: start.format("%b").to_string(),
        weekday: start.format("%A").to_string(),
        year: start.format("%Y").to_string(),
        time: start.format("%-I:%M %p").to_string(),
        long: start.format("%A, %B %-d, %Y at %-I:%M %p").to_string(),
    }
}

/// "January 2025"
pub fn month_label(start: &DateTime<FixedOffset>) -> String {
    start.format("%B %Y").to_string()
}

/// Plain text of an HTML body: tags removed, entities decoded, whitespace
/// collapsed.
pub fn strip_html(body: &str) -> String {
    let without_tags = HTML_TAG.replace_all(body, "");
    let decoded = html_escape::decode_html_entities(&without_tags);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// First sentence of the body, capped at [`DESCRIPTION_LIMIT`] characters.
///
/// Returns `None` when nothing readable is left after stripping markup.
pub fn short_description(body: &str) -> Option<String> {
    let text = strip_html(body);
    if text.is_empty() {
        return None;
    }

    let sentence = match text.find(['.', '!', '?']) {
        // terminators are single-byte, so +1 stays on a char boundary
        Some(idx) => &text[..=idx],
        None => text.as_str(),
    };

    if sentence.chars().count() > DESCRIPTION_LIMIT {
        let mut cut: String = sentence.chars().take(DESCRIPTION_LIMIT).collect();
        cut.push_str(ELLIPSIS);
        Some(cut)
    } else {
        Some(sentence.to_string())
    }
}
