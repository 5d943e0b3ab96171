//! Date parsing for CMS timestamps and the dashboard's "Updated ... ago" label.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a CMS date.
///
/// WordPress returns local post dates without an offset
/// (`2022-03-01T10:00:00`); the SEO plugin and the losses feed use RFC 3339.
/// Offset-less values are taken as UTC.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Human label for how long ago the losses data was refreshed.
///
/// Uses the largest whole unit that is at least one: days, then hours, then
/// minutes (`"3 days"`, `"1 hour"`, `"12 mins"`).
#[must_use]
pub fn last_update_label(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = if now >= updated_at {
        now - updated_at
    } else {
        updated_at - now
    };

    let days = elapsed.num_days();
    if days > 0 {
        return pluralize(days, "day");
    }
    let hours = elapsed.num_hours();
    if hours > 0 {
        return pluralize(hours, "hour");
    }
    pluralize(elapsed.num_minutes(), "min")
}

fn pluralize(count: i64, unit: &str) -> String {
    if count > 1 {
        format!("{count} {unit}s")
    } else {
        format!("{count} {unit}")
    }
}
