//! Relative timestamp formatting for feed items and comments.

use chrono::{DateTime, Utc};

/// Render a timestamp relative to now ("12m ago", "3h ago").
///
/// Anything older than four weeks falls back to an absolute date.
pub fn time_ago(then: DateTime<Utc>) -> String {
    relative_from(Utc::now(), then)
}

fn relative_from(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }
    let weeks = days / 7;
    if weeks < 5 {
        return format!("{weeks}w ago");
    }
    then.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(iso: &str) -> DateTime<Utc> {
        iso.parse().unwrap()
    }

    #[test]
    fn fresh_timestamps_are_just_now() {
        let now = at("2024-03-01T12:00:00Z");
        assert_eq!(relative_from(now, at("2024-03-01T12:00:00Z")), "just now");
        assert_eq!(relative_from(now, at("2024-03-01T11:59:15Z")), "just now");
    }

    #[test]
    fn minutes_hours_days_weeks() {
        let now = at("2024-03-01T12:00:00Z");
        assert_eq!(relative_from(now, at("2024-03-01T11:48:00Z")), "12m ago");
        assert_eq!(relative_from(now, at("2024-03-01T09:00:00Z")), "3h ago");
        assert_eq!(relative_from(now, at("2024-02-27T12:00:00Z")), "3d ago");
        assert_eq!(relative_from(now, at("2024-02-09T12:00:00Z")), "3w ago");
    }

    #[test]
    fn old_timestamps_fall_back_to_a_date() {
        let now = at("2024-06-01T12:00:00Z");
        let then = Utc.with_ymd_and_hms(2024, 1, 9, 8, 0, 0).unwrap();
        assert_eq!(relative_from(now, then), "Jan 9, 2024");
    }
}
