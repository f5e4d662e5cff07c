//! Humanized relative ages for file listings.

use std::time::Duration;

/// Format an age like the moment.js `fromNow()` display the operators are
/// used to ("a few seconds ago", "4 minutes ago", ...).
pub fn from_now(age: Duration) -> String {
    let delta = age.as_secs_f64();

    if delta < 45.0 {
        "a few seconds ago".to_string()
    } else if delta < 90.0 {
        "a minute ago".to_string()
    } else if delta <= 44.0 * 60.0 {
        format!("{} minutes ago", (delta / 60.0).round() as i64)
    } else if delta <= 89.0 * 60.0 {
        "an hour ago".to_string()
    } else if delta <= 21.0 * 3600.0 {
        format!("{} hours ago", (delta / 3600.0).round() as i64)
    } else if delta <= 35.0 * 3600.0 {
        "a day ago".to_string()
    } else if delta <= 25.0 * 24.0 * 3600.0 {
        format!("{} days ago", (delta / (24.0 * 3600.0)).round() as i64)
    } else if delta <= 45.0 * 24.0 * 3600.0 {
        "a month ago".to_string()
    } else if delta <= 319.0 * 24.0 * 3600.0 {
        format!("{} months ago", (delta / (30.0 * 24.0 * 3600.0)).round() as i64)
    } else if delta <= 547.0 * 24.0 * 3600.0 {
        "a year ago".to_string()
    } else {
        format!("{} years ago", (delta / (365.25 * 24.0 * 3600.0)).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_seconds_and_minutes() {
        assert_eq!(from_now(secs(10)), "a few seconds ago");
        assert_eq!(from_now(secs(44)), "a few seconds ago");
        assert_eq!(from_now(secs(60)), "a minute ago");
        assert_eq!(from_now(secs(240)), "4 minutes ago");
        assert_eq!(from_now(secs(44 * 60)), "44 minutes ago");
    }

    #[test]
    fn test_hours_and_days() {
        assert_eq!(from_now(secs(60 * 60)), "an hour ago");
        assert_eq!(from_now(secs(5 * 3600)), "5 hours ago");
        assert_eq!(from_now(secs(30 * 3600)), "a day ago");
        assert_eq!(from_now(secs(4 * 24 * 3600)), "4 days ago");
    }

    #[test]
    fn test_months_and_years() {
        assert_eq!(from_now(secs(40 * 24 * 3600)), "a month ago");
        assert_eq!(from_now(secs(90 * 24 * 3600)), "3 months ago");
        assert_eq!(from_now(secs(400 * 24 * 3600)), "a year ago");
        assert_eq!(from_now(secs(3 * 365 * 24 * 3600)), "3 years ago");
    }
}
