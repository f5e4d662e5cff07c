//! Query windows for metric fetches.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Error returned for an inverted query window.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("stop must not come before start")]
    Inverted,
}

/// A half-open query window `[start, stop]` with a sampling step.
///
/// Windows are value objects: a new fetch gets a new window, nothing is
/// mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    step: Duration,
}

impl TimeWindow {
    /// Create a window. Fails if `stop` comes before `start`.
    pub fn new(
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        step: Duration,
    ) -> Result<Self, WindowError> {
        if stop < start {
            return Err(WindowError::Inverted);
        }
        Ok(Self { start, stop, step })
    }

    /// A trailing window of `span_secs` seconds ending at `stop`.
    ///
    /// This is the shape every live view uses: the window slides forward
    /// with the clock on each poll.
    pub fn trailing(stop: DateTime<Utc>, span_secs: u64, step: Duration) -> Self {
        let start = stop - chrono::Duration::seconds(span_secs as i64);
        Self { start, stop, step }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn stop(&self) -> DateTime<Utc> {
        self.stop
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// The step as sent to the server: floored to whole seconds.
    pub fn step_seconds(&self) -> u64 {
        self.step.as_secs()
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn stop_rfc3339(&self) -> String {
        self.stop.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_window() {
        let err = TimeWindow::new(at(100), at(50), Duration::from_secs(1));
        assert_eq!(err.unwrap_err(), WindowError::Inverted);
    }

    #[test]
    fn test_new_accepts_equal_bounds() {
        assert!(TimeWindow::new(at(100), at(100), Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_step_is_floored_to_whole_seconds() {
        // A step supplied in milliseconds must map to floor(ms / 1000)
        let window = TimeWindow::trailing(at(1000), 60, Duration::from_millis(2500));
        assert_eq!(window.step_seconds(), 2);

        let window = TimeWindow::trailing(at(1000), 60, Duration::from_millis(999));
        assert_eq!(window.step_seconds(), 0);
    }

    #[test]
    fn test_trailing_window_spans_back_from_stop() {
        let window = TimeWindow::trailing(at(10_000), 3600, Duration::from_secs(60));
        assert_eq!(window.start(), at(10_000 - 3600));
        assert_eq!(window.stop(), at(10_000));
    }

    #[test]
    fn test_rfc3339_formatting() {
        let window = TimeWindow::trailing(at(0), 60, Duration::from_secs(1));
        assert_eq!(window.stop_rfc3339(), "1970-01-01T00:00:00.000Z");
        assert_eq!(window.start_rfc3339(), "1969-12-31T23:59:00.000Z");
    }
}
