//! Topic payload parsing and repeated-reading suppression

use std::collections::VecDeque;

use thiserror::Error;

/// Default capacity of the recent-readings window.
pub const DEFAULT_REPEAT_WINDOW: usize = 3;

/// Payload did not match the `H:MM:SS` / `HH:MM:SS` clock format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("payload is not an H:MM:SS clock value: {0:?}")]
pub struct ParseError(pub String);

/// Parse an `H:MM:SS` or `HH:MM:SS` payload into total seconds.
///
/// Hours take one or two digits, minutes and seconds exactly two each.
/// The numeric ranges of minutes and seconds are not bounded beyond their
/// digit count; `00:99:00` parses to 5940. Surrounding whitespace is
/// trimmed, anything else is rejected.
pub fn parse_duration(payload: &str) -> Result<u64, ParseError> {
    let err = || ParseError(payload.to_string());

    let mut fields = payload.trim().split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(err());
    };

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 || seconds.len() != 2 {
        return Err(err());
    }
    if ![hours, minutes, seconds]
        .iter()
        .all(|field| field.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(err());
    }

    let hours: u64 = hours.parse().map_err(|_| err())?;
    let minutes: u64 = minutes.parse().map_err(|_| err())?;
    let seconds: u64 = seconds.parse().map_err(|_| err())?;
    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Sliding window of recent readings with stuck-publisher suppression.
///
/// A window full of identical readings is interpreted as a stale upstream
/// repeating itself, and [`ingest`](Self::ingest) emits 0 instead of the
/// parsed value. The window keeps sliding after a suppression fires, so a
/// fourth identical reading emits 0 again.
///
/// The window capacity is a policy knob (`--repeat-window`); the observed
/// upstream behavior this works around used three readings.
#[derive(Debug)]
pub struct IngestFilter {
    window: usize,
    recent: VecDeque<u64>,
}

impl IngestFilter {
    /// Create a filter with the given window capacity.
    ///
    /// Capacities below 2 cannot distinguish a stuck publisher and disable
    /// suppression entirely.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            recent: VecDeque::with_capacity(window),
        }
    }

    /// Parse a raw payload and apply repeat suppression.
    ///
    /// On parse failure the window is left untouched and the payload is
    /// discarded with no state change.
    pub fn ingest(&mut self, payload: &str) -> Result<u64, ParseError> {
        let seconds = parse_duration(payload)?;
        if self.window < 2 {
            return Ok(seconds);
        }

        self.recent.push_back(seconds);
        if self.recent.len() > self.window {
            self.recent.pop_front();
        }
        if self.recent.len() == self.window && self.recent.iter().all(|&value| value == seconds) {
            return Ok(0);
        }
        Ok(seconds)
    }
}

impl Default for IngestFilter {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_digit_clock_values() {
        assert_eq!(parse_duration("01:02:03"), Ok(3723));
        assert_eq!(parse_duration("00:05:00"), Ok(300));
        assert_eq!(parse_duration("00:00:00"), Ok(0));
    }

    #[test]
    fn parses_single_digit_hours() {
        assert_eq!(parse_duration("1:02:03"), Ok(3723));
        assert_eq!(parse_duration("9:00:01"), Ok(32_401));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_duration("  00:10:00\n"), Ok(600));
    }

    #[test]
    fn minutes_and_seconds_are_not_range_checked() {
        // The format trusts the numeric conversion, digit count aside
        assert_eq!(parse_duration("00:99:99"), Ok(99 * 60 + 99));
    }

    #[test]
    fn rejects_malformed_payloads() {
        for payload in [
            "",
            "hello",
            "00:00",
            "00:00:00:00",
            "000:00:00",
            "0:0:00",
            "00:0:00",
            "00:00:0",
            "00:00:000",
            "-1:00:00",
            "+1:00:00",
            "0a:00:00",
            "00 :00:00",
            "12:34",
        ] {
            assert!(parse_duration(payload).is_err(), "accepted {:?}", payload);
        }
    }

    #[test]
    fn distinct_readings_pass_through() {
        let mut filter = IngestFilter::default();
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:04:00"), Ok(240));
        assert_eq!(filter.ingest("00:03:00"), Ok(180));
    }

    #[test]
    fn three_identical_readings_emit_zero() {
        let mut filter = IngestFilter::default();
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(0));
    }

    #[test]
    fn window_keeps_sliding_after_a_suppression() {
        let mut filter = IngestFilter::default();
        filter.ingest("00:05:00").unwrap();
        filter.ingest("00:05:00").unwrap();
        assert_eq!(filter.ingest("00:05:00"), Ok(0));
        // Still three identical entries in the window
        assert_eq!(filter.ingest("00:05:00"), Ok(0));
    }

    #[test]
    fn a_different_reading_breaks_the_run() {
        let mut filter = IngestFilter::default();
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:04:00"), Ok(240));
        // Two of the last three match, not all three
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
    }

    #[test]
    fn parse_errors_leave_the_window_untouched() {
        let mut filter = IngestFilter::default();
        filter.ingest("00:05:00").unwrap();
        filter.ingest("00:05:00").unwrap();
        assert!(filter.ingest("garbage").is_err());
        // The rejected payload must not have evicted anything
        assert_eq!(filter.ingest("00:05:00"), Ok(0));
    }

    #[test]
    fn window_capacity_is_configurable() {
        let mut filter = IngestFilter::new(4);
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(0));
    }

    #[test]
    fn tiny_windows_disable_suppression() {
        let mut filter = IngestFilter::new(1);
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(300));

        let mut filter = IngestFilter::new(0);
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
        assert_eq!(filter.ingest("00:05:00"), Ok(300));
    }
}
