use crate::constants::{MONTHS, TIME_FORMAT};
use crate::errors::SimError;
use chrono::{Datelike, NaiveDateTime, Timelike};
use hifitime::{Duration, Epoch};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Absolute UTC instant used to index field samples and simulation steps.
///
/// Equality is exact; two timestamps differing by a nanosecond are distinct.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp(Epoch);

impl Timestamp {
    pub fn from_epoch(epoch: Epoch) -> Self {
        Timestamp(epoch)
    }

    pub fn from_gregorian_utc(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanos: u32,
    ) -> Self {
        Timestamp(Epoch::from_gregorian_utc(
            year, month, day, hour, minute, second, nanos,
        ))
    }

    /// Parses `"01 Oct 2025 07:00:00"` with an optional fractional second.
    pub fn parse(text: &str) -> Result<Self, SimError> {
        let trimmed = text.trim().trim_matches('"');
        let parsed = NaiveDateTime::parse_from_str(trimmed, TIME_FORMAT)
            .map_err(|_| SimError::TimeParse(text.to_string()))?;

        // chrono encodes a leap second as nanosecond >= 1e9
        let nanos = parsed.nanosecond().min(999_999_999);
        Ok(Self::from_gregorian_utc(
            parsed.year(),
            parsed.month() as u8,
            parsed.day() as u8,
            parsed.hour() as u8,
            parsed.minute() as u8,
            parsed.second() as u8,
            nanos,
        ))
    }

    pub fn epoch(&self) -> Epoch {
        self.0
    }

    /// Signed seconds from `earlier` to `self`.
    pub fn seconds_since(&self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0).to_seconds()
    }
}

impl Sub for Timestamp {
    type Output = f64;

    fn sub(self, other: Timestamp) -> f64 {
        self.seconds_since(other)
    }
}

impl Add<f64> for Timestamp {
    type Output = Timestamp;

    fn add(self, seconds: f64) -> Timestamp {
        Timestamp(self.0 + Duration::from_seconds(seconds))
    }
}

impl FromStr for Timestamp {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day, hour, minute, second, nanos) = self.0.to_gregorian_utc();
        let month_name = MONTHS[(month.clamp(1, 12) - 1) as usize];
        write!(
            f,
            "{:02} {} {} {:02}:{:02}:{:02}.{:03}",
            day,
            month_name,
            year,
            hour,
            minute,
            second,
            nanos / 1_000_000
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case("01 Oct 2025 07:00:00", "01 Oct 2025 07:00:00.000"; "whole seconds")]
    #[test_case(
        "1 Oct 2025 07:00:00.250",
        "01 Oct 2025 07:00:00.250";
        "single digit day with millis"
    )]
    #[test_case("\"15 Mar 2024 23:59:59.999\"", "15 Mar 2024 23:59:59.999"; "quoted field")]
    fn parse_and_display(input: &str, expected: &str) {
        let t = Timestamp::parse(input).unwrap();
        assert_eq!(t.to_string(), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Timestamp::parse("2025-10-01T07:00:00"),
            Err(SimError::TimeParse(_))
        ));
    }

    #[test]
    fn arithmetic_in_seconds() {
        let start = Timestamp::parse("01 Oct 2025 07:00:00").unwrap();
        let later = start + 90.5;

        assert_abs_diff_eq!(later - start, 90.5, epsilon = 1e-9);
        assert_abs_diff_eq!(start - later, -90.5, epsilon = 1e-9);
        assert!(start < later);
        assert_eq!(later.to_string(), "01 Oct 2025 07:01:30.500");
    }

    #[test]
    fn equality_is_exact() {
        let start = Timestamp::parse("01 Oct 2025 07:00:00").unwrap();
        assert_eq!(start, start + 0.0);
        assert_ne!(start, start + 1e-6);
    }
}
