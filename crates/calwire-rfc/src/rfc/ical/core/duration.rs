//! iCalendar DURATION value type (RFC 5545 §3.3.6).

use std::fmt;

use chrono::TimeDelta;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Duration value (RFC 5545 §3.3.6).
///
/// Stored as a signed number of seconds. Years and months are not part of
/// the iCalendar grammar, so every duration has an exact length.
///
/// Encoding decomposes the total greedily into weeks, days, hours, minutes
/// and seconds, so `P7D` on input is written back as `P1W`.
///
/// The range is symmetric: `i64::MIN` seconds is clamped to `-i64::MAX`, the
/// most negative length the grammar can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(i64);

impl Duration {
    const fn clamped(seconds: i64) -> Self {
        if seconds == i64::MIN {
            Self(-i64::MAX)
        } else {
            Self(seconds)
        }
    }

    /// Creates a new zero duration.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Creates a duration from a signed number of seconds.
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self::clamped(seconds)
    }

    /// Creates a duration from weeks.
    #[must_use]
    pub const fn weeks(weeks: i64) -> Self {
        Self::clamped(weeks.saturating_mul(WEEK))
    }

    /// Creates a duration from days.
    #[must_use]
    pub const fn days(days: i64) -> Self {
        Self::clamped(days.saturating_mul(DAY))
    }

    /// Creates a duration from hours.
    #[must_use]
    pub const fn hours(hours: i64) -> Self {
        Self::clamped(hours.saturating_mul(HOUR))
    }

    /// Creates a duration from minutes.
    #[must_use]
    pub const fn minutes(minutes: i64) -> Self {
        Self::clamped(minutes.saturating_mul(MINUTE))
    }

    /// Creates a duration from seconds.
    #[must_use]
    pub const fn seconds(seconds: i64) -> Self {
        Self::clamped(seconds)
    }

    /// Negates this duration.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self(self.0.saturating_neg())
    }

    /// Returns whether this duration points backwards in time.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the total duration as seconds.
    #[must_use]
    pub const fn as_seconds(self) -> i64 {
        self.0
    }

    /// Converts to a `chrono` delta for date arithmetic.
    ///
    /// Returns `None` when the value is outside the range `chrono` supports.
    #[must_use]
    pub fn to_time_delta(self) -> Option<TimeDelta> {
        TimeDelta::try_seconds(self.0)
    }
}

impl From<i64> for Duration {
    fn from(seconds: i64) -> Self {
        Self::clamped(seconds)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-")?;
        }
        write!(f, "P")?;

        let mut rest = self.0.unsigned_abs();
        let mut take = |unit: i64| {
            let unit = unit.unsigned_abs();
            let count = rest / unit;
            rest %= unit;
            count
        };
        let weeks = take(WEEK);
        let days = take(DAY);
        let hours = take(HOUR);
        let minutes = take(MINUTE);
        let seconds = rest;

        if weeks > 0 {
            write!(f, "{weeks}W")?;
        }
        if days > 0 {
            write!(f, "{days}D")?;
        }
        if hours > 0 || minutes > 0 || seconds > 0 {
            write!(f, "T")?;
            if hours > 0 {
                write!(f, "{hours}H")?;
            }
            if minutes > 0 {
                write!(f, "{minutes}M")?;
            }
            if seconds > 0 {
                write!(f, "{seconds}S")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_display() {
        assert_eq!(Duration::hours(1).to_string(), "PT1H");
        assert_eq!(Duration::days(1).to_string(), "P1D");
        assert_eq!(Duration::weeks(2).to_string(), "P2W");
        assert_eq!(Duration::minutes(15).negate().to_string(), "-PT15M");
        assert_eq!(Duration::seconds(93_784).to_string(), "P1DT2H3M4S");
    }

    #[test]
    fn duration_display_is_greedy() {
        assert_eq!(Duration::days(7).to_string(), "P1W");
        assert_eq!(Duration::days(8).to_string(), "P1W1D");
        assert_eq!(Duration::minutes(90).to_string(), "PT1H30M");
        assert_eq!(Duration::seconds(86_401).to_string(), "P1DT1S");
    }

    #[test]
    fn zero_duration_display() {
        assert_eq!(Duration::zero().to_string(), "P");
    }

    #[test]
    fn duration_as_seconds() {
        assert_eq!(Duration::hours(1).as_seconds(), 3600);
        assert_eq!(Duration::days(1).negate().as_seconds(), -86_400);
        assert_eq!(Duration::weeks(1).as_seconds(), 604_800);
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        assert_eq!(Duration::from_seconds(i64::MIN).negate().as_seconds(), i64::MAX);
        assert!(Duration::from_seconds(i64::MAX).to_time_delta().is_none());
    }

    #[test]
    fn most_negative_input_is_clamped() {
        assert_eq!(Duration::from_seconds(i64::MIN).as_seconds(), -i64::MAX);
        assert_eq!(Duration::from(i64::MIN).as_seconds(), -i64::MAX);
        assert_eq!(Duration::weeks(i64::MIN).as_seconds(), -i64::MAX);
        assert_eq!(Duration::minutes(-i64::MAX).as_seconds(), -i64::MAX);
        assert_eq!(Duration::from_seconds(i64::MIN), Duration::from_seconds(i64::MAX).negate());
    }
}
