//! iCalendar DATE-TIME, TIME and UTC-OFFSET value types (RFC 5545 §3.3.5, §3.3.12, §3.3.14).

use std::fmt;

use chrono::{Datelike, NaiveDate, TimeDelta, TimeZone, Utc};

use super::Date;

/// Zone tag carried by a DATE-TIME.
///
/// Only the presence or absence of the trailing `Z` is modeled. A local time
/// is stored as if local time were UTC; no timezone database is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneTag {
    /// Written with a trailing `Z`.
    Utc,
    /// Written without a trailing `Z` (floating or TZID-qualified).
    Local,
}

/// Time value (RFC 5545 §3.3.12).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    /// Hour (0-23).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
    /// Second (0-60, allowing for leap seconds).
    pub second: u8,
    /// Whether this time is in UTC (indicated by 'Z' suffix).
    pub is_utc: bool,
}

impl Time {
    /// Creates a new time value.
    #[must_use]
    pub const fn new(hour: u8, minute: u8, second: u8, is_utc: bool) -> Self {
        Self {
            hour,
            minute,
            second,
            is_utc,
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
        if self.is_utc {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

/// DATE-TIME value (RFC 5545 §3.3.5).
///
/// Held as an instant on the UTC timeline plus the zone tag it was written
/// with, so that encoding reproduces the same wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    instant: chrono::DateTime<Utc>,
    zone: ZoneTag,
}

impl DateTime {
    /// Creates a DATE-TIME from an instant and a zone tag.
    ///
    /// Returns `None` outside years 0 through 9999, which have no four-digit
    /// wire form.
    #[must_use]
    pub fn from_instant(instant: chrono::DateTime<Utc>, zone: ZoneTag) -> Option<Self> {
        (0..=9999)
            .contains(&instant.year())
            .then_some(Self { instant, zone })
    }

    /// Creates a DATE-TIME from seconds since the Unix epoch.
    #[must_use]
    pub fn from_timestamp(seconds: i64, zone: ZoneTag) -> Option<Self> {
        Self::from_instant(Utc.timestamp_opt(seconds, 0).single()?, zone)
    }

    /// Combines a parsed date and time.
    ///
    /// A second value of 60 rolls over into the next minute. Returns `None`
    /// for dates or times that do not exist on the calendar.
    #[must_use]
    pub fn from_parts(date: Date, time: Time) -> Option<Self> {
        let leap = time.second > 59;
        let naive = NaiveDate::from_ymd_opt(
            i32::from(date.year),
            u32::from(date.month),
            u32::from(date.day),
        )?
        .and_hms_opt(
            u32::from(time.hour),
            u32::from(time.minute),
            u32::from(time.second.min(59)),
        )?;
        let naive = if leap {
            naive.checked_add_signed(TimeDelta::seconds(1))?
        } else {
            naive
        };
        let zone = if time.is_utc {
            ZoneTag::Utc
        } else {
            ZoneTag::Local
        };
        Self::from_instant(naive.and_utc(), zone)
    }

    /// Midnight UTC at the start of the given date.
    #[must_use]
    pub fn start_of_day(date: Date) -> Option<Self> {
        Self::from_parts(date, Time::new(0, 0, 0, true))
    }

    /// Creates a UTC DATE-TIME.
    #[must_use]
    pub fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        Self::from_parts(
            Date::new(year, month, day),
            Time::new(hour, minute, second, true),
        )
    }

    /// Creates a local DATE-TIME (no trailing `Z`).
    #[must_use]
    pub fn local(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        Self::from_parts(
            Date::new(year, month, day),
            Time::new(hour, minute, second, false),
        )
    }

    /// Returns the instant on the UTC timeline.
    #[must_use]
    pub const fn instant(&self) -> chrono::DateTime<Utc> {
        self.instant
    }

    /// Returns seconds since the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.instant.timestamp()
    }

    /// Returns the zone tag this value was written with.
    #[must_use]
    pub const fn zone(&self) -> ZoneTag {
        self.zone
    }

    /// Returns whether this is a UTC time.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        matches!(self.zone, ZoneTag::Utc)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instant.format("%Y%m%dT%H%M%S"))?;
        if self.is_utc() {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

/// UTC-OFFSET value (e.g., +0530, -0800, +013045).
///
/// The seconds field is kept optional so that encoding mirrors the width the
/// offset was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
    /// `true` east of UTC (`+`), `false` west (`-`).
    pub ahead: bool,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: Option<u8>,
}

impl UtcOffset {
    /// Creates an offset without a seconds field.
    #[must_use]
    pub const fn new(ahead: bool, hours: u8, minutes: u8) -> Self {
        Self {
            ahead,
            hours,
            minutes,
            seconds: None,
        }
    }

    /// Creates an offset with an explicit seconds field.
    #[must_use]
    pub const fn with_seconds(ahead: bool, hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            ahead,
            hours,
            minutes,
            seconds: Some(seconds),
        }
    }

    /// Returns the signed displacement from UTC in seconds.
    #[must_use]
    pub fn as_seconds(self) -> i32 {
        let magnitude = i32::from(self.hours) * 3600
            + i32::from(self.minutes) * 60
            + i32::from(self.seconds.unwrap_or(0));
        if self.ahead { magnitude } else { -magnitude }
    }

    /// UTC offset (zero).
    pub const UTC: Self = Self::new(true, 0, 0);
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.ahead { '+' } else { '-' };
        write!(f, "{sign}{:02}{:02}", self.hours, self.minutes)?;
        if let Some(seconds) = self.seconds {
            write!(f, "{seconds:02}")?;
        }
        Ok(())
    }
}
