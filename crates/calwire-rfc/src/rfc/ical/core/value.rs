//! iCalendar DATE, PERIOD and GEO value types plus the typed value union
//! (RFC 5545 §3.3, §3.8.1.6).

use std::fmt;

use super::{DateTime, Duration, UtcOffset, ValueKind};

/// DATE value (RFC 5545 §3.3.4).
///
/// A calendar date without time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    /// Year (e.g., 2026).
    pub year: u16,
    /// Month (1-12).
    pub month: u8,
    /// Day of month (1-31).
    pub day: u8,
}

impl Date {
    /// Creates a new date.
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// PERIOD value (RFC 5545 §3.3.9).
///
/// A precise period of time, defined by either:
/// - An explicit start and end (both DATE-TIME)
/// - A start DATE-TIME and a DURATION
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Explicit start and end times.
    Explicit {
        start: DateTime,
        end: DateTime,
    },
    /// Start time and duration.
    Duration {
        start: DateTime,
        duration: Duration,
    },
}

impl Period {
    /// Creates an explicit period from start to end.
    #[must_use]
    pub const fn explicit(start: DateTime, end: DateTime) -> Self {
        Self::Explicit { start, end }
    }

    /// Creates a period from a start time and duration.
    #[must_use]
    pub const fn from_duration(start: DateTime, duration: Duration) -> Self {
        Self::Duration { start, duration }
    }

    /// Returns the start of the period.
    #[must_use]
    pub const fn start(&self) -> &DateTime {
        match self {
            Self::Explicit { start, .. } | Self::Duration { start, .. } => start,
        }
    }

    /// Resolves the end of the period.
    ///
    /// For the start+duration form the end carries the start's zone tag.
    /// Returns `None` if the arithmetic leaves the supported range.
    #[must_use]
    pub fn end_instant(&self) -> Option<DateTime> {
        match self {
            Self::Explicit { end, .. } => Some(*end),
            Self::Duration { start, duration } => {
                let end = start.instant().checked_add_signed(duration.to_time_delta()?)?;
                DateTime::from_instant(end, start.zone())
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit { start, end } => write!(f, "{start}/{end}"),
            Self::Duration { start, duration } => write!(f, "{start}/{duration}"),
        }
    }
}

/// GEO value (RFC 5545 §3.8.1.6): latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPair {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPair {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.latitude, self.longitude)
    }
}

/// Value types (RFC 5545 §3.3).
///
/// This enum represents the decoded value of a property. Any value that does
/// not decode under its expected type is kept verbatim as [`Value::Text`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// TEXT value (unescaped for free-text properties, verbatim otherwise).
    Text(String),
    /// INTEGER value.
    Integer(i64),
    /// DATE value.
    Date(Date),
    /// DATE-TIME value.
    DateTime(DateTime),
    /// DURATION value.
    Duration(Duration),
    /// PERIOD value.
    Period(Period),
    /// UTC-OFFSET value.
    UtcOffset(UtcOffset),
    /// GEO value.
    Geo(GeoPair),
    /// Comma-separated list of values (EXDATE, RDATE, FREEBUSY).
    List(Vec<Value>),
}

impl Value {
    /// Returns the temporal kind the value holds. A list reports the kind of
    /// its first item.
    #[must_use]
    pub fn temporal_kind(&self) -> Option<ValueKind> {
        match self {
            Self::Date(_) => Some(ValueKind::Date),
            Self::DateTime(_) => Some(ValueKind::DateTime),
            Self::Duration(_) => Some(ValueKind::Duration),
            Self::Period(_) => Some(ValueKind::Period),
            Self::List(items) => items.first().and_then(Self::temporal_kind),
            _ => None,
        }
    }

    /// Returns this value as text, if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns this value as an integer, if it is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns this value as a date-time, if it is a date-time value.
    #[must_use]
    pub const fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns this value as a date, if it is a date value.
    #[must_use]
    pub const fn as_date(&self) -> Option<&Date> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Returns this value as a duration, if it is a duration value.
    #[must_use]
    pub const fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_period(&self) -> Option<&Period> {
        match self {
            Self::Period(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_utc_offset(&self) -> Option<UtcOffset> {
        match self {
            Self::UtcOffset(o) => Some(*o),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_geo(&self) -> Option<GeoPair> {
        match self {
            Self::Geo(g) => Some(*g),
            _ => None,
        }
    }

    /// Returns the elements of a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime> for Value {
    fn from(dt: DateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl From<Period> for Value {
    fn from(p: Period) -> Self {
        Self::Period(p)
    }
}

impl From<UtcOffset> for Value {
    fn from(o: UtcOffset) -> Self {
        Self::UtcOffset(o)
    }
}

impl From<GeoPair> for Value {
    fn from(g: GeoPair) -> Self {
        Self::Geo(g)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

/// Writes the wire form of the value, without text escaping.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Duration(d) => write!(f, "{d}"),
            Self::Period(p) => write!(f, "{p}"),
            Self::UtcOffset(o) => write!(f, "{o}"),
            Self::Geo(g) => write!(f, "{g}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}
