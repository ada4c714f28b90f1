//! Property name to value type table.
//!
//! Both the parser and the serializer look properties up here, so a name is
//! always decoded and encoded under the same rules.

use super::Parameters;
use super::parameter::names;

/// Value grammar a property is decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Verbatim text, no escape processing.
    Text,
    /// Human-readable text with `\\`, `\,`, `\;` and `\n` escapes.
    FreeText,
    Integer,
    Date,
    DateTime,
    Duration,
    Period,
    UtcOffset,
    Geo,
}

impl ValueKind {
    /// Returns whether the kind is a point or span in time, which a
    /// `VALUE=` parameter may override.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Date | Self::DateTime | Self::Duration | Self::Period
        )
    }

    /// Maps a `VALUE=` parameter to a temporal kind.
    #[must_use]
    pub fn from_value_param(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "DATE" => Some(Self::Date),
            "DATE-TIME" => Some(Self::DateTime),
            "PERIOD" => Some(Self::Period),
            "DURATION" => Some(Self::Duration),
            _ => None,
        }
    }

    /// Returns the `VALUE=` parameter naming a temporal kind.
    #[must_use]
    pub const fn value_param(self) -> Option<&'static str> {
        match self {
            Self::Date => Some("DATE"),
            Self::DateTime => Some("DATE-TIME"),
            Self::Period => Some("PERIOD"),
            Self::Duration => Some("DURATION"),
            _ => None,
        }
    }
}

/// How a property's value is decoded and encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyKind {
    pub value: ValueKind,
    /// Whether the value is a comma-separated list of `value`.
    pub list: bool,
}

impl PropertyKind {
    const fn single(value: ValueKind) -> Self {
        Self { value, list: false }
    }

    const fn list(value: ValueKind) -> Self {
        Self { value, list: true }
    }

    /// Looks up a property name. Unknown names are verbatim text.
    #[must_use]
    pub fn lookup(name: &str) -> Self {
        PROPERTY_KINDS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map_or(Self::single(ValueKind::Text), |(_, kind)| *kind)
    }

    /// Looks up a property name and applies any `VALUE=` override.
    ///
    /// The override only applies between temporal kinds; `VALUE=` on a text
    /// or numeric property is left for the caller to interpret.
    #[must_use]
    pub fn resolve(name: &str, params: &Parameters) -> Self {
        let kind = Self::lookup(name);
        if !kind.value.is_temporal() {
            return kind;
        }
        match params
            .value(names::VALUE)
            .and_then(ValueKind::from_value_param)
        {
            Some(value) => Self { value, ..kind },
            None => kind,
        }
    }
}

const PROPERTY_KINDS: &[(&str, PropertyKind)] = &[
    ("DESCRIPTION", PropertyKind::single(ValueKind::FreeText)),
    ("SUMMARY", PropertyKind::single(ValueKind::FreeText)),
    ("LOCATION", PropertyKind::single(ValueKind::FreeText)),
    ("DTSTAMP", PropertyKind::single(ValueKind::DateTime)),
    ("COMPLETED", PropertyKind::single(ValueKind::DateTime)),
    ("CREATED", PropertyKind::single(ValueKind::DateTime)),
    ("LAST-MODIFIED", PropertyKind::single(ValueKind::DateTime)),
    ("DTSTART", PropertyKind::single(ValueKind::DateTime)),
    ("DTEND", PropertyKind::single(ValueKind::DateTime)),
    ("DUE", PropertyKind::single(ValueKind::DateTime)),
    ("RECURRENCE-ID", PropertyKind::single(ValueKind::DateTime)),
    ("RDATE", PropertyKind::list(ValueKind::DateTime)),
    ("EXDATE", PropertyKind::list(ValueKind::DateTime)),
    ("TRIGGER", PropertyKind::single(ValueKind::Duration)),
    ("DURATION", PropertyKind::single(ValueKind::Duration)),
    ("FREEBUSY", PropertyKind::list(ValueKind::Period)),
    ("TZOFFSETFROM", PropertyKind::single(ValueKind::UtcOffset)),
    ("TZOFFSETTO", PropertyKind::single(ValueKind::UtcOffset)),
    ("PERCENT-COMPLETE", PropertyKind::single(ValueKind::Integer)),
    ("PRIORITY", PropertyKind::single(ValueKind::Integer)),
    ("REPEAT", PropertyKind::single(ValueKind::Integer)),
    ("SEQUENCE", PropertyKind::single(ValueKind::Integer)),
    ("GEO", PropertyKind::single(ValueKind::Geo)),
];
