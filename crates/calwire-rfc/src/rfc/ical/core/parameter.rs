//! iCalendar parameter types (RFC 5545 §3.2).

use std::fmt;

/// A single iCalendar property parameter.
///
/// Parameters modify or provide metadata for a property value.
/// For example: `DTSTART;TZID=America/New_York:20260123T120000`
///
/// The `TZID` is a parameter with name `TZID` and value `America/New_York`.
/// A bare key such as `RSVP` in `ATTENDEE;RSVP:...` has no values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values. Most parameters have one value, but some
    /// (like MEMBER) can have multiple comma-separated values.
    pub values: Vec<String>,
}

impl Parameter {
    /// Creates a new parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// Creates a new parameter with multiple values.
    #[must_use]
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Creates a parameter that is a bare key with no value.
    #[must_use]
    pub fn flag(name: impl Into<String>) -> Self {
        Self::with_values(name, Vec::new())
    }

    /// Returns the first (and usually only) value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Creates a TZID parameter.
    #[must_use]
    pub fn tzid(tzid: impl Into<String>) -> Self {
        Self::new("TZID", tzid)
    }

    /// Creates a VALUE parameter.
    #[must_use]
    pub fn value_type(value_type: impl Into<String>) -> Self {
        Self::new("VALUE", value_type)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.values.is_empty() {
            write!(f, "=")?;
            for (i, value) in self.values.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                if needs_quoting(value) {
                    write!(f, "\"{}\"", caret_encode(value))?;
                } else {
                    write!(f, "{}", caret_encode(value))?;
                }
            }
        }
        Ok(())
    }
}

/// Checks if a parameter value needs quoting.
fn needs_quoting(s: &str) -> bool {
    s.chars().any(|c| matches!(c, ':' | ';' | ','))
}

/// RFC 6868 encoding for characters a parameter value cannot carry.
fn caret_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '^' => out.push_str("^^"),
            '\n' => out.push_str("^n"),
            '"' => out.push_str("^'"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Ordered parameter map of one property.
///
/// Names are unique: inserting an existing name overwrites the earlier entry
/// in place, keeping its position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the first value of the named parameter.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name)?.value()
    }

    /// Returns whether a parameter with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts a parameter, replacing any existing one with the same name.
    pub fn insert(&mut self, param: Parameter) {
        match self.0.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.0.push(param),
        }
    }

    /// Removes and returns the named parameter.
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        let idx = self.0.iter().position(|p| p.name.eq_ignore_ascii_case(name))?;
        Some(self.0.remove(idx))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut params = Self::new();
        for param in iter {
            params.insert(param);
        }
        params
    }
}

impl From<Vec<Parameter>> for Parameters {
    fn from(params: Vec<Parameter>) -> Self {
        params.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Common parameter names as constants.
pub mod names {
    /// Time zone identifier.
    pub const TZID: &str = "TZID";
    /// Value data type.
    pub const VALUE: &str = "VALUE";
}
