//! iCalendar property and content line types (RFC 5545 §3.1, §3.8).

use super::{Date, DateTime, Duration, Parameter, Parameters, Value};

/// A raw content line as split from iCalendar text.
///
/// This is the low-level representation before value type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters; a repeated name overwrites the earlier one.
    pub params: Parameters,
    /// Raw value string (after unfolding, before unescaping).
    pub raw_value: String,
}

impl ContentLine {
    /// Creates a new content line.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Parameters::new(),
            raw_value: value.into(),
        }
    }

    /// Creates a content line with parameters.
    #[must_use]
    pub fn with_params(
        name: impl Into<String>,
        params: Parameters,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params,
            raw_value: value.into(),
        }
    }

    /// Returns the VALUE parameter if present.
    #[must_use]
    pub fn value_type(&self) -> Option<&str> {
        self.params.value("VALUE")
    }
}

/// A decoded iCalendar property (an attribute of a component).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Parameters,
    /// Decoded value.
    pub value: Value,
}

impl Property {
    /// Creates a property with any value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Parameters::new(),
            value: value.into(),
        }
    }

    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Value::Text(value.into()))
    }

    /// Creates a property with an integer value.
    #[must_use]
    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, Value::Integer(value))
    }

    /// Creates a property with a datetime value.
    #[must_use]
    pub fn datetime(name: impl Into<String>, dt: DateTime) -> Self {
        Self::new(name, Value::DateTime(dt))
    }

    /// Creates a property with a date value.
    ///
    /// Adds `VALUE=DATE` so the value decodes as a date again.
    #[must_use]
    pub fn date(name: impl Into<String>, d: Date) -> Self {
        Self::new(name, Value::Date(d)).with_param(Parameter::value_type("DATE"))
    }

    /// Creates a property with a duration value.
    #[must_use]
    pub fn duration(name: impl Into<String>, d: Duration) -> Self {
        Self::new(name, Value::Duration(d))
    }

    /// Adds a parameter, builder style.
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.insert(param);
        self
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.params.value(name)
    }

    /// Sets a parameter, replacing any existing parameter with the same name.
    pub fn set_param(&mut self, param: Parameter) {
        self.params.insert(param);
    }

    /// Returns the value as text if it is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    /// Returns the value as an integer if it is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        self.value.as_integer()
    }

    /// Returns the value as a datetime if it is a datetime value.
    #[must_use]
    pub const fn as_datetime(&self) -> Option<&DateTime> {
        self.value.as_datetime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_uppercased() {
        assert_eq!(Property::text("summary", "x").name, "SUMMARY");
        assert_eq!(ContentLine::new("dtStart", "x").name, "DTSTART");
    }

    #[test]
    fn date_property_carries_value_param() {
        let prop = Property::date("DTSTART", Date::new(2026, 3, 1));
        assert_eq!(prop.get_param_value("VALUE"), Some("DATE"));
        assert_eq!(prop.value.as_date(), Some(&Date::new(2026, 3, 1)));
    }

    #[test]
    fn set_param_replaces() {
        let mut prop = Property::text("ATTENDEE", "mailto:a@example.com")
            .with_param(Parameter::new("CN", "A"));
        prop.set_param(Parameter::new("cn", "B"));
        assert_eq!(prop.params.len(), 1);
        assert_eq!(prop.get_param_value("CN"), Some("B"));
    }
}
