//! iCalendar document serialization.
//!
//! Components are written depth-first: BEGIN, properties in insertion order,
//! children, END. Every content line is folded and terminated with CRLF.

use std::borrow::Cow;
use std::fmt;

use calwire_core::config::ExportConfig;
use calwire_core::constants::{DEFAULT_METHOD, DEFAULT_PRODID, DEFAULT_VERSION};

use super::escape::escape_text;
use super::fold::fold_line;
use crate::rfc::ical::core::{
    Calendar, Component, ComponentKind, Property, PropertyKind, Value, ValueKind, param_names,
};

/// Root properties a VCALENDAR must carry on export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDefaults {
    pub version: String,
    pub prodid: String,
    pub method: String,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            prodid: DEFAULT_PRODID.to_string(),
            method: DEFAULT_METHOD.to_string(),
        }
    }
}

impl From<&ExportConfig> for ExportDefaults {
    fn from(config: &ExportConfig) -> Self {
        Self {
            version: config.version.clone(),
            prodid: config.prodid.clone(),
            method: config.method.clone(),
        }
    }
}

/// Serializes a component tree with the built-in export defaults.
///
/// A VCALENDAR root missing VERSION, PRODID or METHOD gets them appended in
/// that order; the input tree is not modified.
#[must_use]
#[tracing::instrument(skip(root), fields(component = %root.name))]
pub fn serialize(root: &Component) -> String {
    serialize_with(root, &ExportDefaults::default())
}

/// Serializes a component tree, filling missing VCALENDAR root properties
/// from `defaults`.
#[must_use]
#[tracing::instrument(skip(root, defaults), fields(component = %root.name))]
pub fn serialize_with(root: &Component, defaults: &ExportDefaults) -> String {
    let root = with_defaults(root, defaults);

    let mut output = String::new();
    write_component(&mut output, &root);

    tracing::debug!(output_len = output.len(), "Serialized iCalendar document");
    output
}

/// Serializes a single component and its children without adding defaults.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut output = String::new();
    write_component(&mut output, component);
    output
}

/// Serializes a single property as a folded content line ending in CRLF.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut output = String::new();
    write_line(&mut output, &content_line(prop));
    output
}

fn with_defaults<'a>(root: &'a Component, defaults: &ExportDefaults) -> Cow<'a, Component> {
    if root.kind != ComponentKind::Calendar {
        return Cow::Borrowed(root);
    }

    let missing: Vec<(&str, &str)> = [
        ("VERSION", defaults.version.as_str()),
        ("PRODID", defaults.prodid.as_str()),
        ("METHOD", defaults.method.as_str()),
    ]
    .into_iter()
    .filter(|(name, _)| root.get_property(name).is_none())
    .collect();

    if missing.is_empty() {
        return Cow::Borrowed(root);
    }

    tracing::trace!(count = missing.len(), "Adding export defaults");
    let mut root = root.clone();
    for (name, value) in missing {
        root.add_property(Property::text(name, value));
    }
    Cow::Owned(root)
}

enum Step<'a> {
    Begin(&'a Component),
    End(&'a Component),
}

/// Walks the tree with an explicit stack; nesting depth is unbounded.
fn write_component(output: &mut String, root: &Component) {
    let mut pending = vec![Step::Begin(root)];

    while let Some(step) = pending.pop() {
        match step {
            Step::Begin(component) => {
                write_line(output, &format!("BEGIN:{}", component.name));
                for prop in &component.properties {
                    write_line(output, &content_line(prop));
                }
                pending.push(Step::End(component));
                pending.extend(component.children.iter().rev().map(Step::Begin));
            }
            Step::End(component) => write_line(output, &format!("END:{}", component.name)),
        }
    }
}

fn write_line(output: &mut String, line: &str) {
    output.push_str(&fold_line(line));
    output.push_str("\r\n");
}

/// Assembles `NAME(;PARAM)*:value` for a property.
///
/// A temporal value whose kind differs from what the name and parameters
/// resolve to gets a `VALUE=` parameter naming its actual kind, replacing
/// any existing one.
fn content_line(prop: &Property) -> String {
    let mut line = prop.name.clone();

    let value_param = value_param_override(prop);
    for param in &prop.params {
        if value_param.is_some() && param.name.eq_ignore_ascii_case(param_names::VALUE) {
            continue;
        }
        line.push(';');
        line.push_str(&param.to_string());
    }
    if let Some(kind) = value_param {
        line.push(';');
        line.push_str(param_names::VALUE);
        line.push('=');
        line.push_str(kind);
    }

    line.push(':');
    line.push_str(&encode_value(prop));
    line
}

fn value_param_override(prop: &Property) -> Option<&'static str> {
    let declared = PropertyKind::resolve(&prop.name, &prop.params).value;
    if !declared.is_temporal() {
        return None;
    }
    prop.value
        .temporal_kind()
        .filter(|actual| *actual != declared)
        .and_then(ValueKind::value_param)
}

/// Encodes a property value, escaping free text.
///
/// Line breaks left in any value are written as a literal `\n` so that no
/// physical line carries a bare CR or LF.
fn encode_value(prop: &Property) -> String {
    let kind = PropertyKind::resolve(&prop.name, &prop.params);

    let encoded = match &prop.value {
        Value::Text(text) if kind.value == ValueKind::FreeText => escape_text(text),
        value => value.to_string(),
    };

    if encoded.contains(['\r', '\n']) {
        encoded.replace("\r\n", "\\n").replace(['\r', '\n'], "\\n")
    } else {
        encoded
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(&self.root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{
        Date, DateTime, Duration, GeoPair, Parameter, Parameters, Period, UtcOffset,
    };
    use crate::rfc::ical::parse::{ParseOptions, parse_with};

    fn event_with(prop: Property) -> Component {
        let mut event = Component::event();
        event.add_property(prop);
        event
    }

    #[test_log::test]
    fn serialize_simple_calendar() {
        let mut cal = Component::calendar();
        cal.add_property(Property::text("VERSION", "2.0"));
        cal.add_property(Property::text("PRODID", "-//Test//Test//EN"));
        cal.add_property(Property::text("METHOD", "REQUEST"));

        let mut event = Component::event();
        event.add_property(Property::text("UID", "test-123"));
        event.add_property(Property::datetime(
            "DTSTAMP",
            DateTime::utc(2026, 1, 23, 12, 0, 0).unwrap(),
        ));
        event.add_property(Property::text("SUMMARY", "Test Event"));
        cal.add_component(event);

        let output = serialize(&cal);
        assert_eq!(
            output,
            "BEGIN:VCALENDAR\r\n\
             VERSION:2.0\r\n\
             PRODID:-//Test//Test//EN\r\n\
             METHOD:REQUEST\r\n\
             BEGIN:VEVENT\r\n\
             UID:test-123\r\n\
             DTSTAMP:20260123T120000Z\r\n\
             SUMMARY:Test Event\r\n\
             END:VEVENT\r\n\
             END:VCALENDAR\r\n"
        );
    }

    #[test]
    fn defaults_added_when_absent() {
        let output = serialize(&Component::calendar());
        assert_eq!(
            output,
            format!(
                "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{DEFAULT_PRODID}\r\nMETHOD:PUBLISH\r\nEND:VCALENDAR\r\n"
            )
        );
    }

    #[test]
    fn defaults_do_not_override_and_keep_input_untouched() {
        let mut cal = Component::calendar();
        cal.add_property(Property::text("METHOD", "CANCEL"));
        let before = cal.clone();

        let defaults = ExportDefaults {
            version: "2.0".into(),
            prodid: "-//Example//Planner//EN".into(),
            method: "PUBLISH".into(),
        };
        let output = serialize_with(&cal, &defaults);

        assert_eq!(cal, before);
        assert!(output.contains("METHOD:CANCEL\r\n"));
        assert!(!output.contains("METHOD:PUBLISH"));
        assert!(output.contains("PRODID:-//Example//Planner//EN\r\n"));
        let version = output.find("VERSION").unwrap();
        let prodid = output.find("PRODID").unwrap();
        assert!(output.find("METHOD").unwrap() < version);
        assert!(version < prodid);
    }

    #[test]
    fn non_calendar_root_gets_no_defaults() {
        let output = serialize(&event_with(Property::text("UID", "1")));
        assert_eq!(output, "BEGIN:VEVENT\r\nUID:1\r\nEND:VEVENT\r\n");
    }

    #[test]
    fn export_config_converts() {
        let config = ExportConfig {
            version: "2.0".into(),
            prodid: "-//X//Y//EN".into(),
            method: "REQUEST".into(),
        };
        let defaults = ExportDefaults::from(&config);
        assert_eq!(defaults.method, "REQUEST");
        assert_eq!(ExportDefaults::from(&ExportConfig::default()), ExportDefaults::default());
    }

    #[test]
    fn free_text_is_escaped() {
        let prop = Property::text("SUMMARY", "Lunch, then; review\\notes\nnext");
        assert_eq!(
            serialize_property(&prop),
            "SUMMARY:Lunch\\, then\\; review\\\\notes\\nnext\r\n"
        );
    }

    #[test]
    fn plain_text_is_not_escaped() {
        let prop = Property::text("RRULE", "FREQ=WEEKLY;BYDAY=MO,WE");
        assert_eq!(serialize_property(&prop), "RRULE:FREQ=WEEKLY;BYDAY=MO,WE\r\n");
    }

    #[test]
    fn line_breaks_in_plain_values_are_neutralized() {
        let prop = Property::text("X-NOTE", "one\r\ntwo\rthree\nfour");
        assert_eq!(serialize_property(&prop), "X-NOTE:one\\ntwo\\nthree\\nfour\r\n");
    }

    #[test]
    fn typed_values_encode() {
        let start = DateTime::utc(2026, 3, 1, 9, 0, 0).unwrap();
        let cases = [
            (Property::date("DTSTART", Date::new(2026, 3, 1)), "DTSTART;VALUE=DATE:20260301"),
            (Property::duration("DURATION", Duration::hours(1)), "DURATION:PT1H"),
            (Property::integer("PRIORITY", 5), "PRIORITY:5"),
            (Property::new("GEO", GeoPair::new(37.5, -122.25)), "GEO:37.5;-122.25"),
            (Property::new("TZOFFSETFROM", UtcOffset::new(false, 8, 0)), "TZOFFSETFROM:-0800"),
            (
                Property::new("FREEBUSY", Value::List(vec![Period::from_duration(start, Duration::minutes(30)).into()])),
                "FREEBUSY:20260301T090000Z/PT30M",
            ),
            (
                Property::new(
                    "EXDATE",
                    Value::List(vec![start.into(), DateTime::utc(2026, 3, 8, 9, 0, 0).unwrap().into()]),
                ),
                "EXDATE:20260301T090000Z,20260308T090000Z",
            ),
        ];

        for (prop, expected) in cases {
            assert_eq!(serialize_property(&prop), format!("{expected}\r\n"));
        }
    }

    #[test]
    fn value_param_follows_the_actual_value() {
        let start = DateTime::utc(2026, 3, 1, 9, 0, 0).unwrap();
        let end = DateTime::utc(2026, 3, 1, 10, 0, 0).unwrap();
        let mut stale = Property::datetime("DTEND", end);
        stale.params = Parameters::from(vec![Parameter::value_type("DATE"), Parameter::new("X-P", "1")]);

        let cases = [
            (Property::new("DTSTART", Date::new(2026, 3, 1)), "DTSTART;VALUE=DATE:20260301"),
            (
                Property::new(
                    "RDATE",
                    Value::List(vec![
                        Period::explicit(start, end).into(),
                        Period::from_duration(start, Duration::hours(2)).into(),
                    ]),
                ),
                "RDATE;VALUE=PERIOD:20260301T090000Z/20260301T100000Z,20260301T090000Z/PT2H",
            ),
            (Property::new("TRIGGER", start), "TRIGGER;VALUE=DATE-TIME:20260301T090000Z"),
            (stale, "DTEND;X-P=1;VALUE=DATE-TIME:20260301T100000Z"),
        ];

        let options = ParseOptions::default().with_root("VEVENT");
        for (prop, expected) in cases {
            assert_eq!(serialize_property(&prop), format!("{expected}\r\n"));

            let text = serialize_component(&event_with(prop.clone()));
            let parsed = parse_with(&text, &options).unwrap();
            assert_eq!(parsed.get_property(&prop.name).unwrap().value, prop.value, "{expected}");
        }
    }

    #[test]
    fn default_kind_gets_no_value_param() {
        let start = DateTime::utc(2026, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(
            serialize_property(&Property::datetime("DTSTART", start)),
            "DTSTART:20260301T090000Z\r\n"
        );
        assert_eq!(
            serialize_property(&Property::new("X-WHEN", Date::new(2026, 3, 1))),
            "X-WHEN:20260301\r\n"
        );
    }

    #[test]
    fn parameters_are_written_in_order() {
        let mut prop = Property::text("ATTENDEE", "mailto:a@example.com");
        prop.params = Parameters::from(vec![
            Parameter::new("CN", "Doe, Jane"),
            Parameter::new("ROLE", "REQ-PARTICIPANT"),
            Parameter::flag("RSVP"),
        ]);
        assert_eq!(
            serialize_property(&prop),
            "ATTENDEE;CN=\"Doe, Jane\";ROLE=REQ-PARTICIPANT;RSVP:mailto:a@example.com\r\n"
        );
    }

    #[test]
    fn long_lines_are_folded() {
        let prop = Property::text("DESCRIPTION", "x".repeat(200));
        let output = serialize_property(&prop);
        assert!(output.ends_with("\r\n"));
        for line in output.trim_end_matches("\r\n").split("\r\n") {
            assert!(line.len() <= 75);
        }
        assert_eq!(output.matches("\r\n ").count(), 2);
    }

    #[test]
    fn children_follow_properties() {
        let mut event = Component::event();
        event.add_component(Component::alarm());
        event.add_property(Property::text("UID", "1"));

        assert_eq!(
            serialize_component(&event),
            "BEGIN:VEVENT\r\nUID:1\r\nBEGIN:VALARM\r\nEND:VALARM\r\nEND:VEVENT\r\n"
        );
    }

    #[test]
    fn very_deep_tree_serializes() {
        let depth = 20_000;
        let mut node = Component::alarm();
        for _ in 1..depth {
            let mut parent = Component::alarm();
            parent.add_component(node);
            node = parent;
        }

        let output = serialize_component(&node);
        assert_eq!(output.matches("BEGIN:VALARM\r\n").count(), depth);
        assert!(output.ends_with("END:VALARM\r\nEND:VALARM\r\n"));
        assert!(output.contains("BEGIN:VALARM\r\nEND:VALARM\r\n"));
    }

    #[test]
    fn calendar_display_uses_defaults() {
        let text = Calendar::new().to_string();
        assert!(text.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(text.ends_with("END:VCALENDAR\r\n"));
    }
}
