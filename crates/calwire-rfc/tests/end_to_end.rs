//! Public API tests: parse, inspect, edit and export a calendar.

use calwire_rfc::rfc::ical::{
    AttributeValue, Calendar, Component, ComponentKind, DateTime, Duration, ExportDefaults,
    KindRegistry, Parameter, Parameters, ParseErrorKind, ParseOptions, Period, Property, Value,
    parse, parse_into, parse_with, serialize, serialize_with,
};

const MEETING: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Example//Planner//EN\r\n\
BEGIN:VEVENT\r\n\
UID:meeting-1@example.com\r\n\
DTSTAMP:20230101T090000Z\r\n\
DTSTART:20230101T120000Z\r\n\
DURATION:PT1H30M\r\n\
SUMMARY:Quarterly review\\, part 1\r\n\
ATTENDEE;CN=Alice:mailto:alice@example.com\r\n\
ATTENDEE;CN=Bob;RSVP=TRUE:mailto:bob@example.com\r\n\
RDATE;VALUE=PERIOD:20230108T120000Z/PT1H\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER:-PT10M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

#[test_log::test]
fn parse_and_inspect() {
    let root = parse(MEETING).unwrap();
    assert_eq!(root.kind, ComponentKind::Calendar);

    let event = root.find_component("VEVENT").unwrap();
    assert_eq!(event.summary(), Some("Quarterly review, part 1"));

    let start = event.get_property("DTSTART").unwrap().as_datetime().unwrap();
    assert_eq!(start.timestamp(), 1_672_574_400);

    let Some(AttributeValue::Single(duration)) = event.get_attribute("DURATION") else {
        panic!("expected a single DURATION");
    };
    assert_eq!(duration.as_duration(), Some(Duration::from_seconds(5400)));

    let Some(AttributeValue::Multiple(attendees)) = event.get_attribute("ATTENDEE") else {
        panic!("expected several ATTENDEEs");
    };
    assert_eq!(attendees.len(), 2);
    let params = event.get_attribute_params("attendee");
    assert_eq!(params[1].value("CN"), Some("Bob"));
    assert_eq!(params[1].value("RSVP"), Some("TRUE"));

    let rdate = event.get_property("RDATE").unwrap().value.as_list().unwrap();
    let Value::Period(period) = &rdate[0] else {
        panic!("expected a period");
    };
    let end = period.end_instant().unwrap();
    assert_eq!(end, DateTime::utc(2023, 1, 8, 13, 0, 0).unwrap());

    assert_eq!(event.components().len(), 1);
    assert_eq!(event.component(0).unwrap().kind, ComponentKind::Alarm);
    assert!(event.component(1).is_none());
}

#[test]
fn edit_and_export() {
    let mut root = parse(MEETING).unwrap();
    let event = root.find_component_mut("VEVENT").unwrap();

    event.set_attribute(
        "SUMMARY",
        Value::from("Quarterly review; moved"),
        Parameters::new(),
        false,
    );
    event.set_attribute(
        "ATTENDEE",
        Value::from("mailto:carol@example.com"),
        Parameters::from(vec![Parameter::new("CN", "Carol")]),
        true,
    );
    assert_eq!(event.remove_attribute("RDATE"), 1);
    assert_eq!(event.remove_attribute("RDATE"), 0);

    let output = serialize(&root);
    assert!(output.contains("SUMMARY:Quarterly review\\; moved\r\n"));
    assert!(output.contains("ATTENDEE;CN=Carol:mailto:carol@example.com\r\n"));
    assert!(!output.contains("RDATE"));
    assert!(output.contains("METHOD:PUBLISH\r\n"));
    assert!(output.contains("PRODID:-//Example//Planner//EN\r\n"));

    let reparsed = parse(&output).unwrap();
    let event = reparsed.find_component("VEVENT").unwrap();
    assert_eq!(event.get_properties("ATTENDEE").len(), 3);
    assert_eq!(event.summary(), Some("Quarterly review; moved"));
}

#[test]
fn build_calendar_from_scratch() {
    let mut calendar = Calendar::new();

    let mut event = Component::event();
    event.add_property(Property::text("UID", "built@example.com"));
    let start = DateTime::utc(2026, 5, 4, 9, 0, 0).unwrap();
    event.add_property(Property::datetime("DTSTART", start));
    event.add_property(Property::new(
        "FREEBUSY",
        Value::List(vec![Period::from_duration(start, Duration::hours(2)).into()]),
    ));
    calendar.add_event(event);

    let defaults = ExportDefaults {
        method: "REQUEST".into(),
        ..ExportDefaults::default()
    };
    let output = serialize_with(&calendar.root, &defaults);
    assert!(output.contains("METHOD:REQUEST\r\n"));
    assert!(output.contains("DTSTART:20260504T090000Z\r\n"));
    assert!(output.contains("FREEBUSY:20260504T090000Z/PT2H\r\n"));

    let parsed: Calendar = output.parse().unwrap();
    assert_eq!(parsed.events()[0].uid(), Some("built@example.com"));
    assert_eq!(parsed.method(), Some("REQUEST"));
    assert_eq!(parsed.to_string(), output);
}

#[test]
fn structural_errors_abort() {
    let cases = [
        ("VERSION:2.0\r\n", ParseErrorKind::MissingBegin),
        ("BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nEND:VCALENDAR\r\n", ParseErrorKind::MismatchedComponent),
        ("BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\n", ParseErrorKind::MissingEnd),
        ("BEGIN:VCALENDAR\r\nEND:VTODO\r\nEND:VCALENDAR\r\n", ParseErrorKind::UnmatchedEnd),
    ];

    for (input, kind) in cases {
        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, kind, "{input:?}");
        assert!(err.is_structural());
    }
}

#[test]
fn extension_components_with_validation() {
    fn require_payload(component: &Component) -> Result<(), String> {
        if component.get_property("X-PAYLOAD").is_some() {
            Ok(())
        } else {
            Err("X-PAYLOAD required".to_string())
        }
    }

    let registry = KindRegistry::new().with("X-SYNC-STATE", Some(require_payload));
    let options = ParseOptions::default().with_registry(registry);

    let good = "BEGIN:VCALENDAR\r\nBEGIN:X-SYNC-STATE\r\nX-PAYLOAD:token\r\nEND:X-SYNC-STATE\r\nEND:VCALENDAR\r\n";
    let root = parse_with(good, &options).unwrap();
    assert_eq!(root.children[0].kind, ComponentKind::Extension);

    let bad = "BEGIN:VCALENDAR\r\nBEGIN:X-SYNC-STATE\r\nEND:X-SYNC-STATE\r\nEND:VCALENDAR\r\n";
    let err = parse_with(bad, &options).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidComponent);
    assert!(err.to_string().ends_with("X-PAYLOAD required"));
}

#[test]
fn merge_second_feed_into_calendar() {
    let mut calendar = Calendar::from(parse(MEETING).unwrap());
    let feed = "BEGIN:VCALENDAR\r\nBEGIN:VTODO\r\nUID:todo-1@example.com\r\nEND:VTODO\r\nEND:VCALENDAR\r\n";

    parse_into(feed, &mut calendar.root, &ParseOptions::default(), false).unwrap();
    assert_eq!(calendar.events().len(), 1);
    assert_eq!(calendar.todos()[0].uid(), Some("todo-1@example.com"));
    assert_eq!(calendar.version(), Some("2.0"));

    parse_into(feed, &mut calendar.root, &ParseOptions::default(), true).unwrap();
    assert!(calendar.events().is_empty());
    assert_eq!(calendar.todos().len(), 1);
    assert_eq!(calendar.version(), None);
}
