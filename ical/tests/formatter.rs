// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the iCalendar formatter.

use jiff::civil::date;
use recal_ical::{
    Calendar, Component, ComponentKind, FoldingStyle, FormatOptions, Parameter, Property,
    PropertyKind, RecurrenceFrequency, RecurrenceRule, Temporal, format, format_calendar, parse,
};

#[test]
fn test_format_simple_event() {
    let input = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Example Corp.//Cal Client 1.0//EN\r\n\
BEGIN:VEVENT\r\n\
UID:12345@example.com\r\n\
DTSTAMP:20250110T120000Z\r\n\
DTSTART:20250110T140000Z\r\n\
DTEND:20250110T150000Z\r\n\
SUMMARY:Test Event\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    let calendar = parse(input).unwrap();
    let formatted = format(&calendar).unwrap();

    assert!(formatted.contains("BEGIN:VCALENDAR"));
    assert!(formatted.contains("VERSION:2.0"));
    assert!(formatted.contains("PRODID:-//Example Corp.//Cal Client 1.0//EN"));
    assert!(formatted.contains("UID:12345@example.com"));
    assert!(formatted.contains("DTSTAMP:20250110T120000Z"));
    assert!(formatted.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
}

#[test]
fn test_format_creates_crlf_line_endings() {
    let input = "BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:test\nEND:VCALENDAR\n";
    let formatted = format(&parse(input).unwrap()).unwrap();

    assert_eq!(
        formatted,
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:test\r\nEND:VCALENDAR\r\n"
    );
}

#[test]
fn test_format_with_parameters() {
    let input = "BEGIN:VEVENT\r\n\
UID:test@example.com\r\n\
SUMMARY;LANGUAGE=en:Test Event\r\n\
ATTENDEE;CN=\"Doe, Jane\";PARTSTAT=ACCEPTED:mailto:jane@example.com\r\n\
END:VEVENT\r\n";

    let formatted = format(&parse(input).unwrap()).unwrap();
    assert!(formatted.contains("SUMMARY;LANGUAGE=en:Test Event\r\n"));
    assert!(
        formatted.contains("ATTENDEE;CN=\"Doe, Jane\";PARTSTAT=ACCEPTED:mailto:jane@example.com\r\n")
    );
}

#[test]
fn test_format_text_with_special_characters() {
    let input = "BEGIN:VEVENT\r\n\
UID:test@example.com\r\n\
SUMMARY:Test with semicolon\\; and comma\\, and backslash\\\\\r\n\
DESCRIPTION:two\\nlines\r\n\
END:VEVENT\r\n";

    let event = parse(input).unwrap();
    assert_eq!(
        event.summary(),
        Some("Test with semicolon; and comma, and backslash\\")
    );

    let formatted = format(&event).unwrap();
    assert!(formatted.contains("SUMMARY:Test with semicolon\\; and comma\\, and backslash\\\\\r\n"));
    assert!(formatted.contains("DESCRIPTION:two\\nlines\r\n"));
}

#[test]
fn test_format_built_components() {
    let start = Temporal::Zoned {
        datetime: date(2025, 1, 6).at(9, 0, 0, 0),
        tzid: "Europe/Berlin".to_owned(),
    };
    let rule = RecurrenceRule::new(RecurrenceFrequency::Weekly)
        .with_count(4)
        .unwrap();
    let event = Component::new(ComponentKind::Event)
        .with_uid("built@example.com")
        .unwrap()
        .with_dtstamp(&Temporal::Utc(date(2025, 1, 1).at(0, 0, 0, 0)))
        .unwrap()
        .with_dtstart(start)
        .unwrap()
        .with_rrule(rule)
        .unwrap()
        .with_exdate(Temporal::Zoned {
            datetime: date(2025, 1, 13).at(9, 0, 0, 0),
            tzid: "Europe/Berlin".to_owned(),
        })
        .unwrap()
        .with_summary("Planning")
        .unwrap();

    assert_eq!(
        format(&event).unwrap(),
        "BEGIN:VEVENT\r\n\
UID:built@example.com\r\n\
DTSTAMP:20250101T000000Z\r\n\
DTSTART;TZID=Europe/Berlin:20250106T090000\r\n\
RRULE:FREQ=WEEKLY;COUNT=4\r\n\
EXDATE;TZID=Europe/Berlin:20250113T090000\r\n\
SUMMARY:Planning\r\n\
END:VEVENT\r\n"
    );
}

#[test]
fn test_format_date_value() {
    let event = Component::new(ComponentKind::Event)
        .with_dtstart(Temporal::Date(date(2025, 1, 10)))
        .unwrap()
        .with_dtend(Temporal::Date(date(2025, 1, 11)))
        .unwrap();

    let formatted = format(&event).unwrap();
    assert!(formatted.contains("DTSTART;VALUE=DATE:20250110\r\n"));
    assert!(formatted.contains("DTEND;VALUE=DATE:20250111\r\n"));
}

#[test]
fn test_format_calendar_with_index() {
    let mut calendar = Calendar::new("-//recal//test//EN");
    calendar.add_component(
        Component::new(ComponentKind::Todo)
            .with_uid("todo@example.com")
            .unwrap(),
    );

    assert_eq!(
        format_calendar(&calendar).unwrap(),
        "BEGIN:VCALENDAR\r\n\
PRODID:-//recal//test//EN\r\n\
VERSION:2.0\r\n\
BEGIN:VTODO\r\n\
UID:todo@example.com\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n"
    );
}

#[test]
fn test_format_options() {
    let mut event = Component::new(ComponentKind::Journal);
    event
        .add_property(Property::text(PropertyKind::Description, "x".repeat(100)))
        .unwrap();

    let unfolded = FormatOptions::default()
        .folding(None)
        .write_to_string(&event)
        .unwrap();
    assert!(unfolded.contains(&format!("DESCRIPTION:{}\r\n", "x".repeat(100))));

    let tabbed = FormatOptions::default()
        .folding_style(FoldingStyle::Tab)
        .write_to_string(&event)
        .unwrap();
    assert!(tabbed.contains("\r\n\t"));
    assert_eq!(parse(&tabbed).unwrap(), event);
}

#[test]
fn test_format_uri_parameters_are_quoted() {
    let property = Property::text(PropertyKind::Description, "See attached")
        .with_parameter(Parameter::AlternateText("http://example.com/a.html".to_owned()))
        .unwrap();
    assert_eq!(
        property.to_string(),
        "DESCRIPTION;ALTREP=\"http://example.com/a.html\":See attached"
    );
}
