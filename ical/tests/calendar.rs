// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar level queries over parsed series.

use jiff::civil::date;
use recal_ical::{ComponentKind, ParseError, Temporal, parse_calendar};

const SERIES: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//recal//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:standup@example.com\r\n\
DTSTAMP:20250101T000000Z\r\n\
DTSTART:20250106T090000\r\n\
DURATION:PT15M\r\n\
RRULE:FREQ=DAILY;COUNT=5\r\n\
SUMMARY:Stand-up\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:standup@example.com\r\n\
DTSTAMP:20250101T000000Z\r\n\
RECURRENCE-ID:20250108T090000\r\n\
DTSTART:20250108T113000\r\n\
DURATION:PT15M\r\n\
SUMMARY:Stand-up (late)\r\n\
END:VEVENT\r\n\
BEGIN:VTODO\r\n\
UID:review@example.com\r\n\
DTSTAMP:20250101T000000Z\r\n\
DTSTART;VALUE=DATE:20250107\r\n\
SUMMARY:Review\r\n\
END:VTODO\r\n\
END:VCALENDAR\r\n";

fn floating(d: i8, h: i8, m: i8) -> Temporal {
    Temporal::Floating(date(2025, 1, d).at(h, m, 0, 0))
}

#[test]
fn indexes_series_by_uid() {
    let calendar = parse_calendar(SERIES).unwrap();
    assert_eq!(
        calendar.uids().collect::<Vec<_>>(),
        ["review@example.com", "standup@example.com"]
    );

    let series = calendar.series("standup@example.com").unwrap();
    assert_eq!(series.parent().and_then(|p| p.summary()), Some("Stand-up"));
    assert_eq!(series.overrides().len(), 1);
    assert!(series.override_for(&floating(8, 9, 0)).is_some());
    assert!(calendar.series("nope@example.com").is_none());
    assert!(calendar.validate().is_empty(), "{:?}", calendar.validate());
}

#[test]
fn streams_series_without_overridden_instances() {
    let calendar = parse_calendar(SERIES).unwrap();
    let got: Vec<_> = calendar
        .stream_occurrences("standup@example.com", &floating(1, 0, 0), &floating(31, 0, 0))
        .unwrap()
        .collect();
    assert_eq!(
        got,
        [floating(6, 9, 0), floating(7, 9, 0), floating(9, 9, 0), floating(10, 9, 0)]
    );
    assert!(
        calendar
            .stream_occurrences("nope@example.com", &floating(1, 0, 0), &floating(31, 0, 0))
            .is_err()
    );
}

#[test]
fn expands_every_component_in_order() {
    let calendar = parse_calendar(SERIES).unwrap();
    let instances = calendar.expand(&floating(7, 0, 0), &floating(9, 0, 0));
    let summary: Vec<_> = instances
        .iter()
        .map(|i| (i.component.summary().unwrap_or_default(), i.start.to_string()))
        .collect();
    assert_eq!(
        summary,
        [
            ("Review", "20250107".to_owned()),
            ("Stand-up", "20250107T090000".to_owned()),
            ("Stand-up (late)", "20250108T113000".to_owned()),
        ]
    );

    let late = instances.get(2).unwrap();
    assert_eq!(late.end, Some(floating(8, 11, 45)));
    assert_eq!(*late.component.kind(), ComponentKind::Event);
}

#[test]
fn applies_revisions_in_place() {
    let mut calendar = parse_calendar(SERIES).unwrap();
    let mut parent = calendar
        .series("standup@example.com")
        .and_then(|s| s.parent())
        .cloned()
        .unwrap();
    parent.set_summary("Daily").unwrap();

    calendar.apply_revision("standup@example.com", vec![parent]).unwrap();
    assert_eq!(calendar.components().len(), 2);
    assert_eq!(
        calendar.components().first().and_then(|c| c.summary()),
        Some("Daily")
    );

    let removed = calendar.remove_series("review@example.com");
    assert_eq!(removed.len(), 1);
    assert_eq!(calendar.uids().count(), 1);
}

#[test]
fn flags_mismatched_recurrence_ids() {
    let broken = SERIES.replace(
        "RECURRENCE-ID:20250108T090000",
        "RECURRENCE-ID:20250108T140000Z",
    );
    let calendar = parse_calendar(&broken).unwrap();
    let errors = calendar.validate();
    assert!(
        errors
            .iter()
            .any(|e| e.contains("RECURRENCE-ID must have the same form as the DTSTART of its series")),
        "{errors:?}"
    );
}

#[test]
fn rejects_non_calendar_roots() {
    let err = parse_calendar("BEGIN:VTODO\r\nEND:VTODO\r\n").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedComponent { .. }));
}
