// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Edits applied one after another to a calendar, the way a client would.

use jiff::Timestamp;
use jiff::civil::date;
use recal_core::{ChangeScope, Config, Reviser, instance_of, reschedule};
use recal_ical::{Calendar, Temporal, TemporalTag, format_calendar, parse_calendar};

const SRC: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//recal//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:daily@example.com\r\n\
DTSTAMP:20250301T000000Z\r\n\
DTSTART:20250303T090000\r\n\
DURATION:PT30M\r\n\
RRULE:FREQ=DAILY;COUNT=5\r\n\
SUMMARY:Daily\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

const UID: &str = "daily@example.com";

fn at(d: i8, h: i8) -> Temporal {
    Temporal::Floating(date(2025, 3, d).at(h, 0, 0, 0))
}

fn reviser() -> Reviser<Timestamp> {
    let now: Timestamp = "2025-03-01T12:00:00Z".parse().unwrap();
    Reviser::new(Config::default()).with_clock(now)
}

fn edit(calendar: &mut Calendar, occurrence: &Temporal, start: Temporal, scope: ChangeScope) {
    let series = calendar.series(UID).unwrap();
    let mut edited = instance_of(&series, occurrence).unwrap();
    reschedule(&mut edited, start, None).unwrap();
    let components = reviser().revise(&series, &edited, occurrence, scope).unwrap();
    calendar.apply_revision(UID, components).unwrap();
}

fn starts(calendar: &Calendar) -> Vec<Temporal> {
    calendar
        .expand(&at(1, 0), &at(31, 0))
        .into_iter()
        .map(|instance| instance.start)
        .collect()
}

#[test]
fn test_edit_workflow() {
    let mut calendar = parse_calendar(SRC).unwrap();

    // Move a single day.
    edit(&mut calendar, &at(4, 9), at(4, 10), ChangeScope::One);
    let found = starts(&calendar);
    assert_eq!(found.len(), 5);
    assert!(found.contains(&at(4, 10)));
    assert!(!found.contains(&at(4, 9)));

    // Move the whole series an hour earlier, the moved day stays put.
    edit(&mut calendar, &at(5, 9), at(5, 8), ChangeScope::All);
    let found = starts(&calendar);
    assert_eq!(found.len(), 5);
    for expected in [at(3, 8), at(4, 10), at(5, 8), at(6, 8), at(7, 8)] {
        assert!(found.contains(&expected), "{expected} missing from {found:?}");
    }
    let series = calendar.series(UID).unwrap();
    assert_eq!(series.parent().unwrap().sequence(), 1);
    assert!(series.override_for(&at(4, 8)).is_some());

    // Split the series from the fourth day on.
    edit(&mut calendar, &at(6, 8), at(6, 7), ChangeScope::ThisAndFuture);
    assert_eq!(calendar.uids().count(), 2);
    let found = starts(&calendar);
    assert_eq!(found.len(), 5);
    for expected in [at(3, 8), at(4, 10), at(5, 8), at(6, 7), at(7, 7)] {
        assert!(found.contains(&expected), "{expected} missing from {found:?}");
    }

    // The result survives a round trip through text.
    let text = format_calendar(&calendar).unwrap();
    let reparsed = parse_calendar(&text).unwrap();
    assert!(reparsed.validate().is_empty(), "{:?}", reparsed.validate());
    assert_eq!(starts(&reparsed), starts(&calendar));
}

#[test]
fn test_delete_workflow() {
    let mut calendar = parse_calendar(SRC).unwrap();
    edit(&mut calendar, &at(4, 9), at(4, 10), ChangeScope::One);

    let series = calendar.series(UID).unwrap();
    let components = reviser().delete_one(&series, &at(4, 9)).unwrap();
    calendar.apply_revision(UID, components).unwrap();
    assert_eq!(starts(&calendar).len(), 4);

    let series = calendar.series(UID).unwrap();
    let components = reviser().delete_this_and_future(&series, &at(6, 9)).unwrap();
    calendar.apply_revision(UID, components).unwrap();
    assert_eq!(starts(&calendar), [at(3, 9), at(5, 9)]);

    let series = calendar.series(UID).unwrap();
    let components = reviser().delete_all(&series);
    calendar.apply_revision(UID, components).unwrap();
    assert_eq!(calendar.uids().count(), 0);
}

const WEEKLY: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//recal//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:weekly@example.com\r\n\
DTSTAMP:20160201T000000Z\r\n\
DTSTART;TZID=America/Los_Angeles:20160214T080000\r\n\
DTEND;TZID=America/Los_Angeles:20160214T100000\r\n\
RRULE:FREQ=WEEKLY;BYDAY=SU,TU,FR\r\n\
SUMMARY:Weekly\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

fn los_angeles(d: i8, h: i8) -> Temporal {
    Temporal::Zoned {
        datetime: date(2016, 2, d).at(h, 0, 0, 0),
        tzid: "America/Los_Angeles".to_owned(),
    }
}

fn whole_day(d: i8) -> Temporal {
    Temporal::Date(date(2016, 2, d))
}

fn to_whole_day(calendar: &mut Calendar, occurrence: &Temporal, day: i8) {
    let uid = "weekly@example.com";
    let series = calendar.series(uid).unwrap();
    let mut edited = instance_of(&series, occurrence).unwrap();
    reschedule(&mut edited, whole_day(day), Some(whole_day(day + 1))).unwrap();
    let components = reviser().revise(&series, &edited, occurrence, ChangeScope::One).unwrap();
    calendar.apply_revision(uid, components).unwrap();
}

fn week_of(calendar: &Calendar) -> Vec<Temporal> {
    let from = Temporal::Utc(date(2016, 2, 21).at(8, 0, 0, 0));
    let to = Temporal::Utc(date(2016, 2, 28).at(8, 0, 0, 0));
    calendar
        .expand(&from, &to)
        .into_iter()
        .map(|instance| instance.start)
        .collect()
}

#[test]
fn test_whole_day_overrides_keep_the_series_form() {
    let mut calendar = parse_calendar(WEEKLY).unwrap();
    assert_eq!(week_of(&calendar).len(), 3);

    to_whole_day(&mut calendar, &los_angeles(23, 8), 22);
    to_whole_day(&mut calendar, &los_angeles(26, 8), 26);

    let found = week_of(&calendar);
    assert_eq!(found.len(), 3);
    for expected in [los_angeles(21, 8), whole_day(22), whole_day(26)] {
        assert!(found.contains(&expected), "{expected} missing from {found:?}");
    }

    let series = calendar.series("weekly@example.com").unwrap();
    assert_eq!(series.overrides().len(), 2);
    let child = series.override_for(&los_angeles(23, 8)).unwrap();
    assert_eq!(child.recurrence_id().map(Temporal::tag), Some(TemporalTag::Zoned));
    assert_eq!(child.dtstart(), Some(&whole_day(22)));
    assert_eq!(child.dtend(), Some(&whole_day(23)));
    assert!(child.rrule().is_none());
    assert_eq!(child.sequence(), 1);
    assert!(calendar.validate().is_empty(), "{:?}", calendar.validate());

    let reparsed = parse_calendar(&format_calendar(&calendar).unwrap()).unwrap();
    assert!(reparsed.validate().is_empty(), "{:?}", reparsed.validate());
    let child = reparsed
        .series("weekly@example.com")
        .and_then(|s| s.override_for(&los_angeles(26, 8)))
        .unwrap();
    assert_eq!(child.recurrence_id(), Some(&los_angeles(26, 8)));
    assert_eq!(child.dtstart(), Some(&whole_day(26)));
}
