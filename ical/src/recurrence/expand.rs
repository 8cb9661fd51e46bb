// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Expansion of a recurrence rule into its start instants.
//!
//! The rule is walked period by period (a year, a month, a week, a day or a
//! sub-daily step). Each period expands to candidate days, which the BYxxx
//! filters narrow, and to candidate times of day. BYSETPOS then picks from the
//! sorted candidates of the period. Everything happens on the wall clock of
//! DTSTART, so zoned series keep their local time across DST changes.

use std::collections::VecDeque;
use std::rc::Rc;

use jiff::civil::{Date, DateTime, Time, Weekday};
use jiff::{SignedDuration, Span, Timestamp};

use crate::value::{ByRule, RecurrenceFrequency, RecurrenceRule, RuleEnd, Temporal};

/// BY rules of a recurrence rule, with the defaults taken from DTSTART.
#[derive(Debug)]
struct Expansion {
    freq: RecurrenceFrequency,
    interval: i64,
    wkst: Weekday,
    months: Vec<i8>,
    week_numbers: Vec<i8>,
    year_days: Vec<i16>,
    month_days: Vec<i8>,
    weekdays: Vec<Weekday>,
    nth_weekdays: Vec<(Weekday, i8)>,
    hours: Vec<i8>,
    minutes: Vec<i8>,
    seconds: Vec<i8>,
    set_positions: Vec<i16>,
    date_only: bool,
}

fn small(values: &[u8]) -> Vec<i8> {
    let mut values: Vec<i8> = values.iter().filter_map(|&v| i8::try_from(v).ok()).collect();
    values.sort_unstable();
    values.dedup();
    values
}

impl Expansion {
    fn new(rule: &RecurrenceRule, start: DateTime, date_only: bool) -> Self {
        let freq = rule.freq;
        let mut expansion = Self {
            freq,
            interval: i64::from(rule.interval.max(1)),
            wkst: rule.week_start(),
            months: Vec::new(),
            week_numbers: Vec::new(),
            year_days: Vec::new(),
            month_days: Vec::new(),
            weekdays: Vec::new(),
            nth_weekdays: Vec::new(),
            hours: Vec::new(),
            minutes: Vec::new(),
            seconds: Vec::new(),
            set_positions: Vec::new(),
            date_only,
        };

        let has_week_numbers = rule
            .by_rules()
            .iter()
            .any(|r| matches!(r, ByRule::ByWeekNo(_)));
        // ordinals only mean something within a month or a year
        let ordinals_apply = freq == RecurrenceFrequency::Monthly
            || (freq == RecurrenceFrequency::Yearly && !has_week_numbers);

        for by in rule.by_rules() {
            match by {
                ByRule::ByMonth(v) => expansion.months = small(v),
                ByRule::ByWeekNo(v) => expansion.week_numbers.clone_from(v),
                ByRule::ByYearDay(v) => expansion.year_days.clone_from(v),
                ByRule::ByMonthDay(v) => expansion.month_days.clone_from(v),
                ByRule::ByDay(v) => {
                    for day in v {
                        match day.occurrence {
                            Some(n) if ordinals_apply => expansion.nth_weekdays.push((day.day, n)),
                            _ => expansion.weekdays.push(day.day),
                        }
                    }
                }
                ByRule::ByHour(v) => expansion.hours = small(v),
                ByRule::ByMinute(v) => expansion.minutes = small(v),
                ByRule::BySecond(v) => expansion.seconds = small(v),
                ByRule::BySetPos(v) => expansion.set_positions.clone_from(v),
            }
        }

        let no_day_rules = expansion.week_numbers.is_empty()
            && expansion.year_days.is_empty()
            && expansion.month_days.is_empty()
            && expansion.weekdays.is_empty()
            && expansion.nth_weekdays.is_empty();
        if no_day_rules {
            match freq {
                RecurrenceFrequency::Yearly => {
                    if expansion.months.is_empty() {
                        expansion.months = vec![start.month()];
                    }
                    expansion.month_days = vec![start.day()];
                }
                RecurrenceFrequency::Monthly => expansion.month_days = vec![start.day()],
                RecurrenceFrequency::Weekly => expansion.weekdays = vec![start.weekday()],
                _ => {}
            }
        }

        if expansion.hours.is_empty() && freq > RecurrenceFrequency::Hourly {
            expansion.hours = vec![start.hour()];
        }
        if expansion.minutes.is_empty() && freq > RecurrenceFrequency::Minutely {
            expansion.minutes = vec![start.minute()];
        }
        if expansion.seconds.is_empty() && freq > RecurrenceFrequency::Secondly {
            expansion.seconds = vec![start.second()];
        }
        expansion
    }

    fn first_cursor(&self, start: DateTime) -> Cursor {
        match self.freq {
            RecurrenceFrequency::Yearly => Cursor::Year(start.year()),
            RecurrenceFrequency::Monthly => Cursor::Month(start.year(), start.month()),
            RecurrenceFrequency::Weekly => Cursor::Week(start.date()),
            RecurrenceFrequency::Daily => Cursor::Day(start.date()),
            _ => Cursor::Time(start),
        }
    }

    /// Sorted candidates of one period, BYSETPOS applied.
    fn candidates(&self, cursor: &Cursor) -> Vec<DateTime> {
        let times = self.times(cursor);
        if times.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<DateTime> = self
            .days(cursor)
            .into_iter()
            .filter(|&day| self.day_matches(day))
            .flat_map(|day| times.iter().map(move |&time| day.to_datetime(time)))
            .collect();

        if !self.set_positions.is_empty() {
            let len = i64::try_from(candidates.len()).unwrap_or(i64::MAX);
            let mut picked: Vec<DateTime> = self
                .set_positions
                .iter()
                .filter_map(|&pos| {
                    let pos = i64::from(pos);
                    let index = if pos > 0 { pos - 1 } else { len + pos };
                    usize::try_from(index)
                        .ok()
                        .and_then(|i| candidates.get(i).copied())
                })
                .collect();
            picked.sort_unstable();
            picked.dedup();
            candidates = picked;
        }
        candidates
    }

    fn days(&self, cursor: &Cursor) -> Vec<Date> {
        match *cursor {
            Cursor::Year(year) => (1..=12)
                .filter(|m| self.months.is_empty() || self.months.contains(m))
                .flat_map(|month| month_days(year, month))
                .collect(),
            Cursor::Month(year, month) => {
                if self.months.is_empty() || self.months.contains(&month) {
                    month_days(year, month)
                } else {
                    Vec::new()
                }
            }
            Cursor::Week(first) => {
                let mut days = vec![first];
                let mut day = first;
                while let Ok(next) = day.tomorrow() {
                    if next.weekday() == self.wkst {
                        break;
                    }
                    days.push(next);
                    day = next;
                }
                days
            }
            Cursor::Day(day) => vec![day],
            Cursor::Time(datetime) => vec![datetime.date()],
        }
    }

    fn times(&self, cursor: &Cursor) -> Vec<Time> {
        if self.date_only {
            return vec![Time::midnight()];
        }

        let (hours, minutes, seconds) = match *cursor {
            Cursor::Time(now) => {
                let pick = |set: &[i8], current: i8| {
                    if set.is_empty() || set.contains(&current) {
                        vec![current]
                    } else {
                        Vec::new()
                    }
                };
                match self.freq {
                    RecurrenceFrequency::Hourly => (
                        pick(&self.hours, now.hour()),
                        self.minutes.clone(),
                        self.seconds.clone(),
                    ),
                    RecurrenceFrequency::Minutely => (
                        pick(&self.hours, now.hour()),
                        pick(&self.minutes, now.minute()),
                        self.seconds.clone(),
                    ),
                    _ => (
                        pick(&self.hours, now.hour()),
                        pick(&self.minutes, now.minute()),
                        pick(&self.seconds, now.second()),
                    ),
                }
            }
            _ => (
                self.hours.clone(),
                self.minutes.clone(),
                self.seconds.clone(),
            ),
        };

        let mut times = Vec::with_capacity(hours.len() * minutes.len() * seconds.len());
        for &h in &hours {
            for &m in &minutes {
                // second 60 has no wall clock time and is dropped
                times.extend(seconds.iter().filter_map(|&s| Time::new(h, m, s, 0).ok()));
            }
        }
        times
    }

    fn day_matches(&self, day: Date) -> bool {
        if !self.months.is_empty() && !self.months.contains(&day.month()) {
            return false;
        }

        if !self.week_numbers.is_empty() {
            let Some((week, weeks)) = week_number(day, self.wkst) else {
                return false;
            };
            let matches = self.week_numbers.iter().any(|&n| {
                let n = i32::from(n);
                n == week || n == week - weeks - 1
            });
            if !matches {
                return false;
            }
        }

        if !self.year_days.is_empty() {
            let doy = day.day_of_year();
            let len = day.days_in_year();
            if !self.year_days.iter().any(|&n| n == doy || n == doy - len - 1) {
                return false;
            }
        }

        if !self.month_days.is_empty() {
            let dom = day.day();
            let len = day.days_in_month();
            if !self.month_days.iter().any(|&n| n == dom || n == dom - len - 1) {
                return false;
            }
        }

        if !self.weekdays.is_empty() || !self.nth_weekdays.is_empty() {
            let weekday = day.weekday();
            let plain = self.weekdays.contains(&weekday);
            let nth = self
                .nth_weekdays
                .iter()
                .any(|&(d, n)| d == weekday && self.is_nth_weekday(day, n));
            if !plain && !nth {
                return false;
            }
        }
        true
    }

    /// Whether `day` is the `n`-th of its weekday in the month, or in the
    /// year for yearly rules without BYMONTH.
    fn is_nth_weekday(&self, day: Date, n: i8) -> bool {
        let (before, after) =
            if self.freq == RecurrenceFrequency::Monthly || !self.months.is_empty() {
                (
                    i16::from(day.day()) - 1,
                    i16::from(day.days_in_month() - day.day()),
                )
            } else {
                (
                    day.day_of_year() - 1,
                    day.days_in_year() - day.day_of_year(),
                )
            };
        let n = i16::from(n);
        if n > 0 {
            before / 7 + 1 == n
        } else {
            -(after / 7 + 1) == n
        }
    }

    fn advance(&self, cursor: &Cursor) -> Option<Cursor> {
        match *cursor {
            Cursor::Year(year) => {
                let next = i64::from(year) + self.interval;
                i16::try_from(next)
                    .ok()
                    .filter(|&y| y <= MAX_YEAR)
                    .map(Cursor::Year)
            }
            Cursor::Month(year, month) => {
                let index = i64::from(year) * 12 + i64::from(month - 1) + self.interval;
                let year = i16::try_from(index.div_euclid(12))
                    .ok()
                    .filter(|&y| y <= MAX_YEAR)?;
                let month = i8::try_from(index.rem_euclid(12) + 1).ok()?;
                Some(Cursor::Month(year, month))
            }
            Cursor::Week(first) => {
                let into_week = i64::from(first.weekday().since(self.wkst));
                add_days(first, self.interval * 7 - into_week).map(Cursor::Week)
            }
            Cursor::Day(day) => add_days(day, self.interval).map(Cursor::Day),
            Cursor::Time(now) => {
                let unit = match self.freq {
                    RecurrenceFrequency::Hourly => 3600,
                    RecurrenceFrequency::Minutely => 60,
                    _ => 1,
                } * self.interval;

                let steps = if self.day_matches(now.date()) {
                    1
                } else {
                    // jump to the first step on a later day
                    let elapsed = i64::from(now.hour()) * 3600
                        + i64::from(now.minute()) * 60
                        + i64::from(now.second());
                    let left = 86_400 - elapsed;
                    (left + unit - 1) / unit
                };
                now.checked_add(SignedDuration::from_secs(steps * unit))
                    .ok()
                    .map(Cursor::Time)
            }
        }
    }
}

const MAX_YEAR: i16 = 9999;

/// The period an expansion is currently in.
#[derive(Debug, Clone, Copy)]
enum Cursor {
    Year(i16),
    Month(i16, i8),
    /// First day of the week period, DTSTART for the first one.
    Week(Date),
    Day(Date),
    Time(DateTime),
}

fn month_days(year: i16, month: i8) -> Vec<Date> {
    let Ok(first) = Date::new(year, month, 1) else {
        return Vec::new();
    };
    (1..=first.days_in_month())
        .filter_map(|day| Date::new(year, month, day).ok())
        .collect()
}

fn add_days(day: Date, days: i64) -> Option<Date> {
    day.checked_add(Span::new().try_days(days).ok()?).ok()
}

/// Week number of `day` with weeks starting on `wkst`, and the number of
/// weeks in its week-numbering year.
///
/// Week 1 is the first week holding at least four days of the year.
fn week_number(day: Date, wkst: Weekday) -> Option<(i32, i32)> {
    let year = day.year();
    let this = first_week_start(year, wkst)?;
    let (start, next) = if day < this {
        (first_week_start(year.checked_sub(1)?, wkst)?, this)
    } else {
        let next = first_week_start(year.checked_add(1)?, wkst)?;
        if day >= next {
            (next, first_week_start(year.checked_add(2)?, wkst)?)
        } else {
            (this, next)
        }
    };
    let week = days_between(start, day)? / 7 + 1;
    let weeks = days_between(start, next)? / 7;
    Some((week, weeks))
}

fn first_week_start(year: i16, wkst: Weekday) -> Option<Date> {
    let jan1 = Date::new(year, 1, 1).ok()?;
    let offset = i64::from(jan1.weekday().since(wkst));
    let shift = if 7 - offset >= 4 { -offset } else { 7 - offset };
    add_days(jan1, shift)
}

fn days_between(from: Date, to: Date) -> Option<i32> {
    Some(from.until(to).ok()?.get_days())
}

/// Where a rule stops.
#[derive(Debug, Clone, Copy)]
enum Limit {
    Date(Date),
    Instant(Timestamp),
}

/// Iterator over the instants produced by a recurrence rule, DTSTART first.
///
/// Instants come in increasing order and in the form of DTSTART. COUNT
/// includes DTSTART and UNTIL is inclusive.
#[derive(Debug, Clone)]
pub struct RuleIter {
    expansion: Rc<Expansion>,
    start: Temporal,
    last: DateTime,
    last_instant: Option<Timestamp>,
    limit: Option<Limit>,
    remaining: Option<u32>,
    cursor: Option<Cursor>,
    pending: VecDeque<DateTime>,
    started: bool,
    peeked: Option<Temporal>,
}

impl RuleIter {
    /// Start expanding `rule` from `start`.
    #[must_use]
    pub fn new(start: &Temporal, rule: &RecurrenceRule) -> Self {
        let civil = start.civil();
        let expansion = Expansion::new(rule, civil, start.is_date());
        let limit = match &rule.end {
            RuleEnd::Until(until) if until.is_date() || start.is_date() => {
                Some(Limit::Date(until.date()))
            }
            RuleEnd::Until(until) => Some(Limit::Instant(until.retag_like(start).instant())),
            _ => None,
        };
        Self {
            cursor: Some(expansion.first_cursor(civil)),
            expansion: Rc::new(expansion),
            start: start.clone(),
            last: civil,
            last_instant: None,
            limit,
            remaining: rule.count(),
            pending: VecDeque::new(),
            started: false,
            peeked: None,
        }
    }

    /// Look at the next instant without consuming it.
    pub fn peek(&mut self) -> Option<&Temporal> {
        if self.peeked.is_none() {
            self.peeked = self.advance();
        }
        self.peeked.as_ref()
    }

    /// Drop every instant before `start`.
    pub fn skip_before(&mut self, start: Timestamp) {
        while self.peek().is_some_and(|t| t.instant() < start) {
            self.peeked = None;
        }
    }

    fn is_past_limit(&self, candidate: DateTime) -> bool {
        match self.limit {
            Some(Limit::Date(until)) => candidate.date() > until,
            Some(Limit::Instant(until)) => self.start.with_civil(candidate).instant() > until,
            None => false,
        }
    }

    fn emit(&mut self, civil: DateTime) -> Temporal {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        let temporal = self.start.with_civil(civil);
        self.last = civil;
        self.last_instant = Some(temporal.instant());
        temporal
    }

    fn advance(&mut self) -> Option<Temporal> {
        if self.remaining == Some(0) {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.emit(self.last));
        }

        loop {
            if let Some(candidate) = self.pending.pop_front() {
                if candidate <= self.last {
                    continue;
                }
                if self.is_past_limit(candidate) {
                    self.cursor = None;
                    self.pending.clear();
                    return None;
                }
                // a time in a DST gap resolves to the instant after it, which
                // the next candidate may already hold; it does not count
                if self.last_instant == Some(self.start.with_civil(candidate).instant()) {
                    self.last = candidate;
                    continue;
                }
                return Some(self.emit(candidate));
            }

            let cursor = self.cursor.take()?;
            self.pending = self.expansion.candidates(&cursor).into();
            self.cursor = self.expansion.advance(&cursor);
        }
    }
}

impl Iterator for RuleIter {
    type Item = Temporal;

    fn next(&mut self) -> Option<Temporal> {
        match self.peeked.take() {
            Some(peeked) => Some(peeked),
            None => self.advance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::value::parse_with;
    use crate::value::value_rrule;

    fn rule(text: &str) -> RecurrenceRule {
        parse_with(value_rrule(), text).unwrap()
    }

    fn floating(y: i16, m: i8, d: i8, h: i8, min: i8) -> Temporal {
        Temporal::Floating(date(y, m, d).at(h, min, 0, 0))
    }

    fn expand(start: &Temporal, text: &str, limit: usize) -> Vec<String> {
        RuleIter::new(start, &rule(text))
            .take(limit)
            .map(|t| t.to_string())
            .collect()
    }

    #[rustfmt::skip]
    #[test]
    fn expands_rules() {
        let cases: &[(&str, Temporal, &[&str])] = &[
            ("FREQ=DAILY;COUNT=3", floating(1997, 9, 2, 9, 0),
                &["19970902T090000", "19970903T090000", "19970904T090000"]),
            ("FREQ=DAILY;INTERVAL=10;COUNT=3", floating(1997, 9, 2, 9, 0),
                &["19970902T090000", "19970912T090000", "19970922T090000"]),
            ("FREQ=WEEKLY;COUNT=3;BYDAY=TU,TH", floating(1997, 9, 2, 9, 0),
                &["19970902T090000", "19970904T090000", "19970909T090000"]),
            ("FREQ=WEEKLY;INTERVAL=2;WKST=SU;BYDAY=TU,TH;COUNT=4", floating(1997, 9, 2, 9, 0),
                &["19970902T090000", "19970904T090000", "19970916T090000", "19970918T090000"]),
            ("FREQ=MONTHLY;BYDAY=1FR;COUNT=3", floating(1997, 9, 5, 9, 0),
                &["19970905T090000", "19971003T090000", "19971107T090000"]),
            ("FREQ=MONTHLY;BYDAY=-2MO;COUNT=3", floating(1997, 9, 22, 9, 0),
                &["19970922T090000", "19971020T090000", "19971117T090000"]),
            ("FREQ=MONTHLY;BYMONTHDAY=-3;COUNT=3", floating(1997, 9, 28, 9, 0),
                &["19970928T090000", "19971029T090000", "19971128T090000"]),
            ("FREQ=MONTHLY;COUNT=4", floating(2025, 1, 31, 9, 0),
                &["20250131T090000", "20250331T090000", "20250531T090000", "20250731T090000"]),
            ("FREQ=YEARLY;BYMONTH=6,7;COUNT=4", floating(1997, 6, 10, 9, 0),
                &["19970610T090000", "19970710T090000", "19980610T090000", "19980710T090000"]),
            ("FREQ=YEARLY;BYDAY=20MO;COUNT=2", floating(1997, 5, 19, 9, 0),
                &["19970519T090000", "19980518T090000"]),
            ("FREQ=YEARLY;BYWEEKNO=20;BYDAY=MO;COUNT=3", floating(1997, 5, 12, 9, 0),
                &["19970512T090000", "19980511T090000", "19990517T090000"]),
            ("FREQ=YEARLY;BYYEARDAY=1,100;COUNT=3", floating(1997, 1, 1, 9, 0),
                &["19970101T090000", "19970410T090000", "19980101T090000"]),
            ("FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1;COUNT=3", floating(1997, 9, 30, 9, 0),
                &["19970930T090000", "19971031T090000", "19971128T090000"]),
            ("FREQ=HOURLY;INTERVAL=3;UNTIL=19970902T170000", floating(1997, 9, 2, 9, 0),
                &["19970902T090000", "19970902T120000", "19970902T150000"]),
            ("FREQ=MINUTELY;INTERVAL=15;COUNT=4", floating(1997, 9, 2, 9, 0),
                &["19970902T090000", "19970902T091500", "19970902T093000", "19970902T094500"]),
            ("FREQ=DAILY;BYHOUR=9,10;BYMINUTE=0,30;COUNT=5", floating(1997, 9, 2, 9, 0),
                &["19970902T090000", "19970902T093000", "19970902T100000", "19970902T103000", "19970903T090000"]),
            ("FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=29;COUNT=3", floating(2024, 2, 29, 9, 0),
                &["20240229T090000", "20280229T090000", "20320229T090000"]),
        ];
        for (text, start, expected) in cases {
            assert_eq!(&expand(start, text, 10), expected, "Expand {text}");
        }
    }

    #[test]
    fn emits_dtstart_even_when_rule_does_not_match() {
        let start = floating(2025, 1, 1, 9, 0);
        let got = expand(&start, "FREQ=WEEKLY;BYDAY=FR;COUNT=3", 10);
        assert_eq!(got, ["20250101T090000", "20250103T090000", "20250110T090000"]);
    }

    #[test]
    fn until_is_inclusive() {
        let start = Temporal::Utc(date(2025, 1, 1).at(9, 0, 0, 0));
        let got = expand(&start, "FREQ=DAILY;UNTIL=20250103T090000Z", 10);
        assert_eq!(got, ["20250101T090000Z", "20250102T090000Z", "20250103T090000Z"]);

        let dates = Temporal::Date(date(2025, 1, 1));
        let got = expand(&dates, "FREQ=WEEKLY;UNTIL=20250115", 10);
        assert_eq!(got, ["20250101", "20250108", "20250115"]);
    }

    #[test]
    fn zoned_series_keep_wall_clock_across_dst() {
        let start = Temporal::Zoned {
            datetime: date(2025, 3, 8).at(9, 0, 0, 0),
            tzid: "America/New_York".to_owned(),
        };
        let got: Vec<_> = RuleIter::new(&start, &rule("FREQ=DAILY;COUNT=2")).collect();
        let second = got.get(1).unwrap();
        assert_eq!(second.civil(), date(2025, 3, 9).at(9, 0, 0, 0));
        assert_eq!(
            got.first().unwrap().duration_until(second),
            SignedDuration::from_hours(23)
        );
    }

    #[test]
    fn hours_in_a_dst_gap_do_not_use_up_the_count() {
        let start = Temporal::Zoned {
            datetime: date(2025, 3, 9).at(0, 0, 0, 0),
            tzid: "America/New_York".to_owned(),
        };
        let got: Vec<_> = RuleIter::new(&start, &rule("FREQ=HOURLY;COUNT=5")).collect();
        let instants: Vec<_> = got.iter().map(Temporal::instant).collect();
        let expected: Vec<Timestamp> = [
            "2025-03-09T05:00:00Z",
            "2025-03-09T06:00:00Z",
            "2025-03-09T07:00:00Z",
            "2025-03-09T08:00:00Z",
            "2025-03-09T09:00:00Z",
        ]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
        assert_eq!(instants, expected);
    }

    #[test]
    fn unbounded_rules_are_lazy() {
        let start = floating(2025, 1, 1, 0, 0);
        let mut iter = RuleIter::new(&start, &rule("FREQ=SECONDLY"));
        let mut iter_from = iter.clone();
        assert_eq!(iter.nth(86_400).unwrap(), floating(2025, 1, 2, 0, 0));

        iter_from.skip_before(floating(2025, 1, 1, 0, 1).instant());
        assert_eq!(iter_from.next().unwrap(), floating(2025, 1, 1, 0, 1));
    }

    #[test]
    fn impossible_rules_end() {
        let start = floating(2025, 1, 1, 9, 0);
        let got = expand(&start, "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=30", 10);
        assert_eq!(got, ["20250101T090000"]);
    }

    #[test]
    fn numbers_weeks() {
        assert_eq!(week_number(date(2025, 1, 1), Weekday::Monday), Some((1, 52)));
        assert_eq!(week_number(date(2024, 12, 30), Weekday::Monday), Some((1, 52)));
        assert_eq!(week_number(date(2021, 1, 3), Weekday::Monday), Some((53, 53)));
        assert_eq!(week_number(date(2020, 12, 31), Weekday::Monday), Some((53, 53)));
    }
}
