// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule value type as defined in RFC 5545 Section 3.3.10.

use std::fmt::{self, Display};
use std::str::FromStr;

use chumsky::prelude::*;
use jiff::civil::Weekday;

use crate::keyword::{
    KW_DAY_FR, KW_DAY_MO, KW_DAY_SA, KW_DAY_SU, KW_DAY_TH, KW_DAY_TU, KW_DAY_WE, KW_RRULE_BYDAY,
    KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND,
    KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_FREQ,
    KW_RRULE_FREQ_DAILY, KW_RRULE_FREQ_HOURLY, KW_RRULE_FREQ_MINUTELY, KW_RRULE_FREQ_MONTHLY,
    KW_RRULE_FREQ_SECONDLY, KW_RRULE_FREQ_WEEKLY, KW_RRULE_FREQ_YEARLY, KW_RRULE_INTERVAL,
    KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::recurrence::RecurrenceError;
use crate::value::{
    Extra, Temporal, parse_with, sign, unsigned, value_date, value_date_time,
};

/// Recurrence rule
///
/// At most one rule per BYxxx kind is kept, sorted by the order in which the
/// recurrence engine applies them. The order of the parts in the source text
/// is remembered so that a parsed rule is written back the way it was read;
/// it takes no part in equality.
#[derive(Debug, Clone)]
pub struct RecurrenceRule {
    /// Frequency of recurrence
    pub freq: RecurrenceFrequency,

    /// Number of periods between recurrences, at least 1
    pub interval: u32,

    /// How the recurrence ends
    pub end: RuleEnd,

    /// Start day of week, `None` when the part is absent (Monday applies)
    pub wkst: Option<Weekday>,

    by_rules: Vec<ByRule>,
    part_order: Vec<RulePart>,
}

/// Recurrence frequency
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString, strum::IntoStaticStr,
)]
#[expect(missing_docs)]
pub enum RecurrenceFrequency {
    #[strum(serialize = "SECONDLY")]
    Secondly,
    #[strum(serialize = "MINUTELY")]
    Minutely,
    #[strum(serialize = "HOURLY")]
    Hourly,
    #[strum(serialize = "DAILY")]
    Daily,
    #[strum(serialize = "WEEKLY")]
    Weekly,
    #[strum(serialize = "MONTHLY")]
    Monthly,
    #[strum(serialize = "YEARLY")]
    Yearly,
}

impl RecurrenceFrequency {
    /// Whether one period of this frequency is shorter than a day.
    #[must_use]
    pub const fn is_sub_daily(self) -> bool {
        matches!(self, Self::Secondly | Self::Minutely | Self::Hourly)
    }
}

impl Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &'static str = self.into();
        f.write_str(name)
    }
}

/// The end condition of a recurrence rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RuleEnd {
    /// No COUNT and no UNTIL.
    #[default]
    Forever,

    /// `COUNT=n`, the number of occurrences including DTSTART.
    Count(u32),

    /// `UNTIL=...`, the last allowed occurrence, inclusive.
    Until(Temporal),
}

/// Day of week with optional occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekDayNum {
    /// Day of the week
    pub day: Weekday,
    /// Occurrence within the month or year, negative counting from the end
    pub occurrence: Option<i8>,
}

impl WeekDayNum {
    /// Every `day` of the period.
    #[must_use]
    pub const fn every(day: Weekday) -> Self {
        Self {
            day,
            occurrence: None,
        }
    }

    /// The `n`-th `day` of the period.
    #[must_use]
    pub const fn nth(n: i8, day: Weekday) -> Self {
        Self {
            day,
            occurrence: Some(n),
        }
    }
}

impl Display for WeekDayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.occurrence {
            write!(f, "{n}")?;
        }
        f.write_str(weekday_keyword(self.day))
    }
}

/// The two-letter keyword of a weekday.
#[must_use]
pub const fn weekday_keyword(day: Weekday) -> &'static str {
    match day {
        Weekday::Sunday => KW_DAY_SU,
        Weekday::Monday => KW_DAY_MO,
        Weekday::Tuesday => KW_DAY_TU,
        Weekday::Wednesday => KW_DAY_WE,
        Weekday::Thursday => KW_DAY_TH,
        Weekday::Friday => KW_DAY_FR,
        Weekday::Saturday => KW_DAY_SA,
    }
}

/// The BYxxx rule kinds, declared in the order the engine applies them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString, strum::IntoStaticStr,
)]
#[expect(missing_docs)]
pub enum ByRuleKind {
    #[strum(serialize = "BYMONTH")]
    ByMonth,
    #[strum(serialize = "BYWEEKNO")]
    ByWeekNo,
    #[strum(serialize = "BYYEARDAY")]
    ByYearDay,
    #[strum(serialize = "BYMONTHDAY")]
    ByMonthDay,
    #[strum(serialize = "BYDAY")]
    ByDay,
    #[strum(serialize = "BYHOUR")]
    ByHour,
    #[strum(serialize = "BYMINUTE")]
    ByMinute,
    #[strum(serialize = "BYSECOND")]
    BySecond,
    #[strum(serialize = "BYSETPOS")]
    BySetPos,
}

impl Display for ByRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &'static str = self.into();
        f.write_str(name)
    }
}

/// One BYxxx rule part with its list of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ByRule {
    /// Months, 1 to 12
    ByMonth(Vec<u8>),
    /// ISO week numbers, 1 to 53 or -53 to -1
    ByWeekNo(Vec<i8>),
    /// Days of the year, 1 to 366 or -366 to -1
    ByYearDay(Vec<i16>),
    /// Days of the month, 1 to 31 or -31 to -1
    ByMonthDay(Vec<i8>),
    /// Weekdays with optional ordinals
    ByDay(Vec<WeekDayNum>),
    /// Hours, 0 to 23
    ByHour(Vec<u8>),
    /// Minutes, 0 to 59
    ByMinute(Vec<u8>),
    /// Seconds, 0 to 60
    BySecond(Vec<u8>),
    /// Positions within the period's occurrence set
    BySetPos(Vec<i16>),
}

impl ByRule {
    /// The kind of this rule.
    #[must_use]
    pub const fn kind(&self) -> ByRuleKind {
        match self {
            Self::ByMonth(_) => ByRuleKind::ByMonth,
            Self::ByWeekNo(_) => ByRuleKind::ByWeekNo,
            Self::ByYearDay(_) => ByRuleKind::ByYearDay,
            Self::ByMonthDay(_) => ByRuleKind::ByMonthDay,
            Self::ByDay(_) => ByRuleKind::ByDay,
            Self::ByHour(_) => ByRuleKind::ByHour,
            Self::ByMinute(_) => ByRuleKind::ByMinute,
            Self::BySecond(_) => ByRuleKind::BySecond,
            Self::BySetPos(_) => ByRuleKind::BySetPos,
        }
    }
}

impl Display for ByRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{v}")?;
            }
            Ok(())
        }

        write!(f, "{}=", self.kind())?;
        match self {
            Self::ByMonth(v) | Self::ByHour(v) | Self::ByMinute(v) | Self::BySecond(v) => join(f, v),
            Self::ByWeekNo(v) | Self::ByMonthDay(v) => join(f, v),
            Self::ByYearDay(v) | Self::BySetPos(v) => join(f, v),
            Self::ByDay(v) => join(f, v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RulePart {
    Freq,
    Until,
    Count,
    Interval,
    By(ByRuleKind),
    Wkst,
}

impl RecurrenceRule {
    /// An unbounded rule with interval 1 and no BYxxx parts.
    #[must_use]
    pub const fn new(freq: RecurrenceFrequency) -> Self {
        Self {
            freq,
            interval: 1,
            end: RuleEnd::Forever,
            wkst: None,
            by_rules: Vec::new(),
            part_order: Vec::new(),
        }
    }

    /// Set the interval.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::ZeroInterval`] for an interval of 0.
    pub fn with_interval(mut self, interval: u32) -> Result<Self, RecurrenceError> {
        if interval == 0 {
            return Err(RecurrenceError::ZeroInterval);
        }
        self.interval = interval;
        Ok(self)
    }

    /// Limit the rule to `count` occurrences.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::CountUntilExclusion`] when UNTIL is set.
    pub fn with_count(mut self, count: u32) -> Result<Self, RecurrenceError> {
        if matches!(self.end, RuleEnd::Until(_)) {
            return Err(RecurrenceError::CountUntilExclusion);
        }
        self.end = RuleEnd::Count(count);
        Ok(self)
    }

    /// Limit the rule to occurrences up to and including `until`.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::CountUntilExclusion`] when COUNT is set.
    pub fn with_until(mut self, until: Temporal) -> Result<Self, RecurrenceError> {
        if matches!(self.end, RuleEnd::Count(_)) {
            return Err(RecurrenceError::CountUntilExclusion);
        }
        self.end = RuleEnd::Until(until);
        Ok(self)
    }

    /// Add a BYxxx rule, replacing any rule of the same kind.
    #[must_use]
    pub fn with_by_rule(mut self, rule: ByRule) -> Self {
        self.set_by_rule(rule);
        self
    }

    /// Set the start day of the week.
    #[must_use]
    pub fn with_wkst(mut self, wkst: Weekday) -> Self {
        self.wkst = Some(wkst);
        self
    }

    /// The BYxxx rules in application order.
    #[must_use]
    pub fn by_rules(&self) -> &[ByRule] {
        &self.by_rules
    }

    /// The BYxxx rule of `kind`, if present.
    #[must_use]
    pub fn by_rule(&self, kind: ByRuleKind) -> Option<&ByRule> {
        self.by_rules.iter().find(|r| r.kind() == kind)
    }

    /// Insert a BYxxx rule, replacing any rule of the same kind.
    pub fn set_by_rule(&mut self, rule: ByRule) {
        match self
            .by_rules
            .binary_search_by_key(&rule.kind(), ByRule::kind)
        {
            Ok(i) => {
                if let Some(slot) = self.by_rules.get_mut(i) {
                    *slot = rule;
                }
            }
            Err(i) => self.by_rules.insert(i, rule),
        }
    }

    /// Remove the BYxxx rule of `kind`.
    pub fn remove_by_rule(&mut self, kind: ByRuleKind) -> Option<ByRule> {
        let i = self.by_rules.iter().position(|r| r.kind() == kind)?;
        Some(self.by_rules.remove(i))
    }

    /// The start day of the week, Monday when WKST is absent.
    #[must_use]
    pub fn week_start(&self) -> Weekday {
        self.wkst.unwrap_or(Weekday::Monday)
    }

    /// The COUNT part, if present.
    #[must_use]
    pub const fn count(&self) -> Option<u32> {
        match self.end {
            RuleEnd::Count(count) => Some(count),
            _ => None,
        }
    }

    /// The UNTIL part, if present.
    #[must_use]
    pub const fn until(&self) -> Option<&Temporal> {
        match &self.end {
            RuleEnd::Until(until) => Some(until),
            _ => None,
        }
    }

    fn present_parts(&self) -> Vec<RulePart> {
        let mut parts = vec![RulePart::Freq];
        match self.end {
            RuleEnd::Forever => {}
            RuleEnd::Count(_) => parts.push(RulePart::Count),
            RuleEnd::Until(_) => parts.push(RulePart::Until),
        }
        if self.interval != 1 || self.part_order.contains(&RulePart::Interval) {
            parts.push(RulePart::Interval);
        }
        parts.extend(self.by_rules.iter().map(|r| RulePart::By(r.kind())));
        if self.wkst.is_some() {
            parts.push(RulePart::Wkst);
        }

        // source order first, parts added later keep their canonical place
        parts.sort_by_key(|part| {
            self.part_order
                .iter()
                .position(|p| p == part)
                .unwrap_or(usize::MAX)
        });
        parts
    }
}

impl PartialEq for RecurrenceRule {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq
            && self.interval == other.interval
            && self.end == other.end
            && self.week_start() == other.week_start()
            && self.by_rules == other.by_rules
    }
}

impl Eq for RecurrenceRule {}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.present_parts().into_iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            match part {
                RulePart::Freq => write!(f, "{KW_RRULE_FREQ}={}", self.freq)?,
                RulePart::Until => {
                    if let RuleEnd::Until(until) = &self.end {
                        write!(f, "{KW_RRULE_UNTIL}={until}")?;
                    }
                }
                RulePart::Count => {
                    if let RuleEnd::Count(count) = self.end {
                        write!(f, "{KW_RRULE_COUNT}={count}")?;
                    }
                }
                RulePart::Interval => write!(f, "{KW_RRULE_INTERVAL}={}", self.interval)?,
                RulePart::By(kind) => {
                    if let Some(rule) = self.by_rule(kind) {
                        write!(f, "{rule}")?;
                    }
                }
                RulePart::Wkst => {
                    write!(f, "{KW_RRULE_WKST}={}", weekday_keyword(self.week_start()))?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for RecurrenceRule {
    type Err = String;

    /// Parse the text of an RRULE value, such as `FREQ=DAILY;COUNT=10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_with(value_rrule(), s)
    }
}

/// Format Definition:  This value type is defined by the following notation:
///
/// ```txt
/// recur           = recur-rule-part *( ";" recur-rule-part )
///                 ;
///                 ; The rule parts are not ordered in any
///                 ; particular sequence.
///                 ;
///                 ; The FREQ rule part is REQUIRED,
///                 ; but MUST NOT occur more than once.
///                 ;
///                 ; The UNTIL or COUNT rule parts are OPTIONAL,
///                 ; but they MUST NOT occur in the same 'recur'.
///                 ;
///                 ; The other rule parts are OPTIONAL,
///                 ; but MUST NOT occur more than once.
/// ```
pub fn value_rrule<'src>() -> impl Parser<'src, &'src str, RecurrenceRule, Extra<'src>> + Clone {
    recur_rule_part()
        .separated_by(just(';'))
        .at_least(1)
        .collect::<Vec<_>>()
        .try_map(build_from_parts)
}

fn build_from_parts<'src>(
    parts: Vec<Part>,
    span: SimpleSpan,
) -> Result<RecurrenceRule, Rich<'src, char>> {
    let mut freq = None;
    let mut rule = RecurrenceRule::new(RecurrenceFrequency::Yearly);

    for part in parts {
        let key = part.key();
        if rule.part_order.contains(&key) {
            return Err(Rich::custom(span, format!("duplicate rule part {}", part.name())));
        }
        if matches!(key, RulePart::Count | RulePart::Until)
            && (rule.part_order.contains(&RulePart::Count)
                || rule.part_order.contains(&RulePart::Until))
        {
            return Err(Rich::custom(span, "COUNT and UNTIL are mutually exclusive"));
        }
        rule.part_order.push(key);

        match part {
            Part::Freq(f) => freq = Some(f),
            Part::Until(until) => rule.end = RuleEnd::Until(until),
            Part::Count(count) => rule.end = RuleEnd::Count(count),
            Part::Interval(interval) => rule.interval = interval,
            Part::By(by) => rule.set_by_rule(by),
            Part::Wkst(day) => rule.wkst = Some(day),
        }
    }

    rule.freq = freq.ok_or_else(|| Rich::custom(span, "FREQ rule part is required"))?;
    Ok(rule)
}

#[derive(Debug, Clone)]
enum Part {
    Freq(RecurrenceFrequency),
    Until(Temporal),
    Count(u32),
    Interval(u32),
    By(ByRule),
    Wkst(Weekday),
}

impl Part {
    const fn key(&self) -> RulePart {
        match self {
            Self::Freq(_) => RulePart::Freq,
            Self::Until(_) => RulePart::Until,
            Self::Count(_) => RulePart::Count,
            Self::Interval(_) => RulePart::Interval,
            Self::By(by) => RulePart::By(by.kind()),
            Self::Wkst(_) => RulePart::Wkst,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Freq(_) => KW_RRULE_FREQ,
            Self::Until(_) => KW_RRULE_UNTIL,
            Self::Count(_) => KW_RRULE_COUNT,
            Self::Interval(_) => KW_RRULE_INTERVAL,
            Self::By(by) => by.kind().into(),
            Self::Wkst(_) => KW_RRULE_WKST,
        }
    }
}

/// ```txt
/// recur-rule-part = ( "FREQ" "=" freq )
///                 / ( "UNTIL" "=" enddate )
///                 / ( "COUNT" "=" 1*DIGIT )
///                 / ( "INTERVAL" "=" 1*DIGIT )
///                 / ( "BYSECOND" "=" byseclist )
///                 / ( "BYMINUTE" "=" byminlist )
///                 / ( "BYHOUR" "=" byhrlist )
///                 / ( "BYDAY" "=" bywdaylist )
///                 / ( "BYMONTHDAY" "=" bymodaylist )
///                 / ( "BYYEARDAY" "=" byyrdaylist )
///                 / ( "BYWEEKNO" "=" bywknolist )
///                 / ( "BYMONTH" "=" bymolist )
///                 / ( "BYSETPOS" "=" bysplist )
///                 / ( "WKST" "=" weekday )
/// ```
#[allow(clippy::cast_possible_truncation)]
fn recur_rule_part<'src>() -> impl Parser<'src, &'src str, Part, Extra<'src>> + Clone {
    let kw = |name: &'static str| just(name).then_ignore(just('='));

    // BYMONTHDAY and BYWEEKNO are checked against 31 and 53, so they fit in i8
    let narrow = |v: Vec<i16>| v.into_iter().map(|n| n as i8).collect::<Vec<_>>();

    choice((
        kw(KW_RRULE_FREQ).ignore_then(freq()).map(Part::Freq),
        kw(KW_RRULE_UNTIL).ignore_then(enddate()).map(Part::Until),
        kw(KW_RRULE_COUNT).ignore_then(positive()).map(Part::Count),
        kw(KW_RRULE_INTERVAL)
            .ignore_then(positive())
            .map(Part::Interval),
        kw(KW_RRULE_BYSECOND)
            .ignore_then(list(bounded(60)))
            .map(|v| Part::By(ByRule::BySecond(v))),
        kw(KW_RRULE_BYMINUTE)
            .ignore_then(list(bounded(59)))
            .map(|v| Part::By(ByRule::ByMinute(v))),
        kw(KW_RRULE_BYHOUR)
            .ignore_then(list(bounded(23)))
            .map(|v| Part::By(ByRule::ByHour(v))),
        kw(KW_RRULE_BYDAY)
            .ignore_then(list(weekdaynum()))
            .map(|v| Part::By(ByRule::ByDay(v))),
        kw(KW_RRULE_BYMONTHDAY)
            .ignore_then(list(ordinal(31)))
            .map(move |v| Part::By(ByRule::ByMonthDay(narrow(v)))),
        kw(KW_RRULE_BYYEARDAY)
            .ignore_then(list(ordinal(366)))
            .map(|v| Part::By(ByRule::ByYearDay(v))),
        kw(KW_RRULE_BYWEEKNO)
            .ignore_then(list(ordinal(53)))
            .map(move |v| Part::By(ByRule::ByWeekNo(narrow(v)))),
        kw(KW_RRULE_BYMONTH)
            .ignore_then(list(month()))
            .map(|v| Part::By(ByRule::ByMonth(v))),
        kw(KW_RRULE_BYSETPOS)
            .ignore_then(list(ordinal(366)))
            .map(|v| Part::By(ByRule::BySetPos(v))),
        kw(KW_RRULE_WKST).ignore_then(weekday()).map(Part::Wkst),
    ))
}

/// ```txt
/// freq        = "SECONDLY" / "MINUTELY" / "HOURLY" / "DAILY"
///             / "WEEKLY" / "MONTHLY" / "YEARLY"
/// ```
fn freq<'src>() -> impl Parser<'src, &'src str, RecurrenceFrequency, Extra<'src>> + Clone {
    choice((
        just(KW_RRULE_FREQ_SECONDLY).to(RecurrenceFrequency::Secondly),
        just(KW_RRULE_FREQ_MINUTELY).to(RecurrenceFrequency::Minutely),
        just(KW_RRULE_FREQ_HOURLY).to(RecurrenceFrequency::Hourly),
        just(KW_RRULE_FREQ_DAILY).to(RecurrenceFrequency::Daily),
        just(KW_RRULE_FREQ_WEEKLY).to(RecurrenceFrequency::Weekly),
        just(KW_RRULE_FREQ_MONTHLY).to(RecurrenceFrequency::Monthly),
        just(KW_RRULE_FREQ_YEARLY).to(RecurrenceFrequency::Yearly),
    ))
}

/// ```txt
/// enddate     = date / date-time
/// ```
///
/// A local date-time is floating here, the engine compares it with the wall
/// clock of DTSTART.
fn enddate<'src>() -> impl Parser<'src, &'src str, Temporal, Extra<'src>> + Clone {
    choice((
        value_date_time().map(|(datetime, utc)| {
            if utc {
                Temporal::Utc(datetime)
            } else {
                Temporal::Floating(datetime)
            }
        }),
        value_date().map(Temporal::Date),
    ))
}

fn list<'src, T, P>(item: P) -> impl Parser<'src, &'src str, Vec<T>, Extra<'src>> + Clone
where
    P: Parser<'src, &'src str, T, Extra<'src>> + Clone,
{
    item.separated_by(just(',')).at_least(1).collect()
}

/// `1*DIGIT` greater than zero, for COUNT and INTERVAL.
fn positive<'src>() -> impl Parser<'src, &'src str, u32, Extra<'src>> + Clone {
    unsigned().try_map(|n, span| match n {
        0 => Err(Rich::custom(span, "expected a positive number")),
        n => Ok(n),
    })
}

/// `1*2DIGIT` from 0 to `max`, for seconds, minutes and hours.
#[allow(clippy::cast_possible_truncation)]
fn bounded<'src>(max: u32) -> impl Parser<'src, &'src str, u8, Extra<'src>> + Clone {
    unsigned().try_map(move |n, span| {
        if n > max {
            return Err(Rich::custom(span, format!("{n} is out of range 0 to {max}")));
        }
        Ok(n as u8)
    })
}

/// ```txt
/// monthnum    = 1*2DIGIT       ;1 to 12
/// ```
#[allow(clippy::cast_possible_truncation)]
fn month<'src>() -> impl Parser<'src, &'src str, u8, Extra<'src>> + Clone {
    unsigned().try_map(|n, span| match n {
        1..=12 => Ok(n as u8),
        _ => Err(Rich::custom(span, format!("month {n} is out of range"))),
    })
}

/// `[plus / minus] n` with `1 <= n <= max`, shared by the ordinal lists:
///
/// ```txt
/// monthdaynum = [plus / minus] ordmoday
/// yeardaynum  = [plus / minus] ordyrday
/// weeknum     = [plus / minus] ordwk
/// setposday   = yeardaynum
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn ordinal<'src>(max: u32) -> impl Parser<'src, &'src str, i16, Extra<'src>> + Clone {
    sign().then(unsigned()).try_map(move |(positive, n), span| {
        if n == 0 || n > max {
            return Err(Rich::custom(span, format!("{n} is out of range 1 to {max}")));
        }
        let n = n as i16;
        Ok(if positive { n } else { -n })
    })
}

/// ```txt
/// weekdaynum  = [[plus / minus] ordwk] weekday
/// ```
#[allow(clippy::cast_possible_truncation)]
fn weekdaynum<'src>() -> impl Parser<'src, &'src str, WeekDayNum, Extra<'src>> + Clone {
    ordinal(53)
        .or_not()
        .then(weekday())
        .map(|(occurrence, day)| WeekDayNum {
            day,
            occurrence: occurrence.map(|n| n as i8),
        })
}

/// ```txt
/// weekday     = "SU" / "MO" / "TU" / "WE" / "TH" / "FR" / "SA"
/// ```
fn weekday<'src>() -> impl Parser<'src, &'src str, Weekday, Extra<'src>> + Clone {
    choice((
        just(KW_DAY_SU).to(Weekday::Sunday),
        just(KW_DAY_MO).to(Weekday::Monday),
        just(KW_DAY_TU).to(Weekday::Tuesday),
        just(KW_DAY_WE).to(Weekday::Wednesday),
        just(KW_DAY_TH).to(Weekday::Thursday),
        just(KW_DAY_FR).to(Weekday::Friday),
        just(KW_DAY_SA).to(Weekday::Saturday),
    ))
}
