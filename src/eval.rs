//! Next-match computation.
//!
//! The engine advances a working instant field by field, coarse to fine,
//! restarting from the year whenever a coarser field rolls over. Days whose
//! wall clock is monotone take a fast path of plain civil-time searches; a
//! day that straddles a UTC offset change is walked in absolute one-hour and
//! one-minute steps instead, so that times skipped by a spring-forward
//! produce no match and times repeated by a fall-back match once per UTC
//! occurrence, in monotone order.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp, Zoned};

use crate::expr::Expression;

/// The instant treated as "absent": 0001-01-01T00:00:00 UTC. Feeding it to
/// [`next_after`] yields no match, so it passes through chained calls.
fn zero_instant() -> Timestamp {
    Date::new(1, 1, 1)
        .unwrap()
        .at(0, 0, 0, 0)
        .to_zoned(TimeZone::UTC)
        .unwrap()
        .timestamp()
}

/// The smallest instant strictly after `from` matching `expr`, in `from`'s
/// zone unless the expression names one. `None` when the year list is
/// exhausted or the expression's zone does not resolve.
pub(crate) fn next_after(expr: &Expression, from: &Zoned) -> Option<Zoned> {
    if from.timestamp() == zero_instant() {
        return None;
    }
    let tz = match &expr.zone {
        Some(name) => TimeZone::get(name).ok()?,
        None => from.time_zone().clone(),
    };

    // round strictly up to the next whole second
    let nanos = 1_000_000_000 - i64::from(from.subsec_nanosecond());
    let mut t = from
        .with_time_zone(tz.clone())
        .checked_add(Span::new().nanoseconds(nanos))
        .ok()?;

    'wrap: loop {
        let year = t.year();
        match first_at_least(&expr.years, year) {
            None => return None,
            Some(y) if y != year => t = start_of(y, expr.months[0], 1, &tz)?,
            _ => {}
        }

        let month = t.month();
        match first_at_least(&expr.months, month) {
            None => {
                t = start_of(t.year() + 1, expr.months[0], 1, &tz)?;
                continue 'wrap;
            }
            Some(m) if m != month => t = start_of(t.year(), m, 1, &tz)?,
            _ => {}
        }

        let days = actual_days_of_month(expr, t.year(), t.month());
        if days.is_empty() {
            t = start_of_next_month(&t, &tz)?;
            continue 'wrap;
        }

        let day = t.day();
        match first_at_least(&days, day) {
            None => {
                t = start_of_next_month(&t, &tz)?;
                continue 'wrap;
            }
            Some(d) if d != day => {
                t = start_of(t.year(), t.month(), d, &tz)?;
                // Some zones have no midnight on some dates (transitions at
                // 00:00). Snap across the jump to the nearest civil midnight.
                let hour = t.hour();
                if hour != 0 {
                    let delta = if hour > 12 {
                        i64::from(24 - hour)
                    } else {
                        -i64::from(hour)
                    };
                    t = t.checked_add(Span::new().hours(delta)).ok()?;
                }
            }
            _ => {}
        }

        if transition_in_day(&t, &tz) {
            // Hour walk: an hour here may hold 30, 60, or 90 minutes, and a
            // wall hour may repeat. Step by absolute hours, skipping a
            // repeated wall hour, and keep the walk pinned to the top of
            // the hour.
            while !contains(&expr.hours, t.hour()) {
                let hour_before = t.hour();
                t = t.checked_add(Span::new().hours(1)).ok()?;
                if t.hour() == hour_before {
                    t = t.checked_add(Span::new().hours(1)).ok()?;
                }
                t = truncate_seconds(&t)?;
                let minute = t.minute();
                if minute != 0 {
                    t = t.checked_sub(Span::new().minutes(i64::from(minute))).ok()?;
                }
                if t.hour() == 0 {
                    // wrapped past midnight; reanchor and start over
                    t = start_of(t.year(), t.month(), t.day(), &tz)?;
                    continue 'wrap;
                }
            }

            while !contains(&expr.minutes, t.minute()) {
                let hour_before = t.hour();
                t = truncate_seconds(&t)?
                    .checked_add(Span::new().minutes(1))
                    .ok()?;
                if t.hour() != hour_before {
                    continue 'wrap;
                }
            }

            let second = t.second();
            t = truncate_seconds(&t)?;
            match first_at_least(&expr.seconds, second) {
                None => {
                    t = t.checked_add(Span::new().minutes(1)).ok()?;
                    continue 'wrap;
                }
                Some(s) => t = t.checked_add(Span::new().seconds(i64::from(s))).ok()?,
            }
            return Some(t);
        }

        // Fast path: the whole day sits at one offset, so civil values
        // behave like plain integers.
        let hour = t.hour();
        match first_at_least(&expr.hours, hour) {
            None => {
                t = start_of_next_day(&t, &tz)?;
                continue 'wrap;
            }
            Some(h) if h != hour => {
                t = at(t.date(), h, expr.minutes[0], expr.seconds[0], &tz)?;
            }
            _ => {}
        }

        let minute = t.minute();
        match first_at_least(&expr.minutes, minute) {
            None => {
                t = start_of_next_hour(&t, &tz)?;
                continue 'wrap;
            }
            Some(m) if m != minute => {
                t = at(t.date(), t.hour(), m, expr.seconds[0], &tz)?;
            }
            _ => {}
        }

        let second = t.second();
        match first_at_least(&expr.seconds, second) {
            None => {
                t = start_of_next_minute(&t, &tz)?;
                continue 'wrap;
            }
            Some(s) if s != second => {
                t = at(t.date(), t.hour(), t.minute(), s, &tz)?;
            }
            _ => {}
        }

        return Some(t);
    }
}

/// Successive matches after `from`, each fed back as the next start.
pub(crate) fn next_n(expr: &Expression, from: &Zoned, n: usize) -> Vec<Zoned> {
    let mut results = Vec::with_capacity(n);
    let mut cursor = from.clone();
    while results.len() < n {
        match next_after(expr, &cursor) {
            Some(t) => {
                cursor = t.clone();
                results.push(t);
            }
            None => break,
        }
    }
    results
}

/// Wall-clock membership: every civil component of `instant` (viewed in the
/// expression's zone, if it names one) is in its permitted list.
pub(crate) fn matches(expr: &Expression, instant: &Zoned) -> bool {
    let t = match &expr.zone {
        Some(name) => match TimeZone::get(name) {
            Ok(tz) => instant.with_time_zone(tz),
            Err(_) => return false,
        },
        None => instant.clone(),
    };
    if t.subsec_nanosecond() != 0 {
        return false;
    }
    contains(&expr.years, t.year())
        && contains(&expr.months, t.month())
        && contains(&expr.hours, t.hour())
        && contains(&expr.minutes, t.minute())
        && contains(&expr.seconds, t.second())
        && contains(&actual_days_of_month(expr, t.year(), t.month()), t.day())
}

/// Days of `(year, month)` permitted by both the day-of-month and weekday
/// constraints. When both fields are restricted the result is their
/// intersection, not their union.
fn actual_days_of_month(expr: &Expression, year: i16, month: i8) -> Vec<i8> {
    let Ok(first) = Date::new(year, month, 1) else {
        return Vec::new();
    };
    let mut days = Vec::new();
    for day in 1..=first.days_in_month() {
        if expr.days_of_month_restricted && !contains(&expr.days_of_month, day) {
            continue;
        }
        if expr.weekdays_restricted {
            let Ok(date) = Date::new(year, month, day) else {
                continue;
            };
            if !contains(&expr.weekdays, date.weekday().to_sunday_zero_offset()) {
                continue;
            }
        }
        days.push(day);
    }
    days
}

fn contains<T: Ord>(list: &[T], value: T) -> bool {
    list.binary_search(&value).is_ok()
}

fn first_at_least<T: Copy + Ord>(list: &[T], value: T) -> Option<T> {
    let i = list.partition_point(|&x| x < value);
    list.get(i).copied()
}

/// True when the civil day containing `t` straddles a UTC offset change.
fn transition_in_day(t: &Zoned, tz: &TimeZone) -> bool {
    let Some(today) = start_of(t.year(), t.month(), t.day(), tz) else {
        return false;
    };
    let Some(tomorrow) = start_of_next_day(t, tz) else {
        return false;
    };
    today.offset() != tomorrow.offset()
}

fn at(date: Date, hour: i8, minute: i8, second: i8, tz: &TimeZone) -> Option<Zoned> {
    date.at(hour, minute, second, 0).to_zoned(tz.clone()).ok()
}

fn start_of(year: i16, month: i8, day: i8, tz: &TimeZone) -> Option<Zoned> {
    at(Date::new(year, month, day).ok()?, 0, 0, 0, tz)
}

fn start_of_next_month(t: &Zoned, tz: &TimeZone) -> Option<Zoned> {
    let (year, month) = if t.month() == 12 {
        (t.year() + 1, 1)
    } else {
        (t.year(), t.month() + 1)
    };
    start_of(year, month, 1, tz)
}

fn start_of_next_day(t: &Zoned, tz: &TimeZone) -> Option<Zoned> {
    at(t.date().tomorrow().ok()?, 0, 0, 0, tz)
}

fn start_of_next_hour(t: &Zoned, tz: &TimeZone) -> Option<Zoned> {
    if t.hour() == 23 {
        start_of_next_day(t, tz)
    } else {
        at(t.date(), t.hour() + 1, 0, 0, tz)
    }
}

fn start_of_next_minute(t: &Zoned, tz: &TimeZone) -> Option<Zoned> {
    if t.minute() == 59 {
        start_of_next_hour(t, tz)
    } else {
        at(t.date(), t.hour(), t.minute() + 1, 0, tz)
    }
}

fn truncate_seconds(t: &Zoned) -> Option<Zoned> {
    // offsets are whole minutes, so the wall second is the absolute second
    t.checked_sub(Span::new().seconds(i64::from(t.second())))
        .ok()
}

/// Lazy iterator over successive matches of an [`Expression`].
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    expr: &'a Expression,
    cursor: Option<Zoned>,
}

impl<'a> Occurrences<'a> {
    pub(crate) fn new(expr: &'a Expression, from: Zoned) -> Self {
        Self {
            expr,
            cursor: Some(from),
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Zoned;

    fn next(&mut self) -> Option<Zoned> {
        let cursor = self.cursor.take()?;
        let next = next_after(self.expr, &cursor)?;
        self.cursor = Some(next.clone());
        Some(next)
    }
}
