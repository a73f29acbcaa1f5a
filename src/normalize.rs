//! Surface-form normalization: shorthand keywords and field classification.
//!
//! An expression has up to four whitespace-separated fields — weekday set,
//! date, time, zone — any of which may be omitted. This module expands the
//! shorthand keywords (`daily`, `weekly`, ...) and assigns each raw field to
//! a slot by shape, strictly in weekday → date → time → zone order.

use crate::error::ParseError;

/// The up-to-four fields of an expression, classified but not yet parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Slots {
    pub(crate) weekdays: Option<String>,
    pub(crate) date: Option<String>,
    pub(crate) time: Option<String>,
    pub(crate) zone: Option<String>,
}

/// Split an input into classified slots, expanding shorthand keywords.
pub(crate) fn split(input: &str) -> Result<Slots, ParseError> {
    let raw: Vec<&str> = input.split_whitespace().collect();
    if raw.len() > 4 {
        return Err(ParseError::TooManyFields { count: raw.len() });
    }

    if let Some(first) = raw.first() {
        if let Some(mut slots) = shorthand(first) {
            // A shorthand stands for a whole expression; only a zone may follow it.
            match raw.len() {
                1 => return Ok(slots),
                2 if is_zone_name(raw[1]) => {
                    slots.zone = Some(raw[1].to_string());
                    return Ok(slots);
                }
                2 => return Err(ParseError::malformed(raw[1])),
                n => return Err(ParseError::TooManyFields { count: n }),
            }
        }
    }

    let mut slots = Slots::default();
    let mut next_kind = 0;
    for field in raw {
        let mut assigned = false;
        for kind in next_kind..4 {
            let matched = match kind {
                0 => is_weekday_field(field),
                1 => is_date_field(field),
                2 => is_time_field(field),
                _ => is_zone_name(field),
            };
            if matched {
                let slot = match kind {
                    0 => &mut slots.weekdays,
                    1 => &mut slots.date,
                    2 => &mut slots.time,
                    _ => &mut slots.zone,
                };
                *slot = Some(field.to_string());
                next_kind = kind + 1;
                assigned = true;
                break;
            }
        }
        if !assigned {
            return Err(ParseError::malformed(field));
        }
    }
    Ok(slots)
}

/// Expand a shorthand keyword into its equivalent slots.
fn shorthand(word: &str) -> Option<Slots> {
    let lower = word.to_ascii_lowercase();
    let (weekdays, date, time) = match lower.as_str() {
        "hourly" => (None, "*-*-*", "*:00:00"),
        "daily" => (None, "*-*-*", "00:00:00"),
        "weekly" => (Some("Mon"), "*-*-*", "00:00:00"),
        "monthly" => (None, "*-*-01", "00:00:00"),
        "yearly" | "annually" => (None, "*-01-01", "00:00:00"),
        _ => return None,
    };
    Some(Slots {
        weekdays: weekdays.map(str::to_string),
        date: Some(date.to_string()),
        time: Some(time.to_string()),
        zone: None,
    })
}

/// Weekday sets are names or 0-based numbers joined by `,` and `..`.
fn is_weekday_field(field: &str) -> bool {
    !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ',' || c == '.')
}

/// Dates are `-`-separated; a time never contains `-`.
fn is_date_field(field: &str) -> bool {
    field.contains('-') && !field.contains(':')
}

fn is_time_field(field: &str) -> bool {
    field.contains(':')
}

/// IANA-style zone name: letter-led, e.g. `UTC` or `America/Los_Angeles`.
fn is_zone_name(field: &str) -> bool {
    field
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '+' | '-'))
}
