//! Field parsing: the `*` / value / `a..b` / `/step` grammar over each
//! field's domain, and assembly of the final [`Expression`].

use crate::display;
use crate::error::ParseError;
use crate::expr::{Expression, YEAR_MAX, YEAR_MIN};
use crate::normalize;

/// One comma-separated element of a field, kept for canonical rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Atom {
    All { step: Option<u16> },
    Value { value: u16, step: Option<u16> },
    Range { lo: u16, hi: u16, step: Option<u16> },
}

impl Atom {
    /// Sort key for the canonical form: wildcards first, then by start value.
    pub(crate) fn key(&self) -> u32 {
        match *self {
            Atom::All { .. } => 0,
            Atom::Value { value, .. } => u32::from(value) + 1,
            Atom::Range { lo, .. } => u32::from(lo) + 1,
        }
    }
}

/// A field's value domain.
#[derive(Debug, Clone, Copy)]
struct FieldDef {
    name: &'static str,
    min: u16,
    max: u16,
    /// Whether month names are valid values here.
    month_names: bool,
}

const SECONDS: FieldDef = FieldDef {
    name: "seconds",
    min: 0,
    max: 59,
    month_names: false,
};
const MINUTES: FieldDef = FieldDef {
    name: "minutes",
    min: 0,
    max: 59,
    month_names: false,
};
const HOURS: FieldDef = FieldDef {
    name: "hours",
    min: 0,
    max: 23,
    month_names: false,
};
const DAYS_OF_MONTH: FieldDef = FieldDef {
    name: "days of month",
    min: 1,
    max: 31,
    month_names: false,
};
const MONTHS: FieldDef = FieldDef {
    name: "months",
    min: 1,
    max: 12,
    month_names: true,
};
const YEARS: FieldDef = FieldDef {
    name: "years",
    min: YEAR_MIN as u16,
    max: YEAR_MAX as u16,
    month_names: false,
};

/// A parsed field: its atoms (for the canonical form) and the materialized,
/// sorted, deduplicated value list.
#[derive(Debug, Clone)]
struct Field {
    atoms: Vec<Atom>,
    values: Vec<u16>,
}

impl Field {
    fn is_wildcard(&self) -> bool {
        self.atoms == [Atom::All { step: None }]
    }

    fn values_i8(&self) -> Vec<i8> {
        self.values.iter().map(|&v| v as i8).collect()
    }
}

/// Weekday abbreviations and full names, Mon-first — the order weekday
/// ranges and the canonical form use.
const WEEKDAY_NAMES: [(&str, &str); 7] = [
    ("mon", "monday"),
    ("tue", "tuesday"),
    ("wed", "wednesday"),
    ("thu", "thursday"),
    ("fri", "friday"),
    ("sat", "saturday"),
    ("sun", "sunday"),
];

const MONTH_NAMES: [(&str, &str); 12] = [
    ("jan", "january"),
    ("feb", "february"),
    ("mar", "march"),
    ("apr", "april"),
    ("may", "may"),
    ("jun", "june"),
    ("jul", "july"),
    ("aug", "august"),
    ("sep", "september"),
    ("oct", "october"),
    ("nov", "november"),
    ("dec", "december"),
];

/// Parse a calendar-event expression into its normalized [`Expression`].
pub(crate) fn parse(input: &str) -> Result<Expression, ParseError> {
    let slots = normalize::split(input)?;

    let (weekdays, weekdays_restricted) = match &slots.weekdays {
        Some(text) => (parse_weekdays(text)?, true),
        None => ((0i8..7).collect(), false),
    };

    // Date sub-tokens are day, month, year from the right; a missing year
    // defaults to the wildcard window.
    let (year_field, month_field, dom_field) = match &slots.date {
        Some(text) => {
            let parts: Vec<&str> = text.split('-').collect();
            let (year_text, month_text, dom_text) = match parts.as_slice() {
                [month, day] => (None, *month, *day),
                [year, month, day] => (Some(*year), *month, *day),
                _ => return Err(ParseError::malformed(text.clone())),
            };
            let year_field = match year_text {
                Some(year) => Some(parse_field(&expand_two_digit_year(year), YEARS)?),
                None => None,
            };
            (
                year_field,
                Some(parse_field(month_text, MONTHS)?),
                Some(parse_field(dom_text, DAYS_OF_MONTH)?),
            )
        }
        None => (None, None, None),
    };

    // Time sub-tokens are hour, minute, optional second (default 00).
    let (hour_field, minute_field, second_field) = match &slots.time {
        Some(text) => {
            let parts: Vec<&str> = text.split(':').collect();
            let (hour, minute, second) = match parts.as_slice() {
                [hour, minute] => (*hour, *minute, "00"),
                [hour, minute, second] => (*hour, *minute, *second),
                _ => return Err(ParseError::malformed(text.clone())),
            };
            (
                Some(parse_field(hour, HOURS)?),
                Some(parse_field(minute, MINUTES)?),
                Some(parse_field(second, SECONDS)?),
            )
        }
        None => (None, None, None),
    };

    let canonical = display::canonical(&display::CanonicalParts {
        weekdays: weekdays_restricted.then_some(weekdays.as_slice()),
        years: year_field.as_ref().map(|f| f.atoms.as_slice()),
        months: month_field.as_ref().map(|f| f.atoms.as_slice()),
        days_of_month: dom_field.as_ref().map(|f| f.atoms.as_slice()),
        hours: hour_field.as_ref().map(|f| f.atoms.as_slice()),
        minutes: minute_field.as_ref().map(|f| f.atoms.as_slice()),
        seconds: second_field.as_ref().map(|f| f.atoms.as_slice()),
        zone: slots.zone.as_deref(),
    });

    Ok(Expression {
        seconds: second_field
            .as_ref()
            .map(Field::values_i8)
            .unwrap_or_else(|| vec![0]),
        minutes: minute_field
            .as_ref()
            .map(Field::values_i8)
            .unwrap_or_else(|| vec![0]),
        hours: hour_field
            .as_ref()
            .map(Field::values_i8)
            .unwrap_or_else(|| vec![0]),
        days_of_month_restricted: dom_field.as_ref().is_some_and(|f| !f.is_wildcard()),
        days_of_month: dom_field
            .as_ref()
            .map(Field::values_i8)
            .unwrap_or_else(|| (1i8..=31).collect()),
        months: month_field
            .as_ref()
            .map(Field::values_i8)
            .unwrap_or_else(|| (1i8..=12).collect()),
        years: year_field
            .as_ref()
            .map(|f| f.values.iter().map(|&v| v as i16).collect())
            .unwrap_or_else(|| (YEAR_MIN..=YEAR_MAX).collect()),
        weekdays,
        weekdays_restricted,
        zone: slots.zone,
        canonical,
    })
}

/// `YY` means `20YY`, but only as a bare two-digit year.
fn expand_two_digit_year(text: &str) -> String {
    if text.len() == 2 && text.bytes().all(|b| b.is_ascii_digit()) {
        format!("20{text}")
    } else {
        text.to_string()
    }
}

fn parse_field(input: &str, def: FieldDef) -> Result<Field, ParseError> {
    let mut atoms = Vec::new();
    for part in input.split(',') {
        atoms.push(parse_atom(part, def)?);
    }

    let mut values = Vec::new();
    for atom in &atoms {
        let (lo, hi, step) = match *atom {
            Atom::All { step } => (def.min, def.max, step.unwrap_or(1)),
            // a step without a range runs to the end of the domain
            Atom::Value { value, step: None } => (value, value, 1),
            Atom::Value {
                value,
                step: Some(step),
            } => (value, def.max, step),
            Atom::Range { lo, hi, step } => (lo, hi, step.unwrap_or(1)),
        };
        values.extend((lo..=hi).step_by(usize::from(step)));
    }
    values.sort_unstable();
    values.dedup();

    Ok(Field { atoms, values })
}

fn parse_atom(input: &str, def: FieldDef) -> Result<Atom, ParseError> {
    if input.is_empty() {
        return Err(ParseError::malformed(input));
    }
    let (body, step) = match input.split_once('/') {
        Some((body, step)) => (body, Some(parse_step(step, input, def)?)),
        None => (input, None),
    };

    if body == "*" {
        return Ok(Atom::All { step });
    }
    if let Some((lo, hi)) = body.split_once("..") {
        let lo = parse_value(lo, def)?;
        let hi = parse_value(hi, def)?;
        if lo > hi {
            return Err(ParseError::InvalidRange {
                token: input.to_string(),
                field: def.name,
            });
        }
        return Ok(Atom::Range { lo, hi, step });
    }
    Ok(Atom::Value {
        value: parse_value(body, def)?,
        step,
    })
}

fn parse_step(input: &str, atom: &str, def: FieldDef) -> Result<u16, ParseError> {
    let err = || ParseError::InvalidStep {
        token: atom.to_string(),
        field: def.name,
    };
    let step: u16 = input.parse().map_err(|_| err())?;
    let domain_size = def.max - def.min + 1;
    if step == 0 || step >= domain_size {
        return Err(err());
    }
    Ok(step)
}

fn parse_value(input: &str, def: FieldDef) -> Result<u16, ParseError> {
    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        let value: u32 = input.parse().map_err(|_| ParseError::unknown(input))?;
        if value < u32::from(def.min) || value > u32::from(def.max) {
            return Err(ParseError::OutOfRange {
                token: input.to_string(),
                field: def.name,
                min: def.min,
                max: def.max,
            });
        }
        return Ok(value as u16);
    }
    if def.month_names {
        if let Some(month) = month_by_name(input) {
            return Ok(month);
        }
    }
    Err(ParseError::unknown(input))
}

fn month_by_name(input: &str) -> Option<u16> {
    let lower = input.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|&(short, full)| lower == short || lower == full)
        .map(|i| i as u16 + 1)
}

/// Mon-first index (Mon = 0) of a weekday name.
fn weekday_by_name(input: &str) -> Option<u16> {
    let lower = input.to_ascii_lowercase();
    WEEKDAY_NAMES
        .iter()
        .position(|&(short, full)| lower == short || lower == full)
        .map(|i| i as u16)
}

fn weekday_number(input: &str) -> Result<u16, ParseError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::unknown(input));
    }
    let value: u32 = input.parse().map_err(|_| ParseError::unknown(input))?;
    if value > 6 {
        return Err(ParseError::OutOfRange {
            token: input.to_string(),
            field: "weekdays",
            min: 0,
            max: 6,
        });
    }
    Ok(value as u16)
}

fn mon_first_to_sunday_zero(day: u16) -> usize {
    usize::from((day + 1) % 7)
}

/// Parse the weekday field into a sorted Sunday=0 membership list.
///
/// Name ranges (`Mon..Wed`) order the week Mon-first; bare numbers use the
/// Sunday=0 numbering. Wrapping ranges are rejected rather than guessed at.
fn parse_weekdays(input: &str) -> Result<Vec<i8>, ParseError> {
    // one trailing comma is tolerated: "Wed, 17:48"
    let trimmed = input.strip_suffix(',').unwrap_or(input);
    let mut set = [false; 7]; // Sunday = 0

    for token in trimmed.split(',') {
        if token.is_empty() {
            return Err(ParseError::malformed(input));
        }
        match token.split_once("..") {
            Some((lo, hi)) => match (weekday_by_name(lo), weekday_by_name(hi)) {
                (Some(lo), Some(hi)) => {
                    if lo > hi {
                        return Err(ParseError::InvalidRange {
                            token: token.to_string(),
                            field: "weekdays",
                        });
                    }
                    for day in lo..=hi {
                        set[mon_first_to_sunday_zero(day)] = true;
                    }
                }
                (None, None) => {
                    let lo = weekday_number(lo)?;
                    let hi = weekday_number(hi)?;
                    if lo > hi {
                        return Err(ParseError::InvalidRange {
                            token: token.to_string(),
                            field: "weekdays",
                        });
                    }
                    for day in lo..=hi {
                        set[usize::from(day)] = true;
                    }
                }
                // a name on one side and a number on the other has no
                // defined ordering
                _ => {
                    return Err(ParseError::InvalidRange {
                        token: token.to_string(),
                        field: "weekdays",
                    });
                }
            },
            None => {
                if let Some(day) = weekday_by_name(token) {
                    set[mon_first_to_sunday_zero(day)] = true;
                } else {
                    set[usize::from(weekday_number(token)?)] = true;
                }
            }
        }
    }

    Ok((0..7)
        .filter(|&day| set[day as usize])
        .map(|day| day as i8)
        .collect())
}
