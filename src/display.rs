//! Canonical-form rendering.
//!
//! The canonical form zero-pads numeric components, writes weekdays Mon-first
//! with runs of three or more collapsed into ranges, sorts plain value lists,
//! and preserves range and step atoms as written.

use std::fmt;

use crate::expr::Expression;
use crate::parser::Atom;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Canonical three-letter weekday names, Mon-first.
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Everything the canonical form is assembled from. `None` fields render as
/// their default (`*` for date parts, `00` for time parts).
pub(crate) struct CanonicalParts<'a> {
    /// Sunday=0 membership list; `None` when the weekday field is
    /// unrestricted (then it is omitted entirely).
    pub(crate) weekdays: Option<&'a [i8]>,
    pub(crate) years: Option<&'a [Atom]>,
    pub(crate) months: Option<&'a [Atom]>,
    pub(crate) days_of_month: Option<&'a [Atom]>,
    pub(crate) hours: Option<&'a [Atom]>,
    pub(crate) minutes: Option<&'a [Atom]>,
    pub(crate) seconds: Option<&'a [Atom]>,
    pub(crate) zone: Option<&'a str>,
}

pub(crate) fn canonical(parts: &CanonicalParts<'_>) -> String {
    let mut out = String::new();
    if let Some(days) = parts.weekdays {
        out.push_str(&weekday_set(days));
        out.push(' ');
    }
    out.push_str(&field(parts.years, 4, "*"));
    out.push('-');
    out.push_str(&field(parts.months, 2, "*"));
    out.push('-');
    out.push_str(&field(parts.days_of_month, 2, "*"));
    out.push(' ');
    out.push_str(&field(parts.hours, 2, "00"));
    out.push(':');
    out.push_str(&field(parts.minutes, 2, "00"));
    out.push(':');
    out.push_str(&field(parts.seconds, 2, "00"));
    if let Some(zone) = parts.zone {
        out.push(' ');
        out.push_str(zone);
    }
    out
}

fn field(atoms: Option<&[Atom]>, pad: usize, default: &str) -> String {
    let Some(atoms) = atoms else {
        return default.to_string();
    };
    let mut atoms = atoms.to_vec();
    atoms.sort_by_key(Atom::key);
    atoms.dedup();
    atoms
        .iter()
        .map(|a| atom(a, pad))
        .collect::<Vec<_>>()
        .join(",")
}

fn atom(atom: &Atom, pad: usize) -> String {
    let (body, step) = match *atom {
        Atom::All { step } => ("*".to_string(), step),
        Atom::Value { value, step } => (format!("{value:0pad$}"), step),
        Atom::Range { lo, hi, step } => (format!("{lo:0pad$}..{hi:0pad$}"), step),
    };
    match step {
        Some(step) => format!("{body}/{step}"),
        None => body,
    }
}

/// Render a Sunday=0 membership list Mon-first, collapsing runs of three or
/// more adjacent days into `a..b`.
fn weekday_set(days: &[i8]) -> String {
    let mut present = [false; 7]; // Mon-first
    for &day in days {
        present[usize::from((day as u8 + 6) % 7)] = true;
    }

    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < 7 {
        if !present[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i < 7 && present[i] {
            i += 1;
        }
        if i - start >= 3 {
            parts.push(format!("{}..{}", WEEKDAYS[start], WEEKDAYS[i - 1]));
        } else {
            for day in start..i {
                parts.push(WEEKDAYS[day].to_string());
            }
        }
    }
    parts.join(",")
}
