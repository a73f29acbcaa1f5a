//! calexpr — calendar-event expressions in the systemd timer style.
//!
//! An expression names a set of instants with up to four fields — weekday
//! set, date, time, zone — where every date and time component may be a
//! wildcard, a value, a range, a stepped range, or a list:
//!
//! ```text
//! Mon..Fri *-*-* 08:30:00 Europe/Berlin
//! *-02-29 01:00:00
//! Sat,Sun 12-05 08:05:40
//! daily
//! ```
//!
//! Parsing normalizes a permissive surface syntax (shorthand keywords, bare
//! times and dates, two-digit years, weekday casing) into a canonical form,
//! and the engine computes the next matching instant from any starting
//! point. Daylight-saving discontinuities are handled the way wall clocks
//! do: times skipped by a spring-forward do not fire that day, and times
//! repeated by a fall-back fire once per occurrence.
//!
//! # Examples
//!
//! ```
//! use calexpr::Expression;
//!
//! let expr = Expression::parse("05:40").unwrap();
//! assert_eq!(expr.to_string(), "*-*-* 05:40:00");
//!
//! let from: jiff::Zoned = "2019-02-07T01:00:00+00:00[UTC]".parse().unwrap();
//! let next = expr.next(&from).unwrap();
//! assert_eq!(next.to_string(), "2019-02-07T05:40:00+00:00[UTC]");
//! ```

pub mod error;

mod display;
mod eval;
mod expr;
mod normalize;
mod parser;

pub use error::ParseError;
pub use eval::Occurrences;
pub use expr::Expression;

use jiff::Zoned;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

impl Expression {
    /// Parse a calendar-event expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use calexpr::Expression;
    ///
    /// let expr = Expression::parse("Sat,Thu,Mon..Wed,Sat..Sun").unwrap();
    /// assert_eq!(expr.to_string(), "Mon..Thu,Sat,Sun *-*-* 00:00:00");
    ///
    /// assert!(Expression::parse("*:0/60").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parser::parse(input)
    }

    /// Parse a known-good expression.
    ///
    /// # Panics
    ///
    /// Panics if `input` does not parse; use [`Expression::parse`] for
    /// untrusted input.
    pub fn must_parse(input: &str) -> Self {
        match Self::parse(input) {
            Ok(expr) => expr,
            Err(err) => panic!("invalid calendar expression {input:?}: {err}"),
        }
    }

    /// The smallest instant strictly after `from` that matches.
    ///
    /// The result is in `from`'s zone unless the expression names a zone, in
    /// which case it is computed and returned in that zone. `None` means no
    /// match exists within the supported year horizon (or the expression's
    /// zone does not resolve).
    ///
    /// # Examples
    ///
    /// ```
    /// use calexpr::Expression;
    ///
    /// let expr = Expression::parse("*-02-29 01:00:00").unwrap();
    /// let from: jiff::Zoned = "2019-01-04T01:00:00+00:00[UTC]".parse().unwrap();
    /// let next = expr.next(&from).unwrap();
    /// assert_eq!(next.to_string(), "2020-02-29T01:00:00+00:00[UTC]");
    /// ```
    pub fn next(&self, from: &Zoned) -> Option<Zoned> {
        eval::next_after(self, from)
    }

    /// The next `n` matches after `from`, each result feeding the next
    /// search. Shorter than `n` when the horizon is exhausted first.
    ///
    /// # Examples
    ///
    /// ```
    /// use calexpr::Expression;
    ///
    /// let expr = Expression::parse("*:0/5").unwrap();
    /// let from: jiff::Zoned = "2013-09-02T08:44:32+00:00[UTC]".parse().unwrap();
    /// let times = expr.next_n(&from, 3);
    /// assert_eq!(times[0].to_string(), "2013-09-02T08:45:00+00:00[UTC]");
    /// assert_eq!(times[2].to_string(), "2013-09-02T08:55:00+00:00[UTC]");
    /// ```
    pub fn next_n(&self, from: &Zoned, n: usize) -> Vec<Zoned> {
        eval::next_n(self, from, n)
    }

    /// Whether an instant's wall clock matches this expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use calexpr::Expression;
    ///
    /// let expr = Expression::parse("*-*-* 09:00").unwrap();
    /// let at: jiff::Zoned = "2019-06-05T09:00:00+00:00[UTC]".parse().unwrap();
    /// assert!(expr.matches(&at));
    /// ```
    pub fn matches(&self, instant: &Zoned) -> bool {
        eval::matches(self, instant)
    }

    /// A lazy iterator of successive matches after `from`.
    ///
    /// Unbounded for most expressions; it ends when the year horizon is
    /// exhausted.
    ///
    /// # Examples
    ///
    /// ```
    /// use calexpr::Expression;
    ///
    /// let expr = Expression::parse("Mon 00:00").unwrap();
    /// let from: jiff::Zoned = "2019-01-04T01:00:00+00:00[UTC]".parse().unwrap();
    /// let mondays: Vec<_> = expr.occurrences(&from).take(2).collect();
    /// assert_eq!(mondays[0].to_string(), "2019-01-07T00:00:00+00:00[UTC]");
    /// assert_eq!(mondays[1].to_string(), "2019-01-14T00:00:00+00:00[UTC]");
    /// ```
    pub fn occurrences(&self, from: &Zoned) -> Occurrences<'_> {
        Occurrences::new(self, from.clone())
    }

    /// The zone named by the expression, if any.
    ///
    /// Zone names are stored verbatim and resolved at match time; an
    /// unresolvable name makes [`Expression::next`] return `None`.
    pub fn timezone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// The canonical normalized form.
    ///
    /// # Examples
    ///
    /// ```
    /// use calexpr::Expression;
    ///
    /// assert_eq!(Expression::parse("weekly").unwrap().as_str(), "Mon *-*-* 00:00:00");
    /// ```
    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Serializes as the canonical expression string, so serialization and
/// deserialization round-trip (modulo normalization of the input form).
#[cfg(feature = "serde")]
impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

/// Deserializes from an expression string in any accepted surface form.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Expression::parse(&s).map_err(serde::de::Error::custom)
    }
}
