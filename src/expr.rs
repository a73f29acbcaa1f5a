//! The parsed expression: per-field value lists plus restriction flags.

/// First year an expression may name; also the start of the year wildcard
/// window.
pub(crate) const YEAR_MIN: i16 = 1970;

/// Last year an expression may name. Searching past this bound is the one
/// terminal condition of the next-match engine.
pub(crate) const YEAR_MAX: i16 = 2099;

/// A parsed calendar-event expression.
///
/// Each time field holds the sorted, deduplicated list of values it permits;
/// a wildcard materializes the field's full domain. Day-of-month and weekday
/// each carry a flag recording whether the surface form narrowed them, since
/// a restricted weekday *intersects* with a restricted day-of-month rather
/// than extending it.
///
/// An `Expression` is immutable after parsing and safe to share across
/// threads; matching borrows it and allocates only transient per-month state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// Permitted seconds, in [0, 59].
    pub(crate) seconds: Vec<i8>,
    /// Permitted minutes, in [0, 59].
    pub(crate) minutes: Vec<i8>,
    /// Permitted hours, in [0, 23].
    pub(crate) hours: Vec<i8>,
    /// Nominal days of month, in [1, 31]; trimmed to each month's length
    /// during matching.
    pub(crate) days_of_month: Vec<i8>,
    pub(crate) days_of_month_restricted: bool,
    /// Permitted months, in [1, 12].
    pub(crate) months: Vec<i8>,
    /// Permitted years, in [`YEAR_MIN`, `YEAR_MAX`].
    pub(crate) years: Vec<i16>,
    /// Permitted weekdays, Sunday = 0.
    pub(crate) weekdays: Vec<i8>,
    pub(crate) weekdays_restricted: bool,
    /// Time zone name, stored verbatim and resolved at match time.
    pub(crate) zone: Option<String>,
    /// The normalized textual form, computed once at parse time.
    pub(crate) canonical: String,
}
