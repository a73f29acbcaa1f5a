//! Conformance tables for the surface grammar: normalization pairs that must
//! share a canonical form, and next-match sequences from fixed instants.

use calexpr::Expression;
use jiff::civil::date;
use jiff::tz::TimeZone;
use jiff::Zoned;

fn tz(name: &str) -> TimeZone {
    TimeZone::get(name).unwrap()
}

fn zdt(tz: &TimeZone, year: i16, month: i8, day: i8, hour: i8, minute: i8, second: i8) -> Zoned {
    date(year, month, day)
        .at(hour, minute, second, 0)
        .to_zoned(tz.clone())
        .unwrap()
}

/// Denormalized surface form, and the canonical form it must normalize to.
const NORM_PAIRS: &[(&str, &str)] = &[
    ("Sat,Thu,Mon..Wed,Sat..Sun", "Mon..Thu,Sat,Sun *-*-* 00:00:00"),
    ("Mon,Sun 12-*-* 2,1:23", "Mon,Sun 2012-*-* 01,02:23:00"),
    ("Wed *-1", "Wed *-*-01 00:00:00"),
    ("Wed..Wed,Wed *-1", "Wed *-*-01 00:00:00"),
    ("Wed, 17:48", "Wed *-*-* 17:48:00"),
    ("Wed..Sat,Tue 12-10-15 1:2:3", "Tue..Sat 2012-10-15 01:02:03"),
    ("*-*-7 0:0:0", "*-*-07 00:00:00"),
    ("10-15", "*-10-15 00:00:00"),
    ("monday *-12-* 17:00", "Mon *-12-* 17:00:00"),
    ("Mon,Fri *-*-3,1,2 *:30:45", "Mon,Fri *-*-01,02,03 *:30:45"),
    ("12,14,13,12:20,10,30", "*-*-* 12,13,14:10,20,30:00"),
    ("12..14:10,20,30", "*-*-* 12..14:10,20,30:00"),
    ("mon,fri *-1/2-1,3 *:30:45", "Mon,Fri *-01/2-01,03 *:30:45"),
    ("03-05 08:05:40", "*-03-05 08:05:40"),
    ("08:05:40", "*-*-* 08:05:40"),
    ("05:40", "*-*-* 05:40:00"),
    ("Sat,Sun 12-05 08:05:40", "Sat,Sun *-12-05 08:05:40"),
    ("Sat,Sun 08:05:40", "Sat,Sun *-*-* 08:05:40"),
    ("2003-03-05 05:40", "2003-03-05 05:40:00"),
    ("2003-02..04-05", "2003-02..04-05 00:00:00"),
    ("2003-03-05 05:40 UTC", "2003-03-05 05:40:00 UTC"),
    ("2003-03-05", "2003-03-05 00:00:00"),
    ("03-05", "*-03-05 00:00:00"),
    ("hourly", "*-*-* *:00:00"),
    ("daily UTC", "*-*-* 00:00:00 UTC"),
    ("monthly", "*-*-01 00:00:00"),
    ("weekly", "Mon *-*-* 00:00:00"),
    ("weekly Pacific/Auckland", "Mon *-*-* 00:00:00 Pacific/Auckland"),
    ("yearly", "*-01-01 00:00:00"),
    ("annually", "*-01-01 00:00:00"),
    ("*:2/3", "*-*-* *:02/3:00"),
];

#[test]
fn normalization_pairs_share_a_canonical_form() {
    for (denorm, norm) in NORM_PAIRS {
        let a = Expression::must_parse(denorm);
        let b = Expression::must_parse(norm);
        assert_eq!(a.to_string(), *norm, "canonical form of {denorm:?}");
        assert_eq!(b.to_string(), *norm, "canonical form of {norm:?} is not a fixed point");
        assert_eq!(a, b, "{denorm:?} and {norm:?} parse differently");
    }
}

#[test]
fn normalization_pairs_match_the_same_instants() {
    let from = zdt(&tz("UTC"), 2001, 1, 4, 1, 0, 0);
    for (denorm, norm) in NORM_PAIRS {
        assert_eq!(
            Expression::must_parse(denorm).next(&from),
            Expression::must_parse(norm).next(&from),
            "next diverges for {denorm:?} vs {norm:?}"
        );
    }
}

/// Run a pattern from a starting instant and compare the produced sequence.
/// With `exhausted`, the match after the last expected one must not exist.
fn check_sequence(pattern: &str, from: &Zoned, expected: &[Zoned], exhausted: bool) {
    let expr = Expression::must_parse(pattern);
    let got = expr.next_n(from, expected.len());
    assert_eq!(got, expected, "next_n for {pattern:?} from {from}");
    if exhausted {
        let last = expected.last().unwrap_or(from);
        assert_eq!(expr.next(last), None, "horizon for {pattern:?}");
    }
}

#[test]
fn plain_times_fire_daily() {
    let la = tz("America/Los_Angeles");
    let from = zdt(&la, 2019, 2, 7, 1, 0, 0);
    check_sequence(
        "05:40",
        &from,
        &[
            zdt(&la, 2019, 2, 7, 5, 40, 0),
            zdt(&la, 2019, 2, 8, 5, 40, 0),
            zdt(&la, 2019, 2, 9, 5, 40, 0),
        ],
        false,
    );
    check_sequence(
        "05:40:00",
        &from,
        &[
            zdt(&la, 2019, 2, 7, 5, 40, 0),
            zdt(&la, 2019, 2, 8, 5, 40, 0),
            zdt(&la, 2019, 2, 9, 5, 40, 0),
        ],
        false,
    );
    check_sequence(
        "08:05:40",
        &from,
        &[
            zdt(&la, 2019, 2, 7, 8, 5, 40),
            zdt(&la, 2019, 2, 8, 8, 5, 40),
            zdt(&la, 2019, 2, 9, 8, 5, 40),
            zdt(&la, 2019, 2, 10, 8, 5, 40),
            zdt(&la, 2019, 2, 11, 8, 5, 40),
            zdt(&la, 2019, 2, 12, 8, 5, 40),
        ],
        false,
    );
}

#[test]
fn daily_shorthand_fires_at_midnight() {
    let la = tz("America/Los_Angeles");
    check_sequence(
        "daily",
        &zdt(&la, 2019, 2, 7, 1, 0, 0),
        &[
            zdt(&la, 2019, 2, 8, 0, 0, 0),
            zdt(&la, 2019, 2, 9, 0, 0, 0),
            zdt(&la, 2019, 2, 10, 0, 0, 0),
        ],
        false,
    );
}

#[test]
fn fixed_dates_fire_once() {
    let la = tz("America/Los_Angeles");
    let from = zdt(&la, 2019, 2, 7, 1, 0, 0);
    check_sequence(
        "2023-03-05",
        &from,
        &[zdt(&la, 2023, 3, 5, 0, 0, 0)],
        true,
    );
    check_sequence(
        "2020-06-05 05:40:00",
        &from,
        &[zdt(&la, 2020, 6, 5, 5, 40, 0)],
        true,
    );
    // entirely in the past
    check_sequence("2003-03-05 05:40", &from, &[], true);
}

#[test]
fn date_ranges_and_steps() {
    let la = tz("America/Los_Angeles");
    check_sequence(
        "2019-02..04-05",
        &zdt(&la, 2019, 1, 7, 1, 0, 0),
        &[
            zdt(&la, 2019, 2, 5, 0, 0, 0),
            zdt(&la, 2019, 3, 5, 0, 0, 0),
            zdt(&la, 2019, 4, 5, 0, 0, 0),
        ],
        true,
    );
    check_sequence(
        "2019-02-05..08",
        &zdt(&la, 2019, 1, 4, 1, 0, 0),
        &[
            zdt(&la, 2019, 2, 5, 0, 0, 0),
            zdt(&la, 2019, 2, 6, 0, 0, 0),
            zdt(&la, 2019, 2, 7, 0, 0, 0),
            zdt(&la, 2019, 2, 8, 0, 0, 0),
        ],
        true,
    );
    check_sequence(
        "2019..2023-02-05",
        &zdt(&la, 2019, 1, 4, 1, 0, 0),
        &[
            zdt(&la, 2019, 2, 5, 0, 0, 0),
            zdt(&la, 2020, 2, 5, 0, 0, 0),
            zdt(&la, 2021, 2, 5, 0, 0, 0),
            zdt(&la, 2022, 2, 5, 0, 0, 0),
            zdt(&la, 2023, 2, 5, 0, 0, 0),
        ],
        true,
    );
    check_sequence(
        "2023-02-05..15/3",
        &zdt(&la, 2019, 1, 4, 1, 0, 0),
        &[
            zdt(&la, 2023, 2, 5, 0, 0, 0),
            zdt(&la, 2023, 2, 8, 0, 0, 0),
            zdt(&la, 2023, 2, 11, 0, 0, 0),
            zdt(&la, 2023, 2, 14, 0, 0, 0),
        ],
        true,
    );
}

#[test]
fn second_and_minute_wildcards() {
    let la = tz("America/Los_Angeles");
    let from = zdt(&la, 2019, 1, 4, 1, 0, 0);
    check_sequence(
        "*-*-* *:*:00",
        &from,
        &[
            zdt(&la, 2019, 1, 4, 1, 1, 0),
            zdt(&la, 2019, 1, 4, 1, 2, 0),
            zdt(&la, 2019, 1, 4, 1, 3, 0),
            zdt(&la, 2019, 1, 4, 1, 4, 0),
        ],
        false,
    );
    check_sequence(
        "*-*-* *:*:*",
        &from,
        &[
            zdt(&la, 2019, 1, 4, 1, 0, 1),
            zdt(&la, 2019, 1, 4, 1, 0, 2),
            zdt(&la, 2019, 1, 4, 1, 0, 3),
            zdt(&la, 2019, 1, 4, 1, 0, 4),
        ],
        false,
    );
    check_sequence(
        "*-*-* *:*:0/5",
        &from,
        &[
            zdt(&la, 2019, 1, 4, 1, 0, 5),
            zdt(&la, 2019, 1, 4, 1, 0, 10),
            zdt(&la, 2019, 1, 4, 1, 0, 15),
            zdt(&la, 2019, 1, 4, 1, 0, 20),
        ],
        false,
    );
}

#[test]
fn minute_ranges_and_lists() {
    let la = tz("America/Los_Angeles");
    let from = zdt(&la, 2019, 1, 4, 1, 0, 0);
    check_sequence(
        "00:17..43",
        &from,
        &[
            zdt(&la, 2019, 1, 5, 0, 17, 0),
            zdt(&la, 2019, 1, 5, 0, 18, 0),
            zdt(&la, 2019, 1, 5, 0, 19, 0),
            zdt(&la, 2019, 1, 5, 0, 20, 0),
        ],
        false,
    );
    check_sequence(
        "00:17,43",
        &from,
        &[
            zdt(&la, 2019, 1, 5, 0, 17, 0),
            zdt(&la, 2019, 1, 5, 0, 43, 0),
            zdt(&la, 2019, 1, 6, 0, 17, 0),
            zdt(&la, 2019, 1, 6, 0, 43, 0),
        ],
        false,
    );
}

#[test]
fn weekday_fields_select_days() {
    let la = tz("America/Los_Angeles");
    let from = zdt(&la, 2019, 1, 4, 1, 0, 0); // a Friday
    check_sequence(
        "MON 00:00",
        &from,
        &[
            zdt(&la, 2019, 1, 7, 0, 0, 0),
            zdt(&la, 2019, 1, 14, 0, 0, 0),
            zdt(&la, 2019, 1, 21, 0, 0, 0),
            zdt(&la, 2019, 1, 28, 0, 0, 0),
            zdt(&la, 2019, 2, 4, 0, 0, 0),
        ],
        false,
    );
    check_sequence(
        "friday 00:00",
        &from,
        &[
            zdt(&la, 2019, 1, 11, 0, 0, 0),
            zdt(&la, 2019, 1, 18, 0, 0, 0),
            zdt(&la, 2019, 1, 25, 0, 0, 0),
            zdt(&la, 2019, 2, 1, 0, 0, 0),
            zdt(&la, 2019, 2, 8, 0, 0, 0),
        ],
        false,
    );
    check_sequence(
        "SUN,SAT 00:00",
        &from,
        &[
            zdt(&la, 2019, 1, 5, 0, 0, 0),
            zdt(&la, 2019, 1, 6, 0, 0, 0),
            zdt(&la, 2019, 1, 12, 0, 0, 0),
            zdt(&la, 2019, 1, 13, 0, 0, 0),
            zdt(&la, 2019, 1, 19, 0, 0, 0),
            zdt(&la, 2019, 1, 20, 0, 0, 0),
            zdt(&la, 2019, 1, 26, 0, 0, 0),
            zdt(&la, 2019, 1, 27, 0, 0, 0),
            zdt(&la, 2019, 2, 2, 0, 0, 0),
            zdt(&la, 2019, 2, 3, 0, 0, 0),
        ],
        false,
    );
    check_sequence(
        "Fri..Sat 00:00",
        &from,
        &[
            zdt(&la, 2019, 1, 5, 0, 0, 0),
            zdt(&la, 2019, 1, 11, 0, 0, 0),
            zdt(&la, 2019, 1, 12, 0, 0, 0),
            zdt(&la, 2019, 1, 18, 0, 0, 0),
            zdt(&la, 2019, 1, 19, 0, 0, 0),
        ],
        false,
    );
}

#[test]
fn hour_fields() {
    let la = tz("America/Los_Angeles");
    let from = zdt(&la, 2019, 1, 4, 1, 0, 0);
    check_sequence(
        "*-*-* 01:00:00",
        &from,
        &[
            zdt(&la, 2019, 1, 5, 1, 0, 0),
            zdt(&la, 2019, 1, 6, 1, 0, 0),
            zdt(&la, 2019, 1, 7, 1, 0, 0),
            zdt(&la, 2019, 1, 8, 1, 0, 0),
            zdt(&la, 2019, 1, 9, 1, 0, 0),
            zdt(&la, 2019, 1, 10, 1, 0, 0),
            zdt(&la, 2019, 1, 11, 1, 0, 0),
        ],
        false,
    );
    check_sequence(
        "*-*-* 0/3:00:00",
        &from,
        &[
            zdt(&la, 2019, 1, 4, 3, 0, 0),
            zdt(&la, 2019, 1, 4, 6, 0, 0),
            zdt(&la, 2019, 1, 4, 9, 0, 0),
            zdt(&la, 2019, 1, 4, 12, 0, 0),
        ],
        false,
    );

    // hour list with holes: every listed hour at :10, then the next day
    let hours = [1, 2, 4, 5, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23];
    let mut expected: Vec<Zoned> = hours
        .iter()
        .map(|&h| zdt(&la, 2019, 1, 4, h, 10, 0))
        .collect();
    expected.push(zdt(&la, 2019, 1, 5, 0, 10, 0));
    check_sequence("*-*-* 0..2,4..5,7..23:10:00", &from, &expected, false);
}

#[test]
fn minute_steps_roll_into_the_next_hour() {
    let la = tz("America/Los_Angeles");
    let from = zdt(&la, 2019, 1, 4, 1, 0, 0);
    let expected = [
        zdt(&la, 2019, 1, 4, 1, 10, 0),
        zdt(&la, 2019, 1, 4, 1, 20, 0),
        zdt(&la, 2019, 1, 4, 1, 30, 0),
        zdt(&la, 2019, 1, 4, 1, 40, 0),
        zdt(&la, 2019, 1, 4, 1, 50, 0),
        zdt(&la, 2019, 1, 4, 2, 0, 0),
        zdt(&la, 2019, 1, 4, 2, 10, 0),
    ];
    check_sequence("*-*-* *:*/10:00", &from, &expected, false);
    check_sequence("*-*-* *:0/10:00", &from, &expected, false);
}

#[test]
fn day_ranges_with_hour_lists() {
    let la = tz("America/Los_Angeles");
    check_sequence(
        "*-*-1..5 04,12:00:00",
        &zdt(&la, 2019, 1, 4, 1, 0, 0),
        &[
            zdt(&la, 2019, 1, 4, 4, 0, 0),
            zdt(&la, 2019, 1, 4, 12, 0, 0),
            zdt(&la, 2019, 1, 5, 4, 0, 0),
            zdt(&la, 2019, 1, 5, 12, 0, 0),
        ],
        false,
    );
}

#[test]
fn leap_day_expressions() {
    let la = tz("America/Los_Angeles");
    check_sequence(
        "*-02-29 01:00:00",
        &zdt(&la, 2019, 1, 4, 1, 0, 0),
        &[
            zdt(&la, 2020, 2, 29, 1, 0, 0),
            zdt(&la, 2024, 2, 29, 1, 0, 0),
            zdt(&la, 2028, 2, 29, 1, 0, 0),
            zdt(&la, 2032, 2, 29, 1, 0, 0),
        ],
        false,
    );
}

#[test]
fn year_horizon() {
    let utc = tz("UTC");
    let from = zdt(&utc, 2013, 8, 31, 0, 0, 0);
    assert_eq!(Expression::must_parse("1980-*-* *:*").next(&from), None);
    assert_eq!(
        Expression::must_parse("2050-*-* *:*").next(&from),
        Some(zdt(&utc, 2050, 1, 1, 0, 0, 0))
    );
    // the zero instant passes through unmatched
    let zero = zdt(&utc, 1, 1, 1, 0, 0, 0);
    assert_eq!(Expression::must_parse("2099-*-* *:*").next(&zero), None);
}

#[test]
fn next_n_sequences() {
    let utc = tz("UTC");
    check_sequence(
        "SAT 00:00",
        &zdt(&utc, 2013, 9, 2, 8, 44, 30),
        &[
            zdt(&utc, 2013, 9, 7, 0, 0, 0),
            zdt(&utc, 2013, 9, 14, 0, 0, 0),
            zdt(&utc, 2013, 9, 21, 0, 0, 0),
            zdt(&utc, 2013, 9, 28, 0, 0, 0),
            zdt(&utc, 2013, 10, 5, 0, 0, 0),
        ],
        false,
    );
    check_sequence(
        "*:0/5",
        &zdt(&utc, 2013, 9, 2, 8, 44, 32),
        &[
            zdt(&utc, 2013, 9, 2, 8, 45, 0),
            zdt(&utc, 2013, 9, 2, 8, 50, 0),
            zdt(&utc, 2013, 9, 2, 8, 55, 0),
            zdt(&utc, 2013, 9, 2, 9, 0, 0),
            zdt(&utc, 2013, 9, 2, 9, 5, 0),
        ],
        false,
    );
}

#[test]
fn invalid_steps_are_parse_errors() {
    for input in ["*:0/60", "*:0/61", "*:2/60", "*:2..20/61", "*/60 * * * * *"] {
        assert!(Expression::parse(input).is_err(), "{input:?} should not parse");
    }
}
