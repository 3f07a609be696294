use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime};

use crate::error::Error;

/// Reporting window granularity for stats queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(Error::validation(format!(
                "invalid period {other:?} (expected day, week or month)"
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
        }
    }
}

/// Parses a `YYYY-MM-DD` calendar-date literal.
pub fn parse_date(s: &str) -> Result<Date, Error> {
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(s, &fmt)
        .map_err(|_| Error::validation(format!("invalid date {s:?}, expected YYYY-MM-DD")))
}

/// `[midnight, midnight + 24h)` around the anchor, UTC.
pub fn day_window(anchor: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = anchor.midnight().assume_utc();
    (start, start + Duration::days(1))
}

/// Resolves the half-open `[start, end)` window for a period around an anchor
/// date. Weeks start on Monday, so a Sunday anchor falls on day 7 of the
/// preceding Monday-start week; month windows snap to the 1st.
pub fn resolve_window(period: Period, anchor: Date) -> (OffsetDateTime, OffsetDateTime) {
    match period {
        Period::Day => day_window(anchor),
        Period::Week => {
            let monday = anchor - Duration::days(anchor.weekday().number_days_from_monday() as i64);
            let start = monday.midnight().assume_utc();
            (start, start + Duration::days(7))
        }
        Period::Month => {
            let first = Date::from_calendar_date(anchor.year(), anchor.month(), 1)
                .expect("day 1 exists in every month");
            let next = match first.month() {
                Month::December => Date::from_calendar_date(first.year() + 1, Month::January, 1),
                m => Date::from_calendar_date(first.year(), m.next(), 1),
            }
            .expect("day 1 exists in every month");
            (first.midnight().assume_utc(), next.midnight().assume_utc())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn period_parses_known_labels() {
        assert_eq!("day".parse::<Period>().unwrap(), Period::Day);
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
        assert!("year".parse::<Period>().is_err());
        assert!("Day".parse::<Period>().is_err());
    }

    #[test]
    fn day_window_is_midnight_to_midnight() {
        let (start, end) = resolve_window(Period::Day, date!(2024 - 03 - 15));
        assert_eq!(start, date!(2024 - 03 - 15).midnight().assume_utc());
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn week_window_snaps_to_monday() {
        // 2024-03-15 is a Friday; the containing week starts Monday the 11th.
        let (start, end) = resolve_window(Period::Week, date!(2024 - 03 - 15));
        assert_eq!(start, date!(2024 - 03 - 11).midnight().assume_utc());
        assert_eq!(end - start, Duration::days(7));
    }

    #[test]
    fn sunday_anchor_belongs_to_previous_monday_week() {
        // 2024-03-17 is a Sunday, day 7 of the week starting Monday the 11th.
        let (start, _) = resolve_window(Period::Week, date!(2024 - 03 - 17));
        assert_eq!(start, date!(2024 - 03 - 11).midnight().assume_utc());
    }

    #[test]
    fn month_window_snaps_to_first_of_month() {
        let (start, end) = resolve_window(Period::Month, date!(2023 - 10 - 27));
        assert_eq!(start, date!(2023 - 10 - 01).midnight().assume_utc());
        assert_eq!(end, date!(2023 - 11 - 01).midnight().assume_utc());
    }

    #[test]
    fn december_window_rolls_into_next_year() {
        let (start, end) = resolve_window(Period::Month, date!(2023 - 12 - 31));
        assert_eq!(start, date!(2023 - 12 - 01).midnight().assume_utc());
        assert_eq!(end, date!(2024 - 01 - 01).midnight().assume_utc());
    }

    #[test]
    fn parse_date_accepts_calendar_literals_only() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date!(2024 - 02 - 29));
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("").is_err());
    }
}
