use std::fmt;

use chrono::{NaiveDate, NaiveTime, Weekday};

use super::{parse_digits, Bounds, Span};
use crate::context::Context;
use crate::error::{DatespanError, Result};
use crate::time_point::{TimeInput, TimePoint};

/// Seven consecutive days starting at a reference day.
///
/// Outside the rare dates a zone skipped whole, a week covers exactly seven
/// local days.
///
/// The week number and week-year are the ISO 8601 values of the first day,
/// so a week built from a Monday round-trips through `YYYY-Www`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Week {
    bounds: Bounds,
    year: i32,
    number: u32,
}

impl Week {
    /// The week whose first day contains `value`.
    pub fn new<'a>(value: impl Into<TimeInput<'a>>, ctx: &Context) -> Result<Self> {
        let point = TimePoint::cast(value, "week", ctx)?;
        Self::starting(&point)
    }

    /// The week starting on the day of `point`.
    pub fn starting(point: &TimePoint) -> Result<Self> {
        let last = point.modify().by_days(6)?;
        let bounds = Bounds::new(point, &last)?;
        let iso = bounds.start().iso_week();
        Ok(Self {
            bounds,
            year: iso.year(),
            number: iso.week(),
        })
    }

    /// The week starting today.
    pub fn current(ctx: &Context) -> Result<Self> {
        Self::starting(&ctx.now())
    }

    /// Parse `YYYY-Www` into the week starting on that ISO week's Monday.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidField`] naming the year or week
    /// component that is missing, non-numeric, or not a week of that year.
    pub fn from_string(value: &str, ctx: &Context) -> Result<Self> {
        let trimmed = value.trim();
        let (year_part, week_part) = trimmed
            .split_once('-')
            .ok_or_else(|| DatespanError::field("week", value, "a YYYY-Www week"))?;

        let year: i32 = parse_digits(year_part)
            .ok_or_else(|| DatespanError::field("year", year_part, "a numeric year"))?;
        let number: u32 = week_part
            .strip_prefix(['W', 'w'])
            .and_then(parse_digits)
            .ok_or_else(|| DatespanError::field("week", week_part, "a week like W14"))?;

        let monday = NaiveDate::from_isoywd_opt(year, number, Weekday::Mon).ok_or_else(|| {
            DatespanError::field("week", number, "a week number that exists in that ISO year")
        })?;
        let point = TimePoint::from_local(monday.and_time(NaiveTime::MIN), ctx.default_zone())?;
        Self::starting(&point)
    }

    /// ISO week number of the first day.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// ISO week-year of the first day.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The week starting seven days later.
    pub fn next(&self) -> Result<Self> {
        Self::starting(&self.bounds.start().modify().by_days(7)?)
    }

    /// The week starting seven days earlier.
    pub fn previous(&self) -> Result<Self> {
        Self::starting(&self.bounds.start().modify().by_days(-7)?)
    }
}

impl Span for Week {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.number)
    }
}
