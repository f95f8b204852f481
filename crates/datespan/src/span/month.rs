use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use super::{parse_digits, Bounds, Span};
use crate::context::Context;
use crate::error::{DatespanError, Result};
use crate::time_point::TimePoint;

/// A calendar month. The day count is computed once at construction and
/// leaves out local dates the zone skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Month {
    bounds: Bounds,
    year: i32,
    month: u32,
    days: u32,
}

impl Month {
    /// `month` of `year` in the context's default zone.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidField`] if `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32, ctx: &Context) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(DatespanError::field("month", month, "a month between 1 and 12"));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DatespanError::field("year", year, "a year within the supported range"))?;
        let point = TimePoint::from_local(first.and_time(NaiveTime::MIN), ctx.default_zone())?;
        Self::containing(&point)
    }

    /// The month containing `point`, in the point's zone.
    pub fn containing(point: &TimePoint) -> Result<Self> {
        let first = point.modify().day_to(1)?;
        let last = first.modify().by_months(1)?.modify().by_days(-1)?;
        let bounds = Bounds::new(&first, &last)?;
        Ok(Self {
            bounds,
            year: first.year(),
            month: first.month(),
            days: bounds.local_day_count(),
        })
    }

    /// The month containing the context clock's "now".
    pub fn current(ctx: &Context) -> Result<Self> {
        Self::containing(&ctx.now())
    }

    /// The month before the current one, whatever today's day of month.
    pub fn last(ctx: &Context) -> Result<Self> {
        Self::current(ctx)?.previous()
    }

    /// The previous month on the first day of a month, the current one otherwise.
    pub fn current_or_last_when_first_day(ctx: &Context) -> Result<Self> {
        let current = Self::current(ctx)?;
        if ctx.now().day() == 1 {
            current.previous()
        } else {
            Ok(current)
        }
    }

    /// Parse `YYYY-MM`.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidField`] naming the year or month
    /// component that is missing, non-numeric, or out of range.
    pub fn from_string(value: &str, ctx: &Context) -> Result<Self> {
        let trimmed = value.trim();
        let (year_part, month_part) = trimmed
            .split_once('-')
            .ok_or_else(|| DatespanError::field("month", value, "a YYYY-MM month"))?;

        let year: i32 = parse_digits(year_part)
            .ok_or_else(|| DatespanError::field("year", year_part, "a numeric year"))?;
        let month: u32 = parse_digits(month_part)
            .ok_or_else(|| DatespanError::field("month", month_part, "a numeric month"))?;

        Self::new(year, month, ctx)
    }

    /// Calendar year of the month.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of the year, 1-based.
    pub fn number(&self) -> u32 {
        self.month
    }

    /// The following month, rolling into January of the next year.
    pub fn next(&self) -> Result<Self> {
        Self::containing(&self.bounds.start().modify().by_months(1)?)
    }

    /// The preceding month.
    pub fn previous(&self) -> Result<Self> {
        Self::containing(&self.bounds.start().modify().by_months(-1)?)
    }

    /// Whether "now", seen in the month's own zone, falls in this month.
    pub fn is_current_month(&self, ctx: &Context) -> bool {
        let now = ctx.now().with_zone(*self.bounds.start().zone());
        now.year() == self.year && now.month() == self.month
    }
}

impl Span for Month {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn amount_of_days(&self) -> u32 {
        self.days
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
