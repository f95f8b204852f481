use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use super::{parse_digits, Bounds, Months, Span};
use crate::context::Context;
use crate::error::{DatespanError, Result};
use crate::time_point::TimePoint;

/// A calendar year, January 1st to December 31st.
///
/// 365 or 366 days, less any local dates the zone skipped that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Year {
    bounds: Bounds,
    year: i32,
    days: u32,
}

impl Year {
    /// `year` in the context's default zone.
    pub fn new(year: i32, ctx: &Context) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| DatespanError::field("year", year, "a year within the supported range"))?;
        let point = TimePoint::from_local(first.and_time(NaiveTime::MIN), ctx.default_zone())?;
        Self::containing(&point)
    }

    /// The year containing `point`, in the point's zone.
    pub fn containing(point: &TimePoint) -> Result<Self> {
        let year = i64::from(point.year());
        let first = point.modify().date_to(year, 1, 1)?;
        let last = point.modify().date_to(year, 12, 31)?;
        let bounds = Bounds::new(&first, &last)?;
        Ok(Self {
            bounds,
            year: point.year(),
            days: bounds.local_day_count(),
        })
    }

    /// The year containing the context clock's "now".
    pub fn current(ctx: &Context) -> Result<Self> {
        Self::containing(&ctx.now())
    }

    /// Parse an all-digit year such as `2015`.
    pub fn from_string(value: &str, ctx: &Context) -> Result<Self> {
        let year: i32 = parse_digits(value.trim())
            .ok_or_else(|| DatespanError::field("year", value, "a numeric year"))?;
        Self::new(year, ctx)
    }

    /// The year number.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Gregorian leap-year rule, applied proleptically.
    pub fn is_leap(&self) -> bool {
        NaiveDate::from_ymd_opt(self.year, 2, 29).is_some()
    }

    /// The following year.
    pub fn next(&self) -> Result<Self> {
        Self::containing(&self.bounds.start().modify().by_years(1)?)
    }

    /// The preceding year.
    pub fn previous(&self) -> Result<Self> {
        Self::containing(&self.bounds.start().modify().by_years(-1)?)
    }

    /// Whether "now", seen in the year's own zone, falls in this year.
    pub fn is_current_year(&self, ctx: &Context) -> bool {
        ctx.now().with_zone(*self.bounds.start().zone()).year() == self.year
    }

    /// Lazy cursor over the twelve months of the year.
    pub fn months(&self) -> Months<'_> {
        Months::new(self)
    }
}

impl Span for Year {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn amount_of_days(&self) -> u32 {
        self.days
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)
    }
}
