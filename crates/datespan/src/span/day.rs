use std::fmt;

use chrono::NaiveDate;

use super::{Bounds, Span};
use crate::context::Context;
use crate::error::Result;
use crate::time_point::{TimeInput, TimePoint};

/// A single calendar day, from its first to its last local instant.
///
/// A day always holds at least one instant. Naming a date the zone skipped
/// whole resolves like any wall time in a DST gap, forward onto the next
/// existing day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Day {
    bounds: Bounds,
}

impl Day {
    /// The day containing `value`.
    pub fn new<'a>(value: impl Into<TimeInput<'a>>, ctx: &Context) -> Result<Self> {
        let point = TimePoint::cast(value, "day", ctx)?;
        Self::containing(&point)
    }

    /// The day containing `point`, in the point's zone.
    pub fn containing(point: &TimePoint) -> Result<Self> {
        Ok(Self {
            bounds: Bounds::new(point, point)?,
        })
    }

    /// The day containing the context clock's "now".
    pub fn today(ctx: &Context) -> Result<Self> {
        Self::containing(&ctx.now())
    }

    /// The calendar date in the day's zone.
    pub fn date(&self) -> NaiveDate {
        self.bounds.start().date_naive()
    }

    /// The following day: the one holding the instant right after this
    /// day's end.
    pub fn next(&self) -> Result<Self> {
        let end = self.bounds.end();
        Self::containing(&TimePoint::from_timestamp(end.timestamp() + 1, *end.zone())?)
    }

    /// The preceding day: the one holding the instant right before this
    /// day's start.
    pub fn previous(&self) -> Result<Self> {
        let start = self.bounds.start();
        Self::containing(&TimePoint::from_timestamp(start.timestamp() - 1, *start.zone())?)
    }

    /// Whether this is the current day in the day's own zone.
    pub fn is_today(&self, ctx: &Context) -> bool {
        let now = ctx.now().with_zone(*self.bounds.start().zone());
        now.date_naive() == self.date()
    }
}

impl Span for Day {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn amount_of_days(&self) -> u32 {
        1
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date().format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::Zone;
    use chrono::{TimeZone, Utc};

    fn ctx() -> Context {
        Context::new(Zone::resolve("Europe/Berlin").unwrap())
            .with_now(Utc.with_ymd_and_hms(2015, 6, 10, 22, 30, 0).unwrap())
    }

    #[test]
    fn test_day_bounds() {
        let day = Day::new("2014-12-31 15:45", &ctx()).unwrap();
        assert_eq!(day.start().to_string(), "2014-12-31 00:00:00+0100");
        assert_eq!(day.end().to_string(), "2014-12-31 23:59:59+0100");
        assert_eq!(day.start().date_naive(), day.end().date_naive());
        assert_eq!(day.amount_of_days(), 1);
    }

    #[test]
    fn test_next_crosses_year() {
        let day = Day::new("2014-12-31", &ctx()).unwrap();
        assert_eq!(day.next().unwrap().as_string(), "2015-01-01");
        assert_eq!(day.next().unwrap().previous().unwrap(), day);
    }

    #[test]
    fn test_previous_crosses_leap_month() {
        let day = Day::new("2008-03-01", &ctx()).unwrap();
        assert_eq!(day.previous().unwrap().to_string(), "2008-02-29");
    }

    #[test]
    fn test_next_over_dst_switch() {
        let day = Day::new("2015-03-29", &ctx()).unwrap();
        let next = day.next().unwrap();
        assert_eq!(next.to_string(), "2015-03-30");
        assert_eq!(next.start().to_string(), "2015-03-30 00:00:00+0200");
    }

    #[test]
    fn test_day_keeps_repeated_last_hour() {
        // Asuncion falls back at midnight: 23:00 to 23:59:59 on 2015-03-21 runs twice
        let asuncion = Zone::resolve("America/Asuncion").unwrap();
        let point = TimePoint::from_timestamp(1_426_995_000, asuncion).unwrap();
        assert_eq!(point.to_string(), "2015-03-21 23:30:00-0400");

        let day = Day::containing(&point).unwrap();
        assert!(day.contains_date(&point));
        assert!(!day.ends_before(&point));
        assert_eq!(day.start().to_string(), "2015-03-21 00:00:00-0300");
        assert_eq!(day.end().to_string(), "2015-03-21 23:59:59-0400");

        let next = day.next().unwrap();
        assert_eq!(next.to_string(), "2015-03-22");
        assert_eq!(next.start().timestamp(), day.end().timestamp() + 1);
        assert_eq!(day.end().timestamp() - day.start().timestamp(), 25 * 3600 - 1);
    }

    #[test]
    fn test_day_starting_after_skipped_midnight() {
        let ctx = Context::new(Zone::resolve("America/Santiago").unwrap());
        let day = Day::new("2016-08-14", &ctx).unwrap();
        assert_eq!(day.start().to_string(), "2016-08-14 01:00:00-0300");
        assert_eq!(day.previous().unwrap().end().timestamp() + 1, day.start().timestamp());
    }

    #[test]
    fn test_skipped_date_names_next_day() {
        let ctx = Context::new(Zone::resolve("Pacific/Apia").unwrap());
        let day = Day::new("2011-12-30", &ctx).unwrap();
        assert_eq!(day.to_string(), "2011-12-31");
        assert_eq!(day.previous().unwrap().to_string(), "2011-12-29");
        assert_eq!(day.previous().unwrap().next().unwrap(), day);
    }

    #[test]
    fn test_is_today_uses_own_zone() {
        let ctx = ctx();
        // 22:30 UTC on June 10 is already June 11 in Berlin
        assert!(Day::new("2015-06-11", &ctx).unwrap().is_today(&ctx));
        assert!(!Day::new("2015-06-10", &ctx).unwrap().is_today(&ctx));

        let utc_day = Day::containing(&ctx.now().with_zone(Zone::utc())).unwrap();
        assert_eq!(utc_day.to_string(), "2015-06-10");
        assert!(utc_day.is_today(&ctx));
    }

    #[test]
    fn test_today() {
        let ctx = ctx();
        assert_eq!(Day::today(&ctx).unwrap().to_string(), "2015-06-11");
    }

    #[test]
    fn test_days_yields_itself() {
        let day = Day::new("2015-03-10", &ctx()).unwrap();
        let days: Vec<Day> = day.days().collect();
        assert_eq!(days, vec![day]);
    }

    #[test]
    fn test_round_trip() {
        let ctx = ctx();
        let day = Day::new("2015-03-10", &ctx).unwrap();
        assert_eq!(Day::new(&day.as_string(), &ctx).unwrap(), day);
    }

    #[test]
    fn test_invalid_day_names_field() {
        let err = Day::new("2015-13-45", &ctx()).unwrap_err().to_string();
        assert!(err.contains("day") && err.contains("2015-13-45"), "got: {err}");
    }
}
