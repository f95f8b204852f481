//! Derive new time points by changing calendar or time-of-day fields.
//!
//! [`FieldModifier`] borrows an origin [`TimePoint`] and every method returns
//! a fresh point in the origin's zone; the origin is never touched.
//!
//! Explicit setters (`time_to`, `date_to`) validate their components
//! structurally. Single-field setters and the `by_*` family instead roll
//! over: hour 25 becomes 01:00 on the next day, day 32 of January becomes
//! February 1st, month 13 becomes January of the next year.

use chrono::{NaiveDate, NaiveTime, TimeDelta, Timelike};

use crate::error::{DatespanError, Result};
use crate::time_point::TimePoint;
use crate::zone::Fold;

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Builder deriving new [`TimePoint`]s from an origin.
#[derive(Debug, Clone, Copy)]
pub struct FieldModifier<'a> {
    origin: &'a TimePoint,
}

impl<'a> FieldModifier<'a> {
    /// Modifier deriving points from `origin`.
    pub fn new(origin: &'a TimePoint) -> Self {
        Self { origin }
    }

    /// The point every derived value starts from.
    pub fn origin(&self) -> &TimePoint {
        self.origin
    }

    // ── relative expressions ────────────────────────────────────────────

    /// Apply a relative expression such as `"+1 day"`, `"-2 weeks 3 hours"`,
    /// `"next month"` or `"tomorrow noon"`.
    ///
    /// Terms are applied left to right:
    /// - `[+|-]N <unit>` where unit is `sec`/`second`, `min`/`minute`,
    ///   `hour`, `day`, `week`, `fortnight`, `month` or `year` (plural allowed)
    /// - `next <unit>` / `last <unit>`
    /// - `today`/`midnight` (00:00:00), `noon` (12:00:00), `now` (no-op),
    ///   `tomorrow`/`yesterday` (±1 day at 00:00:00)
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidExpression`] if any term is not understood.
    pub fn to(&self, expression: &str) -> Result<TimePoint> {
        let adjustments = parse_relative(expression)?;
        let mut current = *self.origin;
        for adjustment in adjustments {
            current = adjustment.apply(&current)?;
        }
        Ok(current)
    }

    // ── time of day ─────────────────────────────────────────────────────

    /// Replace the time of day, keeping date and zone.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidField`] naming the first component
    /// outside `0..=23` / `0..=59` / `0..=59`.
    pub fn time_to(&self, hour: i64, minute: i64, second: i64) -> Result<TimePoint> {
        check_range("hour", hour, 0, 23, "an hour between 0 and 23")?;
        check_range("minute", minute, 0, 59, "a minute between 0 and 59")?;
        check_range("second", second, 0, 59, "a second between 0 and 59")?;
        self.set_time(hour, minute, second, Fold::Earlier)
    }

    /// 00:00:00 on the origin's date, or the first instant after it when
    /// midnight falls into a DST gap.
    pub fn time_to_start_of_day(&self) -> Result<TimePoint> {
        self.time_to(0, 0, 0)
    }

    /// The last second of the origin's date.
    ///
    /// Unlike `time_to(23, 59, 59)`, a wall time repeated by a fall-back
    /// transition at midnight resolves to its second occurrence, so the
    /// result is never followed by another instant of the same date.
    pub fn time_to_end_of_day(&self) -> Result<TimePoint> {
        self.set_time(23, 59, 59, Fold::Later)
    }

    /// Set the hour; values outside `0..=23` roll over into adjacent days.
    pub fn hour_to(&self, hour: i64) -> Result<TimePoint> {
        let o = self.origin;
        self.set_time(hour, i64::from(o.minutes()), i64::from(o.seconds()), Fold::Earlier)
    }

    /// Set the minute, rolling over into hours.
    pub fn minute_to(&self, minute: i64) -> Result<TimePoint> {
        let o = self.origin;
        self.set_time(i64::from(o.hours()), minute, i64::from(o.seconds()), Fold::Earlier)
    }

    /// Set the second, rolling over into minutes.
    pub fn second_to(&self, second: i64) -> Result<TimePoint> {
        let o = self.origin;
        self.set_time(i64::from(o.hours()), i64::from(o.minutes()), second, Fold::Earlier)
    }

    /// Shift the wall-clock hour by `delta`.
    pub fn by_hours(&self, delta: i64) -> Result<TimePoint> {
        self.hour_to(checked_shift("hours", self.origin.hours(), delta)?)
    }

    /// Shift the wall-clock minute by `delta`.
    pub fn by_minutes(&self, delta: i64) -> Result<TimePoint> {
        self.minute_to(checked_shift("minutes", self.origin.minutes(), delta)?)
    }

    /// Shift the wall-clock second by `delta`.
    pub fn by_seconds(&self, delta: i64) -> Result<TimePoint> {
        self.second_to(checked_shift("seconds", self.origin.seconds(), delta)?)
    }

    // ── date ────────────────────────────────────────────────────────────

    /// Replace the calendar date, keeping time of day and zone.
    ///
    /// Only the structural ranges are checked (month `1..=12`, day `1..=31`);
    /// `date_to(2015, 2, 31)` rolls over to March 3rd.
    pub fn date_to(&self, year: i64, month: i64, day: i64) -> Result<TimePoint> {
        check_range("month", month, 1, 12, "a month between 1 and 12")?;
        check_range("day", day, 1, 31, "a day between 1 and 31")?;
        self.set_date(year, month, day)
    }

    /// Set the year; Feb 29 in a common year becomes Mar 1.
    pub fn year_to(&self, year: i64) -> Result<TimePoint> {
        let o = self.origin;
        self.set_date(year, i64::from(o.month()), i64::from(o.day()))
    }

    /// Set the month. 13 is January of the next year, 0 is December of the
    /// previous one, and a day past the new month's end spills forward.
    pub fn month_to(&self, month: i64) -> Result<TimePoint> {
        let o = self.origin;
        self.set_date(i64::from(o.year()), month, i64::from(o.day()))
    }

    /// Set the day of month, rolling over into adjacent months.
    pub fn day_to(&self, day: i64) -> Result<TimePoint> {
        let o = self.origin;
        self.set_date(i64::from(o.year()), i64::from(o.month()), day)
    }

    /// Shift the year by `delta`.
    pub fn by_years(&self, delta: i64) -> Result<TimePoint> {
        let year = i64::from(self.origin.year())
            .checked_add(delta)
            .ok_or_else(|| DatespanError::field("years", delta, "a representable year offset"))?;
        self.year_to(year)
    }

    /// Shift the month by `delta`.
    pub fn by_months(&self, delta: i64) -> Result<TimePoint> {
        self.month_to(checked_shift("months", self.origin.month(), delta)?)
    }

    /// Shift the calendar date by `delta` days, keeping the wall time.
    pub fn by_days(&self, delta: i64) -> Result<TimePoint> {
        self.day_to(checked_shift("days", self.origin.day(), delta)?)
    }

    // ── rollover core ───────────────────────────────────────────────────

    /// Wall-clock time of day `hour:minute:second` on the origin's date,
    /// carrying overflow into the date.
    fn set_time(&self, hour: i64, minute: i64, second: i64, fold: Fold) -> Result<TimePoint> {
        let seconds = hour
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|h| minute.checked_mul(SECONDS_PER_MINUTE).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(second))
            .ok_or_else(|| {
                DatespanError::field(
                    "time",
                    format!("{hour}:{minute}:{second}"),
                    "a representable time of day",
                )
            })?;
        self.at_wall_clock(self.origin.date_naive(), seconds, fold)
    }

    /// Wall-clock `year-month-day` at the origin's time of day, carrying
    /// month overflow into the year and day overflow into the month.
    fn set_date(&self, year: i64, month: i64, day: i64) -> Result<TimePoint> {
        let out_of_range = || {
            DatespanError::field("date", format!("{year}-{month}-{day}"), "a representable date")
        };

        let months = year
            .checked_mul(12)
            .and_then(|y| y.checked_add(month - 1))
            .ok_or_else(out_of_range)?;
        let normalized_year = i32::try_from(months.div_euclid(12)).map_err(|_| out_of_range())?;
        let normalized_month =
            u32::try_from(months.rem_euclid(12) + 1).map_err(|_| out_of_range())?;

        let date = NaiveDate::from_ymd_opt(normalized_year, normalized_month, 1)
            .and_then(|first| {
                TimeDelta::try_days(day - 1).and_then(|offset| first.checked_add_signed(offset))
            })
            .ok_or_else(out_of_range)?;

        let time_of_day = i64::from(self.origin.local().time().num_seconds_from_midnight());
        self.at_wall_clock(date, time_of_day, Fold::Earlier)
    }

    fn at_wall_clock(
        &self,
        date: NaiveDate,
        seconds_from_midnight: i64,
        fold: Fold,
    ) -> Result<TimePoint> {
        let naive = TimeDelta::try_seconds(seconds_from_midnight)
            .and_then(|offset| date.and_time(NaiveTime::MIN).checked_add_signed(offset))
            .ok_or_else(|| {
                DatespanError::field("time", seconds_from_midnight, "a representable time of day")
            })?;
        TimePoint::from_local_with(naive, *self.origin.zone(), fold)
    }
}

fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
    expected: &'static str,
) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DatespanError::field(field, value, expected))
    }
}

fn checked_shift(field: &'static str, current: u32, delta: i64) -> Result<i64> {
    i64::from(current)
        .checked_add(delta)
        .ok_or_else(|| DatespanError::field(field, delta, "a representable offset"))
}

// ── relative expression grammar ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Fortnight,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Shift(i64, Unit),
    Midnight,
    Noon,
}

impl Adjustment {
    fn apply(self, point: &TimePoint) -> Result<TimePoint> {
        let m = point.modify();
        match self {
            Self::Shift(n, Unit::Second) => m.by_seconds(n),
            Self::Shift(n, Unit::Minute) => m.by_minutes(n),
            Self::Shift(n, Unit::Hour) => m.by_hours(n),
            Self::Shift(n, Unit::Day) => m.by_days(n),
            Self::Shift(n, Unit::Week) => m.by_days(scaled(n, 7)?),
            Self::Shift(n, Unit::Fortnight) => m.by_days(scaled(n, 14)?),
            Self::Shift(n, Unit::Month) => m.by_months(n),
            Self::Shift(n, Unit::Year) => m.by_years(n),
            Self::Midnight => m.time_to_start_of_day(),
            Self::Noon => m.time_to(12, 0, 0),
        }
    }
}

fn scaled(n: i64, factor: i64) -> Result<i64> {
    n.checked_mul(factor)
        .ok_or_else(|| DatespanError::InvalidExpression(format!("amount {n} is too large")))
}

fn parse_unit(s: &str) -> Option<Unit> {
    let singular = s.strip_suffix('s').unwrap_or(s);
    match singular {
        "sec" | "second" => Some(Unit::Second),
        "min" | "minute" => Some(Unit::Minute),
        "hour" => Some(Unit::Hour),
        "day" => Some(Unit::Day),
        "week" => Some(Unit::Week),
        "fortnight" => Some(Unit::Fortnight),
        "month" => Some(Unit::Month),
        "year" => Some(Unit::Year),
        _ => None,
    }
}

/// Parse a relative expression into an ordered list of adjustments.
fn parse_relative(expression: &str) -> Result<Vec<Adjustment>> {
    let normalized = expression.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(DatespanError::InvalidExpression(
            "empty relative expression".to_string(),
        ));
    }

    let unknown = |term: &str| {
        DatespanError::InvalidExpression(format!("unknown term '{term}' in '{}'", expression.trim()))
    };

    let mut adjustments = Vec::new();
    let mut tokens = normalized.split_whitespace();

    while let Some(token) = tokens.next() {
        match token {
            "now" => {}
            "today" | "midnight" => adjustments.push(Adjustment::Midnight),
            "noon" => adjustments.push(Adjustment::Noon),
            "tomorrow" => {
                adjustments.push(Adjustment::Shift(1, Unit::Day));
                adjustments.push(Adjustment::Midnight);
            }
            "yesterday" => {
                adjustments.push(Adjustment::Shift(-1, Unit::Day));
                adjustments.push(Adjustment::Midnight);
            }
            "next" | "last" => {
                let unit_token = tokens.next().ok_or_else(|| {
                    DatespanError::InvalidExpression(format!(
                        "expected unit after '{token}' in '{}'",
                        expression.trim()
                    ))
                })?;
                let unit = parse_unit(unit_token).ok_or_else(|| unknown(unit_token))?;
                let n = if token == "next" { 1 } else { -1 };
                adjustments.push(Adjustment::Shift(n, unit));
            }
            _ => {
                // "+3 days", "-1 week", "2 hours", "+3days"
                let split = token
                    .char_indices()
                    .skip(1)
                    .find(|(_, c)| !c.is_ascii_digit())
                    .map_or(token.len(), |(i, _)| i);
                let (number, attached_unit) = token.split_at(split);
                let n: i64 = number.parse().map_err(|_| unknown(token))?;
                let unit_token = if attached_unit.is_empty() {
                    tokens.next().ok_or_else(|| {
                        DatespanError::InvalidExpression(format!(
                            "number without unit at end of '{}'",
                            expression.trim()
                        ))
                    })?
                } else {
                    attached_unit
                };
                let unit = parse_unit(unit_token).ok_or_else(|| unknown(unit_token))?;
                adjustments.push(Adjustment::Shift(n, unit));
            }
        }
    }

    Ok(adjustments)
}
