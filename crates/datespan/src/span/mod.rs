//! Calendar spans: closed intervals of whole days.
//!
//! Every span owns a normalized [`Bounds`] pair: the start is moved to the
//! first and the end to the last instant of their calendar days (00:00:00 and
//! 23:59:59 outside DST transitions), each in the zone of the point that
//! produced it. Shared behavior (boundary comparisons,
//! containment, day counting, day iteration) lives in default methods of the
//! [`Span`] trait; the concrete kinds override only what differs.
//!
//! | Kind | Canonical string | Days |
//! |---|---|---|
//! | [`Day`] | `2015-01-01` | 1 |
//! | [`Week`] | `2007-W14` | 7 |
//! | [`Month`] | `2008-02` | 28 to 31 |
//! | [`Year`] | `2015` | 365/366 |
//! | [`CustomDatespan`] | `2015-01-01,2015-12-31` | inclusive difference |
//!
//! Day counts cover the local dates that exist in the span's zone. A date a
//! zone skipped whole (`Pacific/Apia` went from 2011-12-29 to 2011-12-31) is
//! not counted and not iterated.

mod custom;
mod day;
mod iter;
mod month;
mod week;
mod year;

use std::fmt;

use serde::{Serialize, Serializer};

pub use custom::CustomDatespan;
pub use day::Day;
pub use iter::{Days, Months};
pub use month::Month;
pub use week::Week;
pub use year::Year;

use crate::context::Context;
use crate::error::Result;
use crate::time_point::TimePoint;
use crate::zone::Zone;

/// A normalized `(start, end)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    start: TimePoint,
    end: TimePoint,
}

impl Bounds {
    /// Normalize `start` to the first and `end` to the last second of their days.
    pub fn new(start: &TimePoint, end: &TimePoint) -> Result<Self> {
        Ok(Self {
            start: start.modify().time_to_start_of_day()?,
            end: end.modify().time_to_end_of_day()?,
        })
    }

    /// First instant of the start day.
    pub fn start(&self) -> &TimePoint {
        &self.start
    }

    /// Last instant of the end day.
    pub fn end(&self) -> &TimePoint {
        &self.end
    }

    /// Whole calendar days from the start day to the end day.
    pub fn day_difference(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days()
    }

    /// Local dates from the start day to the end day, both included, that
    /// exist in the start's zone.
    pub fn local_day_count(&self) -> u32 {
        let zone = self.start.zone();
        let last = self.end.date_naive();
        let count = self
            .start
            .date_naive()
            .iter_days()
            .take_while(|date| *date <= last)
            .filter(|date| zone.has_local_date(*date))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Parse a non-empty run of ASCII digits; signs and whitespace are rejected.
pub(crate) fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Behavior shared by every calendar span.
pub trait Span: fmt::Display {
    /// The normalized boundary pair.
    fn bounds(&self) -> &Bounds;

    /// First second of the span.
    fn start(&self) -> &TimePoint {
        self.bounds().start()
    }

    /// Last second of the span.
    fn end(&self) -> &TimePoint {
        self.bounds().end()
    }

    /// The span starts strictly before `date`.
    fn starts_before(&self, date: &TimePoint) -> bool {
        self.start().is_before(date)
    }

    /// The span starts strictly after `date`.
    fn starts_after(&self, date: &TimePoint) -> bool {
        self.start().is_after(date)
    }

    /// The span ends strictly before `date`.
    fn ends_before(&self, date: &TimePoint) -> bool {
        self.end().is_before(date)
    }

    /// The span ends strictly after `date`.
    fn ends_after(&self, date: &TimePoint) -> bool {
        self.end().is_after(date)
    }

    /// Format the start with a strftime pattern, optionally in another zone.
    fn format_start(&self, pattern: &str, zone: Option<&Zone>) -> Result<String> {
        self.start().format_in(pattern, zone)
    }

    /// Format the end with a strftime pattern, optionally in another zone.
    fn format_end(&self, pattern: &str, zone: Option<&Zone>) -> Result<String> {
        self.end().format_in(pattern, zone)
    }

    /// Number of calendar days covered, both ends included. Equals the
    /// number of days [`Span::days`] yields.
    fn amount_of_days(&self) -> u32 {
        self.bounds().local_day_count()
    }

    /// Whether the span starts after the end of today in the context's default zone.
    fn is_in_future(&self, ctx: &Context) -> Result<bool> {
        let end_of_today = ctx.now().modify().time_to_end_of_day()?;
        Ok(self.start().is_after(&end_of_today))
    }

    /// Boundary-inclusive containment.
    fn contains_date(&self, date: &TimePoint) -> bool {
        !date.is_before(self.start()) && !date.is_after(self.end())
    }

    /// Canonical string form, accepted back by [`crate::parse_span`].
    fn as_string(&self) -> String {
        self.to_string()
    }

    /// Lazy cursor over every day of the span.
    fn days(&self) -> Days<'_, Self>
    where
        Self: Sized,
    {
        Days::new(self)
    }
}

/// One of the concrete span kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datespan {
    Day(Day),
    Week(Week),
    Month(Month),
    Year(Year),
    Custom(CustomDatespan),
}

impl Datespan {
    fn inner(&self) -> &dyn Span {
        match self {
            Self::Day(span) => span,
            Self::Week(span) => span,
            Self::Month(span) => span,
            Self::Year(span) => span,
            Self::Custom(span) => span,
        }
    }
}

impl Span for Datespan {
    fn bounds(&self) -> &Bounds {
        self.inner().bounds()
    }

    fn amount_of_days(&self) -> u32 {
        self.inner().amount_of_days()
    }
}

impl fmt::Display for Datespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl From<Day> for Datespan {
    fn from(span: Day) -> Self {
        Self::Day(span)
    }
}

impl From<Week> for Datespan {
    fn from(span: Week) -> Self {
        Self::Week(span)
    }
}

impl From<Month> for Datespan {
    fn from(span: Month) -> Self {
        Self::Month(span)
    }
}

impl From<Year> for Datespan {
    fn from(span: Year) -> Self {
        Self::Year(span)
    }
}

impl From<CustomDatespan> for Datespan {
    fn from(span: CustomDatespan) -> Self {
        Self::Custom(span)
    }
}

macro_rules! serialize_as_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(
                    &self,
                    serializer: S,
                ) -> std::result::Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )+
    };
}

serialize_as_display!(Day, Week, Month, Year, CustomDatespan, Datespan);
