//! Timezone handle: IANA zones from chrono-tz plus fixed numeric offsets.
//!
//! A [`Zone`] answers offset and DST queries for an instant and converts
//! local wall-clock times back to instants. Wall times that fall into a DST
//! gap are shifted forward by the length of the gap; wall times that occur
//! twice (fall back) resolve to the earlier instant unless the caller asks
//! for the later one with [`Fold::Later`].

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Utc,
};
use chrono_tz::{OffsetComponents, Tz};
use serde::{Serialize, Serializer};

use crate::context::Context;
use crate::error::{DatespanError, Result};
use crate::time_point::TimePoint;

/// Range of years scanned by [`Zone::has_dst`].
const DST_SCAN_YEARS: (i32, i32) = (1900, 2100);

/// Which occurrence of a repeated wall time to pick when clocks fall back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Fold {
    /// The first occurrence, before the transition.
    #[default]
    Earlier,
    /// The second occurrence, after the transition. End-of-day boundaries
    /// use this so a day keeps its repeated last hour.
    Later,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ZoneKind {
    Named(Tz),
    Fixed(FixedOffset),
}

/// A timezone: either an IANA zone or a fixed UTC offset.
///
/// Two zones are equal iff their identifiers are equal, so `Europe/Berlin`
/// and a fixed `+01:00` are different zones even when their offsets agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zone {
    kind: ZoneKind,
}

impl Zone {
    /// Resolve an IANA identifier (e.g. `"Europe/Berlin"`).
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidTimezone`] if the identifier is unknown
    /// to the timezone database.
    pub fn resolve(identifier: &str) -> Result<Self> {
        identifier
            .trim()
            .parse::<Tz>()
            .map(Self::from)
            .map_err(|_| DatespanError::InvalidTimezone(identifier.to_string()))
    }

    /// The UTC zone.
    pub fn utc() -> Self {
        Self::from(Tz::UTC)
    }

    /// A zone with a constant offset of `seconds` east of UTC.
    pub fn fixed(seconds: i32) -> Result<Self> {
        FixedOffset::east_opt(seconds)
            .map(Self::from)
            .ok_or_else(|| DatespanError::field("offset", seconds, "less than 24 hours from UTC"))
    }

    /// The zone identifier: the IANA name, or `±HH:MM` for fixed offsets.
    pub fn name(&self) -> String {
        match self.kind {
            ZoneKind::Named(tz) => tz.name().to_string(),
            ZoneKind::Fixed(offset) => offset.to_string(),
        }
    }

    /// Signed seconds east of UTC at `instant`, DST included.
    pub fn offset_seconds(&self, instant: &DateTime<Utc>) -> i32 {
        match self.kind {
            ZoneKind::Named(tz) => tz
                .offset_from_utc_datetime(&instant.naive_utc())
                .fix()
                .local_minus_utc(),
            ZoneKind::Fixed(offset) => offset.local_minus_utc(),
        }
    }

    /// Offset at the context clock's current instant.
    pub fn offset_seconds_now(&self, ctx: &Context) -> i32 {
        self.offset_seconds(&ctx.now_utc())
    }

    /// The offset at `instant` formatted as `±HHMM` (e.g. `+0200`, `-0530`).
    pub fn offset_string(&self, instant: &DateTime<Utc>) -> String {
        let offset_secs = self.offset_seconds(instant);
        let sign = if offset_secs >= 0 { "+" } else { "-" };
        let abs_secs = offset_secs.unsigned_abs();
        let hours = abs_secs / 3600;
        let minutes = (abs_secs % 3600) / 60;
        format!("{sign}{hours:02}{minutes:02}")
    }

    /// The `±HHMM` offset this zone has at the instant of `point`.
    pub fn offset(&self, point: &TimePoint) -> String {
        self.offset_string(&point.to_utc())
    }

    /// Whether daylight saving time is in effect at `instant`.
    pub fn is_dst(&self, instant: &DateTime<Utc>) -> bool {
        match self.kind {
            ZoneKind::Named(tz) => {
                tz.offset_from_utc_datetime(&instant.naive_utc()).dst_offset() != TimeDelta::zero()
            }
            ZoneKind::Fixed(_) => false,
        }
    }

    /// Whether the zone observed DST at any point of its known history.
    ///
    /// chrono-tz does not expose its transition tables, so this samples the
    /// zone weekly across [`DST_SCAN_YEARS`].
    pub fn has_dst(&self) -> bool {
        let ZoneKind::Named(tz) = self.kind else {
            return false;
        };
        let Some(first) = NaiveDate::from_ymd_opt(DST_SCAN_YEARS.0, 1, 1) else {
            return false;
        };
        first
            .iter_weeks()
            .take_while(|date| date.year() <= DST_SCAN_YEARS.1)
            .any(|date| {
                tz.offset_from_utc_datetime(&date.and_time(NaiveTime::MIN))
                    .dst_offset()
                    != TimeDelta::zero()
            })
    }

    /// Re-anchor `point` to this zone. The instant is unchanged.
    pub fn translate(&self, point: &TimePoint) -> TimePoint {
        point.with_zone(*self)
    }

    /// `instant` as a wall-clock value in this zone.
    pub fn local(&self, instant: &DateTime<Utc>) -> DateTime<FixedOffset> {
        match self.kind {
            ZoneKind::Named(tz) => instant.with_timezone(&tz).fixed_offset(),
            ZoneKind::Fixed(offset) => instant.with_timezone(&offset),
        }
    }

    /// Format `instant` in this zone with a strftime pattern.
    ///
    /// IANA zones render `%Z` as the zone abbreviation (`CEST`).
    pub(crate) fn write_formatted(
        &self,
        out: &mut impl fmt::Write,
        instant: &DateTime<Utc>,
        pattern: &str,
    ) -> fmt::Result {
        match self.kind {
            ZoneKind::Named(tz) => write!(out, "{}", instant.with_timezone(&tz).format(pattern)),
            ZoneKind::Fixed(offset) => {
                write!(out, "{}", instant.with_timezone(&offset).format(pattern))
            }
        }
    }

    /// Convert a local wall-clock time in this zone to an instant, taking
    /// the earlier instant when the wall time occurs twice.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidDatetime`] only when shifting a
    /// nonexistent wall time leaves the representable range.
    pub fn resolve_local(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
        self.resolve_local_with(naive, Fold::Earlier)
    }

    /// Like [`Zone::resolve_local`], with `fold` choosing between the two
    /// instants of a repeated wall time.
    pub fn resolve_local_with(&self, naive: NaiveDateTime, fold: Fold) -> Result<DateTime<Utc>> {
        match self.lookup_local(naive) {
            LocalResult::Single(instant) => Ok(instant),
            LocalResult::Ambiguous(a, b) => Ok(match fold {
                Fold::Earlier => a.min(b),
                Fold::Later => a.max(b),
            }),
            LocalResult::None => {
                let shifted = self.shift_out_of_gap(naive)?;
                tracing::warn!(
                    message = "local time falls into a DST gap, shifting forward",
                    zone = %self,
                    %naive,
                    resolved = %shifted,
                );
                Ok(shifted)
            }
        }
    }

    /// Whether the local calendar `date` has at least one instant in this
    /// zone. False only for dates skipped whole, such as 2011-12-30 in
    /// `Pacific/Apia`.
    pub fn has_local_date(&self, date: NaiveDate) -> bool {
        let midnight = date.and_time(NaiveTime::MIN);
        match self.lookup_local(midnight) {
            LocalResult::None => self
                .shift_out_of_gap(midnight)
                .is_ok_and(|instant| self.local(&instant).date_naive() == date),
            _ => true,
        }
    }

    fn lookup_local(&self, naive: NaiveDateTime) -> LocalResult<DateTime<Utc>> {
        match self.kind {
            ZoneKind::Named(tz) => tz
                .from_local_datetime(&naive)
                .map(|dt| dt.with_timezone(&Utc)),
            ZoneKind::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Interpret a wall time inside a DST gap with the offset in effect
    /// before the transition, which moves it forward by the gap length.
    fn shift_out_of_gap(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
        let out_of_range = || DatespanError::datetime("local time", naive);

        let before = naive
            .checked_sub_signed(TimeDelta::days(1))
            .ok_or_else(out_of_range)?
            .and_utc();
        let offset = self.offset_seconds(&before);
        Ok(naive
            .checked_sub_signed(TimeDelta::seconds(i64::from(offset)))
            .ok_or_else(out_of_range)?
            .and_utc())
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self {
            kind: ZoneKind::Named(tz),
        }
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Self {
            kind: ZoneKind::Fixed(offset),
        }
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::utc()
    }
}

impl FromStr for Zone {
    type Err = DatespanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ZoneKind::Named(tz) => f.write_str(tz.name()),
            ZoneKind::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
