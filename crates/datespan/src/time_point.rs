//! Immutable point in time with an attached display zone.
//!
//! A [`TimePoint`] is an instant (whole seconds) plus the [`Zone`] used to
//! decompose it into calendar fields. Equality, hashing and ordering look at
//! the instant only.
//!
//! # Accepted strings
//!
//! - RFC 3339: `2007-08-23T12:35:47Z`, `2007-08-23T14:35:47+02:00`
//! - Default stringification: `2007-08-23 14:35:47+0200`
//! - Naive wall time: `2007-08-23 14:35:47`, `2007-08-23T14:35`, `2007-08-23`
//! - Naive wall time followed by an IANA zone: `2007-08-23 14:35 Europe/Berlin`
//! - Unix seconds: `@1187872547`
//! - ISO week: `2007-W14` (Monday 00:00)
//! - Anchors: `now`, `today`, `tomorrow`, `yesterday`
//!
//! A zone carried by the string wins over the zone passed by the caller,
//! which in turn wins over the context's default zone.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{
    DateTime, Datelike, FixedOffset, IsoWeek, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound,
    Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::context::Context;
use crate::error::{DatespanError, Result};
use crate::modifier::FieldModifier;
use crate::zone::{Fold, Zone};

/// Pattern of the default stringification, `YYYY-MM-DD HH:MM:SS±HHMM`.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// An instant in whole seconds plus the zone it is displayed in.
#[derive(Debug, Clone, Copy)]
pub struct TimePoint {
    instant: DateTime<Utc>,
    zone: Zone,
}

/// Anything that can be coerced into a [`TimePoint`] by [`TimePoint::cast`].
#[derive(Debug, Clone, Copy)]
pub enum TimeInput<'a> {
    /// Unix seconds, displayed in the context's default zone.
    Timestamp(i64),
    /// A calendar string in one of the accepted forms.
    Text(&'a str),
    /// An existing point, passed through untouched.
    Point(TimePoint),
}

impl TimePoint {
    /// The instant `seconds` after the Unix epoch, displayed in `zone`.
    pub fn from_timestamp(seconds: i64, zone: Zone) -> Result<Self> {
        DateTime::from_timestamp(seconds, 0)
            .map(|instant| Self { instant, zone })
            .ok_or_else(|| DatespanError::datetime("timestamp", seconds))
    }

    /// A point for `instant` displayed in `zone`. Sub-second precision is dropped.
    pub fn from_utc(instant: DateTime<Utc>, zone: Zone) -> Self {
        Self {
            instant: instant.trunc_subsecs(0),
            zone,
        }
    }

    /// A point for the wall-clock time `naive` in `zone`.
    pub fn from_local(naive: NaiveDateTime, zone: Zone) -> Result<Self> {
        Self::from_local_with(naive, zone, Fold::Earlier)
    }

    /// A point for the wall-clock time `naive` in `zone`, with `fold`
    /// picking the occurrence of a repeated wall time.
    pub fn from_local_with(naive: NaiveDateTime, zone: Zone, fold: Fold) -> Result<Self> {
        zone.resolve_local_with(naive, fold)
            .map(|instant| Self::from_utc(instant, zone))
    }

    /// The context clock's current instant in the default zone.
    pub fn now(ctx: &Context) -> Self {
        ctx.now()
    }

    /// Parse a calendar string.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidDatetime`] if `value` matches none of
    /// the accepted forms.
    pub fn parse(value: &str, zone: Option<Zone>, ctx: &Context) -> Result<Self> {
        parse_text(value, zone, ctx, "date")
    }

    /// Coerce `value` into a point. `field` names the value in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidDatetime`] naming `field` when the
    /// value cannot be coerced.
    pub fn cast<'a>(value: impl Into<TimeInput<'a>>, field: &str, ctx: &Context) -> Result<Self> {
        match value.into() {
            TimeInput::Point(point) => Ok(point),
            TimeInput::Timestamp(seconds) => Self::from_timestamp(seconds, ctx.default_zone())
                .map_err(|_| DatespanError::datetime(field, seconds)),
            TimeInput::Text(text) => parse_text(text, None, ctx, field),
        }
    }

    // ── accessors ───────────────────────────────────────────────────────

    /// Unix seconds.
    pub fn timestamp(&self) -> i64 {
        self.instant.timestamp()
    }

    /// The instant as a chrono UTC value.
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The display zone.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// The wall-clock value in the attached zone.
    pub fn local(&self) -> DateTime<FixedOffset> {
        self.zone.local(&self.instant)
    }

    /// The calendar date in the attached zone.
    pub fn date_naive(&self) -> NaiveDate {
        self.local().date_naive()
    }

    /// Local calendar year.
    pub fn year(&self) -> i32 {
        self.local().year()
    }

    /// Local month, `1..=12`.
    pub fn month(&self) -> u32 {
        self.local().month()
    }

    /// Local day of month, `1..=31`.
    pub fn day(&self) -> u32 {
        self.local().day()
    }

    /// Local hour, `0..=23`.
    pub fn hours(&self) -> u32 {
        self.local().hour()
    }

    /// Local minute.
    pub fn minutes(&self) -> u32 {
        self.local().minute()
    }

    /// Local second.
    pub fn seconds(&self) -> u32 {
        self.local().second()
    }

    /// Local day of the week.
    pub fn weekday(&self) -> Weekday {
        self.local().weekday()
    }

    /// ISO 8601 week (and week-based year) of the local date.
    pub fn iso_week(&self) -> IsoWeek {
        self.local().iso_week()
    }

    /// Strictly earlier instant than `other`, whatever the zones.
    pub fn is_before(&self, other: &TimePoint) -> bool {
        self.instant < other.instant
    }

    /// Strictly later instant than `other`.
    pub fn is_after(&self, other: &TimePoint) -> bool {
        self.instant > other.instant
    }

    /// Same instant, displayed in `zone`.
    pub fn with_zone(&self, zone: Zone) -> Self {
        Self {
            instant: self.instant,
            zone,
        }
    }

    /// Start deriving a new point by changing calendar fields.
    pub fn modify(&self) -> FieldModifier<'_> {
        FieldModifier::new(self)
    }

    // ── formatting ──────────────────────────────────────────────────────

    /// Format with a strftime pattern in the attached zone.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidField`] if the pattern contains an
    /// unknown specifier.
    pub fn format(&self, pattern: &str) -> Result<String> {
        self.format_in(pattern, None)
    }

    /// Format with a strftime pattern, translating to `zone` first if given.
    pub fn format_in(&self, pattern: &str, zone: Option<&Zone>) -> Result<String> {
        let zone = zone.unwrap_or(&self.zone);
        let mut out = String::new();
        zone.write_formatted(&mut out, &self.instant, pattern)
            .map_err(|_| DatespanError::field("pattern", pattern, "a valid strftime pattern"))?;
        Ok(out)
    }
}

// ── parsing ─────────────────────────────────────────────────────────────

fn parse_text(value: &str, zone: Option<Zone>, ctx: &Context, field: &str) -> Result<TimePoint> {
    let trimmed = value.trim();
    let zone = zone.unwrap_or(ctx.default_zone());
    let invalid = || DatespanError::datetime(field, value);

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Some(point) = try_anchor(trimmed, zone, ctx)? {
        return Ok(point);
    }

    if let Some(seconds) = trimmed.strip_prefix('@') {
        let seconds: i64 = seconds.parse().map_err(|_| invalid())?;
        return TimePoint::from_timestamp(seconds, Zone::utc()).map_err(|_| invalid());
    }

    if let Some(dt) = try_with_offset(trimmed) {
        return Ok(TimePoint::from(dt));
    }

    // A trailing IANA zone name takes precedence over the caller's zone.
    let (wall, zone) = match trimmed.rsplit_once(' ') {
        Some((head, tail)) => match tail.parse::<Tz>() {
            Ok(tz) => (head.trim_end(), Zone::from(tz)),
            Err(_) => (trimmed, zone),
        },
        None => (trimmed, zone),
    };

    let naive = try_naive(wall).ok_or_else(invalid)?;
    TimePoint::from_local(naive, zone).map_err(|_| invalid())
}

fn try_anchor(s: &str, zone: Zone, ctx: &Context) -> Result<Option<TimePoint>> {
    let now = ctx.now().with_zone(zone);
    let days = match s.to_ascii_lowercase().as_str() {
        "now" => return Ok(Some(now)),
        "today" => 0,
        "tomorrow" => 1,
        "yesterday" => -1,
        _ => return Ok(None),
    };
    let shifted = now.modify().by_days(days)?;
    shifted.modify().time_to_start_of_day().map(Some)
}

fn try_with_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    })
}

fn try_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| try_iso_week(s))
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// `YYYY-Www` → the Monday of that ISO week.
fn try_iso_week(s: &str) -> Option<NaiveDate> {
    let (year, week) = s.split_once("-W")?;
    let year: i32 = year.parse().ok()?;
    let week: u32 = week.parse().ok()?;
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

// ── conversions ─────────────────────────────────────────────────────────

impl From<DateTime<Tz>> for TimePoint {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::from_utc(dt.with_timezone(&Utc), Zone::from(dt.timezone()))
    }
}

impl From<DateTime<FixedOffset>> for TimePoint {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::from_utc(dt.with_timezone(&Utc), Zone::from(*dt.offset()))
    }
}

impl From<DateTime<Utc>> for TimePoint {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt, Zone::utc())
    }
}

impl From<i64> for TimeInput<'_> {
    fn from(seconds: i64) -> Self {
        Self::Timestamp(seconds)
    }
}

impl<'a> From<&'a str> for TimeInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for TimeInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl From<TimePoint> for TimeInput<'_> {
    fn from(point: TimePoint) -> Self {
        Self::Point(point)
    }
}

impl From<&TimePoint> for TimeInput<'_> {
    fn from(point: &TimePoint) -> Self {
        Self::Point(*point)
    }
}

impl From<DateTime<Tz>> for TimeInput<'_> {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Point(dt.into())
    }
}

impl From<DateTime<FixedOffset>> for TimeInput<'_> {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Point(dt.into())
    }
}

impl From<DateTime<Utc>> for TimeInput<'_> {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Point(dt.into())
    }
}

// ── instant-only identity ───────────────────────────────────────────────

impl PartialEq for TimePoint {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for TimePoint {}

impl Hash for TimePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant.hash(state);
    }
}

impl PartialOrd for TimePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimePoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.zone.write_formatted(f, &self.instant, DEFAULT_FORMAT)
    }
}

impl Serialize for TimePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn berlin() -> Zone {
        Zone::resolve("Europe/Berlin").unwrap()
    }

    fn ctx() -> Context {
        Context::default().with_now(Utc.with_ymd_and_hms(2015, 6, 10, 22, 30, 0).unwrap())
    }

    // ── construction ────────────────────────────────────────────────────

    #[test]
    fn test_from_timestamp_formats_in_utc() {
        let point = TimePoint::from_timestamp(1187872547, Zone::utc()).unwrap();
        assert_eq!(
            point.format("%Y-%m-%dT%H:%M:%S%:z").unwrap(),
            "2007-08-23T12:35:47+00:00"
        );
    }

    #[test]
    fn test_zone_only_affects_display() {
        let utc = TimePoint::from_timestamp(1187872547, Zone::utc()).unwrap();
        let local = TimePoint::from_timestamp(1187872547, berlin()).unwrap();
        assert_eq!(utc, local);
        assert_eq!(utc.hours(), 12);
        assert_eq!(local.hours(), 14);
    }

    #[test]
    fn test_default_stringification() {
        let point = TimePoint::from_timestamp(1187872547, berlin()).unwrap();
        assert_eq!(point.to_string(), "2007-08-23 14:35:47+0200");
    }

    #[test]
    fn test_from_utc_drops_subseconds() {
        let instant = Utc.timestamp_opt(1187872547, 999_000_000).unwrap();
        let point = TimePoint::from_utc(instant, Zone::utc());
        assert_eq!(point.timestamp(), 1187872547);
        assert_eq!(point.to_utc().nanosecond(), 0);
    }

    // ── parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_rfc3339_keeps_offset_zone() {
        let point = TimePoint::parse("2007-08-23T14:35:47+02:00", Some(berlin()), &ctx()).unwrap();
        assert_eq!(point.timestamp(), 1187872547);
        assert_eq!(point.zone().name(), "+02:00");
    }

    #[test]
    fn test_parse_default_stringification_round_trip() {
        let original = TimePoint::from_timestamp(1187872547, berlin()).unwrap();
        let parsed = TimePoint::parse(&original.to_string(), None, &ctx()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_naive_uses_passed_zone() {
        let point = TimePoint::parse("2007-08-23 14:35:47", Some(berlin()), &ctx()).unwrap();
        assert_eq!(point.timestamp(), 1187872547);
        assert_eq!(point.zone(), &berlin());
    }

    #[test]
    fn test_parse_naive_falls_back_to_default_zone() {
        let ctx = ctx().with_zone(berlin());
        let point = TimePoint::parse("2007-08-23", None, &ctx).unwrap();
        assert_eq!(point.zone(), &berlin());
        assert_eq!(point.to_string(), "2007-08-23 00:00:00+0200");
    }

    #[test]
    fn test_parse_trailing_zone_wins() {
        let tokyo = Zone::resolve("Asia/Tokyo").unwrap();
        let point = TimePoint::parse("2007-08-23 21:35:47 Asia/Tokyo", Some(berlin()), &ctx())
            .unwrap();
        assert_eq!(point.zone(), &tokyo);
        assert_eq!(point.timestamp(), 1187872547);
    }

    #[test]
    fn test_parse_unix_seconds() {
        let point = TimePoint::parse("@1187872547", Some(berlin()), &ctx()).unwrap();
        assert_eq!(point.timestamp(), 1187872547);
        assert_eq!(point.zone(), &Zone::utc());
    }

    #[test]
    fn test_parse_iso_week() {
        let point = TimePoint::parse("2007-W14", None, &ctx()).unwrap();
        assert_eq!(point.date_naive(), NaiveDate::from_ymd_opt(2007, 4, 2).unwrap());
    }

    #[test]
    fn test_parse_anchors() {
        let ctx = ctx().with_zone(berlin());
        // 22:30 UTC on June 10 is already June 11 in Berlin
        let today = TimePoint::parse("today", None, &ctx).unwrap();
        assert_eq!(today.to_string(), "2015-06-11 00:00:00+0200");
        let tomorrow = TimePoint::parse("Tomorrow", None, &ctx).unwrap();
        assert_eq!(tomorrow.day(), 12);
        let yesterday = TimePoint::parse("yesterday", None, &ctx).unwrap();
        assert_eq!(yesterday.day(), 10);
        assert_eq!(TimePoint::parse("now", None, &ctx).unwrap(), ctx.now());
    }

    #[test]
    fn test_parse_invalid_names_field_and_value() {
        let err = TimePoint::parse("next blue moon", None, &ctx()).unwrap_err().to_string();
        assert!(err.contains("date"), "got: {err}");
        assert!(err.contains("next blue moon"), "got: {err}");
    }

    #[test]
    fn test_parse_rejects_impossible_date() {
        assert!(TimePoint::parse("2015-02-30", None, &ctx()).is_err());
        assert!(TimePoint::parse("", None, &ctx()).is_err());
    }

    // ── cast ────────────────────────────────────────────────────────────

    #[test]
    fn test_cast_accepts_all_inputs() {
        let ctx = ctx();
        let from_int = TimePoint::cast(1_187_872_547_i64, "start", &ctx).unwrap();
        let from_str = TimePoint::cast("2007-08-23T12:35:47Z", "start", &ctx).unwrap();
        let native = Utc.timestamp_opt(1187872547, 0).unwrap().with_timezone(&Tz::Europe__Berlin);
        let from_native = TimePoint::cast(native, "start", &ctx).unwrap();
        let from_point = TimePoint::cast(&from_int, "start", &ctx).unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(from_int, from_native);
        assert_eq!(from_int, from_point);
        assert_eq!(from_native.zone(), &berlin());
    }

    #[test]
    fn test_cast_error_names_field() {
        let err = TimePoint::cast("garbage", "end", &ctx()).unwrap_err().to_string();
        assert!(err.contains("end"), "got: {err}");
        assert!(err.contains("garbage"), "got: {err}");
    }

    // ── comparison & formatting ─────────────────────────────────────────

    #[test]
    fn test_comparisons_ignore_zone() {
        let a = TimePoint::from_timestamp(100, berlin()).unwrap();
        let b = TimePoint::from_timestamp(200, Zone::utc()).unwrap();
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));
        assert!(!a.is_after(&a));
        assert!(a < b);
    }

    #[test]
    fn test_format_in_translates() {
        let point = TimePoint::from_timestamp(1187872547, Zone::utc()).unwrap();
        assert_eq!(
            point.format_in("%H:%M %Z", Some(&berlin())).unwrap(),
            "14:35 CEST"
        );
        // the original is untouched
        assert_eq!(point.hours(), 12);
    }

    #[test]
    fn test_format_rejects_bad_pattern() {
        let point = TimePoint::from_timestamp(0, Zone::utc()).unwrap();
        assert!(point.format("%Q").is_err());
    }

    #[test]
    fn test_field_accessors() {
        let point = TimePoint::parse("2007-08-23 14:35:47", Some(berlin()), &ctx()).unwrap();
        assert_eq!(
            (point.year(), point.month(), point.day()),
            (2007, 8, 23)
        );
        assert_eq!(
            (point.hours(), point.minutes(), point.seconds()),
            (14, 35, 47)
        );
        assert_eq!(point.weekday(), Weekday::Thu);
        assert_eq!(point.iso_week().week(), 34);
    }

    #[test]
    fn test_serialize_as_default_string() {
        let point = TimePoint::from_timestamp(1187872547, Zone::utc()).unwrap();
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            "\"2007-08-23 12:35:47+0000\""
        );
    }
}
