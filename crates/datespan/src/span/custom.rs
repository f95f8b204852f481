use std::fmt;

use super::{Bounds, Span};
use crate::context::Context;
use crate::error::{DatespanError, Result};
use crate::time_point::{TimeInput, TimePoint};

/// An arbitrary range of whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomDatespan {
    bounds: Bounds,
}

impl CustomDatespan {
    /// The days from `start` through `end`, both included.
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidDatetime`] if either bound cannot be
    /// coerced, or [`DatespanError::InvalidField`] if `end` falls on a day
    /// before `start`.
    pub fn new<'a, 'b>(
        start: impl Into<TimeInput<'a>>,
        end: impl Into<TimeInput<'b>>,
        ctx: &Context,
    ) -> Result<Self> {
        let start = TimePoint::cast(start, "start", ctx)?;
        let end = TimePoint::cast(end, "end", ctx)?;
        Self::between(&start, &end)
    }

    /// The whole days from the day of `start` to the day of `end`.
    pub fn between(start: &TimePoint, end: &TimePoint) -> Result<Self> {
        let bounds = Bounds::new(start, end)?;
        if bounds.end().is_before(bounds.start()) {
            return Err(DatespanError::field("end", end, "a date not before the start"));
        }
        Ok(Self { bounds })
    }

    /// Parse `start,end`.
    pub fn from_string(value: &str, ctx: &Context) -> Result<Self> {
        let (start, end) = value
            .split_once(',')
            .ok_or_else(|| DatespanError::field("datespan", value, "a 'start,end' pair"))?;
        Self::new(start.trim(), end.trim(), ctx)
    }
}

impl Span for CustomDatespan {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }
}

impl fmt::Display for CustomDatespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            self.bounds.start().date_naive().format("%Y-%m-%d"),
            self.bounds.end().date_naive().format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::Zone;

    fn ctx() -> Context {
        Context::new(Zone::resolve("Europe/Berlin").unwrap())
    }

    #[test]
    fn test_custom_range() {
        let span = CustomDatespan::new("2015-01-01", "2015-12-31", &ctx()).unwrap();
        assert_eq!(span.as_string(), "2015-01-01,2015-12-31");
        assert_eq!(span.amount_of_days(), 365);
        assert_eq!(span.start().to_string(), "2015-01-01 00:00:00+0100");
        assert_eq!(span.end().to_string(), "2015-12-31 23:59:59+0100");
    }

    #[test]
    fn test_single_day_range() {
        let span = CustomDatespan::new("2015-03-10 08:00", "2015-03-10 09:00", &ctx()).unwrap();
        assert_eq!(span.amount_of_days(), 1);
        assert_eq!(span.days().count(), 1);
    }

    #[test]
    fn test_mixed_inputs() {
        let span = CustomDatespan::new(1_420_070_400_i64, "2015-01-03", &ctx()).unwrap();
        assert_eq!(span.as_string(), "2015-01-01,2015-01-03");
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = CustomDatespan::new("2015-03-10", "2015-03-09", &ctx())
            .unwrap_err()
            .to_string();
        assert!(err.contains("end") && err.contains("2015-03-09"), "got: {err}");
    }

    #[test]
    fn test_bad_bound_names_field() {
        let err = CustomDatespan::new("2015-03-10", "soon", &ctx())
            .unwrap_err()
            .to_string();
        assert!(err.contains("end") && err.contains("soon"), "got: {err}");
    }

    #[test]
    fn test_from_string_round_trip() {
        let ctx = ctx();
        let span = CustomDatespan::from_string("2015-01-01, 2015-02-15", &ctx).unwrap();
        assert_eq!(span.amount_of_days(), 46);
        assert_eq!(CustomDatespan::from_string(&span.as_string(), &ctx).unwrap(), span);
    }

    #[test]
    fn test_days_over_range() {
        let span = CustomDatespan::new("2015-02-27", "2015-03-02", &ctx()).unwrap();
        let days: Vec<String> = span.days().map(|d| d.to_string()).collect();
        assert_eq!(days, ["2015-02-27", "2015-02-28", "2015-03-01", "2015-03-02"]);
    }
}
