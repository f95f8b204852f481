//! # datespan
//!
//! Timezone-correct calendar arithmetic and whole-day spans.
//!
//! The crate provides immutable points in time, DST-aware timezone offsets,
//! and a family of calendar spans (day, ISO week, month, year, custom range)
//! with containment queries, boundary comparisons and lazy iteration. Leap
//! years, month-length rollover and DST transitions are handled once here so
//! callers never re-derive them.
//!
//! ## Modules
//!
//! - [`zone`]: IANA and fixed-offset zones, offsets, DST detection
//! - [`time_point`]: instant plus display zone, string parsing, formatting
//! - [`modifier`]: field setters with rollover and relative expressions
//! - [`span`]: the [`Span`] trait, concrete spans and their cursors
//! - [`parser`]: canonical string to [`Datespan`] dispatch
//! - [`context`]: default zone and clock passed to "now"-relative operations
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use datespan::{parse_span, Context, Span, Zone};
//!
//! let ctx = Context::new(Zone::resolve("Europe/Berlin")?)
//!     .with_now(Utc.with_ymd_and_hms(2015, 6, 10, 12, 0, 0).unwrap());
//!
//! let span = parse_span("2008-02", &ctx)?.expect("non-empty input");
//! assert_eq!(span.amount_of_days(), 29);
//! assert_eq!(span.start().to_string(), "2008-02-01 00:00:00+0100");
//! # Ok::<(), datespan::DatespanError>(())
//! ```

pub mod context;
pub mod error;
pub mod modifier;
pub mod parser;
pub mod span;
pub mod time_point;
pub mod zone;

pub use context::{Clock, Context, ContextConfig};
pub use error::{DatespanError, Result};
pub use modifier::FieldModifier;
pub use parser::parse_span;
pub use span::{Bounds, CustomDatespan, Datespan, Day, Days, Month, Months, Span, Week, Year};
pub use time_point::{TimeInput, TimePoint, DEFAULT_FORMAT};
pub use zone::{Fold, Zone};
