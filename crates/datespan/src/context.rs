//! Explicit calendar context: the default timezone and the "now" anchor.
//!
//! Nothing in this crate reads a process-wide default zone or the system
//! clock directly. Operations that need either take a [`Context`], so a
//! fixed clock makes every "today"/"current month" computation deterministic.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{DatespanError, Result};
use crate::time_point::TimePoint;
use crate::zone::Zone;

/// Source of the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Read `chrono::Utc::now()` on every call.
    #[default]
    System,
    /// Always report the given instant.
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// The clock's current instant.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(anchor) => *anchor,
        }
    }
}

/// Default zone plus clock, threaded into zone-less and "now" operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    default_zone: Zone,
    clock: Clock,
}

/// Serialized form of a [`Context`].
///
/// ```json
/// { "default_timezone": "Europe/Berlin", "now": "2015-06-01T12:00:00Z" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ContextConfig {
    /// IANA name of the default zone. Defaults to `UTC`.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    /// RFC 3339 anchor for a fixed clock. The system clock is used when absent.
    #[serde(default)]
    pub now: Option<String>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Context {
    /// A context with the given default zone and the system clock.
    pub fn new(default_zone: Zone) -> Self {
        Self {
            default_zone,
            clock: Clock::System,
        }
    }

    /// Replace the clock with a fixed anchor.
    pub fn with_now(self, anchor: DateTime<Utc>) -> Self {
        Self {
            clock: Clock::Fixed(anchor),
            ..self
        }
    }

    /// Replace the default zone, keeping the clock.
    pub fn with_zone(self, default_zone: Zone) -> Self {
        Self {
            default_zone,
            ..self
        }
    }

    /// Build a context from a deserialized [`ContextConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`DatespanError::InvalidTimezone`] for an unknown zone or
    /// [`DatespanError::InvalidConfig`] for a malformed `now` anchor.
    pub fn from_config(config: ContextConfig) -> Result<Self> {
        let zone = Zone::resolve(&config.default_timezone)?;
        let ctx = Self::new(zone);

        let ctx = match config.now.as_deref() {
            Some(now) => {
                let anchor = DateTime::parse_from_rfc3339(now)
                    .map_err(|e| DatespanError::InvalidConfig(format!("now '{now}': {e}")))?;
                ctx.with_now(anchor.with_timezone(&Utc))
            }
            None => ctx,
        };

        tracing::trace!(
            message = "loaded calendar context",
            zone = %ctx.default_zone,
            clock = ?ctx.clock,
        );
        Ok(ctx)
    }

    /// Parse a JSON [`ContextConfig`] document and build the context.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ContextConfig =
            serde_json::from_str(json).map_err(|e| DatespanError::InvalidConfig(e.to_string()))?;
        Self::from_config(config)
    }

    /// Zone for inputs that carry none.
    pub fn default_zone(&self) -> Zone {
        self.default_zone
    }

    /// The clock behind "now".
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// The current instant as a chrono UTC value.
    pub fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The current instant in the default zone.
    pub fn now(&self) -> TimePoint {
        TimePoint::from_utc(self.now_utc(), self.default_zone)
    }
}
