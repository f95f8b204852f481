//! Heuristic string-to-span dispatch.
//!
//! Rules are tried in a fixed order and the first match wins:
//!
//! 1. empty input yields no span
//! 2. all digits (`2015`) is a [`Year`]
//! 3. exactly one comma (`2015-01-01,2015-12-31`) is a [`CustomDatespan`]
//! 4. exactly one hyphen followed by `W` (`2007-W14`) is a [`Week`]
//! 5. exactly one hyphen (`2015-03`) is a [`Month`]
//! 6. anything else must be a single [`Day`]
//!
//! A value matched by a rule is handed to that span's parser and never
//! retried against a later rule.

use crate::context::Context;
use crate::error::{DatespanError, Result};
use crate::span::{CustomDatespan, Datespan, Day, Month, Week, Year};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Year,
    Custom,
    Week,
    Month,
    Day,
}

impl Rule {
    fn select(value: &str) -> Self {
        let hyphens = value.matches('-').count();
        if value.bytes().all(|b| b.is_ascii_digit()) {
            Self::Year
        } else if value.matches(',').count() == 1 {
            Self::Custom
        } else if hyphens == 1 && (value.contains("-W") || value.contains("-w")) {
            Self::Week
        } else if hyphens == 1 {
            Self::Month
        } else {
            Self::Day
        }
    }
}

/// Parse any canonical span string.
///
/// Returns `Ok(None)` for empty or whitespace-only input.
///
/// # Errors
///
/// Errors from the matched span parser are returned as-is. When no
/// structured rule matches and the value is not a single day either, the
/// day error is wrapped in [`DatespanError::UnparseableSpan`].
pub fn parse_span(value: &str, ctx: &Context) -> Result<Option<Datespan>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let rule = Rule::select(value);
    tracing::debug!(value, ?rule, "selected span rule");

    let span = match rule {
        Rule::Year => Year::from_string(value, ctx)?.into(),
        Rule::Custom => CustomDatespan::from_string(value, ctx)?.into(),
        Rule::Week => Week::from_string(value, ctx)?.into(),
        Rule::Month => Month::from_string(value, ctx)?.into(),
        Rule::Day => Day::new(value, ctx)
            .map_err(|source| DatespanError::UnparseableSpan {
                value: value.to_string(),
                source: Box::new(source),
            })?
            .into(),
    };
    Ok(Some(span))
}
