//! Restartable cursors over the days of a span and the months of a year.
//!
//! A cursor borrows its source span and owns the current element. It starts
//! positioned on the first element, moves forward only, and can be rewound.
//! Its length is known up front from the source, never counted by walking,
//! so both cursors are [`ExactSizeIterator`]s.

use std::collections::BTreeMap;

use super::{Day, Month, Span, Year};

const MONTHS_PER_YEAR: usize = 12;

/// Cursor over the days of a span.
#[derive(Debug, Clone)]
pub struct Days<'a, S: Span + ?Sized> {
    span: &'a S,
    current: Option<Day>,
    total: usize,
    remaining: usize,
}

impl<'a, S: Span + ?Sized> Days<'a, S> {
    /// Cursor positioned on the first day of `span`.
    pub fn new(span: &'a S) -> Self {
        let total = span.amount_of_days() as usize;
        let mut cursor = Self {
            span,
            current: None,
            total,
            remaining: total,
        };
        cursor.rewind();
        cursor
    }

    /// Reposition on the first day of the span.
    pub fn rewind(&mut self) {
        self.current = Day::containing(self.span.start()).ok();
        self.remaining = self.total;
    }

    /// The day the cursor is on, past the end once exhausted.
    pub fn current(&self) -> Option<&Day> {
        self.current.as_ref()
    }

    /// Canonical string of the current day.
    pub fn key(&self) -> Option<String> {
        self.current.as_ref().map(ToString::to_string)
    }

    /// Move to the following day. A day past the representable calendar
    /// exhausts the cursor.
    pub fn advance(&mut self) {
        self.current = self.current.and_then(|day| day.next().ok());
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Whether the current day still starts before the span's end.
    pub fn valid(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|day| day.starts_before(self.span.end()))
    }

    /// Number of days in the source span.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Rewind and collect every day keyed by its canonical string.
    pub fn to_map(&mut self) -> BTreeMap<String, Day> {
        self.rewind();
        self.by_ref().map(|day| (day.to_string(), day)).collect()
    }
}

impl<S: Span + ?Sized> Iterator for Days<'_, S> {
    type Item = Day;

    fn next(&mut self) -> Option<Day> {
        if !self.valid() {
            return None;
        }
        let day = self.current?;
        self.advance();
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.valid() { self.remaining } else { 0 };
        (remaining, Some(remaining))
    }
}

impl<S: Span + ?Sized> ExactSizeIterator for Days<'_, S> {}

/// Cursor over the twelve months of a year.
#[derive(Debug, Clone)]
pub struct Months<'a> {
    year: &'a Year,
    current: Option<Month>,
    remaining: usize,
}

impl<'a> Months<'a> {
    /// Cursor positioned on January of `year`.
    pub fn new(year: &'a Year) -> Self {
        let mut cursor = Self {
            year,
            current: None,
            remaining: MONTHS_PER_YEAR,
        };
        cursor.rewind();
        cursor
    }

    /// Reposition on January.
    pub fn rewind(&mut self) {
        self.current = Month::containing(self.year.start()).ok();
        self.remaining = MONTHS_PER_YEAR;
    }

    /// The month the cursor is on.
    pub fn current(&self) -> Option<&Month> {
        self.current.as_ref()
    }

    /// Canonical `YYYY-MM` string of the current month.
    pub fn key(&self) -> Option<String> {
        self.current.as_ref().map(ToString::to_string)
    }

    /// Move to the following month.
    pub fn advance(&mut self) {
        self.current = self.current.and_then(|month| month.next().ok());
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Whether the current month still belongs to the source year.
    pub fn valid(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|month| month.year() == self.year.year())
    }

    /// Always twelve.
    pub fn total(&self) -> usize {
        MONTHS_PER_YEAR
    }

    /// Rewind and collect every month keyed by `YYYY-MM`.
    pub fn to_map(&mut self) -> BTreeMap<String, Month> {
        self.rewind();
        self.by_ref().map(|month| (month.to_string(), month)).collect()
    }
}

impl Iterator for Months<'_> {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        if !self.valid() {
            return None;
        }
        let month = self.current?;
        self.advance();
        Some(month)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.valid() { self.remaining } else { 0 };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Months<'_> {}
