use std::fmt;

use chrono::NaiveDate;

use crate::models::{CycleDraft, CycleRecord, DateValue};

/// Canonical identity of a cycle's date range. Two records are "the same
/// cycle" when their keys are equal; `Display` renders `<start>-<end>` with
/// both dates as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeKey {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Anything carrying a start and end date.
pub trait DateRange {
    fn start_date(&self) -> Option<&DateValue>;
    fn end_date(&self) -> Option<&DateValue>;
}

impl DateRange for CycleRecord {
    fn start_date(&self) -> Option<&DateValue> {
        self.start_date.as_ref()
    }

    fn end_date(&self) -> Option<&DateValue> {
        self.end_date.as_ref()
    }
}

impl DateRange for CycleDraft {
    fn start_date(&self) -> Option<&DateValue> {
        self.start_date.as_ref()
    }

    fn end_date(&self) -> Option<&DateValue> {
        self.end_date.as_ref()
    }
}

/// Derives the range key, or `None` when either date is missing or
/// unreadable.
pub fn derive_key<R: DateRange + ?Sized>(record: &R) -> Option<RangeKey> {
    let start = record.start_date()?.to_date()?;
    let end = record.end_date()?.to_date()?;
    Some(RangeKey { start, end })
}
