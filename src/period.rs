// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time intervals.
//!
//! - [`Interval<T>`]: generic interval over any [`TimeInstant`]
//! - [`UtcPeriod`]: the `DateTime<Utc>` interval carried by dark windows and
//!   civil days
//! - [`complement_within`] / [`intersect_periods`]: set operations over
//!   sorted interval lists, used to combine "Sun low enough" and "Moon
//!   down" runs

use super::TimeInstant;
use chrono::{DateTime, Utc};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An interval between two instants.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use darksky::UtcPeriod;
///
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 3, 1, 5, 30, 0).unwrap();
/// let period = UtcPeriod::new(start, end);
/// assert_eq!(period.duration().num_minutes(), 330);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// UTC interval alias.
pub type UtcPeriod = Interval<DateTime<Utc>>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two time instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Returns the duration as the difference between end and start.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Whether `start < end`.
    pub fn is_proper(&self) -> bool {
        self.start < self.end
    }

    /// Whether `instant` lies in `[start, end]`.
    pub fn contains(&self, instant: T) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Returns the overlapping sub-interval between `self` and `other`.
    ///
    /// Intervals are treated as half-open ranges `[start, end)`: if one ends
    /// exactly when the other starts, the intersection is empty.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = if self.start >= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end <= other.end {
            self.end
        } else {
            other.end
        };

        if start < end {
            Some(Self::new(start, end))
        } else {
            None
        }
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl Interval<DateTime<Utc>> {
    /// Returns the duration in whole seconds.
    pub fn duration_seconds(&self) -> i64 {
        self.duration().num_seconds()
    }

    /// Returns the duration in hours as a floating-point value.
    pub fn duration_hours(&self) -> f64 {
        const MILLIS_PER_HOUR: f64 = 3_600_000.0;
        self.duration().num_milliseconds() as f64 / MILLIS_PER_HOUR
    }
}

/// Returns the gaps (complement) of `periods` within the bounding `outer`.
///
/// `periods` must be sorted and non-overlapping. Runs in a single pass.
pub fn complement_within<T: TimeInstant>(
    outer: Interval<T>,
    periods: &[Interval<T>],
) -> Vec<Interval<T>> {
    let mut gaps = Vec::new();
    let mut cursor = outer.start;
    for p in periods {
        if p.start > cursor {
            gaps.push(Interval::new(cursor, p.start));
        }
        if p.end > cursor {
            cursor = p.end;
        }
    }
    if cursor < outer.end {
        gaps.push(Interval::new(cursor, outer.end));
    }
    gaps
}

/// Returns the intersection of two sorted, non-overlapping interval lists.
///
/// O(n+m) merge.
pub fn intersect_periods<T: TimeInstant>(a: &[Interval<T>], b: &[Interval<T>]) -> Vec<Interval<T>> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if let Some(overlap) = a[i].intersection(&b[j]) {
            result.push(overlap);
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}
