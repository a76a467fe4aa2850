// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil days in an IANA time zone.
//!
//! A [`CivilDay`] is the UTC span of one calendar date as a clock in the
//! given zone sees it: from local midnight to one millisecond before the
//! next local midnight.  On DST transition days the span is 23 or 25 hours.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use qtty::{Day, Days, Seconds};

use crate::error::{DarkSkyError, Result};
use crate::period::UtcPeriod;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Midnight may be skipped by a DST jump; probe forward in half hours.
const MIDNIGHT_PROBE_MINUTES: i64 = 30;
const MIDNIGHT_PROBES: i64 = 8;

/// UTC instant of the first local clock reading on `date` at or after 00:00.
fn local_midnight(date: NaiveDate, zone: Tz) -> Result<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    for probe in 0..MIDNIGHT_PROBES {
        let local = midnight + Duration::minutes(MIDNIGHT_PROBE_MINUTES * probe);
        if let Some(instant) = zone.from_local_datetime(&local).earliest() {
            return Ok(instant.with_timezone(&Utc));
        }
    }
    Err(DarkSkyError::UnresolvableMidnight {
        date,
        zone: zone.name().to_string(),
    })
}

/// One calendar date in a time zone, as a closed UTC interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CivilDay {
    date: NaiveDate,
    span: UtcPeriod,
}

impl CivilDay {
    /// Resolve `date` in `zone`.
    pub fn new(date: NaiveDate, zone: Tz) -> Result<Self> {
        let start = local_midnight(date, zone)?;
        let next = date
            .succ_opt()
            .ok_or_else(|| DarkSkyError::UnresolvableMidnight {
                date,
                zone: zone.name().to_string(),
            })?;
        let end = local_midnight(next, zone)? - Duration::milliseconds(1);
        Ok(Self {
            date,
            span: UtcPeriod::new(start, end),
        })
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Local midnight, as UTC.
    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.span.start
    }

    /// The last millisecond of the day ("23:59:59.999"), as UTC.
    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.span.end
    }

    #[inline]
    pub fn span(&self) -> UtcPeriod {
        self.span
    }

    /// Whether `instant` falls within the day, both ends inclusive.
    #[inline]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.span.contains(instant)
    }

    /// Length of the day as a search window for the ephemeris.
    pub fn search_window(&self) -> Days {
        let millis = self.span.duration().num_milliseconds() as f64;
        Seconds::new(millis / 1_000.0).to::<Day>()
    }

    /// Output key, `YYYY-MM-DD`.
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Instants from the day's start every `step`, always ending on the
    /// day's end.  A non-positive step yields the two end points only.
    pub fn samples(&self, step: Duration) -> impl Iterator<Item = DateTime<Utc>> {
        let UtcPeriod { start, end } = self.span;
        let mut next = Some(start);
        std::iter::from_fn(move || {
            let current = next?;
            next = if current >= end {
                None
            } else if step > Duration::zero() && current + step < end {
                Some(current + step)
            } else {
                Some(end)
            };
            Some(current)
        })
    }
}

/// An inclusive range of calendar dates in one time zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CivilRange {
    start: NaiveDate,
    end: NaiveDate,
    zone: Tz,
}

impl CivilRange {
    /// `start > end` is accepted and yields no days.
    pub fn new(start: NaiveDate, end: NaiveDate, zone: Tz) -> Self {
        Self { start, end, zone }
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[inline]
    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of dates in the range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |date| *date <= end)
    }

    /// Civil days in ascending order, each resolved independently.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, Result<CivilDay>)> {
        let zone = self.zone;
        self.dates().map(move |date| (date, CivilDay::new(date, zone)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn utc_day_is_24h_minus_a_millisecond() {
        let day = CivilDay::new(date(2024, 3, 1), Tz::UTC).unwrap();
        assert_eq!(day.start(), Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(
            day.end() - day.start(),
            Duration::hours(24) - Duration::milliseconds(1)
        );
        assert_eq!(day.key(), "2024-03-01");
    }

    #[test]
    fn zone_offset_shifts_utc_span() {
        let day = CivilDay::new(date(2024, 1, 15), chrono_tz::America::Denver).unwrap();
        assert_eq!(day.start(), Utc.with_ymd_and_hms(2024, 1, 15, 7, 0, 0).unwrap());
        assert_eq!(day.end().hour(), 6);
        assert_eq!(day.end().nanosecond(), 999_000_000);
    }

    #[test]
    fn spring_forward_day_is_23_hours() {
        let day = CivilDay::new(date(2024, 3, 10), chrono_tz::America::New_York).unwrap();
        assert_eq!(
            day.end() - day.start(),
            Duration::hours(23) - Duration::milliseconds(1)
        );
        assert!((day.search_window().value() - 23.0 / 24.0).abs() < 1e-6);
    }

    #[test]
    fn fall_back_day_is_25_hours() {
        let day = CivilDay::new(date(2024, 11, 3), chrono_tz::America::New_York).unwrap();
        assert_eq!(
            day.end() - day.start(),
            Duration::hours(25) - Duration::milliseconds(1)
        );
    }

    #[test]
    fn skipped_midnight_resolves_to_first_valid_instant() {
        // Santiago springs forward at 00:00 local, straight to 01:00.
        let day = CivilDay::new(date(2024, 9, 8), chrono_tz::America::Santiago).unwrap();
        let local = day.start().with_timezone(&chrono_tz::America::Santiago);
        assert_eq!(local.date_naive(), date(2024, 9, 8));
        assert_eq!(local.hour(), 1);
    }

    #[test]
    fn contains_is_inclusive() {
        let day = CivilDay::new(date(2024, 3, 1), Tz::UTC).unwrap();
        assert!(day.contains(day.start()));
        assert!(day.contains(day.end()));
        assert!(!day.contains(day.end() + Duration::milliseconds(1)));
    }

    #[test]
    fn samples_cover_both_ends() {
        let day = CivilDay::new(date(2024, 3, 1), Tz::UTC).unwrap();
        let samples: Vec<_> = day.samples(Duration::minutes(1)).collect();
        assert_eq!(samples.len(), 24 * 60 + 1);
        assert_eq!(samples.first(), Some(&day.start()));
        assert_eq!(samples.last(), Some(&day.end()));

        let coarse: Vec<_> = day.samples(Duration::hours(7)).collect();
        assert_eq!(coarse.len(), 5);
        assert_eq!(coarse[3] - coarse[2], Duration::hours(7));

        assert_eq!(day.samples(Duration::zero()).count(), 2);
    }

    #[test]
    fn range_iteration() {
        let range = CivilRange::new(date(2024, 2, 27), date(2024, 3, 2), Tz::UTC);
        let dates: Vec<_> = range.dates().collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(range.len(), 5);
        assert_eq!(dates[2], date(2024, 2, 29));
        assert!(range.days().all(|(_, day)| day.is_ok()));
    }

    #[test]
    fn single_and_inverted_ranges() {
        let single = CivilRange::new(date(2024, 3, 1), date(2024, 3, 1), Tz::UTC);
        assert_eq!(single.dates().count(), 1);

        let inverted = CivilRange::new(date(2024, 3, 2), date(2024, 3, 1), Tz::UTC);
        assert!(inverted.is_empty());
        assert_eq!(inverted.len(), 0);
        assert_eq!(inverted.dates().count(), 0);
    }
}
