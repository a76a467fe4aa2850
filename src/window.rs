// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Classified dark windows and the per-request result.

use chrono::{DateTime, NaiveDate, Utc};
use qtty::Degrees;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DarkSkyError;
use crate::period::UtcPeriod;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Shape of a dark window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum WindowKind {
    /// Dark for the whole civil day.
    FullDark,
    /// Dark from the start of the day (or moonset) until twilight or moonrise.
    Dawn,
    /// Dark from twilight or moonset until the end of the day.
    Dusk,
    /// No interval; carries the day's metadata.
    MetaOnly,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WindowKind::FullDark => "full-dark",
            WindowKind::Dawn => "dawn",
            WindowKind::Dusk => "dusk",
            WindowKind::MetaOnly => "meta-only",
        };
        f.write_str(label)
    }
}

/// Everything the provider reported for one civil day.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DayMetadata {
    pub twilight_start: Option<DateTime<Utc>>,
    pub twilight_end: Option<DateTime<Utc>>,
    pub moon_rise: Option<DateTime<Utc>>,
    pub moon_set: Option<DateTime<Utc>>,
    pub moon_altitude_at_day_start: Degrees,
    pub moon_altitude_at_day_end: Degrees,
    pub moon_altitude_at_twilight_start: Option<Degrees>,
    pub moon_altitude_at_twilight_end: Option<Degrees>,
}

/// One classified entry for a civil date.
///
/// Real windows (`FullDark`, `Dawn`, `Dusk`) always carry a span with
/// `start < end`; `MetaOnly` never does.  The constructors enforce this.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DarkWindow {
    date: NaiveDate,
    kind: WindowKind,
    span: Option<UtcPeriod>,
    metadata: DayMetadata,
}

impl DarkWindow {
    fn with_span(
        date: NaiveDate,
        kind: WindowKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        metadata: DayMetadata,
    ) -> Option<Self> {
        let span = UtcPeriod::new(start, end);
        span.is_proper().then_some(Self {
            date,
            kind,
            span: Some(span),
            metadata,
        })
    }

    /// A window covering the whole civil day.
    pub fn full_dark(
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        metadata: DayMetadata,
    ) -> Option<Self> {
        Self::with_span(date, WindowKind::FullDark, start, end, metadata)
    }

    /// A dawn-side window; `None` when `start >= end`.
    pub fn dawn(
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        metadata: DayMetadata,
    ) -> Option<Self> {
        Self::with_span(date, WindowKind::Dawn, start, end, metadata)
    }

    /// A dusk-side window; `None` when `start >= end`.
    pub fn dusk(
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        metadata: DayMetadata,
    ) -> Option<Self> {
        Self::with_span(date, WindowKind::Dusk, start, end, metadata)
    }

    pub fn meta_only(date: NaiveDate, metadata: DayMetadata) -> Self {
        Self {
            date,
            kind: WindowKind::MetaOnly,
            span: None,
            metadata,
        }
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    #[inline]
    pub fn span(&self) -> Option<UtcPeriod> {
        self.span
    }

    #[inline]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.span.map(|s| s.start)
    }

    #[inline]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.span.map(|s| s.end)
    }

    #[inline]
    pub fn metadata(&self) -> &DayMetadata {
        &self.metadata
    }

    /// Whether this entry describes an actual dark interval.
    #[inline]
    pub fn is_dark(&self) -> bool {
        self.span.is_some()
    }
}

/// The provider request that failed for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Query {
    DayBoundary,
    TwilightStart,
    TwilightEnd,
    MoonRise,
    MoonSet,
    MoonAltitude(DateTime<Utc>),
    SunAltitude(DateTime<Utc>),
    VerificationSweep,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::DayBoundary => f.write_str("day boundary"),
            Query::TwilightStart => f.write_str("twilight start"),
            Query::TwilightEnd => f.write_str("twilight end"),
            Query::MoonRise => f.write_str("moon rise"),
            Query::MoonSet => f.write_str("moon set"),
            Query::MoonAltitude(at) => write!(f, "moon altitude at {}", at.to_rfc3339()),
            Query::SunAltitude(at) => write!(f, "sun altitude at {}", at.to_rfc3339()),
            Query::VerificationSweep => f.write_str("verification sweep"),
        }
    }
}

/// A day that could not be classified.
#[derive(Debug)]
pub struct DayFault {
    pub date: NaiveDate,
    pub query: Query,
    pub error: DarkSkyError,
}

impl fmt::Display for DayFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} failed: {}", self.date, self.query, self.error)
    }
}

#[cfg(feature = "serde")]
impl Serialize for DayFault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DayFault", 3)?;
        state.serialize_field("date", &self.date)?;
        state.serialize_field("query", &self.query)?;
        state.serialize_field("error", &self.error.to_string())?;
        state.end()
    }
}

/// Dark windows for a date range, keyed by civil date.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DarkTimesResult {
    days: BTreeMap<NaiveDate, Vec<DarkWindow>>,
    faults: BTreeMap<NaiveDate, DayFault>,
}

impl DarkTimesResult {
    pub(crate) fn insert_day(&mut self, date: NaiveDate, windows: Vec<DarkWindow>) {
        self.days.insert(date, windows);
    }

    pub(crate) fn insert_fault(&mut self, fault: DayFault) {
        self.faults.insert(fault.date, fault);
    }

    /// Entries for one date, if it was classified.
    pub fn get(&self, date: NaiveDate) -> Option<&[DarkWindow]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    /// Classified dates with their entries, in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[DarkWindow])> {
        self.days.iter().map(|(date, w)| (*date, w.as_slice()))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// All real windows (no `MetaOnly`), in date order.
    pub fn windows(&self) -> impl Iterator<Item = &DarkWindow> {
        self.days.values().flatten().filter(|w| w.is_dark())
    }

    pub fn fault(&self, date: NaiveDate) -> Option<&DayFault> {
        self.faults.get(&date)
    }

    pub fn faults(&self) -> impl Iterator<Item = &DayFault> {
        self.faults.values()
    }

    /// Whether every requested day was classified.
    pub fn is_complete(&self) -> bool {
        self.faults.is_empty()
    }

    /// Number of classified dates.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True when no date was classified and none faulted.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.faults.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EphemerisError;
    use chrono::{Duration, TimeZone};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap()
    }

    fn metadata() -> DayMetadata {
        DayMetadata {
            twilight_start: Some(at(19)),
            twilight_end: Some(at(5)),
            moon_rise: None,
            moon_set: None,
            moon_altitude_at_day_start: Degrees::new(-10.0),
            moon_altitude_at_day_end: Degrees::new(-12.0),
            moon_altitude_at_twilight_start: Some(Degrees::new(-11.0)),
            moon_altitude_at_twilight_end: None,
        }
    }

    #[test]
    fn checked_constructors_reject_empty_spans() {
        assert!(DarkWindow::dawn(date(), at(5), at(5), metadata()).is_none());
        assert!(DarkWindow::dusk(date(), at(20), at(19), metadata()).is_none());
        let dawn = DarkWindow::dawn(date(), at(0), at(5), metadata()).unwrap();
        assert_eq!(dawn.kind(), WindowKind::Dawn);
        assert_eq!(dawn.start(), Some(at(0)));
        assert!(dawn.is_dark());
    }

    #[test]
    fn meta_only_has_no_span() {
        let meta = DarkWindow::meta_only(date(), metadata());
        assert_eq!(meta.kind(), WindowKind::MetaOnly);
        assert_eq!(meta.span(), None);
        assert!(!meta.is_dark());
    }

    #[test]
    fn result_accessors_keep_date_order() {
        let mut result = DarkTimesResult::default();
        let later = date() + Duration::days(1);
        result.insert_day(later, vec![DarkWindow::meta_only(later, metadata())]);
        result.insert_day(date(), vec![DarkWindow::meta_only(date(), metadata())]);
        result.insert_fault(DayFault {
            date: date() + Duration::days(2),
            query: Query::MoonRise,
            error: EphemerisError::Provider("offline".into()).into(),
        });

        assert_eq!(result.dates().collect::<Vec<_>>(), vec![date(), later]);
        assert_eq!(result.len(), 2);
        assert!(!result.is_complete());
        assert_eq!(result.windows().count(), 0);
        let fault = result.faults().next().unwrap();
        assert_eq!(
            fault.to_string(),
            "2024-03-03: moon rise failed: ephemeris provider failed: offline"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_dates_instants_and_degrees() {
        let mut result = DarkTimesResult::default();
        let dusk = DarkWindow::dusk(date(), at(19), at(23), metadata()).unwrap();
        result.insert_day(date(), vec![dusk, DarkWindow::meta_only(date(), metadata())]);

        let json = serde_json::to_value(&result).unwrap();
        let entries = &json["days"]["2024-03-01"];
        assert_eq!(entries[0]["kind"], "Dusk");
        assert_eq!(entries[0]["span"]["start"], "2024-03-01T19:00:00Z");
        assert_eq!(entries[0]["metadata"]["moon_altitude_at_day_start"], -10.0);
        assert!(entries[1]["span"].is_null());
    }
}
