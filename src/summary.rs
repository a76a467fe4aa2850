// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! One row per night, with continuation across midnight.
//!
//! A dark stretch that runs past local midnight shows up as a dusk window
//! ending at one day's end and a dawn window starting at the next day's
//! start.  [`summarize`] flags such pairs so a caller can present them as
//! one night.

use chrono::{Duration, NaiveDate};

use crate::period::UtcPeriod;
use crate::window::{DarkTimesResult, DarkWindow, DayMetadata, WindowKind};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Summary of one classified date.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NightSummary {
    pub date: NaiveDate,
    pub dawn: Option<UtcPeriod>,
    pub dusk: Option<UtcPeriod>,
    /// The whole day is one full-dark window.
    pub full_dark: Option<UtcPeriod>,
    pub metadata: Option<DayMetadata>,
    /// Darkness at this date's start carries over from the previous date.
    pub continues_from_previous: bool,
    /// Darkness at this date's end carries over into the next date.
    pub continues_into_next: bool,
}

impl NightSummary {
    fn from_windows(date: NaiveDate, windows: &[DarkWindow]) -> Self {
        let first = |kind: WindowKind| {
            windows
                .iter()
                .find(|w| w.kind() == kind)
                .and_then(DarkWindow::span)
        };
        Self {
            date,
            dawn: first(WindowKind::Dawn),
            dusk: first(WindowKind::Dusk),
            full_dark: first(WindowKind::FullDark),
            metadata: windows.first().map(|w| *w.metadata()),
            continues_from_previous: false,
            continues_into_next: false,
        }
    }
}

/// Summarize a result, one row per classified date in date order.
///
/// Continuation is only established between consecutive calendar dates
/// that were both classified, when the earlier date is dark up to its last
/// millisecond (full-dark, or a dusk window running to the day's end) and
/// the later date is dark from its first (full-dark, or a dawn window from
/// midnight).
pub fn summarize(result: &DarkTimesResult) -> Vec<NightSummary> {
    let mut rows: Vec<NightSummary> = result
        .iter()
        .map(|(date, windows)| NightSummary::from_windows(date, windows))
        .collect();

    for i in 1..rows.len() {
        let (before, after) = rows.split_at_mut(i);
        let previous = &mut before[i - 1];
        let current = &mut after[0];
        if previous.date.succ_opt() != Some(current.date) {
            continue;
        }
        let Some(boundary_end) = previous.full_dark.or(previous.dusk).map(|p| p.end) else {
            continue;
        };
        let Some(boundary_start) = current.full_dark.or(current.dawn).map(|p| p.start) else {
            continue;
        };
        // Day ends are "23:59:59.999"; the next day starts one millisecond later.
        if boundary_start - boundary_end == Duration::milliseconds(1) {
            previous.continues_into_next = true;
            current.continues_from_previous = true;
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use qtty::Degrees;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn midnight(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
    }

    fn day_end(d: u32) -> DateTime<Utc> {
        midnight(d) + Duration::days(1) - Duration::milliseconds(1)
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        midnight(d) + Duration::hours(h as i64)
    }

    fn meta() -> DayMetadata {
        DayMetadata {
            twilight_start: None,
            twilight_end: None,
            moon_rise: None,
            moon_set: None,
            moon_altitude_at_day_start: Degrees::new(-5.0),
            moon_altitude_at_day_end: Degrees::new(-5.0),
            moon_altitude_at_twilight_start: None,
            moon_altitude_at_twilight_end: None,
        }
    }

    fn result(days: Vec<(NaiveDate, Vec<DarkWindow>)>) -> DarkTimesResult {
        let mut result = DarkTimesResult::default();
        for (d, windows) in days {
            result.insert_day(d, windows);
        }
        result
    }

    #[test]
    fn dusk_to_midnight_continues_into_dawn_from_midnight() {
        let r = result(vec![
            (
                date(1),
                vec![
                    DarkWindow::dusk(date(1), at(1, 20), day_end(1), meta()).unwrap(),
                    DarkWindow::meta_only(date(1), meta()),
                ],
            ),
            (
                date(2),
                vec![
                    DarkWindow::dawn(date(2), midnight(2), at(2, 5), meta()).unwrap(),
                    DarkWindow::meta_only(date(2), meta()),
                ],
            ),
        ]);
        let rows = summarize(&r);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].continues_into_next);
        assert!(!rows[0].continues_from_previous);
        assert!(rows[1].continues_from_previous);
        assert_eq!(rows[1].dawn.map(|p| p.end), Some(at(2, 5)));
    }

    #[test]
    fn moonrise_before_midnight_breaks_the_night() {
        let r = result(vec![
            (
                date(1),
                vec![
                    DarkWindow::dusk(date(1), at(1, 20), at(1, 22), meta()).unwrap(),
                    DarkWindow::meta_only(date(1), meta()),
                ],
            ),
            (
                date(2),
                vec![
                    DarkWindow::dawn(date(2), midnight(2), at(2, 5), meta()).unwrap(),
                    DarkWindow::meta_only(date(2), meta()),
                ],
            ),
        ]);
        let rows = summarize(&r);
        assert!(!rows[0].continues_into_next);
        assert!(!rows[1].continues_from_previous);
    }

    #[test]
    fn full_dark_days_chain() {
        let r = result(vec![
            (
                date(1),
                vec![DarkWindow::full_dark(date(1), midnight(1), day_end(1), meta()).unwrap()],
            ),
            (
                date(2),
                vec![DarkWindow::full_dark(date(2), midnight(2), day_end(2), meta()).unwrap()],
            ),
            (
                date(3),
                vec![
                    DarkWindow::dawn(date(3), midnight(3), at(3, 4), meta()).unwrap(),
                    DarkWindow::meta_only(date(3), meta()),
                ],
            ),
        ]);
        let rows = summarize(&r);
        assert!(rows[0].full_dark.is_some());
        assert!(rows[0].continues_into_next);
        assert!(rows[1].continues_from_previous && rows[1].continues_into_next);
        assert!(rows[2].continues_from_previous);
    }

    #[test]
    fn gaps_in_dates_do_not_continue() {
        let r = result(vec![
            (
                date(1),
                vec![DarkWindow::full_dark(date(1), midnight(1), day_end(1), meta()).unwrap()],
            ),
            (
                date(3),
                vec![DarkWindow::full_dark(date(3), midnight(3), day_end(3), meta()).unwrap()],
            ),
        ]);
        let rows = summarize(&r);
        assert!(!rows[0].continues_into_next);
        assert!(!rows[1].continues_from_previous);
    }
}
