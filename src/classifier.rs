// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Dark-window classification.
//!
//! For every civil day the classifier collects four events from the
//! ephemeris (astronomical dusk and dawn, moonrise and moonset) plus the
//! Moon's altitude at the day's edges and at both twilight instants, then
//! picks window shapes with a fixed decision tree:
//!
//! - **No twilight crossing**: the Sun either never gets dark enough or
//!   never gets light enough.  The first case yields nothing.  In the second
//!   a Moon-free day is confirmed by sampling the whole day and becomes one
//!   [`FullDark`](crate::WindowKind::FullDark) window; otherwise the Moon's rise or
//!   set may still leave a dark stretch at one end of the day.
//! - **Dawn side** (dawn twilight present): dark from midnight or moonset
//!   until dawn twilight or moonrise.
//! - **Dusk side** (dusk twilight present): dark from dusk twilight or
//!   moonset until midnight or moonrise.
//!
//! Every day except a full-dark one ends with a
//! [`MetaOnly`](crate::WindowKind::MetaOnly) entry carrying what the provider
//! reported.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use log::{debug, trace, warn};
use qtty::{Degrees, Minutes};

use crate::civil::{CivilDay, CivilRange};
use crate::ephemeris::{Body, Crossing, Ephemeris};
use crate::error::{DarkSkyError, EphemerisError, Result};
use crate::instant::to_duration;
use crate::observer::Observer;
use crate::window::{DarkTimesResult, DarkWindow, DayFault, DayMetadata, Query};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables of the classification.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassifierConfig {
    /// Solar altitude at or below which the sky counts as dark.
    #[cfg_attr(feature = "serde", serde(rename = "twilight_altitude_deg"))]
    pub twilight_altitude: Degrees,
    /// Sampling step of the full-darkness verification sweep.
    #[cfg_attr(feature = "serde", serde(rename = "sweep_step_minutes"))]
    pub sweep_step: Minutes,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            twilight_altitude: Degrees::new(-18.0),
            sweep_step: Minutes::new(1.0),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        let altitude = self.twilight_altitude.value();
        if !altitude.is_finite() || !(-90.0..=0.0).contains(&altitude) {
            return Err(DarkSkyError::InvalidConfig(format!(
                "twilight altitude must lie in [-90, 0] degrees, got {altitude}"
            )));
        }
        let step = self.sweep_step.value();
        if !step.is_finite() || step <= 0.0 || to_duration(self.sweep_step).is_none() {
            return Err(DarkSkyError::InvalidConfig(format!(
                "sweep step must be a positive number of minutes, got {step}"
            )));
        }
        Ok(())
    }
}

/// Classifies civil days into dark windows using an [`Ephemeris`].
#[derive(Debug, Clone)]
pub struct Classifier<E: Ephemeris> {
    ephemeris: E,
    config: ClassifierConfig,
}

impl<E: Ephemeris> Classifier<E> {
    /// Classifier with the default configuration (−18°, one-minute sweep).
    pub fn new(ephemeris: E) -> Self {
        Self {
            ephemeris,
            config: ClassifierConfig::default(),
        }
    }

    pub fn with_config(ephemeris: E, config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { ephemeris, config })
    }

    #[inline]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    #[inline]
    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    /// Classify every date of `range`.
    ///
    /// Days are independent: a provider failure on one date is recorded as
    /// a [`DayFault`] and the remaining dates are still classified.
    pub fn classify(&self, range: &CivilRange, observer: &Observer) -> DarkTimesResult {
        let mut result = DarkTimesResult::default();
        for (date, day) in range.days() {
            let outcome = day
                .map_err(|error| DayFault {
                    date,
                    query: Query::DayBoundary,
                    error,
                })
                .and_then(|day| self.classify_day(&day, observer));
            match outcome {
                Ok(windows) => result.insert_day(date, windows),
                Err(fault) => {
                    warn!("{fault}");
                    result.insert_fault(fault);
                }
            }
        }
        result
    }

    /// Classify one civil day.
    pub fn classify_day(
        &self,
        day: &CivilDay,
        observer: &Observer,
    ) -> std::result::Result<Vec<DarkWindow>, DayFault> {
        let date = day.date();
        let fault = |query: Query| {
            move |error: EphemerisError| DayFault {
                date,
                query,
                error: error.into(),
            }
        };

        let window = day.search_window();
        let target = self.config.twilight_altitude;
        let eph = &self.ephemeris;

        let twilight_start = eph
            .search_altitude(Body::Sun, observer, Crossing::Descending, day.start(), window, target)
            .map_err(fault(Query::TwilightStart))?;
        let twilight_end = eph
            .search_altitude(Body::Sun, observer, Crossing::Ascending, day.start(), window, target)
            .map_err(fault(Query::TwilightEnd))?;
        let moon_rise = eph
            .search_rise_set(Body::Moon, observer, Crossing::Ascending, day.start(), window)
            .map_err(fault(Query::MoonRise))?;
        let moon_set = eph
            .search_rise_set(Body::Moon, observer, Crossing::Descending, day.start(), window)
            .map_err(fault(Query::MoonSet))?;

        let twilight_start = within_day(day, twilight_start, Query::TwilightStart);
        let twilight_end = within_day(day, twilight_end, Query::TwilightEnd);
        let moon_rise = within_day(day, moon_rise, Query::MoonRise);
        let moon_set = within_day(day, moon_set, Query::MoonSet);

        let moon_at = |at: DateTime<Utc>| {
            eph.altitude(Body::Moon, observer, at)
                .map_err(fault(Query::MoonAltitude(at)))
        };
        let metadata = DayMetadata {
            twilight_start,
            twilight_end,
            moon_rise,
            moon_set,
            moon_altitude_at_day_start: moon_at(day.start())?,
            moon_altitude_at_day_end: moon_at(day.end())?,
            moon_altitude_at_twilight_start: twilight_start.map(&moon_at).transpose()?,
            moon_altitude_at_twilight_end: twilight_end.map(&moon_at).transpose()?,
        };

        let mut windows = Vec::with_capacity(3);
        if twilight_start.is_none() && twilight_end.is_none() {
            // Without a crossing the Sun is either down all day or up all day.
            let sun_at_start = eph
                .altitude(Body::Sun, observer, day.start())
                .map_err(fault(Query::SunAltitude(day.start())))?;
            if sun_at_start > target {
                debug!("{date}: the Sun stays above {target} all day");
            } else if moon_free_day(&metadata) {
                if self
                    .sweep(day, observer)
                    .map_err(fault(Query::VerificationSweep))?
                {
                    trace!("{date}: full-dark");
                    return Ok(full_dark_day(date, day.start(), day.end(), metadata));
                }
                debug!("{date}: no twilight crossing but the day is not dark throughout");
            } else if let Some(window) = moon_limited_window(day, &metadata) {
                windows.push(window);
            }
        }
        windows.extend(dawn_window(day, &metadata));
        windows.extend(dusk_window(day, &metadata));

        trace!(
            "{date}: {}",
            if windows.is_empty() {
                "no dark window".to_string()
            } else {
                windows
                    .iter()
                    .map(|w| w.kind().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        );
        windows.push(DarkWindow::meta_only(date, metadata));
        Ok(windows)
    }

    /// Whether every sample of the day has the Sun at or below the twilight
    /// altitude and the Moon below the horizon.
    fn sweep(&self, day: &CivilDay, observer: &Observer) -> std::result::Result<bool, EphemerisError> {
        let Some(step) = to_duration(self.config.sweep_step) else {
            return Ok(false);
        };
        for at in day.samples(step) {
            let sun = self.ephemeris.altitude(Body::Sun, observer, at)?;
            if sun > self.config.twilight_altitude {
                trace!("{}: sweep stopped at {at}, Sun at {sun}", day.date());
                return Ok(false);
            }
            let moon = self.ephemeris.altitude(Body::Moon, observer, at)?;
            if moon.value() >= 0.0 {
                trace!("{}: sweep stopped at {at}, Moon at {moon}", day.date());
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Classify `[start, end]` in `zone` with the default configuration.
///
/// `start > end` yields an empty result.
pub fn classify<E: Ephemeris + ?Sized>(
    start: NaiveDate,
    end: NaiveDate,
    zone: Tz,
    observer: &Observer,
    ephemeris: &E,
) -> DarkTimesResult {
    Classifier::new(ephemeris).classify(&CivilRange::new(start, end, zone), observer)
}

/// Events beyond the civil day belong to the next one.
fn within_day(day: &CivilDay, event: Option<DateTime<Utc>>, query: Query) -> Option<DateTime<Utc>> {
    match event {
        Some(at) if day.contains(at) => Some(at),
        Some(at) => {
            debug!("{}: {query} at {at} falls after the day, ignored", day.date());
            None
        }
        None => {
            debug!("{}: no {query} found", day.date());
            None
        }
    }
}

fn up(altitude: Degrees) -> bool {
    altitude.value() >= 0.0
}

fn down(altitude: Degrees) -> bool {
    altitude.value() <= 0.0
}

/// No moonrise, no moonset, and the Moon below the horizon at both ends.
fn moon_free_day(meta: &DayMetadata) -> bool {
    meta.moon_rise.is_none()
        && meta.moon_set.is_none()
        && down(meta.moon_altitude_at_day_start)
        && down(meta.moon_altitude_at_day_end)
}

/// The lone full-dark window, or the day's metadata when the span is empty.
fn full_dark_day(
    date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    metadata: DayMetadata,
) -> Vec<DarkWindow> {
    match DarkWindow::full_dark(date, start, end, metadata) {
        Some(window) => vec![window],
        None => vec![DarkWindow::meta_only(date, metadata)],
    }
}

/// Dark stretch left by the Moon on a day without twilight crossings.
fn moon_limited_window(day: &CivilDay, meta: &DayMetadata) -> Option<DarkWindow> {
    let date = day.date();
    if let Some(rise) = meta.moon_rise {
        if down(meta.moon_altitude_at_day_start) && rise > day.start() {
            return DarkWindow::dawn(date, day.start(), rise, *meta);
        }
    }
    if let Some(set) = meta.moon_set {
        if down(meta.moon_altitude_at_day_end) && set < day.end() {
            return DarkWindow::dusk(date, set, day.end(), *meta);
        }
    }
    None
}

fn dawn_window(day: &CivilDay, meta: &DayMetadata) -> Option<DarkWindow> {
    let date = day.date();
    let twilight = meta.twilight_end?;
    let at_start = meta.moon_altitude_at_day_start;

    let moon_down_until_twilight = || {
        let at_twilight = meta.moon_altitude_at_twilight_end?;
        (down(at_start) && down(at_twilight))
            .then(|| DarkWindow::dawn(date, day.start(), twilight, *meta))
            .flatten()
    };
    let moon_sets_before_twilight = || {
        let set = meta.moon_set?;
        (up(at_start) && set < twilight)
            .then(|| DarkWindow::dawn(date, set, twilight, *meta))
            .flatten()
    };
    let moon_rises_before_twilight = || {
        let rise = meta.moon_rise?;
        (down(at_start) && rise < twilight)
            .then(|| DarkWindow::dawn(date, day.start(), rise, *meta))
            .flatten()
    };

    moon_down_until_twilight()
        .or_else(moon_sets_before_twilight)
        .or_else(moon_rises_before_twilight)
}

fn dusk_window(day: &CivilDay, meta: &DayMetadata) -> Option<DarkWindow> {
    let date = day.date();
    let twilight = meta.twilight_start?;
    let at_end = meta.moon_altitude_at_day_end;

    let moon_down_after_twilight = || {
        let at_twilight = meta.moon_altitude_at_twilight_start?;
        (down(at_twilight) && down(at_end))
            .then(|| DarkWindow::dusk(date, twilight, day.end(), *meta))
            .flatten()
    };
    let moon_sets_after_twilight = || {
        let set = meta.moon_set?;
        (down(at_end) && set > twilight)
            .then(|| DarkWindow::dusk(date, set, day.end(), *meta))
            .flatten()
    };
    let moon_rises_after_twilight = || {
        let rise = meta.moon_rise?;
        (up(at_end) && rise > twilight)
            .then(|| DarkWindow::dusk(date, twilight, rise, *meta))
            .flatten()
    };

    moon_down_after_twilight()
        .or_else(moon_sets_after_twilight)
        .or_else(moon_rises_after_twilight)
}
