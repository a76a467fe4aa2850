// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sun and Moon altitude curves across a civil day.

use chrono::{DateTime, Duration, Utc};
use qtty::{Degrees, Minutes};

use crate::civil::CivilDay;
use crate::ephemeris::{Body, Ephemeris};
use crate::error::{DarkSkyError, Result};
use crate::instant::to_duration;
use crate::observer::Observer;
use crate::period::{complement_within, intersect_periods, UtcPeriod};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Both altitudes at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AltitudeSample {
    pub at: DateTime<Utc>,
    pub sun: Degrees,
    pub moon: Degrees,
}

/// Altitudes sampled at a fixed step over one civil day.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AltitudeProfile {
    day: CivilDay,
    samples: Vec<AltitudeSample>,
}

impl AltitudeProfile {
    /// Sample `day` every `step`, from its start to its end inclusive.
    pub fn sample<E: Ephemeris + ?Sized>(
        ephemeris: &E,
        observer: &Observer,
        day: &CivilDay,
        step: Minutes,
    ) -> Result<Self> {
        let step = to_duration(step)
            .filter(|s| *s > Duration::zero())
            .ok_or_else(|| {
                DarkSkyError::InvalidConfig(format!(
                    "profile step must be a positive number of minutes, got {}",
                    step.value()
                ))
            })?;

        let samples = day
            .samples(step)
            .map(|at| {
                Ok(AltitudeSample {
                    at,
                    sun: ephemeris.altitude(Body::Sun, observer, at)?,
                    moon: ephemeris.altitude(Body::Moon, observer, at)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { day: *day, samples })
    }

    pub fn day(&self) -> &CivilDay {
        &self.day
    }

    pub fn samples(&self) -> &[AltitudeSample] {
        &self.samples
    }

    /// Highest Moon altitude over the day.
    pub fn moon_peak(&self) -> Option<AltitudeSample> {
        self.samples
            .iter()
            .copied()
            .max_by(|a, b| a.moon.value().total_cmp(&b.moon.value()))
    }

    /// Sampled runs where `keep` holds.  A run opened at sample `i` extends
    /// to the first sample where the predicate fails, or to the day's end.
    fn runs(&self, keep: impl Fn(&AltitudeSample) -> bool) -> Vec<UtcPeriod> {
        let mut runs = Vec::new();
        let mut open: Option<DateTime<Utc>> = None;
        for sample in &self.samples {
            match (open, keep(sample)) {
                (None, true) => open = Some(sample.at),
                (Some(start), false) => {
                    runs.push(UtcPeriod::new(start, sample.at));
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            let end = self.day.end();
            if start < end {
                runs.push(UtcPeriod::new(start, end));
            }
        }
        runs
    }

    /// Intervals with the Sun at or below `twilight_altitude` and the Moon
    /// below the horizon, at the sampling resolution.
    pub fn dark_periods(&self, twilight_altitude: Degrees) -> Vec<UtcPeriod> {
        let sun_low = self.runs(|s| s.sun <= twilight_altitude);
        let moon_up = self.runs(|s| s.moon.value() >= 0.0);
        let moon_down = complement_within(self.day.span(), &moon_up);
        intersect_periods(&sun_low, &moon_down)
    }
}
