// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Built-in low-precision ephemeris.
//!
//! [`MeeusEphemeris`] answers every [`Ephemeris`] query from the analytic
//! series of Jean Meeus, *Astronomical Algorithms* (2nd ed.):
//!
//! | Part | Chapter | Typical error |
//! |------|---------|---------------|
//! | Sun | 25 (low accuracy) | 0.01° |
//! | Moon | 47 (main terms) | 0.05° |
//! | Sidereal time | 12 | < 0.1 s |
//! | Parallax | 40 | exact for the model |
//!
//! A few hundredths of a degree translate into well under a minute on any
//! event time, which is the resolution the dark-window classification
//! works at.

mod horizon;
mod moon;
pub(crate) mod search;
mod sun;

use chrono::{DateTime, Datelike, Utc};
use qtty::{Days, Degrees, Kilometers, Minutes};

use crate::ephemeris::{Body, Crossing, Ephemeris};
use crate::error::EphemerisError;
use crate::instant::Time;
use crate::observer::Observer;
use crate::scales::{JD, UT};

pub(crate) const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.14;
pub(crate) const KM_PER_AU: f64 = 149_597_870.7;

const SUN_RADIUS_KM: f64 = 696_000.0;
const MOON_RADIUS_KM: f64 = 1_737.4;

/// Refraction assumed at the horizon by rise/set searches (34′).
const HORIZON_REFRACTION: Degrees = Degrees::new(34.0 / 60.0);

/// Years over which the truncated series are trusted.
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1000..=3000;

/// Apparent geocentric equatorial position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Equatorial {
    pub right_ascension: Degrees,
    pub declination: Degrees,
    pub distance: Kilometers,
}

/// Mean obliquity of the ecliptic, Meeus eq. 22.2.
pub(crate) fn mean_obliquity(t: f64) -> Degrees {
    let arcsec = 46.8150 * t + 0.000_59 * t * t - 0.001_813 * t * t * t;
    Degrees::new(23.439_291_111 - arcsec / 3_600.0)
}

/// Nutation in longitude and obliquity, `(Δψ, Δε)`, to 0.5″ (Meeus ch. 22).
pub(crate) fn nutation(t: f64) -> (Degrees, Degrees) {
    let omega = Degrees::new(125.044_52 - 1_934.136_261 * t);
    let sun = Degrees::new(280.4665 + 36_000.7698 * t);
    let moon = Degrees::new(218.3165 + 481_267.8813 * t);

    let psi = -17.20 * omega.sin() - 1.32 * (sun * 2.0).sin() - 0.23 * (moon * 2.0).sin()
        + 0.21 * (omega * 2.0).sin();
    let eps = 9.20 * omega.cos() + 0.57 * (sun * 2.0).cos() + 0.10 * (moon * 2.0).cos()
        - 0.09 * (omega * 2.0).cos();
    (Degrees::new(psi / 3_600.0), Degrees::new(eps / 3_600.0))
}

/// Ecliptic `(λ, β)` to equatorial `(α, δ)` for obliquity `ε`.
pub(crate) fn ecliptic_to_equatorial(
    longitude: Degrees,
    latitude: Degrees,
    obliquity: Degrees,
) -> (Degrees, Degrees) {
    let (sin_l, cos_l) = longitude.sin_cos();
    let (sin_e, cos_e) = obliquity.sin_cos();
    let (sin_b, cos_b) = latitude.sin_cos();

    let alpha = (sin_l * cos_e - latitude.tan() * sin_e).atan2(cos_l);
    let delta = (sin_b * cos_e + cos_b * sin_e * sin_l).asin();
    (
        Degrees::new(alpha.to_degrees()).wrap_pos(),
        Degrees::new(delta.to_degrees()),
    )
}

/// Analytic Sun and Moon ephemeris.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use darksky::{Body, Ephemeris, MeeusEphemeris, Observer};
///
/// let greenwich = Observer::new(51.4769, 0.0, 46.0).unwrap();
/// let noon = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
/// let sun = MeeusEphemeris::default()
///     .altitude(Body::Sun, &greenwich, noon)
///     .unwrap();
/// assert!((sun.value() - 62.0).abs() < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeeusEphemeris {
    refraction: bool,
    search_step: Minutes,
}

impl Default for MeeusEphemeris {
    fn default() -> Self {
        Self {
            refraction: true,
            search_step: Minutes::new(10.0),
        }
    }
}

impl MeeusEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometric altitudes throughout: no refraction on sampled altitudes
    /// and a 0° horizon for rise and set.
    pub fn without_refraction(self) -> Self {
        self.with_refraction(false)
    }

    pub fn with_refraction(mut self, refraction: bool) -> Self {
        self.refraction = refraction;
        self
    }

    /// Coarse step used to bracket crossings before bisection.
    ///
    /// Non-positive or non-finite steps are ignored.
    pub fn with_search_step(mut self, step: Minutes) -> Self {
        if step.value().is_finite() && step.value() > 0.0 {
            self.search_step = step;
        }
        self
    }

    #[inline]
    pub fn refraction(&self) -> bool {
        self.refraction
    }

    #[inline]
    pub fn search_step(&self) -> Minutes {
        self.search_step
    }

    /// Geometric topocentric altitude of the center and the body's distance.
    fn topocentric(
        &self,
        body: Body,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> Result<(Degrees, Kilometers), EphemerisError> {
        if !SUPPORTED_YEARS.contains(&at.year()) {
            return Err(EphemerisError::OutOfRange { at });
        }
        let jd_tt = Time::<JD>::from_utc(at);
        let jd_ut = Time::<UT>::from_utc(at);

        let position = match body {
            Body::Sun => sun::apparent_position(jd_tt),
            Body::Moon => moon::apparent_position(jd_tt),
        };
        let lst = horizon::greenwich_mean_sidereal_time(jd_ut) + observer.longitude();
        let altitude = horizon::topocentric_altitude(&position, observer, lst);

        if !altitude.value().is_finite() || !position.distance.value().is_finite() {
            return Err(EphemerisError::NonFinite { body, at });
        }
        Ok((altitude, position.distance))
    }

    fn semidiameter(body: Body, distance: Kilometers) -> Degrees {
        let radius = match body {
            Body::Sun => SUN_RADIUS_KM,
            Body::Moon => MOON_RADIUS_KM,
        };
        Degrees::new((radius / distance.value()).asin().to_degrees())
    }
}

impl Ephemeris for MeeusEphemeris {
    fn altitude(
        &self,
        body: Body,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> Result<Degrees, EphemerisError> {
        let (altitude, _) = self.topocentric(body, observer, at)?;
        if self.refraction {
            Ok(altitude + horizon::refraction(altitude))
        } else {
            Ok(altitude)
        }
    }

    fn search_altitude(
        &self,
        body: Body,
        observer: &Observer,
        direction: Crossing,
        start: DateTime<Utc>,
        window: Days,
        target: Degrees,
    ) -> Result<Option<DateTime<Utc>>, EphemerisError> {
        search::first_crossing(
            |t| {
                let (altitude, _) = self.topocentric(body, observer, t)?;
                Ok((altitude - target).value())
            },
            direction,
            start,
            window,
            self.search_step,
        )
    }

    fn search_rise_set(
        &self,
        body: Body,
        observer: &Observer,
        direction: Crossing,
        start: DateTime<Utc>,
        window: Days,
    ) -> Result<Option<DateTime<Utc>>, EphemerisError> {
        let horizon = if self.refraction {
            -HORIZON_REFRACTION
        } else {
            Degrees::new(0.0)
        };
        search::first_crossing(
            |t| {
                let (altitude, distance) = self.topocentric(body, observer, t)?;
                let upper_limb = altitude + Self::semidiameter(body, distance);
                Ok((upper_limb - horizon).value())
            },
            direction,
            start,
            window,
            self.search_step,
        )
    }
}
