// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT = TT − UT
//!
//! Polynomial expressions of Espenak & Meeus (2006) for 1900–2150, with
//! the Morrison & Stephenson long-term parabola outside that span.
//!
//! The dark-sky computation is insensitive to ΔT at the level of a few
//! seconds: the Moon moves about half a degree per hour, so even a
//! ten-second error shifts its position by under 0.002°.

use super::instant::Time;
use super::scales::JD;
use qtty::Seconds;

/// Decimal year of a Julian Day on the UT axis.
#[inline]
fn decimal_year(jd_ut: Time<JD>) -> f64 {
    2000.0 + (jd_ut.value() - 2_451_544.5) / 365.25
}

/// Long-term parabola, `u` in centuries from 1820.
#[inline]
fn long_term(year: f64) -> f64 {
    let u = (year - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// Returns **ΔT** for a Julian Day on the **UT** axis.
pub(crate) fn delta_t_seconds(jd_ut: Time<JD>) -> Seconds {
    let y = decimal_year(jd_ut);
    let dt = match y {
        y if y < 1900.0 => long_term(y),
        y if y < 1920.0 => {
            let t = y - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
                - 0.000197 * t.powi(4)
        }
        y if y < 1941.0 => {
            let t = y - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
        }
        y if y < 1961.0 => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        y if y < 1986.0 => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        y if y < 2005.0 => {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t.powi(2)
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        }
        y if y < 2050.0 => {
            let t = y - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t.powi(2)
        }
        y if y < 2150.0 => long_term(y) - 0.5628 * (2150.0 - y),
        y => long_term(y),
    };
    Seconds::new(dt)
}

impl Time<super::scales::UT> {
    /// Returns **ΔT = TT − UT** for this UT epoch.
    ///
    /// ```
    /// use qtty::Seconds;
    ///
    /// let dt = darksky::UniversalTime::new(2_451_545.0).delta_t();
    /// assert!((dt - Seconds::new(63.83)).abs() < Seconds::new(0.5));
    /// ```
    #[inline]
    pub fn delta_t(&self) -> Seconds {
        delta_t_seconds(Time::<JD>::from_days(self.quantity()))
    }
}
