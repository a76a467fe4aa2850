// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Low-accuracy apparent Sun, Meeus *Astronomical Algorithms* ch. 25.
//!
//! Accuracy is about 0.01°, far below what a −18° threshold can resolve.

use qtty::{Degrees, Kilometers};

use super::{ecliptic_to_equatorial, mean_obliquity, Equatorial, KM_PER_AU};
use crate::instant::Time;
use crate::scales::JD;

/// Apparent geocentric position of the Sun at a JD(TT).
pub(crate) fn apparent_position(jd: Time<JD>) -> Equatorial {
    let t = jd.julian_centuries();

    let l0 = Degrees::new(280.46646 + 36_000.76983 * t + 0.000_303_2 * t * t).wrap_pos();
    let m = Degrees::new(357.52911 + 35_999.05029 * t - 0.000_153_7 * t * t).wrap_pos();
    let e = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t * t;

    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (m * 2.0).sin()
        + 0.000_289 * (m * 3.0).sin();

    let true_longitude = l0 + Degrees::new(c);
    let anomaly = m + Degrees::new(c);
    let radius_au = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * anomaly.cos());

    let omega = Degrees::new(125.04 - 1_934.136 * t);
    let longitude = true_longitude - Degrees::new(0.00569 + 0.00478 * omega.sin());
    let obliquity = mean_obliquity(t) + Degrees::new(0.00256 * omega.cos());

    let (right_ascension, declination) =
        ecliptic_to_equatorial(longitude, Degrees::new(0.0), obliquity);

    Equatorial {
        right_ascension,
        declination,
        distance: Kilometers::new(radius_au * KM_PER_AU),
    }
}
