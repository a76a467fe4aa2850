// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Equatorial to horizontal conversion for a ground observer.

use qtty::{Degrees, Radian};

use super::{Equatorial, EARTH_EQUATORIAL_RADIUS_KM};
use crate::instant::Time;
use crate::observer::Observer;
use crate::scales::UT;

/// Polar to equatorial axis ratio of the reference ellipsoid.
const EARTH_AXIS_RATIO: f64 = 0.996_647_19;

/// Greenwich mean sidereal time, Meeus eq. 12.4.
pub(crate) fn greenwich_mean_sidereal_time(jd_ut: Time<UT>) -> Degrees {
    let t = jd_ut.julian_centuries();
    Degrees::new(
        280.460_618_37 + 360.985_647_366_29 * (jd_ut.value() - 2_451_545.0)
            + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
    .wrap_pos()
}

/// Geocentric position of the observer as `(ρ sin φ′, ρ cos φ′)`, Meeus ch. 11.
fn parallax_constants(observer: &Observer) -> (f64, f64) {
    let phi = observer.latitude();
    let height = observer.elevation().value() / (EARTH_EQUATORIAL_RADIUS_KM * 1_000.0);
    let u = (EARTH_AXIS_RATIO * phi.tan()).atan();
    (
        EARTH_AXIS_RATIO * u.sin() + height * phi.sin(),
        u.cos() + height * phi.cos(),
    )
}

/// Topocentric altitude of the body's center, without refraction.
///
/// Applies diurnal parallax to right ascension and declination (Meeus
/// ch. 40) before converting to altitude with the local hour angle.
pub(crate) fn topocentric_altitude(
    position: &Equatorial,
    observer: &Observer,
    local_sidereal_time: Degrees,
) -> Degrees {
    let (rho_sin, rho_cos) = parallax_constants(observer);
    let sin_parallax = EARTH_EQUATORIAL_RADIUS_KM / position.distance.value();

    let hour_angle = local_sidereal_time - position.right_ascension;
    let (sin_h, cos_h) = hour_angle.sin_cos();
    let (sin_dec, cos_dec) = position.declination.sin_cos();

    let denominator = cos_dec - rho_cos * sin_parallax * cos_h;
    let delta_ra = (-rho_cos * sin_parallax * sin_h).atan2(denominator);
    let topo_dec = ((sin_dec - rho_sin * sin_parallax) * delta_ra.cos()).atan2(denominator);
    let topo_hour_angle = hour_angle.to::<Radian>().value() - delta_ra;

    let (sin_phi, cos_phi) = observer.latitude().sin_cos();
    let sin_alt = sin_phi * topo_dec.sin() + cos_phi * topo_dec.cos() * topo_hour_angle.cos();
    Degrees::new(sin_alt.clamp(-1.0, 1.0).asin().to_degrees())
}

/// Atmospheric refraction for a geometric altitude, in degrees.
///
/// Saemundsson's formula under standard conditions.  Below −1° the
/// correction fades linearly to zero at the nadir, so the altitude curve
/// stays continuous through the horizon.
pub(crate) fn refraction(altitude: Degrees) -> Degrees {
    let alt = altitude.value();
    if !(-90.0..=90.0).contains(&alt) {
        return Degrees::new(0.0);
    }
    let hd = alt.max(-1.0);
    let mut correction = 1.02 / Degrees::new(hd + 10.3 / (hd + 5.11)).tan() / 60.0;
    if alt < -1.0 {
        correction *= (alt + 90.0) / 89.0;
    }
    Degrees::new(correction)
}
