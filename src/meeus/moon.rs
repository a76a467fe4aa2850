// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Geocentric Moon, Meeus *Astronomical Algorithms* ch. 47.
//!
//! Only the largest periodic terms of tables 47.A and 47.B are kept.  The
//! truncation costs a few hundredths of a degree in longitude, which moves
//! a moonrise by well under a minute.

use qtty::{Degrees, Kilometers};

use super::{ecliptic_to_equatorial, mean_obliquity, nutation, Equatorial};
use crate::instant::Time;
use crate::scales::JD;

/// `(D, M, M′, F, Σl [1e-6 °], Σr [1e-3 km])`
const LONGITUDE_DISTANCE_TERMS: [(f64, f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 1.0, 0.0, 6_288_774.0, -20_905_355.0),
    (2.0, 0.0, -1.0, 0.0, 1_274_027.0, -3_699_111.0),
    (2.0, 0.0, 0.0, 0.0, 658_314.0, -2_955_968.0),
    (0.0, 0.0, 2.0, 0.0, 213_618.0, -569_925.0),
    (0.0, 1.0, 0.0, 0.0, -185_116.0, 48_888.0),
    (0.0, 0.0, 0.0, 2.0, -114_332.0, -3_149.0),
    (2.0, 0.0, -2.0, 0.0, 58_793.0, 246_158.0),
    (2.0, -1.0, -1.0, 0.0, 57_066.0, -152_138.0),
    (2.0, 0.0, 1.0, 0.0, 53_322.0, -170_733.0),
    (2.0, -1.0, 0.0, 0.0, 45_758.0, -204_586.0),
    (0.0, 1.0, -1.0, 0.0, -40_923.0, -129_620.0),
    (1.0, 0.0, 0.0, 0.0, -34_720.0, 108_743.0),
    (0.0, 1.0, 1.0, 0.0, -30_383.0, 104_755.0),
    (2.0, 0.0, 0.0, -2.0, 15_327.0, 10_321.0),
    (0.0, 0.0, 1.0, 2.0, -12_528.0, 0.0),
    (0.0, 0.0, 1.0, -2.0, 10_980.0, 79_661.0),
    (4.0, 0.0, -1.0, 0.0, 10_675.0, -34_782.0),
    (0.0, 0.0, 3.0, 0.0, 10_034.0, -23_210.0),
    (4.0, 0.0, -2.0, 0.0, 8_548.0, -21_636.0),
    (2.0, 1.0, -1.0, 0.0, -7_888.0, 24_208.0),
];

/// `(D, M, M′, F, Σb [1e-6 °])`
const LATITUDE_TERMS: [(f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 0.0, 1.0, 5_128_122.0),
    (0.0, 0.0, 1.0, 1.0, 280_602.0),
    (0.0, 0.0, 1.0, -1.0, 277_693.0),
    (2.0, 0.0, 0.0, -1.0, 173_237.0),
    (2.0, 0.0, -1.0, 1.0, 55_413.0),
    (2.0, 0.0, -1.0, -1.0, 46_271.0),
    (2.0, 0.0, 0.0, 1.0, 32_573.0),
    (0.0, 0.0, 2.0, 1.0, 17_198.0),
    (2.0, 0.0, 1.0, -1.0, 9_266.0),
    (0.0, 0.0, 2.0, -1.0, 8_822.0),
    (2.0, -1.0, 0.0, -1.0, 8_216.0),
    (2.0, 0.0, -2.0, -1.0, 4_324.0),
    (2.0, 0.0, 1.0, 1.0, 4_200.0),
    (2.0, 1.0, 0.0, -1.0, -3_359.0),
    (2.0, -1.0, -1.0, 1.0, 2_463.0),
    (2.0, -1.0, 0.0, 1.0, 2_211.0),
    (2.0, -1.0, -1.0, -1.0, 2_065.0),
    (0.0, 1.0, -1.0, -1.0, -1_870.0),
    (4.0, 0.0, -1.0, -1.0, 1_828.0),
    (0.0, 1.0, 0.0, 1.0, -1_794.0),
];

/// Fundamental arguments of the lunar theory.
struct Arguments {
    mean_longitude: Degrees,
    elongation: Degrees,
    sun_anomaly: Degrees,
    moon_anomaly: Degrees,
    latitude_argument: Degrees,
    /// Eccentricity factor applied to terms in `M`.
    eccentricity: f64,
}

impl Arguments {
    fn at(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        Self {
            mean_longitude: Degrees::new(
                218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
                    - t4 / 65_194_000.0,
            )
            .wrap_pos(),
            elongation: Degrees::new(
                297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
                    - t4 / 113_065_000.0,
            )
            .wrap_pos(),
            sun_anomaly: Degrees::new(
                357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0,
            )
            .wrap_pos(),
            moon_anomaly: Degrees::new(
                134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
                    - t4 / 14_712_000.0,
            )
            .wrap_pos(),
            latitude_argument: Degrees::new(
                93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
                    + t4 / 863_310_000.0,
            )
            .wrap_pos(),
            eccentricity: 1.0 - 0.002_516 * t - 0.000_007_4 * t2,
        }
    }

    fn term(&self, d: f64, m: f64, mp: f64, f: f64) -> (Degrees, f64) {
        let argument = self.elongation * d
            + self.sun_anomaly * m
            + self.moon_anomaly * mp
            + self.latitude_argument * f;
        let factor = match m.abs() as u8 {
            1 => self.eccentricity,
            2 => self.eccentricity * self.eccentricity,
            _ => 1.0,
        };
        (argument, factor)
    }
}

/// Geometric ecliptic coordinates of the Moon: `(λ, β, Δ)`.
fn ecliptic_position(t: f64) -> (Degrees, Degrees, Kilometers) {
    let args = Arguments::at(t);

    let a1 = Degrees::new(119.75 + 131.849 * t);
    let a2 = Degrees::new(53.09 + 479_264.290 * t);
    let a3 = Degrees::new(313.45 + 481_266.484 * t);

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(d, m, mp, f, coeff_l, coeff_r) in &LONGITUDE_DISTANCE_TERMS {
        let (argument, factor) = args.term(d, m, mp, f);
        let (sin, cos) = argument.sin_cos();
        sum_l += coeff_l * factor * sin;
        sum_r += coeff_r * factor * cos;
    }

    let mut sum_b = 0.0;
    for &(d, m, mp, f, coeff_b) in &LATITUDE_TERMS {
        let (argument, factor) = args.term(d, m, mp, f);
        sum_b += coeff_b * factor * argument.sin();
    }

    let lp = args.mean_longitude;
    let f = args.latitude_argument;
    let mp = args.moon_anomaly;

    sum_l += 3_958.0 * a1.sin() + 1_962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sum_b += -2_235.0 * lp.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - mp).sin()
        - 115.0 * (lp + mp).sin();

    (
        (lp + Degrees::new(sum_l / 1e6)).wrap_pos(),
        Degrees::new(sum_b / 1e6),
        Kilometers::new(385_000.56 + sum_r / 1e3),
    )
}

/// Apparent geocentric position of the Moon at a JD(TT).
pub(crate) fn apparent_position(jd: Time<JD>) -> Equatorial {
    let t = jd.julian_centuries();
    let (longitude, latitude, distance) = ecliptic_position(t);
    let (delta_psi, delta_epsilon) = nutation(t);

    let (right_ascension, declination) = ecliptic_to_equatorial(
        longitude + delta_psi,
        latitude,
        mean_obliquity(t) + delta_epsilon,
    );

    Equatorial {
        right_ascension,
        declination,
        distance,
    }
}
