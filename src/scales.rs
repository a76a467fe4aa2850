// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale markers needed by the ephemeris.
//!
//! | Marker | Description | Epoch (JD) |
//! |--------|-------------|------------|
//! | [`JD`] | Julian Date on the TT axis | 0.0 |
//! | [`MJD`] | Modified Julian Date | 2 400 000.5 |
//! | [`UT`] | Julian Date on the UT axis (Earth rotation) | 0.0 + ΔT |

use super::instant::{Time, TimeScale};
use qtty::*;

/// Julian Date (TT), the identity scale.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JD;

impl TimeScale for JD {
    const LABEL: &'static str = "Julian Day:";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Modified Julian Date, JD minus 2 400 000.5.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct MJD;

const MJD_EPOCH: Days = Days::new(2_400_000.5);

impl TimeScale for MJD {
    const LABEL: &'static str = "MJD";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value + MJD_EPOCH
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt - MJD_EPOCH
    }
}

/// Universal Time: a Julian Day counted on the Earth-rotation axis.
///
/// Sidereal time is a function of UT; every other theory in this crate
/// runs on TT.  The two differ by **ΔT**, which this scale adds and removes.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "UT";

    #[inline]
    fn to_jd_tt(ut_value: Days) -> Days {
        let dt = super::delta_t::delta_t_seconds(Time::<JD>::from_days(ut_value));
        ut_value + dt.to::<Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        // ut + ΔT(ut) = tt; ΔT drifts by well under a second per year.
        let mut ut = jd_tt;
        for _ in 0..3 {
            let dt = super::delta_t::delta_t_seconds(Time::<JD>::from_days(ut));
            ut = jd_tt - dt.to::<Day>();
        }
        ut
    }
}

impl Time<JD> {
    /// J2000.0 epoch: 2000-01-01T12:00:00 TT.
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Julian centuries since J2000.0, the argument of the Meeus series.
    #[inline]
    pub fn julian_centuries(&self) -> f64 {
        ((*self - Self::J2000) / Self::JULIAN_CENTURY)
            .simplify()
            .value()
    }
}

impl Time<UT> {
    /// Julian centuries of UT since J2000.0, the argument of sidereal time.
    #[inline]
    pub fn julian_centuries(&self) -> f64 {
        (self.value() - 2_451_545.0) / 36_525.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_to_jd_adds_delta_t() {
        let ut = Time::<UT>::new(2_451_545.0);
        let jd: Time<JD> = ut.to::<JD>();
        let offset_secs = (jd.quantity() - ut.quantity()).to::<Second>();
        assert!(
            (offset_secs - Seconds::new(63.8)).abs() < Seconds::new(1.0),
            "UT→JD offset = {} s",
            offset_secs
        );
    }

    #[test]
    fn ut_jd_roundtrip() {
        let jd = Time::<JD>::new(2_460_000.0);
        let back: Time<JD> = jd.to::<UT>().to::<JD>();
        assert!((back.quantity() - jd.quantity()).abs() < Days::new(1e-12));
    }

    #[test]
    fn julian_centuries_at_epoch_and_one_century_later() {
        assert_eq!(Time::<JD>::J2000.julian_centuries(), 0.0);
        let later = Time::<JD>::J2000 + Time::<JD>::JULIAN_CENTURY;
        assert!((later.julian_centuries() - 1.0).abs() < 1e-12);
    }
}
