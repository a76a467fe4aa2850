// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! First-crossing search over a sampled function of time.
//!
//! The function is sampled at a coarse step; the first step whose end
//! points bracket a sign change in the requested direction is then
//! bisected down to a millisecond.  A step of ten minutes cannot miss a
//! Sun or Moon crossing: neither body rises and sets again within that
//! span except within a fraction of a degree of the pole, where the
//! crossing is grazing anyway.

use chrono::{DateTime, Duration, Utc};
use qtty::{Days, Minutes};

use crate::ephemeris::Crossing;
use crate::instant::to_duration;

const RESOLUTION_MS: i64 = 1;

fn brackets(direction: Crossing, before: f64, after: f64) -> bool {
    match direction {
        Crossing::Ascending => before < 0.0 && after >= 0.0,
        Crossing::Descending => before >= 0.0 && after < 0.0,
    }
}

/// Finds the first instant in `[start, start + window]` where `f` crosses
/// zero in `direction`.
///
/// Returns the first sample at or past the crossing, so the result `t`
/// satisfies `f(t) >= 0` when ascending and `f(t) < 0` when descending.
pub(crate) fn first_crossing<E, F>(
    mut f: F,
    direction: Crossing,
    start: DateTime<Utc>,
    window: Days,
    step: Minutes,
) -> Result<Option<DateTime<Utc>>, E>
where
    F: FnMut(DateTime<Utc>) -> Result<f64, E>,
{
    let (Some(span), Some(step)) = (to_duration(window), to_duration(step)) else {
        return Ok(None);
    };
    if span <= Duration::zero() || step <= Duration::zero() {
        return Ok(None);
    }
    let end = start + span;

    let mut t0 = start;
    let mut f0 = f(t0)?;
    while t0 < end {
        let t1 = if t0 + step < end { t0 + step } else { end };
        let f1 = f(t1)?;
        if brackets(direction, f0, f1) {
            return bisect(&mut f, direction, t0, t1).map(Some);
        }
        t0 = t1;
        f0 = f1;
    }
    Ok(None)
}

fn bisect<E, F>(
    f: &mut F,
    direction: Crossing,
    mut lo: DateTime<Utc>,
    mut hi: DateTime<Utc>,
) -> Result<DateTime<Utc>, E>
where
    F: FnMut(DateTime<Utc>) -> Result<f64, E>,
{
    while (hi - lo).num_milliseconds() > RESOLUTION_MS {
        let mid = lo + (hi - lo) / 2;
        let value = f(mid)?;
        let past = match direction {
            Crossing::Ascending => value >= 0.0,
            Crossing::Descending => value < 0.0,
        };
        if past {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Ok(hi)
}
