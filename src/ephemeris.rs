// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The ephemeris seam.
//!
//! The classifier never computes a celestial position itself.  Every
//! altitude and every event time comes from an [`Ephemeris`] provider, so
//! the decision tree can be driven by a real theory ([`MeeusEphemeris`](crate::MeeusEphemeris))
//! or by a scripted stub in tests.

use chrono::{DateTime, Utc};
use qtty::{Days, Degrees};
use std::fmt;

use crate::error::EphemerisError;
use crate::observer::Observer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bodies the classifier asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Body {
    Sun,
    Moon,
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Sun => f.write_str("Sun"),
            Body::Moon => f.write_str("Moon"),
        }
    }
}

/// Direction of an altitude crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Crossing {
    /// Altitude increasing through the target (dawn side, rise).
    Ascending,
    /// Altitude decreasing through the target (dusk side, set).
    Descending,
}

/// Source of topocentric altitudes and crossing times.
///
/// Implementations must be deterministic: the same query returns the same
/// answer.  An event that does not occur within the searched window is
/// `Ok(None)`; `Err` is reserved for the provider failing to answer.
pub trait Ephemeris {
    /// Topocentric altitude of `body` seen by `observer` at `at`.
    fn altitude(
        &self,
        body: Body,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> Result<Degrees, EphemerisError>;

    /// First instant in `[start, start + window]` at which the altitude of
    /// the body's center crosses `target` in `direction`.
    fn search_altitude(
        &self,
        body: Body,
        observer: &Observer,
        direction: Crossing,
        start: DateTime<Utc>,
        window: Days,
        target: Degrees,
    ) -> Result<Option<DateTime<Utc>>, EphemerisError>;

    /// First rise ([`Crossing::Ascending`]) or set ([`Crossing::Descending`])
    /// of the body in `[start, start + window]`.
    fn search_rise_set(
        &self,
        body: Body,
        observer: &Observer,
        direction: Crossing,
        start: DateTime<Utc>,
        window: Days,
    ) -> Result<Option<DateTime<Utc>>, EphemerisError>;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn altitude(
        &self,
        body: Body,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> Result<Degrees, EphemerisError> {
        (**self).altitude(body, observer, at)
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
        (**self).search_altitude(body, observer, direction, start, window, target)
    }

    fn search_rise_set(
        &self,
        body: Body,
        observer: &Observer,
        direction: Crossing,
        start: DateTime<Utc>,
        window: Days,
    ) -> Result<Option<DateTime<Utc>>, EphemerisError> {
        (**self).search_rise_set(body, observer, direction, start, window)
    }
}
