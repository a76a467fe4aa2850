// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Astronomical darkness windows.
//!
//! For an observer and a range of calendar dates in an IANA time zone,
//! this crate finds the stretches of each civil day during which the Sun is
//! at or below −18° **and** the Moon is below the horizon.
//!
//! # Core types
//!
//! - [`Observer`]: validated geodetic position.
//! - [`CivilDay`] / [`CivilRange`]: calendar dates resolved to UTC spans.
//! - [`Ephemeris`]: the provider of altitudes and event searches.
//!   [`MeeusEphemeris`] is the built-in implementation.
//! - [`Classifier`]: the per-day decision tree producing a
//!   [`DarkTimesResult`] of [`DarkWindow`]s.
//! - [`summarize`]: one [`NightSummary`] per date, with continuation
//!   across midnight.
//! - [`AltitudeProfile`]: sampled Sun and Moon curves for one day.
//!
//! # Window kinds
//!
//! | Kind | Span |
//! |------|------|
//! | [`FullDark`](WindowKind::FullDark) | the whole civil day |
//! | [`Dawn`](WindowKind::Dawn) | from midnight or moonset, until twilight or moonrise |
//! | [`Dusk`](WindowKind::Dusk) | from twilight or moonset, until midnight or moonrise |
//! | [`MetaOnly`](WindowKind::MetaOnly) | none; carries the day's events |
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use darksky::{classify, MeeusEphemeris, Observer, WindowKind};
//!
//! let observer = Observer::new(40.0, -105.0, 1600.0).unwrap();
//! let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let result = classify(
//!     date,
//!     date,
//!     chrono_tz::America::Denver,
//!     &observer,
//!     &MeeusEphemeris::default(),
//! );
//!
//! let windows = result.get(date).unwrap();
//! assert_eq!(windows.last().unwrap().kind(), WindowKind::MetaOnly);
//! ```
//!
//! # Time scales
//!
//! The built-in ephemeris evaluates its series on typed instants:
//!
//! | Marker | Scale |
//! |--------|-------|
//! | [`JD`] | Julian Date (TT) |
//! | [`MJD`] | Modified Julian Date |
//! | [`UT`] | Universal Time (Earth rotation) |
//!
//! **ΔT = TT − UT** is applied automatically by the [`UT`] scale; the raw
//! value is available via [`Time::<UT>::delta_t()`](Time::delta_t).

mod civil;
mod classifier;
#[cfg(feature = "config")]
mod config;
mod delta_t;
mod ephemeris;
mod error;
pub(crate) mod instant;
mod meeus;
mod observer;
mod period;
mod profile;
pub(crate) mod scales;
mod summary;
mod window;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use civil::{CivilDay, CivilRange};
pub use classifier::{classify, Classifier, ClassifierConfig};
#[cfg(feature = "config")]
pub use config::{DarkSkyConfig, EphemerisSettings};
pub use ephemeris::{Body, Crossing, Ephemeris};
pub use error::{DarkSkyError, EphemerisError, Result};
pub use instant::{Time, TimeInstant, TimeScale};
pub use meeus::MeeusEphemeris;
pub use observer::Observer;
pub use period::{complement_within, intersect_periods, Interval, UtcPeriod};
pub use profile::{AltitudeProfile, AltitudeSample};
pub use scales::{JD, MJD, UT};
pub use summary::{summarize, NightSummary};
pub use window::{DarkTimesResult, DarkWindow, DayFault, DayMetadata, Query, WindowKind};

// ── Type aliases ──────────────────────────────────────────────────────────

/// Julian Date on the TT axis.
pub type JulianDate = Time<JD>;

/// Modified Julian Date, `JD − 2 400 000.5`.
pub type ModifiedJulianDate = Time<MJD>;

/// Julian Date on the Earth-rotation axis.
pub type UniversalTime = Time<UT>;
