// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::ephemeris::Body;

/// Failures reported by an [`Ephemeris`](crate::Ephemeris) provider.
///
/// An event that simply does not happen within the searched window is
/// *not* an error; searches report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EphemerisError {
    /// The theory produced NaN or an infinity.
    #[error("non-finite {body} altitude at {at}")]
    NonFinite { body: Body, at: DateTime<Utc> },

    /// The instant lies outside the range the provider supports.
    #[error("instant {at} is outside the supported range")]
    OutOfRange { at: DateTime<Utc> },

    /// Any other provider-specific failure.
    #[error("ephemeris provider failed: {0}")]
    Provider(String),
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum DarkSkyError {
    #[error("invalid observer {field}: {value} (expected {expected})")]
    InvalidObserver {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),

    #[error("no local midnight could be resolved for {date} in {zone}")]
    UnresolvableMidnight { date: NaiveDate, zone: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    #[cfg(feature = "config")]
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("failed to read configuration file: {0}")]
    ConfigIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DarkSkyError>;
