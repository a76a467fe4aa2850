// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! TOML request files.
//!
//! A request names everything one classification needs:
//!
//! ```toml
//! time_zone = "America/Denver"
//! start = "2024-01-15"
//! end = "2024-01-21"
//!
//! [observer]
//! latitude = 40.0
//! longitude = -105.0
//! elevation_m = 1600.0
//!
//! [classifier]
//! twilight_altitude_deg = -18.0
//! sweep_step_minutes = 1.0
//!
//! [ephemeris]
//! refraction = true
//! search_step_minutes = 10.0
//! ```
//!
//! `time_zone` defaults to `UTC`; the `[classifier]` and `[ephemeris]`
//! tables are optional.

use chrono::NaiveDate;
use chrono_tz::Tz;
use qtty::Minutes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::civil::CivilRange;
use crate::classifier::{Classifier, ClassifierConfig};
use crate::error::{DarkSkyError, Result};
use crate::meeus::MeeusEphemeris;
use crate::observer::Observer;

/// Settings of the built-in [`MeeusEphemeris`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisSettings {
    pub refraction: bool,
    #[serde(rename = "search_step_minutes")]
    pub search_step: Minutes,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        let eph = MeeusEphemeris::default();
        Self {
            refraction: eph.refraction(),
            search_step: eph.search_step(),
        }
    }
}

impl EphemerisSettings {
    pub fn build(&self) -> MeeusEphemeris {
        MeeusEphemeris::new()
            .with_refraction(self.refraction)
            .with_search_step(self.search_step)
    }
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

/// A complete classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkSkyConfig {
    pub observer: Observer,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub ephemeris: EphemerisSettings,
}

impl DarkSkyConfig {
    /// Parse and validate a request.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DarkSkyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a request file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        log::debug!("loaded request from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.zone()?;
        self.classifier.validate()?;
        let step = self.ephemeris.search_step.value();
        if !step.is_finite() || step <= 0.0 {
            return Err(DarkSkyError::InvalidConfig(format!(
                "ephemeris search step must be a positive number of minutes, got {step}"
            )));
        }
        Ok(())
    }

    /// The IANA zone named by `time_zone`.
    pub fn zone(&self) -> Result<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| DarkSkyError::UnknownTimeZone(self.time_zone.clone()))
    }

    pub fn range(&self) -> Result<CivilRange> {
        Ok(CivilRange::new(self.start, self.end, self.zone()?))
    }

    /// Classifier over the configured ephemeris.
    pub fn classifier(&self) -> Result<Classifier<MeeusEphemeris>> {
        Classifier::with_config(self.ephemeris.build(), self.classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtty::Degrees;

    const DENVER: &str = r#"
        time_zone = "America/Denver"
        start = "2024-01-15"
        end = "2024-01-21"

        [observer]
        latitude = 40.0
        longitude = -105.0
        elevation_m = 1600.0

        [classifier]
        twilight_altitude_deg = -15.0
    "#;

    #[test]
    fn parses_a_full_request() {
        let config = DarkSkyConfig::from_toml_str(DENVER).unwrap();
        assert_eq!(config.zone().unwrap(), chrono_tz::America::Denver);
        assert_eq!(config.classifier.twilight_altitude, Degrees::new(-15.0));
        assert_eq!(config.classifier.sweep_step, Minutes::new(1.0));
        assert!(config.ephemeris.refraction);
        assert_eq!(config.range().unwrap().len(), 7);
        assert_eq!(config.classifier().unwrap().config().twilight_altitude, Degrees::new(-15.0));
    }

    #[test]
    fn time_zone_defaults_to_utc() {
        let config = DarkSkyConfig::from_toml_str(
            r#"
            start = "2024-06-21"
            end = "2024-06-21"
            [observer]
            latitude = 78.0
            longitude = 15.6
            "#,
        )
        .unwrap();
        assert_eq!(config.zone().unwrap(), Tz::UTC);
        assert_eq!(config.observer.elevation().value(), 0.0);
    }

    #[test]
    fn unknown_zone_is_rejected() {
        let err = DarkSkyConfig::from_toml_str(&DENVER.replace("America/Denver", "Mars/Olympus"))
            .unwrap_err();
        assert!(matches!(err, DarkSkyError::UnknownTimeZone(zone) if zone == "Mars/Olympus"));
    }

    #[test]
    fn invalid_observer_fails_parsing() {
        let err = DarkSkyConfig::from_toml_str(&DENVER.replace("latitude = 40.0", "latitude = 140.0"))
            .unwrap_err();
        assert!(matches!(err, DarkSkyError::ConfigParse(_)));
    }

    #[test]
    fn invalid_classifier_settings_are_rejected() {
        let err = DarkSkyConfig::from_toml_str(&format!("{DENVER}\nsweep_step_minutes = 0.0\n"))
            .unwrap_err();
        assert!(matches!(err, DarkSkyError::InvalidConfig(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DarkSkyConfig::load("/nonexistent/darksky.toml").unwrap_err();
        assert!(matches!(err, DarkSkyError::ConfigIo(_)));
    }
}
