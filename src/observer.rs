// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Geographic observer.

use qtty::{Degrees, Meter, Quantity};

use crate::error::{DarkSkyError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lowest accepted elevation: the shore of the Dead Sea is about −430 m.
const MIN_ELEVATION_M: f64 = -500.0;

/// A geodetic position on the Earth's surface.
///
/// Longitude is positive east.  Construction validates ranges, so any
/// `Observer` value is usable by an ephemeris without further checks.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawObserver", into = "RawObserver"))]
pub struct Observer {
    latitude: Degrees,
    longitude: Degrees,
    elevation: Quantity<Meter>,
}

impl Observer {
    /// Build an observer from plain degrees and meters.
    pub fn new(latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Result<Self> {
        check("latitude", latitude_deg, -90.0, 90.0, "[-90, 90] degrees")?;
        check("longitude", longitude_deg, -180.0, 180.0, "[-180, 180] degrees")?;
        check(
            "elevation",
            elevation_m,
            MIN_ELEVATION_M,
            f64::MAX,
            "a finite height of at least -500 m",
        )?;
        Ok(Self {
            latitude: Degrees::new(latitude_deg),
            longitude: Degrees::new(longitude_deg),
            elevation: Quantity::<Meter>::new(elevation_m),
        })
    }

    /// Build an observer from typed quantities.
    pub fn from_quantities(
        latitude: Degrees,
        longitude: Degrees,
        elevation: Quantity<Meter>,
    ) -> Result<Self> {
        Self::new(latitude.value(), longitude.value(), elevation.value())
    }

    #[inline]
    pub fn latitude(&self) -> Degrees {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> Degrees {
        self.longitude
    }

    #[inline]
    pub fn elevation(&self) -> Quantity<Meter> {
        self.elevation
    }
}

fn check(field: &'static str, value: f64, lo: f64, hi: f64, expected: &'static str) -> Result<()> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(())
    } else {
        Err(DarkSkyError::InvalidObserver {
            field,
            value,
            expected,
        })
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawObserver {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    elevation_m: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawObserver> for Observer {
    type Error = DarkSkyError;

    fn try_from(raw: RawObserver) -> Result<Self> {
        Observer::new(raw.latitude, raw.longitude, raw.elevation_m)
    }
}

#[cfg(feature = "serde")]
impl From<Observer> for RawObserver {
    fn from(observer: Observer) -> Self {
        RawObserver {
            latitude: observer.latitude.value(),
            longitude: observer.longitude.value(),
            elevation_m: observer.elevation.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        assert!(Observer::new(90.0, 180.0, 0.0).is_ok());
        assert!(Observer::new(-90.0, -180.0, -500.0).is_ok());
        assert!(Observer::new(28.7624, -17.8892, 2396.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let err = Observer::new(90.5, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            DarkSkyError::InvalidObserver {
                field: "latitude",
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_longitude_and_elevation() {
        assert!(Observer::new(0.0, 181.0, 0.0).is_err());
        assert!(Observer::new(0.0, 0.0, -600.0).is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(Observer::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(Observer::new(0.0, f64::INFINITY, 0.0).is_err());
        assert!(Observer::new(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn accessors_return_quantities() {
        let observer = Observer::new(51.4769, -0.0005, 46.0).unwrap();
        assert_eq!(observer.latitude(), Degrees::new(51.4769));
        assert_eq!(observer.longitude(), Degrees::new(-0.0005));
        assert_eq!(observer.elevation().value(), 46.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_validates() {
        let observer = Observer::new(40.0, -105.0, 1600.0).unwrap();
        let json = serde_json::to_string(&observer).unwrap();
        assert!(json.contains("\"elevation_m\":1600.0"));
        let back: Observer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, observer);

        let bad = serde_json::from_str::<Observer>(r#"{"latitude":100.0,"longitude":0.0}"#);
        assert!(bad.is_err());
    }
}
