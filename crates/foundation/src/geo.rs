//! Geographic coordinates in degrees.
//!
//! `GeoPoint` is the only coordinate type that crosses crate boundaries. It is
//! validated on construction: an out-of-range coordinate is an error, never a
//! clamp, since clamping would silently misplace whatever sits on it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("coordinate component is not finite")]
    NonFinite,
}

/// A point on the globe, latitude/longitude in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        let p = Self { lat, lon };
        p.validate()?;
        Ok(p)
    }

    /// Checks the point against the valid coordinate domain.
    ///
    /// Points produced by `new` always pass; deserialized points have not been
    /// checked yet and must go through this before use.
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(GeoError::NonFinite);
        }
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&self.lat) {
            return Err(GeoError::LatitudeOutOfRange(self.lat));
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.lon) {
            return Err(GeoError::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }

    /// Euclidean distance in raw (lat, lon) degree space.
    ///
    /// This is not a great-circle distance: it ignores meridian convergence and
    /// does not wrap at the antimeridian.
    pub fn planar_distance(&self, other: &GeoPoint) -> f64 {
        (self.lat - other.lat).hypot(self.lon - other.lon)
    }
}

/// Wraps a longitude into `[-180, 180)`.
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can land exactly on 360 for tiny negative inputs.
    if wrapped >= MAX_LONGITUDE {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoError, GeoPoint, wrap_longitude};

    #[test]
    fn accepts_domain_edges() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_without_clamping() {
        assert_eq!(
            GeoPoint::new(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -181.0),
            Err(GeoError::LongitudeOutOfRange(-181.0))
        );
        assert_eq!(GeoPoint::new(f64::NAN, 0.0), Err(GeoError::NonFinite));
    }

    #[test]
    fn planar_distance_is_degree_space_hypot() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(3.0, 4.0).unwrap();
        assert_eq!(a.planar_distance(&b), 5.0);
    }

    #[test]
    fn wraps_longitude() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(180.0), -180.0);
        assert_eq!(wrap_longitude(45.0), 45.0);
    }
}
