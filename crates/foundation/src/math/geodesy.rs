use super::Vec3;
use crate::geo::GeoPoint;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Earth-centered, Earth-fixed position of `point` lifted `alt_m` meters above
/// the ellipsoid.
pub fn geo_to_ecef(point: GeoPoint, alt_m: f64) -> Vec3 {
    let lat = point.lat.to_radians();
    let lon = point.lon.to_radians();
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let sin_lon = lon.sin();
    let cos_lon = lon.cos();

    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let x = (n + alt_m) * cos_lat * cos_lon;
    let y = (n + alt_m) * cos_lat * sin_lon;
    let z = (n * (1.0 - WGS84_E2) + alt_m) * sin_lat;

    Vec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::{WGS84_A, WGS84_B, geo_to_ecef};
    use crate::geo::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian() {
        let ecef = geo_to_ecef(GeoPoint::new(0.0, 0.0).unwrap(), 0.0);
        assert_close(ecef.x, WGS84_A, 1e-6);
        assert_close(ecef.y, 0.0, 1e-6);
        assert_close(ecef.z, 0.0, 1e-6);
    }

    #[test]
    fn equator_90e() {
        let ecef = geo_to_ecef(GeoPoint::new(0.0, 90.0).unwrap(), 0.0);
        assert_close(ecef.x, 0.0, 1e-6);
        assert_close(ecef.y, WGS84_A, 1e-6);
    }

    #[test]
    fn north_pole_sits_on_minor_axis() {
        let ecef = geo_to_ecef(GeoPoint::new(90.0, 0.0).unwrap(), 0.0);
        assert_close(ecef.z, WGS84_B, 1e-6);
    }

    #[test]
    fn altitude_lifts_along_normal() {
        let p = GeoPoint::new(0.0, 0.0).unwrap();
        let ground = geo_to_ecef(p, 0.0);
        let lifted = geo_to_ecef(p, 420_000.0);
        assert_close((lifted - ground).length(), 420_000.0, 1e-6);
    }
}
