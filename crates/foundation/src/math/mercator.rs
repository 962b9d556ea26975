//! Web-Mercator "world" space used for flat-map camera math.
//!
//! World units follow the 512-pixel tile convention: the whole world spans
//! `[0, 512)` on both axes at zoom 0, x grows eastward and y grows northward.

use core::f64::consts::PI;

use super::WGS84_A;

pub const TILE_SIZE: f64 = 512.0;

/// Latitude at which the Mercator square ends.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

pub const EARTH_CIRCUMFERENCE_M: f64 = 2.0 * PI * WGS84_A;

/// Projects a longitude/latitude (degrees) into world units.
///
/// Latitudes beyond the Mercator square are pinned to its edge; the poles have
/// no finite Mercator y.
pub fn lng_lat_to_world(lon: f64, lat: f64) -> [f64; 2] {
    let lat = lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let lambda = lon.to_radians();
    let phi = lat.to_radians();
    let x = TILE_SIZE * (lambda + PI) / (2.0 * PI);
    let y = TILE_SIZE * (PI + (PI / 4.0 + phi * 0.5).tan().ln()) / (2.0 * PI);
    [x, y]
}

/// Inverse of [`lng_lat_to_world`], returns `(lon, lat)` in degrees.
pub fn world_to_lng_lat(xy: [f64; 2]) -> (f64, f64) {
    let lambda = xy[0] / TILE_SIZE * 2.0 * PI - PI;
    let phi = 2.0 * ((xy[1] / TILE_SIZE * 2.0 * PI - PI).exp()).atan() - PI * 0.5;
    (lambda.to_degrees(), phi.to_degrees())
}

/// Ground meters covered by one screen pixel at `zoom` and latitude `lat`.
pub fn meters_per_pixel(lat: f64, zoom: f64) -> f64 {
    let lat = lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    EARTH_CIRCUMFERENCE_M * lat.to_radians().cos() / (TILE_SIZE * zoom.exp2())
}

#[cfg(test)]
mod tests {
    use super::{TILE_SIZE, lng_lat_to_world, meters_per_pixel, world_to_lng_lat};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_maps_to_world_center() {
        let [x, y] = lng_lat_to_world(0.0, 0.0);
        assert_close(x, TILE_SIZE * 0.5, 1e-9);
        assert_close(y, TILE_SIZE * 0.5, 1e-9);
    }

    #[test]
    fn inverse_recovers_coordinates() {
        let xy = lng_lat_to_world(30.5, 50.4);
        let (lon, lat) = world_to_lng_lat(xy);
        assert_close(lon, 30.5, 1e-9);
        assert_close(lat, 50.4, 1e-9);
    }

    #[test]
    fn poles_stay_finite() {
        let [_, y] = lng_lat_to_world(0.0, 90.0);
        assert!(y.is_finite());
    }

    #[test]
    fn pixel_footprint_halves_per_zoom_level() {
        let z1 = meters_per_pixel(0.0, 1.0);
        let z2 = meters_per_pixel(0.0, 2.0);
        assert_close(z1 / z2, 2.0, 1e-12);
        assert!(meters_per_pixel(60.0, 1.0) < z1);
    }
}
