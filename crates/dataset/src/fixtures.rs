//! Built-in hotspot set used when no feed is supplied.

use chrono::{DateTime, Utc};
use foundation::geo::GeoPoint;

use crate::record::ClusterRecord;

type Row = (&'static str, f64, f64, u64, u64, f64, &'static str);

// (h3 index, lat, lon, events, mentions, avg severity, region)
const HOTSPOTS: &[Row] = &[
    // Middle East
    ("840c001", 33.3, 44.4, 87, 4200, -8.2, "Baghdad, Iraq"),
    ("840c002", 36.2, 37.1, 62, 3100, -7.8, "Aleppo, Syria"),
    ("840c003", 31.8, 35.2, 120, 6800, -9.1, "Jerusalem"),
    ("840c004", 15.4, 44.2, 55, 2200, -7.5, "Sana'a, Yemen"),
    // Eastern Europe
    ("840e001", 50.4, 30.5, 95, 5500, -8.8, "Kyiv, Ukraine"),
    ("840e002", 48.5, 35.0, 78, 3800, -8.1, "Dnipro, Ukraine"),
    ("840e003", 47.0, 37.8, 45, 2100, -7.2, "Mariupol, Ukraine"),
    // Africa
    ("840a001", 2.0, 45.3, 42, 1800, -7.0, "Mogadishu, Somalia"),
    ("840a002", 15.6, 32.5, 68, 3400, -8.5, "Khartoum, Sudan"),
    ("840a003", 4.8, 31.6, 38, 1500, -6.8, "Juba, South Sudan"),
    ("840a004", 12.0, -1.5, 31, 1200, -6.5, "Ouagadougou, Burkina Faso"),
    ("840a005", -1.3, 29.2, 50, 2400, -7.6, "Goma, DRC"),
    // Asia
    ("840b001", 34.5, 69.2, 55, 2600, -7.4, "Kabul, Afghanistan"),
    ("840b002", 21.0, 96.0, 40, 1900, -7.1, "Mandalay, Myanmar"),
    ("840b003", 39.9, 116.4, 30, 3200, -5.8, "Beijing, China"),
    ("840b004", 25.0, 121.5, 25, 4100, -5.5, "Taipei, Taiwan"),
    // Americas
    ("840d001", 38.9, -77.0, 20, 5200, -5.2, "Washington DC, USA"),
    ("840d002", 19.4, -99.1, 35, 1600, -6.9, "Mexico City, Mexico"),
    ("840d003", 10.5, -66.9, 28, 1400, -6.2, "Caracas, Venezuela"),
    ("840d004", 4.7, -74.1, 22, 1100, -6.0, "Bogotá, Colombia"),
];

/// The built-in hotspots, all stamped as updated at `now`.
pub fn hot_clusters(now: DateTime<Utc>) -> Vec<ClusterRecord> {
    HOTSPOTS
        .iter()
        .map(|&(id, lat, lon, events, mentions, severity, region)| {
            ClusterRecord::new(
                id,
                GeoPoint { lat, lon },
                events,
                mentions,
                severity,
                now,
                region,
            )
        })
        .collect()
}
