use chrono::{DateTime, Utc};
use foundation::geo::{GeoError, GeoPoint};
use serde::{Deserialize, Serialize};

/// Stable identifier of a cluster (an H3 cell key in the upstream feed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub String);

impl ClusterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A spatial aggregate of events. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireClusterRecord", into = "WireClusterRecord")]
pub struct ClusterRecord {
    pub id: ClusterId,
    pub center: GeoPoint,
    pub event_count: u64,
    pub total_mentions: u64,
    /// Goldstein-style index: more negative is more severe.
    pub avg_severity: f64,
    pub last_update: DateTime<Utc>,
    pub region_name: String,
}

impl ClusterRecord {
    pub fn new(
        id: impl Into<String>,
        center: GeoPoint,
        event_count: u64,
        total_mentions: u64,
        avg_severity: f64,
        last_update: DateTime<Utc>,
        region_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ClusterId::new(id),
            center,
            event_count,
            total_mentions,
            avg_severity,
            last_update,
            region_name: region_name.into(),
        }
    }
}

/// Feed layout: flat snake_case fields with the center split in two.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireClusterRecord {
    h3_index: String,
    center_lat: f64,
    center_lon: f64,
    event_count: u64,
    total_mentions: u64,
    avg_severity: f64,
    last_update: DateTime<Utc>,
    region_name: String,
}

impl TryFrom<WireClusterRecord> for ClusterRecord {
    type Error = GeoError;

    fn try_from(w: WireClusterRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClusterId(w.h3_index),
            center: GeoPoint::new(w.center_lat, w.center_lon)?,
            event_count: w.event_count,
            total_mentions: w.total_mentions,
            avg_severity: w.avg_severity,
            last_update: w.last_update,
            region_name: w.region_name,
        })
    }
}

impl From<ClusterRecord> for WireClusterRecord {
    fn from(r: ClusterRecord) -> Self {
        Self {
            h3_index: r.id.0,
            center_lat: r.center.lat,
            center_lon: r.center.lon,
            event_count: r.event_count,
            total_mentions: r.total_mentions,
            avg_severity: r.avg_severity,
            last_update: r.last_update,
            region_name: r.region_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClusterId, ClusterRecord};

    const KYIV: &str = r#"{
        "h3_index": "840e001",
        "center_lat": 50.4,
        "center_lon": 30.5,
        "event_count": 95,
        "total_mentions": 5500,
        "avg_severity": -8.8,
        "last_update": "2026-03-01T12:00:00Z",
        "region_name": "Kyiv, Ukraine"
    }"#;

    #[test]
    fn parses_feed_layout() {
        let r: ClusterRecord = serde_json::from_str(KYIV).expect("parse");
        assert_eq!(r.id, ClusterId::new("840e001"));
        assert_eq!(r.center.lat, 50.4);
        assert_eq!(r.center.lon, 30.5);
        assert_eq!(r.total_mentions, 5500);
        assert_eq!(r.region_name, "Kyiv, Ukraine");
    }

    #[test]
    fn serializes_back_to_feed_layout() {
        let r: ClusterRecord = serde_json::from_str(KYIV).expect("parse");
        let v = serde_json::to_value(&r).expect("serialize");
        assert_eq!(v["h3_index"], "840e001");
        assert_eq!(v["center_lon"], 30.5);
    }

    #[test]
    fn rejects_out_of_range_coordinates_at_parse() {
        let bad = KYIV.replace("50.4", "95.0");
        assert!(serde_json::from_str::<ClusterRecord>(&bad).is_err());
    }

    #[test]
    fn rejects_negative_counts_at_parse() {
        let bad = KYIV.replace("\"event_count\": 95", "\"event_count\": -1");
        assert!(serde_json::from_str::<ClusterRecord>(&bad).is_err());
    }
}
