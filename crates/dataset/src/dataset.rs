use std::collections::HashMap;

use foundation::geo::{GeoError, GeoPoint};
use foundation::math::argmin_by_key;
use thiserror::Error;
use tracing::debug;

use crate::record::{ClusterId, ClusterRecord};
use crate::stats::DatasetStats;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cluster {id}: {source}")]
    CoordinateOutOfRange {
        id: ClusterId,
        #[source]
        source: GeoError,
    },
    #[error("duplicate cluster id {0}")]
    DuplicateId(ClusterId),
    #[error("cluster {0}: avg_severity is not finite")]
    NonFiniteSeverity(ClusterId),
    #[error("malformed cluster feed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validated, immutable collection of clusters with an id index.
///
/// Construction is all-or-nothing: one bad record rejects the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<ClusterRecord>,
    index: HashMap<ClusterId, usize>,
    stats: DatasetStats,
}

impl Dataset {
    pub fn new(records: Vec<ClusterRecord>) -> Result<Self, DatasetError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            r.center
                .validate()
                .map_err(|source| DatasetError::CoordinateOutOfRange {
                    id: r.id.clone(),
                    source,
                })?;
            if !r.avg_severity.is_finite() {
                return Err(DatasetError::NonFiniteSeverity(r.id.clone()));
            }
            if index.insert(r.id.clone(), i).is_some() {
                return Err(DatasetError::DuplicateId(r.id.clone()));
            }
        }

        let stats = DatasetStats::compute(&records);
        debug!(
            clusters = stats.cluster_count,
            critical = stats.critical_count,
            "dataset ingested"
        );
        Ok(Self {
            records,
            index,
            stats,
        })
    }

    /// Parses a JSON array of feed records.
    pub fn from_json_str(payload: &str) -> Result<Self, DatasetError> {
        let records: Vec<ClusterRecord> = serde_json::from_str(payload)?;
        Self::new(records)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ClusterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &ClusterId) -> Option<&ClusterRecord> {
        self.index_of(id).map(|i| &self.records[i])
    }

    pub fn index_of(&self, id: &ClusterId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &ClusterId) -> bool {
        self.index.contains_key(id)
    }

    pub fn stats(&self) -> DatasetStats {
        self.stats
    }

    /// Cluster whose center is closest to `point` in planar (lat, lon) space.
    ///
    /// Ties go to the record that comes first in the dataset.
    pub fn nearest(&self, point: GeoPoint) -> Option<&ClusterRecord> {
        argmin_by_key(&self.records, |r| r.center.planar_distance(&point)).map(|i| &self.records[i])
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, DatasetError};
    use crate::record::{ClusterId, ClusterRecord};
    use chrono::{TimeZone, Utc};
    use foundation::geo::GeoPoint;

    fn rec(id: &str, lat: f64, lon: f64) -> ClusterRecord {
        ClusterRecord {
            id: ClusterId::new(id),
            center: GeoPoint { lat, lon },
            event_count: 1,
            total_mentions: 10,
            avg_severity: -7.0,
            last_update: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            region_name: id.to_string(),
        }
    }

    #[test]
    fn indexes_records_by_id() {
        let ds = Dataset::new(vec![rec("a", 1.0, 1.0), rec("b", 2.0, 2.0)]).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.index_of(&ClusterId::new("b")), Some(1));
        assert_eq!(ds.get(&ClusterId::new("a")).unwrap().center.lat, 1.0);
        assert!(ds.get(&ClusterId::new("zz")).is_none());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let err = Dataset::new(vec![rec("a", 1.0, 1.0), rec("bad", 91.0, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::CoordinateOutOfRange { ref id, .. } if id.as_str() == "bad"
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Dataset::new(vec![rec("a", 1.0, 1.0), rec("a", 2.0, 2.0)]).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateId(_)));
    }

    #[test]
    fn rejects_non_finite_severity() {
        let mut r = rec("a", 1.0, 1.0);
        r.avg_severity = f64::NAN;
        assert!(matches!(
            Dataset::new(vec![r]),
            Err(DatasetError::NonFiniteSeverity(_))
        ));
    }

    #[test]
    fn nearest_uses_planar_degree_distance() {
        let ds = Dataset::new(vec![rec("far", 10.0, 10.0), rec("near", 1.0, 1.0)]).unwrap();
        let hit = ds.nearest(GeoPoint::new(0.0, 0.0).unwrap()).unwrap();
        assert_eq!(hit.id.as_str(), "near");
    }

    #[test]
    fn nearest_ignores_antimeridian_wrap() {
        // Planar distance: 179 -> -179 is 358 degrees apart, not 2.
        let ds = Dataset::new(vec![rec("west", 0.0, -179.0), rec("mid", 0.0, 100.0)]).unwrap();
        let hit = ds.nearest(GeoPoint::new(0.0, 179.0).unwrap()).unwrap();
        assert_eq!(hit.id.as_str(), "mid");
    }

    #[test]
    fn nearest_on_empty_dataset_is_none() {
        assert!(Dataset::empty().nearest(GeoPoint::new(0.0, 0.0).unwrap()).is_none());
    }

    #[test]
    fn parses_json_feed() {
        let payload = r#"[{
            "h3_index": "x1", "center_lat": 1.0, "center_lon": 2.0,
            "event_count": 3, "total_mentions": 4, "avg_severity": -8.5,
            "last_update": "2026-01-01T00:00:00Z", "region_name": "X"
        }]"#;
        let ds = Dataset::from_json_str(payload).unwrap();
        assert_eq!(ds.stats().critical_count, 1);
        assert!(matches!(
            Dataset::from_json_str("{"),
            Err(DatasetError::Json(_))
        ));
    }
}
