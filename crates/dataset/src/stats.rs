use serde::{Deserialize, Serialize};

use crate::record::ClusterRecord;
use crate::severity::SeverityBand;

/// Status-bar aggregates over a dataset.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub cluster_count: usize,
    pub total_events: u64,
    /// Records in the critical band (`avg_severity <= -8`).
    pub critical_count: usize,
}

impl DatasetStats {
    pub fn compute(records: &[ClusterRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.cluster_count += 1;
            acc.total_events = acc.total_events.saturating_add(r.event_count);
            if SeverityBand::classify(r.avg_severity) == SeverityBand::Critical {
                acc.critical_count += 1;
            }
            acc
        })
    }
}
