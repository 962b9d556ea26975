//! Read-only panel model for the selected cluster.

use dataset::{ClusterId, ClusterRecord, SeverityBand, market_symbols_for_region};
use serde::Serialize;

/// Reporting window shown next to the counts.
pub const DETAIL_WINDOW: &str = "24h";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterDetail {
    pub cluster_id: ClusterId,
    pub region_name: String,
    pub severity: SeverityBand,
    pub severity_label: &'static str,
    /// e.g. `-9.1 GSI`
    pub severity_text: String,
    pub event_count: u64,
    /// e.g. `6.8K`
    pub mentions_text: String,
    pub window: &'static str,
    pub market_symbols: [&'static str; 3],
    /// Wall-clock `HH:MM:SS` (UTC) of the last update.
    pub updated: String,
}

impl ClusterDetail {
    pub fn from_record(r: &ClusterRecord) -> Self {
        let severity = SeverityBand::classify(r.avg_severity);
        Self {
            cluster_id: r.id.clone(),
            region_name: r.region_name.clone(),
            severity,
            severity_label: severity.label(),
            severity_text: format!("{:.1} GSI", r.avg_severity),
            event_count: r.event_count,
            mentions_text: compact_thousands(r.total_mentions),
            window: DETAIL_WINDOW,
            market_symbols: market_symbols_for_region(&r.region_name),
            updated: r.last_update.format("%H:%M:%S").to_string(),
        }
    }
}

/// Templated summary built only from the record's own fields.
pub fn summary_text(r: &ClusterRecord) -> String {
    format!(
        "Escalating tensions detected in {}. {} events recorded in the last 24 hours with {} media mentions. \
         Goldstein severity index at {:.1} indicates significant conflict activity. \
         Key actors include state military forces and non-state armed groups. \
         Situation trending toward further escalation based on mention velocity.",
        r.region_name,
        r.event_count,
        group_thousands(r.total_mentions),
        r.avg_severity,
    )
}

/// `6800` -> `6.8K`.
pub fn compact_thousands(n: u64) -> String {
    format!("{:.1}K", n as f64 / 1000.0)
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
