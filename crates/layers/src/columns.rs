use std::collections::HashMap;

use dataset::{ClusterId, ClusterRecord, Dataset, Rgba, severity_color};
use foundation::geo::GeoPoint;
use foundation::math::{Vec3, geo_to_ecef};
use serde::Serialize;

use crate::layer::{Layer, LayerId};
use crate::symbology::{HIGHLIGHT_OUTLINE, LayerConfig};

/// One extruded column per cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub record_id: ClusterId,
    pub position: GeoPoint,
    /// Footprint center on the ellipsoid.
    pub base: Vec3,
    /// Same point lifted by `elevation_m`.
    pub top: Vec3,
    pub elevation_m: f64,
    pub radius_m: f64,
    pub disk_resolution: u32,
    pub fill_color: Rgba,
    pub highlighted: bool,
    pub outline_color: Option<Rgba>,
}

impl Column {
    fn from_record(config: &LayerConfig, r: &ClusterRecord) -> Self {
        let elevation_m = config.elevation_m(r.total_mentions);
        Self {
            record_id: r.id.clone(),
            position: r.center,
            base: geo_to_ecef(r.center, 0.0),
            top: geo_to_ecef(r.center, elevation_m),
            elevation_m,
            radius_m: config.column_radius_m,
            disk_resolution: config.column_disk_resolution,
            fill_color: severity_color(r.avg_severity),
            highlighted: false,
            outline_color: None,
        }
    }

    fn set_highlight(&mut self, on: bool) {
        self.highlighted = on;
        self.outline_color = on.then_some(HIGHLIGHT_OUTLINE);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnLayer {
    columns: Vec<Column>,
    #[serde(skip)]
    by_record: HashMap<ClusterId, usize>,
    #[serde(skip)]
    highlighted: Option<usize>,
    radius_m: f64,
}

impl ColumnLayer {
    pub fn build(config: &LayerConfig, dataset: &Dataset, highlight: Option<&ClusterId>) -> Self {
        let columns: Vec<Column> = dataset
            .records()
            .iter()
            .map(|r| Column::from_record(config, r))
            .collect();
        let by_record = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.record_id.clone(), i))
            .collect();
        let mut layer = Self {
            columns,
            by_record,
            highlighted: None,
            radius_m: config.column_radius_m,
        };
        layer.restyle_highlight(highlight);
        layer
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Footprint radius shared by every column.
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn highlighted(&self) -> Option<&ClusterId> {
        self.highlighted.map(|i| &self.columns[i].record_id)
    }

    /// Moves the highlight to `id`, touching only the old and new columns.
    ///
    /// Returns the indices that changed. Unknown ids clear the highlight.
    pub fn restyle_highlight(&mut self, id: Option<&ClusterId>) -> Vec<usize> {
        let next = id.and_then(|id| self.by_record.get(id).copied());
        if next == self.highlighted {
            return Vec::new();
        }

        let mut touched = Vec::with_capacity(2);
        if let Some(prev) = self.highlighted.take() {
            self.columns[prev].set_highlight(false);
            touched.push(prev);
        }
        if let Some(i) = next {
            self.columns[i].set_highlight(true);
            touched.push(i);
        }
        self.highlighted = next;
        touched
    }
}

impl Layer for ColumnLayer {
    fn id(&self) -> LayerId {
        LayerId::CLUSTER_COLUMNS
    }

    fn len(&self) -> usize {
        self.columns.len()
    }

    fn record_id(&self, index: usize) -> Option<&ClusterId> {
        self.columns.get(index).map(|c| &c.record_id)
    }
}
