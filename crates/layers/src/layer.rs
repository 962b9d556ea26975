use dataset::ClusterId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LayerId(pub &'static str);

impl LayerId {
    pub const GLOBE_SURFACE: LayerId = LayerId("globe-surface");
    pub const CLUSTER_COLUMNS: LayerId = LayerId("hot-clusters-columns");
    pub const CLUSTER_POINTS: LayerId = LayerId("hot-clusters-scatter");
}

/// Which projection the clusters are drawn in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenderMode {
    /// Extruded columns on a 3D globe.
    Globe,
    /// Flat points on a 2D tactical map.
    Map,
}

impl RenderMode {
    /// `Globe` strictly below `threshold`, `Map` at or above it.
    pub fn for_zoom(zoom: f64, threshold: f64) -> Self {
        if zoom < threshold {
            RenderMode::Globe
        } else {
            RenderMode::Map
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Globe => "GLOBE",
            RenderMode::Map => "MAP",
        }
    }
}

pub trait Layer {
    fn id(&self) -> LayerId;

    /// Number of pickable primitives.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Back-reference from primitive `index` to the cluster it was built from.
    fn record_id(&self, index: usize) -> Option<&ClusterId>;
}
