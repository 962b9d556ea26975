use std::sync::Arc;

use dataset::{ClusterId, Dataset};
use serde::Serialize;
use tracing::trace;

use crate::columns::ColumnLayer;
use crate::layer::{Layer, LayerId, RenderMode};
use crate::points::ScatterLayer;
use crate::surface::GlobeSurface;
use crate::symbology::LayerConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderLayer {
    Surface(Arc<GlobeSurface>),
    Columns(ColumnLayer),
    Points(ScatterLayer),
}

impl RenderLayer {
    pub fn id(&self) -> LayerId {
        match self {
            RenderLayer::Surface(_) => LayerId::GLOBE_SURFACE,
            RenderLayer::Columns(l) => l.id(),
            RenderLayer::Points(l) => l.id(),
        }
    }

    /// Pickable view of the layer. The surface carries no records.
    pub fn as_pickable(&self) -> Option<&dyn Layer> {
        match self {
            RenderLayer::Surface(_) => None,
            RenderLayer::Columns(l) => Some(l),
            RenderLayer::Points(l) => Some(l),
        }
    }
}

/// Ordered draw list for one render mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSet {
    pub mode: RenderMode,
    pub layers: Vec<RenderLayer>,
}

impl LayerSet {
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(RenderLayer::id).collect()
    }

    pub fn surface(&self) -> Option<&Arc<GlobeSurface>> {
        self.layers.iter().find_map(|l| match l {
            RenderLayer::Surface(s) => Some(s),
            _ => None,
        })
    }

    pub fn columns(&self) -> Option<&ColumnLayer> {
        self.layers.iter().find_map(|l| match l {
            RenderLayer::Columns(c) => Some(c),
            _ => None,
        })
    }

    pub fn columns_mut(&mut self) -> Option<&mut ColumnLayer> {
        self.layers.iter_mut().find_map(|l| match l {
            RenderLayer::Columns(c) => Some(c),
            _ => None,
        })
    }

    pub fn points(&self) -> Option<&ScatterLayer> {
        self.layers.iter().find_map(|l| match l {
            RenderLayer::Points(p) => Some(p),
            _ => None,
        })
    }

    /// Record behind primitive `index` of layer `id`, if both exist.
    pub fn record_id(&self, id: LayerId, index: usize) -> Option<&ClusterId> {
        self.layers
            .iter()
            .filter(|l| l.id() == id)
            .find_map(|l| l.as_pickable())
            .and_then(|l| l.record_id(index))
    }
}

/// Builds the draw list with default styling.
pub fn build_layers(dataset: &Dataset, mode: RenderMode, highlight: Option<&ClusterId>) -> LayerSet {
    build_layers_with(&LayerConfig::default(), dataset, mode, highlight)
}

/// Pure in its inputs: the same arguments always yield an equal `LayerSet`.
///
/// Globe mode draws the shared surface then one column per record. Map mode
/// draws one point per record and ignores `highlight`.
pub fn build_layers_with(
    config: &LayerConfig,
    dataset: &Dataset,
    mode: RenderMode,
    highlight: Option<&ClusterId>,
) -> LayerSet {
    trace!(?mode, records = dataset.len(), "building layers");
    let layers = match mode {
        RenderMode::Globe => {
            let surface = if *config == LayerConfig::default() {
                GlobeSurface::shared()
            } else {
                Arc::new(GlobeSurface::build(config))
            };
            vec![
                RenderLayer::Surface(surface),
                RenderLayer::Columns(ColumnLayer::build(config, dataset, highlight)),
            ]
        }
        RenderMode::Map => vec![RenderLayer::Points(ScatterLayer::build(config, dataset))],
    };
    LayerSet { mode, layers }
}
