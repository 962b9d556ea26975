pub mod builder;
pub mod columns;
pub mod layer;
pub mod points;
pub mod surface;
pub mod symbology;

pub use builder::*;
pub use layer::*;
pub use surface::GlobeSurface;
pub use symbology::LayerConfig;
