pub mod dataset;
pub mod fixtures;
pub mod markets;
pub mod record;
pub mod severity;
pub mod stats;

pub use dataset::*;
pub use markets::*;
pub use record::*;
pub use severity::*;
pub use stats::*;
