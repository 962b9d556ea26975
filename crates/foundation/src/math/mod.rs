pub mod geodesy;
pub mod mercator;
pub mod precision;
pub mod vec;

pub use geodesy::*;
pub use mercator::*;
pub use precision::*;
pub use vec::*;
