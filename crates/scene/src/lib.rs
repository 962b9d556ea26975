pub mod config;
pub mod dashboard;
pub mod detail;
pub mod picking;
pub mod selection;
pub mod spatial;
pub mod transition;
pub mod view;

pub use config::EngineConfig;
pub use dashboard::{Dashboard, DashboardEvent};
pub use detail::ClusterDetail;
pub use picking::{PickHit, PickResolver};
pub use selection::{Selection, SummaryState, SummaryTask, SummaryToken};
pub use transition::{Interpolation, Transition};
pub use view::{EnginePhase, TickOutcome, ViewDelta, ViewEngine, ViewState};
