mod coordinator;
mod group;
mod reply;
mod stats;

pub use coordinator::{ClientReply, CoordinatorSettings, Dispatch, ForwardingCoordinator};
pub use group::{ForwardMode, ForwardOutcome, GroupKey};
pub use stats::ForwardingStats;
