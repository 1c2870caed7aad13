pub mod forwarding;

pub use forwarding::{
    ClientReply, CoordinatorSettings, Dispatch, ForwardingCoordinator, ForwardingStats,
};
