#![allow(unused_imports)]
pub mod builders;
pub mod mock_channel;

pub use builders::{upstream_reply, MessageBuilder};
pub use mock_channel::MockChannel;
