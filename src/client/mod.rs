//! The `client` module is the subscriber side of the bus.
//!
//! It provides the [`Client`] handle, the [`Subscription`] tag-set filter,
//! the [`Messages`] output stream and the per-client matching loop that
//! connects them.

mod matcher;
pub mod messages;
pub mod pubsub_client;
pub mod subscription;

pub use messages::Messages;
pub use pubsub_client::Client;
pub use subscription::Subscription;
