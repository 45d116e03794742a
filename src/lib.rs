//! # tagsub
//!
//! `tagsub` is the subscriber side of a tag-based publish/subscribe bus.
//! Publishers emit messages carrying an unordered set of string tags; each
//! client registers tag-set subscriptions and receives every message whose
//! tags are a superset of one of them.
//!
//! ## Core Modules
//!
//! - `broker`: the upstream seam (`Broker` trait) plus `Hub`, an in-memory
//!   broker that fans messages out to every registered client.
//! - `client`: the `Client` handle, its subscriptions and the per-client
//!   matching loop.
//! - `config`: layered settings loading.
//! - `utils`: error types and logging initialisation.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use tagsub::broker::Hub;
//! use tagsub::client::Client;
//!
//! # async fn run() -> Result<(), tagsub::utils::error::ClientError> {
//! let hub = Arc::new(Hub::default());
//! let client = Client::new(hub.clone(), 32);
//! client.subscribe(["sensor", "kitchen"])?;
//! client.publish(["sensor", "kitchen", "temp"], json!({"c": 21})).await?;
//! let _message = client.messages().recv().await;
//! client.close()?;
//! # Ok(())
//! # }
//! ```

pub mod broker;
pub mod client;
pub mod config;
pub mod utils;
