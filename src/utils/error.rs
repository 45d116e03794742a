//! Error types returned by the broker seam and the subscriber client.
//!
//! Subscribe, unsubscribe and ping never fail while a client is open.
//! Intake overflow is a broker policy and is never surfaced here.

use thiserror::Error;

use crate::broker::ClientId;

/// Errors reported by a [`Broker`](crate::broker::Broker) implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// The broker has been shut down and no longer fans out messages.
    #[error("broker has been shut down")]
    ShutDown,
}

/// Errors reported by [`Client`](crate::client::Client) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The client was already closed.
    #[error("client {0} is closed")]
    Closed(ClientId),

    /// The broker rejected a publish.
    #[error(transparent)]
    Broker(#[from] BrokerError),
}
