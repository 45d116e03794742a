//! Broker seam
//!
//! The subscriber engine does not fan out messages itself. It talks to an
//! upstream [`Broker`] that hands out client ids, keeps a registry of client
//! intake queues and pushes every published message into each of them.
//! [`hub::Hub`] is the in-memory implementation shipped with the crate.

pub mod hub;
pub mod message;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

pub use crate::utils::error::BrokerError;
pub use hub::{Hub, OverflowPolicy};
pub use message::Message;

/// Broker-assigned client identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Sending half of a client's bounded intake queue.
///
/// The broker holds one of these per registered client. Sends fail once the
/// client's matching loop has exited.
#[derive(Debug, Clone)]
pub struct Intake {
    client_id: ClientId,
    sender: mpsc::Sender<Message>,
}

impl Intake {
    pub(crate) fn new(client_id: ClientId, sender: mpsc::Sender<Message>) -> Self {
        Self { client_id, sender }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Wait for room in the queue. Returns the message back if the client is gone.
    pub async fn send(&self, message: Message) -> Result<(), Message> {
        self.sender.send(message).await.map_err(|e| e.0)
    }

    /// Enqueue without waiting.
    pub fn try_send(&self, message: Message) -> Result<(), TrySendError<Message>> {
        self.sender.try_send(message)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Upstream collaborator of every [`Client`](crate::client::Client).
#[async_trait]
pub trait Broker: fmt::Debug + Send + Sync + 'static {
    /// Hand out an identifier no other live client holds.
    fn next_id(&self) -> ClientId;

    /// Start fanning messages out to this intake.
    fn register(&self, intake: Intake);

    /// Stop fanning messages out to the client. Unknown ids are ignored.
    fn deregister(&self, id: ClientId);

    /// Push `message` into the intake of every registered client.
    async fn publish(&self, message: Message) -> Result<(), BrokerError>;
}

#[cfg(test)]
mod tests;
