//! In-memory hub
//!
//! `Hub` is the reference [`Broker`]: it hands out sequential client ids,
//! keeps the registry of intake queues and fans every published message out
//! to all registered clients, the publisher included.
//!
//! Concurrency notes:
//! - the registry lock is only held long enough to clone the current set of
//!   intakes; the actual sends happen after it is released, so a slow client
//!   never blocks `register`/`deregister`
//! - what happens when a client's intake is full is decided by
//!   [`OverflowPolicy`]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use super::{Broker, BrokerError, ClientId, Intake, Message};

/// What the hub does when a client's intake queue is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Wait until the client's matching loop makes room.
    #[default]
    Block,
    /// Discard the message for that client and log it.
    Drop,
}

#[derive(Debug, Default)]
pub struct Hub {
    clients: Mutex<HashMap<ClientId, Intake>>,
    last_id: AtomicU64,
    overflow: OverflowPolicy,
    shut_down: AtomicBool,
}

impl Hub {
    pub fn new(overflow: OverflowPolicy) -> Self {
        Self {
            overflow,
            ..Self::default()
        }
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Number of currently registered clients.
    pub fn client_count(&self) -> usize {
        self.clients().len()
    }

    pub fn is_registered(&self, id: ClientId) -> bool {
        self.clients().contains_key(&id)
    }

    /// Stop accepting publishes and release every registered intake.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        let released = std::mem::take(&mut *self.clients());
        debug!(clients = released.len(), "hub shut down");
    }

    fn clients(&self) -> MutexGuard<'_, HashMap<ClientId, Intake>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Broker for Hub {
    fn next_id(&self) -> ClientId {
        ClientId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn register(&self, intake: Intake) {
        let id = intake.client_id();
        if self.shut_down.load(Ordering::Acquire) {
            warn!(%id, "hub is shut down, client not registered");
            return;
        }
        self.clients().insert(id, intake);
        debug!(%id, "registered client");
    }

    fn deregister(&self, id: ClientId) {
        if self.clients().remove(&id).is_some() {
            debug!(%id, "deregistered client");
        }
    }

    async fn publish(&self, message: Message) -> Result<(), BrokerError> {
        if self.shut_down.load(Ordering::Acquire) {
            return Err(BrokerError::ShutDown);
        }

        let intakes: Vec<Intake> = self.clients().values().cloned().collect();
        debug!(message_id = %message.id, clients = intakes.len(), "fanning out message");

        for intake in intakes {
            let id = intake.client_id();
            match self.overflow {
                OverflowPolicy::Block => {
                    if intake.send(message.clone()).await.is_err() {
                        debug!(%id, "intake closed, skipping client");
                    }
                }
                OverflowPolicy::Drop => match intake.try_send(message.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        warn!(%id, message_id = %message.id, "intake full, message dropped");
                    }
                    Err(TrySendError::Closed(_)) => {
                        debug!(%id, "intake closed, skipping client");
                    }
                },
            }
        }

        Ok(())
    }
}
