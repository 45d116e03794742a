//! Subscriber client
//!
//! `Client` owns an ordered list of subscriptions, a bounded intake queue fed
//! by the broker, and the output stream its matching loop writes to.
//!
//! Concurrency notes:
//! - `subscribe`, `unsubscribe` and `list` serialize on an edit lock. Every
//!   edit builds a fresh subscription vector and swaps it in atomically.
//! - the matching loop only ever loads the current vector and never takes
//!   the edit lock
//! - `close` is guarded by a compare-and-swap, so only the first call tears
//!   the client down; later calls get [`ClientError::Closed`]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

use super::matcher::MatchingLoop;
use super::messages::Messages;
use super::subscription::Subscription;
use crate::broker::{Broker, ClientId, Intake, Message};
use crate::utils::error::ClientError;

/// Capacity of the matched-message stream. A second pending match stalls the
/// matching loop until a consumer drains the first one.
const OUTPUT_CAPACITY: usize = 1;

#[derive(Debug)]
pub struct Client {
    id: ClientId,
    broker: Arc<dyn Broker>,
    subscriptions: Arc<ArcSwap<Vec<Subscription>>>,
    edits: Mutex<()>,
    messages: Messages,
    shutdown: CancellationToken,
    closed: AtomicBool,
    tracker: TaskTracker,
}

impl Client {
    /// Create a client, start its matching loop and register it with `broker`.
    ///
    /// `intake_buffer` bounds how many messages may wait to be matched; zero
    /// is treated as one. Must be called from within a Tokio runtime.
    pub fn new(broker: Arc<dyn Broker>, intake_buffer: usize) -> Self {
        let id = broker.next_id();
        let (intake_tx, intake_rx) = mpsc::channel(intake_buffer.max(1));
        let (output_tx, output_rx) = mpsc::channel(OUTPUT_CAPACITY);

        let subscriptions = Arc::new(ArcSwap::from_pointee(Vec::new()));
        let shutdown = CancellationToken::new();
        let tracker = TaskTracker::new();

        tracker.spawn(
            MatchingLoop {
                client_id: id,
                subscriptions: subscriptions.clone(),
                intake: intake_rx,
                output: output_tx,
                shutdown: shutdown.clone(),
            }
            .run(),
        );
        tracker.close();

        broker.register(Intake::new(id, intake_tx));
        debug!(%id, intake_buffer, "client created");

        Self {
            id,
            broker,
            subscriptions,
            edits: Mutex::new(()),
            messages: Messages::new(output_rx),
            shutdown,
            closed: AtomicBool::new(false),
            tracker,
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Append a subscription. An empty tag list matches every message.
    /// Identical subscriptions are kept side by side.
    pub fn subscribe<I, S>(&self, tags: I) -> Result<(), ClientError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_open()?;
        let subscription = Subscription::from_tags(tags);

        let _edits = self.lock_edits();
        let mut next = (**self.subscriptions.load()).clone();
        next.push(subscription);
        self.subscriptions.store(Arc::new(next));

        debug!(id = %self.id, subscriptions = self.subscriptions.load().len(), "subscribed");
        Ok(())
    }

    /// Remove every subscription whose tag set equals `tags`, in any order.
    pub fn unsubscribe<I, S>(&self, tags: I) -> Result<(), ClientError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_open()?;
        let test = Subscription::from_tags(tags);

        let _edits = self.lock_edits();
        let keep: Vec<Subscription> = self
            .subscriptions
            .load()
            .iter()
            .filter(|subscription| **subscription != test)
            .cloned()
            .collect();
        self.subscriptions.store(Arc::new(keep));

        debug!(id = %self.id, subscriptions = self.subscriptions.load().len(), "unsubscribed");
        Ok(())
    }

    /// Snapshot of the current subscriptions in subscription order. Tags
    /// within each entry come back sorted.
    pub fn list(&self) -> Result<Vec<Vec<String>>, ClientError> {
        self.ensure_open()?;

        let _edits = self.lock_edits();
        Ok(self
            .subscriptions
            .load()
            .iter()
            .map(Subscription::tags)
            .collect())
    }

    /// Handle to the matched-message stream.
    pub fn messages(&self) -> Messages {
        self.messages.clone()
    }

    /// Ask the broker to fan a new message out to every client.
    pub async fn publish<I, S>(&self, tags: I, payload: Value) -> Result<(), ClientError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_open()?;
        self.broker.publish(Message::new(tags, payload)).await?;
        Ok(())
    }

    /// Stop the matching loop and deregister from the broker. Queued
    /// messages are discarded. Use [`wait`](Self::wait) to observe the loop exit.
    pub fn close(&self) -> Result<(), ClientError> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ClientError::Closed(self.id));
        }
        self.teardown();
        Ok(())
    }

    pub fn ping(&self) -> Result<(), ClientError> {
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Resolves once the matching loop has exited.
    pub async fn wait(&self) {
        self.tracker.wait().await;
    }

    fn teardown(&self) {
        self.shutdown.cancel();
        self.broker.deregister(self.id);
        debug!(id = %self.id, "client closed");
    }

    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.is_closed() {
            return Err(ClientError::Closed(self.id));
        }
        Ok(())
    }

    fn lock_edits(&self) -> MutexGuard<'_, ()> {
        self.edits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.teardown();
        }
    }
}
