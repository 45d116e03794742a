//! Matching loop
//!
//! One task per client. It drains the intake queue in FIFO order, tests each
//! message against the subscription snapshot installed at that moment and
//! forwards one copy per matching subscription to the output stream.
//!
//! The snapshot is read without taking the client's edit lock. An edit that
//! races with an in-flight message may or may not be seen by it.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::subscription::Subscription;
use crate::broker::{ClientId, Message};

pub(crate) struct MatchingLoop {
    pub(crate) client_id: ClientId,
    pub(crate) subscriptions: Arc<ArcSwap<Vec<Subscription>>>,
    pub(crate) intake: mpsc::Receiver<Message>,
    pub(crate) output: mpsc::Sender<Message>,
    pub(crate) shutdown: CancellationToken,
}

impl MatchingLoop {
    pub(crate) async fn run(mut self) {
        debug!(id = %self.client_id, "matching loop started");

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                received = self.intake.recv() => {
                    let Some(message) = received else {
                        debug!(id = %self.client_id, "intake closed by broker");
                        break;
                    };
                    if !self.dispatch(message).await {
                        break;
                    }
                }
            }
        }

        // Anything still queued is discarded with the receiver.
        self.intake.close();
        debug!(id = %self.client_id, "matching loop exited");
    }

    /// Returns `false` once the loop has to stop.
    async fn dispatch(&self, message: Message) -> bool {
        let subscriptions = self.subscriptions.load_full();

        for subscription in subscriptions.iter() {
            if !subscription.matches(&message) {
                continue;
            }
            trace!(id = %self.client_id, message_id = %message.id, "matched");

            // A consumer that stopped reading must not keep close() from completing.
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => return false,
                sent = self.output.send(message.clone()) => {
                    if sent.is_err() {
                        return false;
                    }
                }
            }
        }

        true
    }
}
