//! Output stream of matched messages.

use std::sync::Arc;

use futures::Stream;
use tokio::sync::{Mutex, mpsc};

use crate::broker::Message;

/// Read side of a client's matched-message stream.
///
/// Handles are cheap to clone and may be shared between consumers; each
/// message is observed by exactly one of them. `None` from [`recv`](Self::recv)
/// means the client has closed and everything delivered has been drained.
#[derive(Debug, Clone)]
pub struct Messages {
    receiver: Arc<Mutex<mpsc::Receiver<Message>>>,
}

impl Messages {
    pub(crate) fn new(receiver: mpsc::Receiver<Message>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    pub async fn recv(&self) -> Option<Message> {
        self.receiver.lock().await.recv().await
    }

    /// Take a message if one is ready. Returns `None` when nothing is ready,
    /// when the stream is closed, or while another consumer is receiving.
    pub fn try_recv(&self) -> Option<Message> {
        self.receiver.try_lock().ok()?.try_recv().ok()
    }

    pub fn into_stream(self) -> impl Stream<Item = Message> + Send + 'static {
        futures::stream::unfold(self, |messages| async move {
            let message = messages.recv().await?;
            Some((message, messages))
        })
    }
}
