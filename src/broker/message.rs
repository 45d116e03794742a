//! Message definitions
//!
//! `Message` is the immutable value fanned out by the broker and matched by
//! every client. Fields:
//! - `tags`: unordered, duplicate-free set of labels used for matching
//! - `payload`: opaque JSON body, never inspected by the engine
//! - `id`: unique id assigned when the message is built
//! - `timestamp`: milliseconds since UNIX epoch, set when the message is built

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub tags: Arc<HashSet<String>>,
    pub payload: Arc<Value>,
    pub timestamp: i64,
}

impl Message {
    /// Build a message from a tag list and payload. Duplicate tags collapse.
    pub fn new<I, S>(tags: I, payload: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Uuid::new_v4(),
            tags: Arc::new(tags.into_iter().map(Into::into).collect()),
            payload: Arc::new(payload),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
