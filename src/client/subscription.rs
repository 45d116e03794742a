//! Subscription filters
//!
//! A `Subscription` is an unordered set of tags. A message matches it when
//! every tag in the subscription is present on the message, so the empty
//! subscription matches everything. Tags compare by exact string equality.

use std::collections::HashSet;

use crate::broker::Message;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscription {
    tags: HashSet<String>,
}

impl Subscription {
    /// Build a subscription from a tag list. Duplicates collapse.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Subset test against the message's tag set.
    pub fn matches(&self, message: &Message) -> bool {
        self.tags.is_subset(&message.tags)
    }

    /// Tags in sorted order.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.tags.iter().cloned().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
