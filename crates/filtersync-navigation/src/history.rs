//! In-memory session history
//!
//! A stack of visited addresses with a cursor, like a browser tab's session
//! history: `push` drops any forward entries, `back`/`forward`/`go` move the
//! cursor and notify navigation listeners.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

use filtersync_form::SubscriptionId;

use crate::address::{AddressBar, NavigationListener};
use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: Url,
    pub visited_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(url: Url) -> Self {
        Self {
            url,
            visited_at: Utc::now(),
        }
    }
}

struct HistoryStack {
    entries: Vec<HistoryEntry>,
    index: usize,
}

pub struct MemoryHistory {
    stack: Arc<RwLock<HistoryStack>>,
    listeners: Arc<RwLock<Vec<(SubscriptionId, NavigationListener)>>>,
}

impl MemoryHistory {
    /// Start a history whose only entry is `url`
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        Ok(Self {
            stack: Arc::new(RwLock::new(HistoryStack {
                entries: vec![HistoryEntry::new(url)],
                index: 0,
            })),
            listeners: Arc::new(RwLock::new(Vec::new())),
        })
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Move `delta` entries through history. Out-of-range moves do nothing.
    pub fn go(&self, delta: isize) -> bool {
        let moved_to = {
            let mut stack = self.stack.write();
            let target = stack.index as isize + delta;
            if delta == 0 || target < 0 || target as usize >= stack.entries.len() {
                None
            } else {
                stack.index = target as usize;
                Some(stack.entries[stack.index].url.clone())
            }
        };

        let Some(url) = moved_to else {
            return false;
        };

        tracing::debug!(url = %url, delta, "History navigation");

        let listeners: Vec<NavigationListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }

        true
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.stack.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.stack.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.read().entries.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Position of the current entry
    pub fn index(&self) -> usize {
        self.stack.read().index
    }
}

impl Clone for MemoryHistory {
    fn clone(&self) -> Self {
        Self {
            stack: Arc::clone(&self.stack),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl AddressBar for MemoryHistory {
    fn current(&self) -> Result<Url> {
        let stack = self.stack.read();
        stack
            .entries
            .get(stack.index)
            .map(|entry| entry.url.clone())
            .ok_or_else(|| {
                NavigationError::AddressUnavailable(format!(
                    "no history entry at index {}",
                    stack.index
                ))
            })
    }

    fn push(&self, url: &Url) -> Result<()> {
        let mut stack = self.stack.write();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(HistoryEntry::new(url.clone()));
        stack.index = stack.entries.len() - 1;
        Ok(())
    }

    fn on_navigate(&self, listener: NavigationListener) -> SubscriptionId {
        let id = Uuid::new_v4();
        self.listeners.write().push((id, listener));
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription);
        listeners.len() != before
    }
}
