//! Controller and action-handler registries.
//!
//! Writes are expected during setup, reads on every event; both sit behind a
//! read/write lock so webhook dispatch can read while setup is still running.

use crate::controller::{ActionHandler, Controller};
use crate::message::Message;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ordered list of controllers; first match wins.
#[derive(Default)]
pub struct ControllerRegistry {
    inner: RwLock<Vec<Arc<dyn Controller>>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a controller. No uniqueness or exclusivity check.
    pub async fn add(&self, controller: Arc<dyn Controller>) {
        self.inner.write().await.push(controller);
    }

    /// First registered controller whose `can_handle` accepts `msg`.
    /// Controllers after the match are not consulted.
    pub async fn controller_for(&self, msg: &Message) -> Option<Arc<dyn Controller>> {
        let g = self.inner.read().await;
        g.iter().find(|c| c.can_handle(msg)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Callback id -> action handler, exact match.
#[derive(Default)]
pub struct ActionRegistry {
    inner: RwLock<HashMap<String, ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `id`, replacing any previous handler for it.
    pub async fn add(&self, id: impl Into<String>, handler: ActionHandler) {
        let id = id.into();
        if self.inner.write().await.insert(id.clone(), handler).is_some() {
            log::debug!("action handler for {} replaced", id);
        }
    }

    pub async fn get(&self, id: &str) -> Option<ActionHandler> {
        self.inner.read().await.get(id).cloned()
    }
}
