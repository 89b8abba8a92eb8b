//! Handler capabilities: message controllers, the intro handler, and action handlers.

use crate::bot::Bot;
use crate::error::Result;
use crate::message::{Action, Channel, Message};
use async_trait::async_trait;
use std::sync::Arc;

/// Handles text messages it claims via [`Controller::can_handle`].
///
/// Controllers are consulted in registration order; the first one that
/// accepts a message handles it.
#[async_trait]
pub trait Controller: Send + Sync {
    fn can_handle(&self, msg: &Message) -> bool;
    async fn handle(&self, bot: &dyn Bot, msg: &Message) -> Result<()>;
}

/// Greets a channel the bot was just added to.
///
/// Separate from [`Controller`] so controllers need not implement a no-op;
/// a type may implement both and be registered in both places.
#[async_trait]
pub trait IntroHandler: Send + Sync {
    async fn handle_intro(&self, bot: &dyn Bot, channel: &Channel) -> Result<()>;
}

/// Callback for an interactive action, registered under its callback id.
pub type ActionHandler = Arc<dyn Fn(&dyn Bot, Action) + Send + Sync>;
