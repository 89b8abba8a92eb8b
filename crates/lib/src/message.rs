//! Inbound event values handed to controllers and action handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user on the messaging backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_bot: bool,
}

/// A conversation the bot takes part in (public channel, group or direct message).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_dm: bool,
    /// Member user ids, when known.
    #[serde(default)]
    pub users: Vec<String>,
}

impl Channel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// A text message received by a bot. Immutable input to controller matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub channel: Channel,
    pub text: String,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    /// Parent message timestamp when the message was posted in a thread.
    #[serde(default)]
    pub thread_ts: Option<String>,
}

impl Message {
    pub fn new(channel: Channel, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: text.into(),
            ..Self::default()
        }
    }
}

/// One interactive element the user triggered (button press, menu selection).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAction {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// An interactive callback as seen by action handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Action {
    pub user: User,
    pub channel: Channel,
    /// Identifier the handler was registered under.
    pub callback_id: String,
    pub actions: Vec<UserAction>,
    /// Timestamp of the message carrying the interactive elements.
    pub original_message_ts: String,
    /// URL for replying to the interaction, when the backend provides one.
    pub response_url: Option<String>,
}

impl Action {
    /// The first triggered element, which is the only one for button presses.
    pub fn first(&self) -> Option<&UserAction> {
        self.actions.first()
    }
}
