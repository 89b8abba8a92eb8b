//! Interactive callback payload as POSTed by the messaging backend.
//!
//! The backend sends `application/x-www-form-urlencoded` with a single `payload`
//! field holding JSON. A raw JSON body is accepted as well.

use crate::error::{Error, Result};
use crate::message::{Action, Channel, User, UserAction};
use serde::{Deserialize, Serialize};

/// Workspace the callback originated from; its id selects the target bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackTeam {
    pub id: String,
    #[serde(default)]
    pub domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Decoded attachment action callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCallback {
    pub callback_id: String,
    pub team: CallbackTeam,
    pub channel: CallbackChannel,
    #[serde(default)]
    pub user: CallbackUser,
    #[serde(default)]
    pub actions: Vec<UserAction>,
    #[serde(default)]
    pub action_ts: String,
    #[serde(default)]
    pub message_ts: String,
    #[serde(default)]
    pub attachment_id: String,
    #[serde(default)]
    pub response_url: String,
    /// Verification token; credential checks are the transport's concern.
    #[serde(default)]
    pub token: String,
}

impl From<&ActionCallback> for Action {
    fn from(cb: &ActionCallback) -> Self {
        Action {
            user: User {
                id: cb.user.id.clone(),
                username: cb.user.name.clone(),
                ..User::default()
            },
            channel: Channel {
                id: cb.channel.id.clone(),
                name: cb.channel.name.clone(),
                ..Channel::default()
            },
            callback_id: cb.callback_id.clone(),
            actions: cb.actions.clone(),
            original_message_ts: cb.message_ts.clone(),
            response_url: Some(cb.response_url.clone()).filter(|u| !u.is_empty()),
        }
    }
}

impl From<ActionCallback> for Action {
    fn from(cb: ActionCallback) -> Self {
        Action::from(&cb)
    }
}

/// Decode a webhook body: JSON object, or form-encoded with a `payload` field.
pub fn decode_callback(body: &[u8]) -> Result<ActionCallback> {
    let starts_with_brace = body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');
    if starts_with_brace {
        return serde_json::from_slice(body).map_err(|e| Error::Decode(e.to_string()));
    }
    let payload = url::form_urlencoded::parse(body)
        .find(|(k, _)| k == "payload")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| Error::Decode("missing payload field".to_string()))?;
    serde_json::from_str(&payload).map_err(|e| Error::Decode(e.to_string()))
}
