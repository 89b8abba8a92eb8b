//! Error type shared by the dispatch core.

use std::io;

/// Failures surfaced by the client, its handlers, and the webhook listener.
///
/// "No handler registered" is not an error: lookups return `Option`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("binding webhook listener to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("webhook listener failed: {0}")]
    Serve(#[source] io::Error),
    #[error("decoding interactive payload: {0}")]
    Decode(String),
    #[error("handler failed: {0}")]
    Handler(String),
    #[error("stopping bot {name}: {message}")]
    Bot { name: String, message: String },
}

impl Error {
    /// Convenience for handler implementations reporting a failure.
    pub fn handler(message: impl Into<String>) -> Self {
        Error::Handler(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
