//! Perch — dispatch runtime for chat bots: routes messages to controllers,
//! interactive callbacks to action handlers, and supervises running bots and
//! the inbound webhook listener.

pub mod bot;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod message;
pub mod registry;
pub mod schedule;
pub mod supervisor;
pub mod webhook;

#[cfg(test)]
mod test_support;

pub use bot::{Bot, Job};
pub use client::Client;
pub use config::ClientOptions;
pub use controller::{ActionHandler, Controller, IntroHandler};
pub use error::{Error, Result};
pub use message::{Action, Channel, Message, User, UserAction};
pub use webhook::ActionCallback;
