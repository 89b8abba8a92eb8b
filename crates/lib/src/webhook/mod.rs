//! Webhook: HTTP endpoint for interactive callbacks.
//!
//! Lifecycle is stopped -> listening (`bind` + `serve`) -> draining (shutdown
//! token cancelled, no new connections, bounded by the drain grace) -> stopped
//! (`serve` returned, socket closed).

mod payload;
mod server;

pub use payload::{decode_callback, ActionCallback, CallbackChannel, CallbackTeam, CallbackUser};
pub use server::{WebhookServer, DEFAULT_DRAIN_GRACE};
