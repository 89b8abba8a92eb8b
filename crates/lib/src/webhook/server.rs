//! Webhook listener: accepts interactive callbacks on any path and forwards
//! them to the owning bot.

use crate::error::{Error, Result};
use crate::supervisor::BotSupervisor;
use crate::webhook::payload::decode_callback;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Shared state for request handlers.
#[derive(Clone)]
struct WebhookState {
    bots: Arc<BotSupervisor>,
    debug: bool,
}

/// How long open connections may keep `serve` alive after shutdown.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// A bound listener, ready to serve until its shutdown token fires.
pub struct WebhookServer {
    listener: TcpListener,
    state: WebhookState,
    drain_grace: Duration,
}

impl WebhookServer {
    /// Bind the listener (host:port). Connections queue until `serve` runs.
    pub async fn bind(addr: &str, bots: Arc<BotSupervisor>, debug: bool) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self {
            listener,
            state: WebhookState { bots, debug },
            drain_grace: DEFAULT_DRAIN_GRACE,
        })
    }

    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(Error::Serve)
    }

    /// Serve until `shutdown` is cancelled. On cancel the listener stops
    /// accepting and the socket is closed, so later connects are refused.
    /// In-flight requests get up to the drain grace to finish; after that
    /// `serve` returns without waiting for them.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        let addr = self.local_addr()?;
        let grace = self.drain_grace;
        let app = router(self.state);
        log::info!("webhook listening on {}", addr);
        let server = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned());
        let drain_expired = async {
            shutdown.cancelled().await;
            tokio::time::sleep(grace).await;
        };
        tokio::select! {
            res = server.into_future() => res.map_err(Error::Serve)?,
            _ = drain_expired => log::warn!(
                "webhook listener on {} did not drain within {:?}, abandoning open connections",
                addr,
                grace
            ),
        }
        log::info!("webhook listener on {} stopped", addr);
        Ok(())
    }
}

fn router(state: WebhookState) -> Router {
    Router::new().fallback(action_webhook).with_state(state)
}

/// Any path. 200 on a valid payload whether or not a bot owns it; 400 when
/// the payload cannot be decoded.
async fn action_webhook(
    State(state): State<WebhookState>,
    method: Method,
    body: Bytes,
) -> StatusCode {
    if method != Method::POST {
        return StatusCode::METHOD_NOT_ALLOWED;
    }
    let callback = match decode_callback(&body) {
        Ok(cb) => cb,
        Err(e) => {
            log::warn!("rejecting webhook request: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    let team = callback.team.id.clone();
    let channel = callback.channel.id.clone();
    if state.debug {
        log::debug!(
            "webhook callback {} from team {} channel {}",
            callback.callback_id,
            team,
            channel
        );
    }
    state.bots.dispatch_action(&team, &channel, callback).await;
    StatusCode::OK
}
