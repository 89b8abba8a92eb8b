//! Client: owns the registries, the bot supervisor and the webhook listener,
//! and drives the run/stop lifecycle.
//!
//! Handlers run to completion on the task that invoked them; there is no
//! per-event timeout, so a slow controller delays only its own event.

use crate::bot::{Bot, Job};
use crate::config::ClientOptions;
use crate::controller::{ActionHandler, Controller, IntroHandler};
use crate::error::{Error, Result};
use crate::message::{Action, Channel, Message};
use crate::registry::{ActionRegistry, ControllerRegistry};
use crate::schedule::{Schedule, ScheduledJob};
use crate::supervisor::BotSupervisor;
use crate::webhook::WebhookServer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

struct Inner {
    token: String,
    options: ClientOptions,
    controllers: ControllerRegistry,
    actions: ActionRegistry,
    intro: RwLock<Option<Arc<dyn IntroHandler>>>,
    bots: Arc<BotSupervisor>,
    jobs: RwLock<Vec<ScheduledJob>>,
    shutdown: CancellationToken,
}

/// Dispatch runtime for a set of bots. Cloning shares the same instance;
/// separate `Client::new` calls share nothing.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    pub fn new(token: impl Into<String>, options: ClientOptions) -> Self {
        let bots = Arc::new(BotSupervisor::new(options.debug));
        Self {
            inner: Arc::new(Inner {
                token: token.into(),
                options,
                controllers: ControllerRegistry::new(),
                actions: ActionRegistry::new(),
                intro: RwLock::new(None),
                bots,
                jobs: RwLock::new(Vec::new()),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Credential for bot transports. Not interpreted here.
    pub fn token(&self) -> &str {
        &self.inner.token
    }

    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    pub async fn add_controller(&self, controller: Arc<dyn Controller>) {
        self.inner.controllers.add(controller).await;
    }

    /// First registered controller that can handle `msg`.
    pub async fn controller_for(&self, msg: &Message) -> Option<Arc<dyn Controller>> {
        self.inner.controllers.controller_for(msg).await
    }

    pub async fn add_action_handler(&self, id: impl Into<String>, handler: ActionHandler) {
        self.inner.actions.add(id, handler).await;
    }

    pub async fn action_handler(&self, id: &str) -> Option<ActionHandler> {
        self.inner.actions.get(id).await
    }

    /// Replace the intro handler.
    pub async fn set_intro_handler(&self, handler: Arc<dyn IntroHandler>) {
        *self.inner.intro.write().await = Some(handler);
    }

    /// Run the intro handler for a channel the bot joined. No handler set is not an error.
    pub async fn handle_intro(&self, bot: &dyn Bot, channel: &Channel) -> Result<()> {
        let handler = self.inner.intro.read().await.clone();
        match handler {
            Some(h) => h.handle_intro(bot, channel).await,
            None => {
                if self.inner.options.debug {
                    log::debug!("no intro handler set, ignoring join of {}", channel.id);
                }
                Ok(())
            }
        }
    }

    /// Register a running bot under `name` (the routing key webhook payloads
    /// carry). A bot already registered under that name is stopped and replaced.
    pub async fn add_bot(&self, name: impl Into<String>, bot: Arc<dyn Bot>) -> Result<()> {
        let name = name.into();
        match self.inner.bots.register(name.clone(), bot).await {
            Some(old) => {
                log::info!("bot {} replaced", name);
                old.stop()
            }
            None => {
                log::info!("bot {} registered", name);
                Ok(())
            }
        }
    }

    /// Route a message to its controller. Ok(false) when no controller claims it.
    /// Handler errors are returned to the caller (the bot's receive loop), not retried.
    pub async fn handle_message(&self, bot: &dyn Bot, msg: &Message) -> Result<bool> {
        let Some(controller) = self.controller_for(msg).await else {
            if self.inner.options.debug {
                log::debug!("no controller for message in {}", msg.channel.id);
            }
            return Ok(false);
        };
        controller.handle(bot, msg).await?;
        Ok(true)
    }

    /// Invoke the action handler registered for `action.callback_id`.
    /// Returns false when none is registered.
    pub async fn handle_action(&self, bot: &dyn Bot, action: Action) -> bool {
        let Some(handler) = self.action_handler(&action.callback_id).await else {
            if self.inner.options.debug {
                log::debug!("no action handler for {}", action.callback_id);
            }
            return false;
        };
        handler(bot, action);
        true
    }

    /// Run `job` on every bot whenever `schedule` comes due. Takes effect on the next `run`.
    pub async fn add_scheduled_job(&self, schedule: Arc<dyn Schedule>, job: Job) {
        self.inner
            .jobs
            .write()
            .await
            .push(ScheduledJob { schedule, job });
    }

    /// Start the webhook listener (when enabled) and scheduled jobs, then block
    /// until `stop` is called. Bot failures never end `run`; a listener that
    /// fails is reported once `stop` has been called. Open webhook connections
    /// delay the return by at most `drain_grace_ms`.
    pub async fn run(&self) -> Result<()> {
        let shutdown = self.inner.shutdown.clone();
        if shutdown.is_cancelled() {
            log::debug!("client already stopped, run returns immediately");
            return Ok(());
        }

        let webhook = if self.inner.options.enable_webhook {
            let server = WebhookServer::bind(
                &self.inner.options.webhook_addr,
                self.inner.bots.clone(),
                self.inner.options.debug,
            )
            .await?
            .with_drain_grace(Duration::from_millis(self.inner.options.drain_grace_ms));
            Some(tokio::spawn(server.serve(shutdown.clone())))
        } else {
            log::debug!("webhook disabled");
            None
        };

        let jobs: Vec<ScheduledJob> = self.inner.jobs.read().await.clone();
        let job_tasks: Vec<_> = jobs
            .into_iter()
            .map(|j| j.spawn(self.inner.bots.clone(), shutdown.clone()))
            .collect();

        log::info!(
            "client running with {} bot(s), {} scheduled job(s)",
            self.inner.bots.len().await,
            job_tasks.len()
        );
        shutdown.cancelled().await;

        for result in futures_util::future::join_all(job_tasks).await {
            if let Err(e) = result {
                log::warn!("scheduled job task failed: {}", e);
            }
        }
        if let Some(handle) = webhook {
            handle
                .await
                .map_err(|e| Error::Serve(std::io::Error::other(e)))??;
        }
        log::info!("client stopped");
        Ok(())
    }

    /// Signal the webhook listener to drain, stop every bot once, and unblock
    /// `run`. Returns the first bot stop error; all bots are attempted.
    pub async fn stop(&self) -> Result<()> {
        log::info!("stopping client");
        self.inner.shutdown.cancel();
        self.inner.bots.stop_all().await
    }
}
