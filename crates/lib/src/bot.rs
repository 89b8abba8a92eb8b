//! Bot capability used by the supervisor and handed to handlers.
//!
//! Each bot owns its own backend session and receive loop; this crate only
//! needs to stop it and forward actions and jobs to it.

use crate::error::Result;
use crate::webhook::ActionCallback;
use std::fmt;
use std::sync::Arc;

/// A running bot instance.
pub trait Bot: Send + Sync {
    /// Name the bot is registered under (the workspace/team id it serves).
    fn name(&self) -> &str;
    /// Stop the bot's receive loop. Called exactly once per registration by `stop`.
    fn stop(&self) -> Result<()>;
    /// Interactive callback routed to this bot by the webhook listener.
    fn handle_action(&self, channel: &str, action: ActionCallback);
    /// Scheduled job to run against this bot.
    fn handle_job(&self, job: Job);
}

type JobFn = dyn Fn(&dyn Bot) -> Result<()> + Send + Sync;

/// Opaque unit of work forwarded to bots via [`Bot::handle_job`].
#[derive(Clone)]
pub struct Job {
    name: String,
    run: Arc<JobFn>,
}

impl Job {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&dyn Bot) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the job against `bot`. Bot implementations decide when and where.
    pub fn run(&self, bot: &dyn Bot) -> Result<()> {
        (self.run)(bot)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("name", &self.name).finish()
    }
}
