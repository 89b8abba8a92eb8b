//! Bot supervisor: named set of running bots, action/job forwarding, coordinated stop.

use crate::bot::{Bot, Job};
use crate::error::Result;
use crate::webhook::ActionCallback;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Registry of bot name to running bot. Names are unique keys.
#[derive(Default)]
pub struct BotSupervisor {
    inner: RwLock<HashMap<String, Arc<dyn Bot>>>,
    debug: bool,
}

impl BotSupervisor {
    pub fn new(debug: bool) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            debug,
        }
    }

    /// Register `bot` under `name`. Returns the bot previously registered under
    /// that name, if any; it is no longer supervised.
    pub async fn register(&self, name: impl Into<String>, bot: Arc<dyn Bot>) -> Option<Arc<dyn Bot>> {
        self.inner.write().await.insert(name.into(), bot)
    }

    pub async fn get(&self, name: &str) -> Option<Arc<dyn Bot>> {
        self.inner.read().await.get(name).cloned()
    }

    pub async fn names(&self) -> Vec<String> {
        self.inner.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Forward an interactive callback to the bot registered as `name`.
    /// Returns false (action dropped) when no such bot exists.
    pub async fn dispatch_action(&self, name: &str, channel: &str, action: ActionCallback) -> bool {
        let Some(bot) = self.get(name).await else {
            if self.debug {
                log::debug!(
                    "no bot registered for {}, dropping action {}",
                    name,
                    action.callback_id
                );
            }
            return false;
        };
        if self.debug {
            log::debug!(
                "action {} in channel {} routed to bot {}",
                action.callback_id,
                channel,
                name
            );
        }
        bot.handle_action(channel, action);
        true
    }

    /// Hand `job` to every registered bot.
    pub async fn dispatch_job(&self, job: &Job) {
        let bots: Vec<Arc<dyn Bot>> = self.inner.read().await.values().cloned().collect();
        if self.debug {
            log::debug!("job {} dispatched to {} bot(s)", job.name(), bots.len());
        }
        for bot in bots {
            bot.handle_job(job.clone());
        }
    }

    /// Stop every bot exactly once. A failing bot does not prevent stopping
    /// the rest; the first error is returned. Stopped bots are removed.
    pub async fn stop_all(&self) -> Result<()> {
        let bots: Vec<(String, Arc<dyn Bot>)> = {
            let mut g = self.inner.write().await;
            g.drain().collect()
        };
        let mut first_err = None;
        for (name, bot) in bots {
            match bot.stop() {
                Ok(()) => log::debug!("bot {} stopped", name),
                Err(e) => {
                    log::warn!("stopping bot {} failed: {}", name, e);
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_support::MockBot;

    fn callback(id: &str) -> ActionCallback {
        serde_json::from_value(serde_json::json!({
            "callback_id": id,
            "team": {"id": "T1"},
            "channel": {"id": "C1"},
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn dispatch_action_targets_one_bot() {
        let sup = BotSupervisor::new(true);
        let a = MockBot::new("a");
        let b = MockBot::new("b");
        sup.register("a", a.clone()).await;
        sup.register("b", b.clone()).await;

        assert!(sup.dispatch_action("a", "C1", callback("cb")).await);
        assert_eq!(a.actions(), vec![("C1".to_string(), "cb".to_string())]);
        assert!(b.actions().is_empty());
    }

    #[tokio::test]
    async fn dispatch_action_to_unknown_bot_is_dropped() {
        let sup = BotSupervisor::new(false);
        let a = MockBot::new("a");
        sup.register("a", a.clone()).await;
        assert!(!sup.dispatch_action("zzz", "C1", callback("cb")).await);
        assert!(a.actions().is_empty());
    }

    #[tokio::test]
    async fn register_same_name_overwrites() {
        let sup = BotSupervisor::new(false);
        let a = MockBot::new("a");
        let a2 = MockBot::new("a");
        assert!(sup.register("a", a.clone()).await.is_none());
        let old = sup.register("a", a2.clone()).await.unwrap();
        assert_eq!(old.name(), "a");
        assert_eq!(sup.len().await, 1);
        sup.stop_all().await.unwrap();
        assert_eq!(a.stop_calls(), 0);
        assert_eq!(a2.stop_calls(), 1);
    }

    #[tokio::test]
    async fn stop_all_stops_each_bot_once_and_keeps_going_after_errors() {
        let sup = BotSupervisor::new(false);
        let ok = MockBot::new("ok");
        let bad = MockBot::failing("bad");
        let ok2 = MockBot::new("ok2");
        sup.register("ok", ok.clone()).await;
        sup.register("bad", bad.clone()).await;
        sup.register("ok2", ok2.clone()).await;

        let err = sup.stop_all().await.unwrap_err();
        assert!(matches!(err, Error::Bot { ref name, .. } if name == "bad"));
        assert_eq!(ok.stop_calls(), 1);
        assert_eq!(bad.stop_calls(), 1);
        assert_eq!(ok2.stop_calls(), 1);

        sup.stop_all().await.unwrap();
        assert_eq!(ok.stop_calls(), 1);
        assert!(sup.is_empty().await);
    }

    #[tokio::test]
    async fn dispatch_job_reaches_every_bot() {
        let sup = BotSupervisor::new(false);
        let a = MockBot::new("a");
        let b = MockBot::new("b");
        sup.register("a", a.clone()).await;
        sup.register("b", b.clone()).await;
        sup.dispatch_job(&Job::new("tick", |_bot| Ok(()))).await;
        assert_eq!(a.jobs(), vec!["tick".to_string()]);
        assert_eq!(b.jobs(), vec!["tick".to_string()]);
        let mut names = sup.names().await;
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }
}
