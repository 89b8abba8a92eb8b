//! Recording bot used by unit tests.

use crate::bot::{Bot, Job};
use crate::error::{Error, Result};
use crate::webhook::ActionCallback;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Record {
    stop_calls: usize,
    actions: Vec<(String, String)>,
    jobs: Vec<String>,
}

pub(crate) struct MockBot {
    name: String,
    fail_stop: bool,
    record: Mutex<Record>,
}

impl MockBot {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail_stop: false,
            record: Mutex::new(Record::default()),
        })
    }

    pub(crate) fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail_stop: true,
            record: Mutex::new(Record::default()),
        })
    }

    pub(crate) fn stop_calls(&self) -> usize {
        self.record.lock().unwrap().stop_calls
    }

    /// (channel, callback id) pairs in arrival order.
    pub(crate) fn actions(&self) -> Vec<(String, String)> {
        self.record.lock().unwrap().actions.clone()
    }

    pub(crate) fn jobs(&self) -> Vec<String> {
        self.record.lock().unwrap().jobs.clone()
    }
}

impl Bot for MockBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn stop(&self) -> Result<()> {
        self.record.lock().unwrap().stop_calls += 1;
        if self.fail_stop {
            return Err(Error::Bot {
                name: self.name.clone(),
                message: "connection already closed".to_string(),
            });
        }
        Ok(())
    }

    fn handle_action(&self, channel: &str, action: ActionCallback) {
        self.record
            .lock()
            .unwrap()
            .actions
            .push((channel.to_string(), action.callback_id));
    }

    fn handle_job(&self, job: Job) {
        self.record.lock().unwrap().jobs.push(job.name().to_string());
    }
}
