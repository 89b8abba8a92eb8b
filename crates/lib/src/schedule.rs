//! Recurring jobs: a schedule decides when, every registered bot receives the job.

use crate::bot::Job;
use crate::supervisor::BotSupervisor;
use chrono::{DateTime, NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// When a job should next run, given the current time.
pub trait Schedule: Send + Sync {
    fn next(&self, now: DateTime<Utc>) -> DateTime<Utc>;
}

/// Fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Every(Duration);

impl Every {
    /// None for a zero interval.
    pub fn new(interval: Duration) -> Option<Self> {
        (!interval.is_zero()).then_some(Self(interval))
    }
}

impl Schedule for Every {
    fn next(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.0)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Once a day at a fixed UTC time.
#[derive(Debug, Clone, Copy)]
pub struct DailyAt(NaiveTime);

impl DailyAt {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }
}

impl Schedule for DailyAt {
    fn next(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive().and_time(self.0).and_utc();
        if today > now {
            today
        } else {
            today + chrono::Duration::days(1)
        }
    }
}

/// A job paired with its schedule, registered on the client before `run`.
#[derive(Clone)]
pub(crate) struct ScheduledJob {
    pub(crate) schedule: Arc<dyn Schedule>,
    pub(crate) job: Job,
}

impl ScheduledJob {
    /// Run the job on every bot each time the schedule comes due, until `shutdown` fires.
    pub(crate) fn spawn(
        self,
        bots: Arc<BotSupervisor>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let wait = (self.schedule.next(now) - now)
                    .to_std()
                    .unwrap_or(Duration::ZERO);
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(wait) => bots.dispatch_job(&self.job).await,
                }
            }
            log::debug!("scheduled job {} stopped", self.job.name());
        })
    }
}
