use std::time::Duration;

use crate::config::Config;
use crate::error::PollError;
use crate::notify::Notifier;
use crate::review::status::{parse_homework_status, StatusMode};
use crate::review::StatusSource;

const ERROR_NOTICE_PREFIX: &str = "Бот столкнулся с ошибкой";

#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub poll_interval: Duration,
    pub retry_interval: Duration,
    pub status_mode: StatusMode,
    pub notify_errors: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
            retry_interval: Duration::from_secs(5),
            status_mode: StatusMode::Strict,
            notify_errors: false,
        }
    }
}

impl From<&Config> for PollSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval,
            retry_interval: config.retry_interval,
            status_mode: config.status_mode,
            notify_errors: config.notify_errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Notified { homework: String },
    NoChanges,
}

/// Drives fetch, render and notify, carrying the `from_date` cursor between rounds.
pub struct Poller<S, N> {
    source: S,
    notifier: N,
    settings: PollSettings,
    cursor: i64,
}

impl<S: StatusSource, N: Notifier> Poller<S, N> {
    pub fn new(source: S, notifier: N, settings: PollSettings, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            settings,
            cursor,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// One round. The cursor only moves when the whole round succeeds.
    pub async fn poll_once(&mut self) -> Result<PollOutcome, PollError> {
        let response = self.source.fetch(self.cursor).await?;

        let outcome = match response.latest() {
            Some(homework) => {
                let message = parse_homework_status(homework, self.settings.status_mode)?;
                self.notifier.send(&message).await?;
                PollOutcome::Notified {
                    homework: homework.homework_name.clone(),
                }
            }
            None => PollOutcome::NoChanges,
        };

        if let Some(current_date) = response.current_date {
            self.cursor = current_date;
        }
        tracing::debug!(cursor = self.cursor, ?outcome, "Poll finished");

        Ok(outcome)
    }

    /// Run one round and report how long to wait before the next one.
    pub async fn tick(&mut self) -> Duration {
        match self.poll_once().await {
            Ok(_) => self.settings.poll_interval,
            Err(err) => {
                tracing::error!(kind = err.kind(), cursor = self.cursor, error = %err, "Poll failed");
                if self.settings.notify_errors {
                    self.report_error(&err).await;
                }
                self.settings.retry_interval
            }
        }
    }

    async fn report_error(&self, err: &PollError) {
        let notice = format!("{}: {}", ERROR_NOTICE_PREFIX, err);
        if let Err(send_err) = self.notifier.send(&notice).await {
            tracing::warn!(error = %send_err, "Could not deliver error notice");
        }
    }

    /// Poll until the process is killed.
    pub async fn run(&mut self) {
        tracing::info!(
            cursor = self.cursor,
            interval = ?self.settings.poll_interval,
            "Starting homework status polling"
        );
        loop {
            let delay = self.tick().await;
            tokio::time::sleep(delay).await;
        }
    }
}
