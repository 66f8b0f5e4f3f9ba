// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-interval, cancellable background scheduler.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Default time between two polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(7);

/// Runs an action on a fixed period in a background task.
///
/// The action runs once immediately, then again `interval` after each run
/// completes, so two runs never overlap. Errors (and panics) from the action
/// are logged and the schedule continues.
///
/// Cancellation is checked before every run and raced against the wait
/// between runs. A run already in progress is never interrupted; once
/// cancellation is observed no further run begins.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use yeegroup_lib::poll::PollingScheduler;
///
/// # async fn example() {
/// let handle = PollingScheduler::new(Duration::from_secs(7)).start(|| async {
///     // query the bulbs...
///     Ok(())
/// });
///
/// // later
/// handle.shutdown().await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PollingScheduler {
    interval: Duration,
    token: CancellationToken,
}

impl PollingScheduler {
    /// Creates a scheduler with its own cancellation token.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            token: CancellationToken::new(),
        }
    }

    /// Uses an external cancellation token.
    ///
    /// Cancelling `token` (or any of its parents) stops the schedule.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Returns the interval between runs.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawns the schedule on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<F, Fut>(self, mut action: F) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let Self { interval, token } = self;
        let runs = Arc::new(AtomicU64::new(0));
        let task_runs = Arc::clone(&runs);
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            tracing::info!(?interval, "Polling started");

            loop {
                if task_token.is_cancelled() {
                    break;
                }

                let run = task_runs.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!(run, "Poll tick");

                match AssertUnwindSafe(action()).catch_unwind().await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::warn!(run, error = %e, "Poll failed"),
                    Err(_) => tracing::error!(run, "Poll action panicked"),
                }

                tokio::select! {
                    biased;
                    () = task_token.cancelled() => break,
                    () = tokio::time::sleep(interval) => {}
                }
            }

            tracing::info!("Polling stopped");
        });

        PollHandle {
            token,
            runs,
            task: Some(task),
        }
    }
}

impl Default for PollingScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

/// Handle to a running schedule.
///
/// Dropping the handle cancels the schedule.
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    runs: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Requests cancellation. No new run begins after this returns.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Cancels the schedule and waits for the background task to finish,
    /// including a run that was in progress.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!(error = %e, "Polling task ended abnormally");
        }
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns `true` once the background task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Number of runs started so far.
    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    /// A clone of the cancellation token.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
