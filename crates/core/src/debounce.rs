//! A cancellable "run after a quiet period" task.
//!
//! Values pushed into a [`Debouncer`] restart its timer. Only the most recent value is kept
//! and it is handed to the callback once no new value has arrived for the quiet period. When
//! the owning cancellation token fires (or the debouncer is dropped) any pending value is
//! discarded without running.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debounce task on the current tokio runtime.
    ///
    /// `run` is called from the task, never concurrently with itself.
    pub fn spawn<F>(quiet_period: Duration, cancel: CancellationToken, mut run: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            let timer = sleep(quiet_period);
            tokio::pin!(timer);

            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    next = rx.recv() => match next {
                        Some(value) => {
                            pending = Some(value);
                            timer.as_mut().reset(Instant::now() + quiet_period);
                        }
                        None => break,
                    },
                    _ = &mut timer, if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            run(value);
                        }
                    }
                }
            }

            if pending.is_some() {
                tracing::debug!("debouncer stopped with a pending value; discarded");
            }
        });

        Self { tx, cancel, handle }
    }

    /// Schedules `value`, replacing any value still waiting for its quiet period.
    ///
    /// Returns `false` once the debouncer has been cancelled.
    pub fn push(&self, value: T) -> bool {
        !self.cancel.is_cancelled() && self.tx.send(value).is_ok()
    }
}

impl<T> Debouncer<T> {
    /// Stops the task; a pending value is dropped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels and waits for the task to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("debounce task ended abnormally: {}", e);
        }
    }
}
