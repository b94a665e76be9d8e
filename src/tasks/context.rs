use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// Deadline-bound cancellation shared by the login and sink-write tasks.
#[derive(Debug, Clone)]
pub struct TaskContext {
    deadline: Instant,
    cancelled: watch::Receiver<bool>,
}

/// Cancels every clone of the paired `TaskContext`. Dropping it cancels too.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl TaskContext {
    pub fn with_timeout(timeout: Duration) -> (CancelHandle, TaskContext) {
        let (tx, cancelled) = watch::channel(false);
        let ctx = TaskContext { deadline: Instant::now() + timeout, cancelled };
        (CancelHandle { tx }, ctx)
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Resolves once the deadline elapses or the context is cancelled.
    pub async fn done(&self) {
        let mut cancelled = self.cancelled.clone();
        tokio::select! {
            _ = sleep_until(self.deadline) => {}
            // Err means the handle was dropped, which counts as cancellation
            _ = cancelled.wait_for(|c| *c) => {}
        }
    }
}
