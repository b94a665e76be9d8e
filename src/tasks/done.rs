use tokio::sync::oneshot;

/// Completion signal of a background task.
///
/// Fires when dropped, so every exit path of the owning task (return,
/// error, cancellation, panic unwinding, runtime shutdown) signals exactly once.
#[derive(Debug)]
pub struct DoneSignal(Option<oneshot::Sender<()>>);

#[derive(Debug)]
pub struct DoneReceiver(oneshot::Receiver<()>);

pub fn done_channel() -> (DoneSignal, DoneReceiver) {
    let (tx, rx) = oneshot::channel();
    (DoneSignal(Some(tx)), DoneReceiver(rx))
}

impl Drop for DoneSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

impl DoneReceiver {
    /// Wait until the task finished. A dropped sender counts as finished.
    pub async fn wait(self) {
        let _ = self.0.await;
    }
}
