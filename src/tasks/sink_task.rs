use anyhow::{anyhow, Result};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::cache::token::CachedToken;
use crate::helpers::time::get_instant;
use crate::sinks::TokenSink;
use crate::tasks::context::TaskContext;
use crate::tasks::done::{done_channel, DoneReceiver, DoneSignal};

pub struct SinkHandle {
    /// Hand the freshly issued token to the task.
    pub input: oneshot::Sender<CachedToken>,
    /// Outcome of writing every sink.
    pub result: oneshot::Receiver<Result<()>>,
    pub done: DoneReceiver,
}

/// Spawn the sink-write task. It idles until a token arrives on `input`.
pub fn spawn<S: TokenSink>(ctx: TaskContext, sinks: Vec<S>) -> SinkHandle {
    let (input, input_rx) = oneshot::channel();
    let (result_tx, result) = oneshot::channel();
    let (done_signal, done) = done_channel();
    tokio::spawn(run(done_signal, ctx, sinks, input_rx, result_tx));
    SinkHandle { input, result, done }
}

async fn run<S: TokenSink>(
    _done: DoneSignal,
    ctx: TaskContext,
    sinks: Vec<S>,
    input: oneshot::Receiver<CachedToken>,
    result: oneshot::Sender<Result<()>>,
) {
    let token = tokio::select! {
        token = input => match token {
            Ok(token) => token,
            Err(_) => {
                debug!("sink writer: no token handed over");
                return;
            }
        },
        _ = ctx.done() => {
            debug!("sink writer: context done before a token arrived");
            return;
        }
    };

    let outcome = tokio::select! {
        res = write_all(&sinks, &token) => res,
        _ = ctx.done() => {
            warn!("sink writer: context done while writing token");
            return;
        }
    };

    if result.send(outcome).is_err() {
        debug!("sink writer: nobody waiting for the result");
    }
}

/// Write `token` to every sink in order. Any failed sink fails the whole write.
async fn write_all<S: TokenSink>(sinks: &[S], token: &CachedToken) -> Result<()> {
    let start = get_instant();
    let mut failed = Vec::new();
    for sink in sinks {
        if let Err(err) = sink.write(token).await {
            error!("sink '{}': write failed: {:#}", sink.name(), err);
            failed.push(sink.name().to_owned());
        }
    }
    if !failed.is_empty() {
        return Err(anyhow!("failed to write token to sink(s): {}", failed.join(", ")));
    }
    info!("token written to {} sink(s) in {:?}", sinks.len(), start.elapsed());
    Ok(())
}
