use anyhow::Result;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::auth::AuthMethod;
use crate::cache::token::CachedToken;
use crate::resilience::retry::RetrySettings;
use crate::tasks::context::TaskContext;
use crate::tasks::done::{done_channel, DoneReceiver, DoneSignal};

pub struct LoginHandle {
    /// Single-slot mailbox for the login result.
    pub output: oneshot::Receiver<Result<CachedToken>>,
    pub done: DoneReceiver,
}

/// Spawn the login task. It retries `method` with backoff until it succeeds,
/// runs out of attempts, or `ctx` is done.
pub fn spawn<A: AuthMethod>(ctx: TaskContext, method: A, retry: RetrySettings) -> LoginHandle {
    let (output_tx, output) = oneshot::channel();
    let (done_signal, done) = done_channel();
    tokio::spawn(run(done_signal, ctx, method, retry, output_tx));
    LoginHandle { output, done }
}

// `_done` is the first parameter so it is dropped last, after the method.
async fn run<A: AuthMethod>(
    _done: DoneSignal,
    ctx: TaskContext,
    method: A,
    retry: RetrySettings,
    output: oneshot::Sender<Result<CachedToken>>,
) {
    info!("auth method '{}': authenticating", method.name());

    let result = tokio::select! {
        res = retry.run_with_retry(|| method.authenticate()) => res,
        _ = ctx.done() => {
            warn!("auth method '{}': stopped, context done", method.name());
            return;
        }
    };

    let result = match result {
        Ok(response) => {
            info!("auth method '{}': authentication successful", method.name());
            Ok(response.into_cached_token(method.name()))
        }
        Err(err) => {
            error!("auth method '{}': authentication failed: {:#}", method.name(), err);
            Err(err)
        }
    };

    if output.send(result).is_err() {
        debug!("auth method '{}': nobody waiting for the token", method.name());
    }
}
